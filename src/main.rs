mod run;

use anyhow::{Context, Result};
use monthbudget::Database;

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = Database::open(&db_path)?;

    run::as_cli(&args, &mut db)
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn get_db_path() -> Result<std::path::PathBuf> {
    if let Ok(path) = std::env::var("MONTHBUDGET_DB") {
        return Ok(path.into());
    }
    let proj_dirs = directories::ProjectDirs::from("com", "monthbudget", "MonthBudget")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("monthbudget.db"))
}
