use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use monthbudget::config::ConfigDocument;
use monthbudget::month::{current_month, is_valid_month, next_month, previous_month};
use monthbudget::{BudgetCategory, Database, Transfer};

use super::format::{format_amount, format_tags, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_show(&[], db);
    };
    let rest = &args[2..];
    match command.as_str() {
        "show" | "s" => cli_show(rest, db),
        "months" => cli_months(db),
        "copy" => cli_copy(rest, db),
        "rollover" => cli_rollover(rest, db),
        "clear-rollovers" => cli_clear_rollovers(rest, db),
        "import-config" => cli_import_config(rest, db),
        "export-config" => cli_export_config(rest, db),
        "match" => cli_match(rest, db),
        "prev-month" => {
            let month = month_arg(rest.first())?;
            println!("{}", previous_month(&month)?);
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("monthbudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("monthbudget - month-by-month budget categories and rollovers");
    println!();
    println!("Usage: monthbudget [command]");
    println!();
    println!("Commands:");
    println!("  show [YYYY-MM]                       Show categories and rollovers (default)");
    println!("  months                               List months with budget data");
    println!("  copy [from] <to>                     Copy categories (from defaults to the month before <to>)");
    println!("  rollover <from> <to> <amount>        Move an amount into next month's category");
    println!("    --month <YYYY-MM>                  Source month (default: current)");
    println!("  clear-rollovers [YYYY-MM]            Delete a month's outgoing rollovers");
    println!("  import-config <file.json>            Seed an empty store from a legacy config");
    println!("    --month <YYYY-MM>                  Month to file categories under (default: current)");
    println!("  export-config [YYYY-MM]              Print a month as a legacy config document");
    println!("  match <amount> [tag...]              Categories a transaction would count toward");
    println!("    --month <YYYY-MM>                  Month to check (default: current)");
    println!("  prev-month [YYYY-MM]                 Print the month before");
    println!("  --help, -h                           Show this help");
    println!("  --version, -V                        Show version");
    println!();
    println!("Environment:");
    println!("  MONTHBUDGET_DB                       Database file (default: data directory)");
    println!("  RUST_LOG                             Log filter, e.g. debug");
}

/// A month argument, defaulting to the current month when absent.
pub(crate) fn month_arg(arg: Option<&String>) -> Result<String> {
    let month = arg
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(current_month);
    if !is_valid_month(&month) {
        anyhow::bail!("Invalid month '{month}', expected YYYY-MM");
    }
    Ok(month)
}

/// Value following `--flag`, if present.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| &w[1])
}

/// Arguments that are neither flags nor flag values.
pub(crate) fn positional(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if arg.starts_with("--") {
            skip = true;
        } else {
            out.push(arg);
        }
    }
    out
}

fn cli_show(args: &[String], db: &mut Database) -> Result<()> {
    let month = month_arg(args.first())?;
    let data = db.load_month_data(&month)?;

    println!("Budget - {month}");
    println!("{}", "─".repeat(60));
    if data.categories.is_empty() {
        println!("  No categories. Try: monthbudget copy {month}");
    }

    let mut current_type = None;
    for cat in &data.categories {
        if current_type != Some(cat.category_type) {
            current_type = Some(cat.category_type);
            println!();
            println!("  {}", if cat.is_income() { "Income" } else { "Expenses" });
        }
        let sign = match cat.amount_sign {
            Some(s) => format!(" ({})", s.as_str()),
            None => String::new(),
        };
        println!(
            "    {:<24} {:>12}  {}{sign}",
            truncate(&cat.name, 24),
            format_amount(cat.expected),
            format_tags(&cat.tags, cat.require_all),
        );
    }

    print_transfers("Rollovers in", &data.incoming_rollovers, data.incoming_total());
    print_transfers("Rollovers out", &data.outgoing_rollovers, data.outgoing_total());
    Ok(())
}

fn print_transfers(title: &str, transfers: &[Transfer], total: Decimal) {
    if transfers.is_empty() {
        return;
    }
    println!();
    println!("  {title} (total {})", format_amount(total));
    for t in transfers {
        println!(
            "    {:<20} → {:<20} {:>12}",
            truncate(&t.from_category, 20),
            truncate(&t.to_category, 20),
            format_amount(t.amount),
        );
    }
}

fn cli_months(db: &mut Database) -> Result<()> {
    let months = db.get_months_with_data()?;
    if months.is_empty() {
        println!("No budget data");
        return Ok(());
    }
    for month in &months {
        println!("{month}");
    }
    Ok(())
}

fn cli_copy(args: &[String], db: &mut Database) -> Result<()> {
    let (from, to) = match args {
        [to] => {
            let to = month_arg(Some(to))?;
            (previous_month(&to)?, to)
        }
        [from, to, ..] => (month_arg(Some(from))?, month_arg(Some(to))?),
        [] => anyhow::bail!("Usage: monthbudget copy [from] <to>"),
    };

    if db.has_categories(&to)? {
        println!("Replacing existing categories in {to}");
    }
    let copied = db.copy_from_month(&from, &to)?;
    if copied.is_empty() {
        println!("No categories in {from}, nothing copied");
    } else {
        println!("Copied {} categories from {from} to {to}", copied.len());
    }
    Ok(())
}

fn cli_rollover(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let [from_category, to_category, amount] = pos.as_slice() else {
        anyhow::bail!("Usage: monthbudget rollover <from-category> <to-category> <amount> [--month YYYY-MM]");
    };
    let amount = Decimal::from_str(amount)
        .with_context(|| format!("Invalid amount: {amount}"))?;
    let source_month = month_arg(flag_value(args, "--month"))?;
    let to_month = next_month(&source_month)?;

    let transfer = Transfer::new(
        db.ids(),
        from_category.to_string(),
        to_category.to_string(),
        amount,
    );
    db.save_rollover(&source_month, &to_month, &transfer)?;
    println!(
        "Rolled {} from {from_category} ({source_month}) into {to_category} ({to_month})",
        format_amount(amount)
    );
    Ok(())
}

fn cli_clear_rollovers(args: &[String], db: &mut Database) -> Result<()> {
    let month = month_arg(args.first())?;
    let count = db.load_outgoing_rollovers(&month)?.len();
    db.delete_month_rollovers(&month)?;
    println!("Deleted {count} rollovers from {month}");
    Ok(())
}

fn cli_import_config(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file_path) = positional(args).first().copied() else {
        anyhow::bail!("Usage: monthbudget import-config <file.json> [--month YYYY-MM]");
    };
    let path = Path::new(file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }
    let month = month_arg(flag_value(args, "--month"))?;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = ConfigDocument::from_json(&text)?;
    if doc.is_empty() {
        anyhow::bail!("{file_path} has no income or expense categories");
    }

    let created = db.migrate_legacy_config(&month, &doc)?;
    if created.is_empty() {
        println!("Budget data already exists; legacy config not imported");
    } else {
        println!("Imported {} categories into {month}", created.len());
    }
    Ok(())
}

fn cli_export_config(args: &[String], db: &mut Database) -> Result<()> {
    let month = month_arg(args.first())?;
    let doc = db.export_config(&month)?;
    println!("{}", doc.to_json_pretty()?);
    Ok(())
}

fn cli_match(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let Some((amount, tags)) = pos.split_first() else {
        anyhow::bail!("Usage: monthbudget match <amount> [tag...] [--month YYYY-MM]");
    };
    let amount = Decimal::from_str(amount)
        .with_context(|| format!("Invalid amount: {amount}"))?;
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    let month = month_arg(flag_value(args, "--month"))?;

    let matched = matching_categories(db, &month, &tags, amount)?;
    if matched.is_empty() {
        println!("No category in {month} matches {}", format_tags(&tags, false));
    }
    for cat in &matched {
        println!(
            "  {:<24} {}",
            truncate(&cat.name, 24),
            format_tags(&cat.tags, cat.require_all)
        );
    }
    Ok(())
}

/// Categories of `month` that a transaction with `tags` and `amount` counts toward.
pub(crate) fn matching_categories(
    db: &Database,
    month: &str,
    tags: &[String],
    amount: Decimal,
) -> Result<Vec<BudgetCategory>> {
    Ok(db
        .load_categories(month)?
        .into_iter()
        .filter(|cat| cat.matches(tags, amount))
        .collect())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
