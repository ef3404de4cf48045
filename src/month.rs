use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Parse a `YYYY-MM` key into the first day of that month.
fn first_day(month: &str) -> Result<NaiveDate> {
    let (year, m) = month
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{month}', expected YYYY-MM"))?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || m.len() != 2 || !digits(year) || !digits(m) {
        anyhow::bail!("Invalid month '{month}', expected YYYY-MM");
    }
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in month '{month}'"))?;
    let m: u32 = m
        .parse()
        .with_context(|| format!("Invalid month number in '{month}'"))?;
    NaiveDate::from_ymd_opt(year, m, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{month}', expected YYYY-MM"))
}

fn format_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn is_valid_month(month: &str) -> bool {
    first_day(month).is_ok()
}

/// The month before `month`, rolling the year: `2025-01` → `2024-12`.
pub fn previous_month(month: &str) -> Result<String> {
    let date = first_day(month)?
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| anyhow::anyhow!("No month before '{month}'"))?;
    Ok(format_month(date))
}

/// The month after `month`, rolling the year: `2024-12` → `2025-01`.
pub fn next_month(month: &str) -> Result<String> {
    let date = first_day(month)?
        .checked_add_months(Months::new(1))
        .ok_or_else(|| anyhow::anyhow!("No month after '{month}'"))?;
    Ok(format_month(date))
}

pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

#[cfg(test)]
#[path = "month_tests.rs"]
mod tests;
