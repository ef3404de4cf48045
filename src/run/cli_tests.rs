#![allow(clippy::unwrap_used)]

use super::*;
use monthbudget::{AmountSign, CategoryType};
use std::io::Write;

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("monthbudget")
        .chain(list.iter().copied())
        .map(String::from)
        .collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ── Argument helpers ──────────────────────────────────────────

#[test]
fn test_month_arg() {
    assert_eq!(month_arg(Some(&"2025-03".to_string())).unwrap(), "2025-03");
    assert_eq!(month_arg(None).unwrap(), current_month());
    assert_eq!(month_arg(Some(&"--month".to_string())).unwrap(), current_month());
    assert!(month_arg(Some(&"March".to_string())).is_err());
}

#[test]
fn test_flag_value() {
    let a = strings(&["Food", "--month", "2025-03", "Fun"]);
    assert_eq!(flag_value(&a, "--month").unwrap(), "2025-03");
    assert!(flag_value(&a, "--account").is_none());
    assert!(flag_value(&strings(&["--month"]), "--month").is_none());
}

#[test]
fn test_positional_skips_flags() {
    let a = strings(&["Food", "--month", "2025-03", "Fun", "12.50"]);
    assert_eq!(positional(&a), vec!["Food", "Fun", "12.50"]);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn test_import_copy_and_rollover() {
    let mut db = Database::open_in_memory().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"income": {{"Salary": {{"expected": 5000, "tags": ["salary"]}}}},
            "expenses": {{"Food": {{"expected": 400, "tags": ["food"]}}}}}}"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    as_cli(&args(&["import-config", path, "--month", "2025-03"]), &mut db).unwrap();
    assert_eq!(db.load_categories("2025-03").unwrap().len(), 2);

    as_cli(&args(&["copy", "2025-04"]), &mut db).unwrap();
    assert_eq!(db.load_categories("2025-04").unwrap().len(), 2);

    as_cli(
        &args(&["rollover", "Food", "Food", "37.5", "--month", "2025-03"]),
        &mut db,
    )
    .unwrap();
    let incoming = db.load_incoming_rollovers("2025-04").unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].amount, Decimal::from_str("37.5").unwrap());

    as_cli(&args(&["show", "2025-04"]), &mut db).unwrap();
    as_cli(&args(&["export-config", "2025-04"]), &mut db).unwrap();
    as_cli(&args(&["months"]), &mut db).unwrap();

    as_cli(&args(&["clear-rollovers", "2025-03"]), &mut db).unwrap();
    assert!(db.load_incoming_rollovers("2025-04").unwrap().is_empty());
}

#[test]
fn test_copy_with_explicit_source() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["copy", "2025-01", "2025-06"]), &mut db).unwrap();
    assert!(db.load_categories("2025-06").unwrap().is_empty());
}

#[test]
fn test_bad_input_is_error() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["bogus"]), &mut db).is_err());
    assert!(as_cli(&args(&["copy"]), &mut db).is_err());
    assert!(as_cli(&args(&["show", "2025-13"]), &mut db).is_err());
    assert!(as_cli(&args(&["rollover", "Food", "Food", "lots"]), &mut db).is_err());
    assert!(as_cli(&args(&["rollover", "Food"]), &mut db).is_err());
    assert!(as_cli(&args(&["import-config", "/no/such/file.json"]), &mut db).is_err());
}

#[test]
fn test_import_empty_config_is_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    for body in ["{}", r#"{"income": {}, "expenses": null}"#] {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{body}").unwrap();
        let path = file.path().to_str().unwrap();
        let err = as_cli(&args(&["import-config", path, "--month", "2025-03"]), &mut db).unwrap_err();
        assert!(err.to_string().contains("no income or expense categories"));
    }
    assert!(!db.has_any_categories().unwrap());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"expenses": {{"Rent": {{"expected": 1800}}}}}}"#).unwrap();
    let path = file.path().to_str().unwrap();
    as_cli(&args(&["import-config", path, "--month", "2025-03"]), &mut db).unwrap();
    assert_eq!(db.load_categories("2025-03").unwrap().len(), 1);
}

// ── match ─────────────────────────────────────────────────────

#[test]
fn test_matching_categories() {
    let mut db = Database::open_in_memory().unwrap();
    let ids = monthbudget::ids::SequentialIds::new("m");
    let food = BudgetCategory::new(&ids, CategoryType::Expense, "Food".into(), Decimal::from(400), strings(&["food", "coffee"]));
    let mut dining = BudgetCategory::new(&ids, CategoryType::Expense, "Dining".into(), Decimal::from(100), strings(&["food", "restaurant"]));
    dining.require_all = true;
    let mut refunds = BudgetCategory::new(&ids, CategoryType::Income, "Refunds".into(), Decimal::ZERO, strings(&["food"]));
    refunds.amount_sign = Some(AmountSign::Positive);
    db.save_all_categories("2025-03", &[food, dining, refunds]).unwrap();

    let names = |tags: &[&str], amount: &str| -> Vec<String> {
        matching_categories(&db, "2025-03", &strings(tags), Decimal::from_str(amount).unwrap())
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect()
    };
    assert_eq!(names(&["FOOD"], "-12.50"), vec!["Food"]);
    assert_eq!(names(&["food", "restaurant"], "-40"), vec!["Food", "Dining"]);
    assert_eq!(names(&["food"], "8"), vec!["Refunds", "Food"]);
    assert!(names(&["rent"], "-1800").is_empty());
    assert!(matching_categories(&db, "2025-04", &strings(&["food"]), Decimal::ONE).unwrap().is_empty());
}

#[test]
fn test_match_command() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["match", "-12.50", "food", "--month", "2025-03"]), &mut db).unwrap();
    assert!(as_cli(&args(&["match"]), &mut db).is_err());
    assert!(as_cli(&args(&["match", "lots", "food"]), &mut db).is_err());
    assert!(as_cli(&args(&["match", "5", "--month", "March"]), &mut db).is_err());
}
