#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

#[test]
fn test_format_amount_separators() {
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_amount(dec!(1000)), "1,000.00");
    assert_eq!(format_amount(dec!(999.5)), "999.50");
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-1800)), "-1,800.00");
    assert_eq!(format_amount(dec!(-0.25)), "-0.25");
}

#[test]
fn test_format_amount_rounds() {
    assert_eq!(format_amount(dec!(12.345)), "12.34");
    assert_eq!(format_amount(dec!(12.355)), "12.36");
    assert_eq!(format_amount(dec!(-0.001)), "0.00");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Groceries", 5), "Groc…");
    assert_eq!(truncate("Café au lait", 5), "Café…");
    assert_eq!(truncate("abc", 0), "");
}

#[test]
fn test_format_tags() {
    let tags = vec!["food".to_string(), "groceries".to_string()];
    assert_eq!(format_tags(&tags, false), "food, groceries");
    assert_eq!(format_tags(&tags, true), "food & groceries");
    assert_eq!(format_tags(&[], false), "-");
}
