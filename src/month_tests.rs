#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_previous_month_simple() {
    assert_eq!(previous_month("2025-03").unwrap(), "2025-02");
    assert_eq!(previous_month("2025-10").unwrap(), "2025-09");
}

#[test]
fn test_previous_month_rolls_year() {
    assert_eq!(previous_month("2025-01").unwrap(), "2024-12");
}

#[test]
fn test_next_month_rolls_year() {
    assert_eq!(next_month("2024-12").unwrap(), "2025-01");
    assert_eq!(next_month("2024-02").unwrap(), "2024-03");
}

#[test]
fn test_previous_then_next_is_identity() {
    for m in ["2020-01", "2023-06", "2024-12"] {
        assert_eq!(next_month(&previous_month(m).unwrap()).unwrap(), m);
    }
}

#[test]
fn test_invalid_months_rejected() {
    for bad in ["", "2025", "2025-13", "2025-00", "25-01", "2025-1", "abcd-ef", "2025/01"] {
        assert!(!is_valid_month(bad), "{bad} should be invalid");
        assert!(previous_month(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn test_valid_month() {
    assert!(is_valid_month("2025-03"));
    assert!(is_valid_month(&current_month()));
}
