use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::*;
use crate::errors::*;
use crate::types::*;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_iso_date(iso_date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(iso_date, ISO_DATE_FORMAT)
        .chain_err(|| format!("Invalid ISO date string (YYYY-MM-DD): {}", iso_date))
}

/// Parses a non-negative amount with at most two decimal places.
pub fn parse_amount(amount: &str) -> Result<Amount> {
    let trimmed = amount.trim();
    ensure!(
        AMOUNT_REGEX.is_match(trimmed),
        format!(
            "Invalid amount (expected a non-negative number with up to two decimals): {}",
            amount
        )
    );
    let value =
        Decimal::from_str(trimmed).chain_err(|| format!("Invalid amount: {}", amount))?;
    Amount::from_decimal(value).chain_err(|| format!("Amount too large: {}", amount))
}

pub fn parse_goal_id(goal_id: &str) -> Result<GoalId> {
    goal_id
        .trim()
        .parse::<i32>()
        .map(GoalId)
        .chain_err(|| format!("Invalid goal ID: {}", goal_id))
}

pub fn today_local_date() -> NaiveDate {
    chrono::Local::now().naive_local().date()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("600").unwrap(), Amount::from_scaled_i64(60_000));
        assert_eq!(parse_amount("12.5").unwrap(), Amount::from_scaled_i64(1_250));
        assert_eq!(parse_amount(" 0.05 ").unwrap(), Amount::from_scaled_i64(5));
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.234").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_amount_limits() {
        assert_eq!(
            parse_amount("92233720368547758.07").unwrap(),
            Amount::from_scaled_i64(i64::MAX)
        );
        assert!(parse_amount("92233720368547758.08").is_err());
        assert!(parse_amount("100000000000000000000").is_err());
        assert!(parse_amount("1000000000000000000000000000").is_err());
        assert!(parse_amount("1000000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2026-12-31").unwrap(),
            NaiveDate::from_ymd(2026, 12, 31)
        );
        assert!(parse_iso_date("12/31/2026").is_err());
    }

    #[test]
    fn test_parse_goal_id() {
        assert_eq!(parse_goal_id("42").unwrap(), GoalId(42));
        assert!(parse_goal_id("forty-two").is_err());
    }
}
