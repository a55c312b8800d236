use chrono::NaiveDate;
use rust_decimal::prelude::Zero;
use rust_decimal::Decimal;

use crate::constants::*;
use crate::types::*;

#[derive(Clone, Debug)]
pub struct CurrencyFormat {
    pub currency_symbol: String,
    pub symbol_first: bool,
    pub decimal_separator: String,
    pub group_separator: String,
    pub date_format: String,
}

#[derive(Debug)]
pub struct AmountFormatter<'a> {
    format: &'a CurrencyFormat,
}

impl CurrencyFormat {
    pub fn with_symbol(currency_symbol: &str) -> CurrencyFormat {
        CurrencyFormat {
            currency_symbol: currency_symbol.to_string(),
            symbol_first: true,
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl<'a> AmountFormatter<'a> {
    pub fn new(format: &CurrencyFormat) -> AmountFormatter {
        AmountFormatter { format }
    }

    pub fn format_amount(&self, amount: Amount) -> String {
        self.format_decimal(amount.to_decimal())
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.format.date_format).to_string()
    }

    pub fn format_progress_bar(&self, percentage: Percentage) -> String {
        let clamped = percentage.clamped().whole_percent().max(0) as usize;
        let filled = clamped * PROGRESS_BAR_WIDTH / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(PROGRESS_BAR_WIDTH - filled),
            clamped
        )
    }

    fn format_decimal(&self, amount: Decimal) -> String {
        let raw_formatted = format!("{:.2}", amount.abs().round_dp(2));
        let split_around_decimal: Vec<&str> = raw_formatted.split('.').collect();
        let group_separated = format!(
            "{}{}{}",
            self.add_group_separators(
                split_around_decimal
                    .get(0)
                    .expect("split_around_decimal should have two elements"),
            ),
            self.format.decimal_separator,
            split_around_decimal
                .get(1)
                .expect("split_around_decimal should have two elements")
        );
        let with_symbol = if self.format.symbol_first {
            format!("{}{}", self.format.currency_symbol, group_separated)
        } else {
            format!("{}{}", group_separated, self.format.currency_symbol)
        };
        if amount < Decimal::zero() {
            format!("-{}", with_symbol)
        } else {
            with_symbol
        }
    }

    fn add_group_separators(&self, before_decimal: &str) -> String {
        before_decimal
            .chars()
            .rev()
            .collect::<Vec<char>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect())
            .collect::<Vec<String>>()
            .join(&self.format.group_separator)
            .chars()
            .rev()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref US_FORMAT: CurrencyFormat = CurrencyFormat::with_symbol("$");
        static ref EURO_FORMAT: CurrencyFormat = CurrencyFormat {
            currency_symbol: " €".to_string(),
            symbol_first: false,
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
            date_format: "%d.%m.%Y".to_string(),
        };
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(
            AmountFormatter::new(&US_FORMAT).format_amount(Amount::from_scaled_i64(-12_345)),
            "-$123.45"
        );
        assert_eq!(
            AmountFormatter::new(&US_FORMAT)
                .format_amount(Amount::from_scaled_i64(123_456_789_012)),
            "$1,234,567,890.12"
        );
        assert_eq!(
            AmountFormatter::new(&US_FORMAT).format_amount(Amount::from_scaled_i64(5)),
            "$0.05"
        );
        assert_eq!(
            AmountFormatter::new(&EURO_FORMAT).format_amount(Amount::from_scaled_i64(100_000)),
            "1.000,00 €"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            AmountFormatter::new(&US_FORMAT).format_date(NaiveDate::from_ymd(2011, 4, 27)),
            "2011-04-27"
        );
        assert_eq!(
            AmountFormatter::new(&EURO_FORMAT).format_date(NaiveDate::from_ymd(2011, 4, 27)),
            "27.04.2011"
        );
    }

    #[test]
    fn test_format_progress_bar() {
        let formatter = AmountFormatter::new(&US_FORMAT);
        assert_eq!(
            formatter.format_progress_bar(Percentage::from_whole(60)),
            "[############--------]  60%"
        );
        assert_eq!(
            formatter.format_progress_bar(Percentage::from_whole(120)),
            "[####################] 100%"
        );
        assert_eq!(
            formatter.format_progress_bar(Percentage::from_whole(0)),
            "[--------------------]   0%"
        );
    }
}
