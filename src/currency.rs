//! Formats amounts of money for display.

use numfmt::{Formatter, Precision};

use crate::Error;

/// Formats amounts with a currency symbol, thousands separators and two
/// decimal places, e.g. "₹1,234.50" or "-₹8.25".
pub struct CurrencyFormat {
    symbol: String,
    positive: Formatter,
    negative: Formatter,
}

impl CurrencyFormat {
    /// Create a format that prefixes amounts with `symbol`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrency] if `symbol` is empty or too long to be
    /// used as a prefix.
    pub fn new(symbol: &str) -> Result<Self, Error> {
        if symbol.trim().is_empty() {
            return Err(Error::InvalidCurrency(symbol.to_owned()));
        }

        let formatter = |prefix: &str| {
            Formatter::currency(prefix)
                .map(|formatter| formatter.precision(Precision::Decimals(2)))
                .map_err(|error| {
                    tracing::debug!("could not create currency formatter: {error:?}");
                    Error::InvalidCurrency(symbol.to_owned())
                })
        };

        Ok(Self {
            symbol: symbol.to_owned(),
            positive: formatter(symbol)?,
            negative: formatter(&format!("-{symbol}"))?,
        })
    }

    /// The currency symbol amounts are prefixed with.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format `amount` with two decimal places.
    pub fn format(&self, amount: f64) -> String {
        let formatted = if amount < 0.0 {
            self.negative.fmt_string(amount.abs())
        } else if amount > 0.0 {
            self.positive.fmt_string(amount)
        } else {
            // numfmt renders zero as "0"
            return format!("{}0.00", self.symbol);
        };

        pad_decimals(formatted)
    }
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3".
fn pad_decimals(mut formatted: String) -> String {
    let decimals = match formatted.rfind('.') {
        Some(index) => formatted.len() - index - 1,
        None => {
            formatted.push('.');
            0
        }
    };

    for _ in decimals..2 {
        formatted.push('0');
    }

    formatted
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CurrencyFormat, pad_decimals};

    #[test]
    fn formats_with_symbol_and_two_decimals() {
        let currency = CurrencyFormat::new("₹").unwrap();

        assert_eq!(currency.format(8.25), "₹8.25");
        assert_eq!(currency.format(12.3), "₹12.30");
        assert_eq!(currency.format(1234.5), "₹1,234.50");
    }

    #[test]
    fn formats_negative_amounts() {
        let currency = CurrencyFormat::new("$").unwrap();

        assert_eq!(currency.format(-8.25), "-$8.25");
    }

    #[test]
    fn formats_zero() {
        let currency = CurrencyFormat::new("$").unwrap();

        assert_eq!(currency.format(0.0), "$0.00");
    }

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("$12".to_owned()), "$12.00");
        assert_eq!(pad_decimals("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_decimals("$12.34".to_owned()), "$12.34");
    }

    #[test]
    fn rejects_blank_symbol() {
        assert!(matches!(CurrencyFormat::new("  "), Err(Error::InvalidCurrency(_))));
    }
}
