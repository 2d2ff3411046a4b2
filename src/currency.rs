//! Display formatting for predicted prices.

/// Currency style used by a variant's result region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Currency {
    /// `₹ 1,234.56`
    Rupee,
    /// `$1,234.56`
    Dollar,
}

impl Currency {
    /// Formats `amount` with thousands separators and two decimals.
    pub fn format(self, amount: f64) -> String {
        let grouped = group_thousands(amount.abs());
        let sign = if amount < 0.0 && grouped != "0.00" {
            "-"
        } else {
            ""
        };
        match self {
            // the rupee style keeps the sign after the symbol, like `₹ -1,234.00`
            Self::Rupee => format!("₹ {sign}{grouped}"),
            Self::Dollar => format!("{sign}${grouped}"),
        }
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut out = String::with_capacity(fixed.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(fraction);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_both_styles() {
        assert_eq!(Currency::Rupee.format(250_000.0), "₹ 250,000.00");
        assert_eq!(Currency::Dollar.format(250_000.0), "$250,000.00");
    }

    #[test]
    fn groups_and_rounds() {
        assert_eq!(Currency::Dollar.format(0.0), "$0.00");
        assert_eq!(Currency::Dollar.format(999.999), "$1,000.00");
        assert_eq!(Currency::Dollar.format(1_234_567.891), "$1,234,567.89");
        assert_eq!(Currency::Rupee.format(100.5), "₹ 100.50");
    }

    #[test]
    fn keeps_sign_for_negative_estimates() {
        assert_eq!(Currency::Rupee.format(-1234.5), "₹ -1,234.50");
        assert_eq!(Currency::Dollar.format(-1234.5), "-$1,234.50");
        assert_eq!(Currency::Dollar.format(-0.001), "$0.00");
    }
}
