//! Human-readable rendering of monetary amounts and break-even years.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Money;

const MILLION: Decimal = dec!(1000000);
const THOUSAND: Decimal = dec!(1000);

/// Compact form for dashboards: `1,234.5M`, `25K`, `-900`.
pub fn format_compact(amount: Money) -> String {
    let magnitude = amount.abs();
    if magnitude >= MILLION {
        format!("{}M", group_digits(amount / MILLION, 1, ','))
    } else if magnitude >= THOUSAND {
        format!("{}K", group_digits(amount / THOUSAND, 0, ','))
    } else {
        group_digits(amount, 0, ',')
    }
}

/// Full integer form with space-separated thousands: `8 000 000`.
pub fn format_full(amount: Money) -> String {
    group_digits(amount, 0, ' ')
}

/// `Year N`, or `Never` when the replacement does not pay back.
pub fn format_break_even(break_even_year: Option<u32>) -> String {
    match break_even_year {
        Some(year) => format!("Year {year}"),
        None => "Never".to_string(),
    }
}

fn group_digits(value: Decimal, dp: u32, separator: char) -> String {
    let rounded = value.round_dp(dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compact_millions() {
        assert_eq!(format_compact(dec!(8000000)), "8.0M");
        assert_eq!(format_compact(dec!(1234500000)), "1,234.5M");
        assert_eq!(format_compact(dec!(-2540000)), "-2.5M");
    }

    #[test]
    fn test_compact_thousands() {
        assert_eq!(format_compact(dec!(25000)), "25K");
        assert_eq!(format_compact(dec!(999400)), "999K");
    }

    #[test]
    fn test_compact_small() {
        assert_eq!(format_compact(dec!(-900)), "-900");
        assert_eq!(format_compact(dec!(12.4)), "12");
        assert_eq!(format_compact(Decimal::ZERO), "0");
    }

    #[test]
    fn test_full() {
        assert_eq!(format_full(dec!(8000000)), "8 000 000");
        assert_eq!(format_full(dec!(-1234567.6)), "-1 234 568");
        assert_eq!(format_full(dec!(999)), "999");
    }

    #[test]
    fn test_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(format_full(dec!(-0.2)), "0");
    }

    #[test]
    fn test_break_even_label() {
        assert_eq!(format_break_even(Some(4)), "Year 4");
        assert_eq!(format_break_even(None), "Never");
    }
}
