use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::TcoError;
use crate::types::Rate;
use crate::TcoResult;

/// Compounding factor `(1 + rate)^periods`.
///
/// Used for inflation, discounting and wear alike. A rate at or below -100%
/// would make the factor non-positive and is rejected.
pub fn compound_factor(rate: Rate, periods: u32) -> TcoResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(TcoError::InvalidInput {
            field: "rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }

    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| {
            TcoError::FinancialImpossibility(format!(
                "(1 + {rate})^{periods} overflows decimal precision"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor_period_zero_is_one() {
        assert_eq!(compound_factor(dec!(0.15), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_exact() {
        assert_eq!(compound_factor(dec!(0.15), 1).unwrap(), dec!(1.15));
        assert_eq!(compound_factor(dec!(0.10), 2).unwrap(), dec!(1.21));
    }

    #[test]
    fn test_compound_factor_rejects_minus_one() {
        assert!(compound_factor(dec!(-1), 3).is_err());
    }
}
