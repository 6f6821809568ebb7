use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::format_full;
use crate::types::{Money, Rate};

use super::params::ScenarioParams;
use super::projection::ProjectionResult;

const CRITICAL_RATIO: Decimal = dec!(1.0);
const WARNING_RATIO: Decimal = dec!(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Production losses exceed the price of new equipment
    Critical,
    /// Losses exceed half the price of new equipment
    Warning,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// production_loss_total / capex; `None` when capex is zero or so small
    /// that the quotient leaves the decimal range
    pub ratio: Option<Rate>,
    pub production_loss_total: Money,
    pub capex_new: Money,
    pub message: String,
}

/// Tier the aging asset's cumulative production losses against the cost of
/// replacing it.
///
/// A zero capex leaves the ratio undefined: any loss at all is then critical,
/// and no loss is stable. A quotient too large for a decimal is treated the
/// same way.
pub fn assess_risk(production_loss_total: Money, capex_new: Money) -> RiskAssessment {
    let ratio = if capex_new.is_zero() {
        None
    } else {
        production_loss_total.checked_div(capex_new)
    };

    let tier = match ratio {
        Some(r) if r > CRITICAL_RATIO => RiskTier::Critical,
        Some(r) if r > WARNING_RATIO => RiskTier::Warning,
        Some(_) => RiskTier::Stable,
        None if production_loss_total > Decimal::ZERO => RiskTier::Critical,
        None => RiskTier::Stable,
    };

    let loss = format_full(production_loss_total);
    let message = match (tier, ratio) {
        (RiskTier::Critical, Some(r)) => format!(
            "Critical: keeping the current equipment is financially untenable. \
             Cumulative production losses ({loss}) exceed {r:.1}x the price of new equipment."
        ),
        (RiskTier::Critical, None) => format!(
            "Critical: cumulative production losses ({loss}) far exceed a negligible replacement cost."
        ),
        (RiskTier::Warning, _) => format!(
            "Warning: breakdowns are becoming very expensive ({loss}). Prepare the replacement."
        ),
        (RiskTier::Stable, _) => {
            "Stable: the current equipment is still economically viable.".to_string()
        }
    };

    RiskAssessment {
        tier,
        ratio,
        production_loss_total,
        capex_new,
        message,
    }
}

/// Risk tier of a finished projection.
pub fn assess_projection(params: &ScenarioParams, result: &ProjectionResult) -> RiskAssessment {
    assess_risk(result.production_loss_old_total, params.new_capex)
}
