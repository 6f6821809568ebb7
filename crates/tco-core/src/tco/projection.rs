use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TcoError;
use crate::time_value::compound_factor;
use crate::types::{with_metadata, ComputationOutput, Money, Quantity, Rate};
use crate::TcoResult;

use super::params::ScenarioParams;

/// Real energy cost escalation of the aging asset, on top of inflation.
pub const OLD_ENERGY_ESCALATION: Rate = dec!(0.02);
/// Real maintenance cost escalation of the new asset, on top of inflation.
pub const NEW_MAINTENANCE_ESCALATION: Rate = dec!(0.02);
/// Real energy cost escalation of the new asset, on top of inflation.
pub const NEW_ENERGY_ESCALATION: Rate = dec!(0.01);

/// Final-year failure rate above this multiple of the base rate draws a warning.
const WEAR_WARNING_MULTIPLE: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cost build-up of one scenario for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioYearCost {
    /// Inflation-adjusted maintenance cost
    pub maintenance: Money,
    /// Inflation-adjusted energy cost
    pub energy: Money,
    /// Expected failure count (a rate, not an integer count)
    pub failures: Quantity,
    /// Downtime hours = failures x MTTR
    pub downtime_hours: Quantity,
    /// Inflation-adjusted margin lost to downtime
    pub production_loss: Money,
    /// maintenance + energy + production_loss, undiscounted
    pub cash_flow: Money,
    /// cash_flow / discount factor
    pub discounted_cash_flow: Money,
    /// Running total of discounted cash flows, including year 0
    pub cumulative: Money,
}

/// One projected year for both scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub inflation_factor: Decimal,
    pub discount_factor: Decimal,
    /// `(1 + wear)^(year - 1)`; exactly 1 in year 1
    pub wear_factor: Decimal,
    pub old: ScenarioYearCost,
    pub new: ScenarioYearCost,
}

/// Output of the keep-vs-replace projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// First year in which the replacement's cumulative discounted cost is
    /// strictly below the aging asset's. Never updated after the first crossing.
    pub break_even_year: Option<u32>,
    /// Final cumulative(old) - cumulative(new); positive favours replacement
    pub total_savings: Money,
    /// Cumulative discounted cost of keeping the asset, years 0..=horizon
    pub cumulative_old: Vec<Money>,
    /// Cumulative discounted cost of replacing it, years 0..=horizon
    pub cumulative_new: Vec<Money>,
    /// Downtime hours per year, years 1..=horizon
    pub downtime_hours_old: Vec<Quantity>,
    pub downtime_hours_new: Vec<Quantity>,
    /// Production-loss cost of the aging asset per year, years 1..=horizon
    pub production_loss_old: Vec<Money>,
    pub final_downtime_hours_old: Quantity,
    pub final_downtime_hours_new: Quantity,
    /// Sum of the aging asset's (undiscounted) production-loss costs
    pub production_loss_old_total: Money,
    /// Year-by-year build-up
    pub years: Vec<ProjectionYear>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project discounted cumulative costs of keeping the aging asset versus
/// replacing it. Pure and deterministic.
pub fn project(params: &ScenarioParams) -> TcoResult<ProjectionResult> {
    params.validate()?;

    let n_years = params.horizon_years;
    let capacity = n_years as usize;

    let mut cumulative_old = Decimal::ZERO;
    let mut cumulative_new = params.new_capex - params.resale_value;

    let mut cumulative_old_series = Vec::with_capacity(capacity + 1);
    let mut cumulative_new_series = Vec::with_capacity(capacity + 1);
    cumulative_old_series.push(cumulative_old);
    cumulative_new_series.push(cumulative_new);

    let mut downtime_hours_old = Vec::with_capacity(capacity);
    let mut downtime_hours_new = Vec::with_capacity(capacity);
    let mut production_loss_old = Vec::with_capacity(capacity);
    let mut years = Vec::with_capacity(capacity);

    let mut break_even_year: Option<u32> = None;

    for year in 1..=n_years {
        let inflation_factor = compound_factor(params.inflation_rate, year)?;
        let discount_factor = compound_factor(params.discount_rate, year)?;
        let wear_factor = compound_factor(params.old_wear_factor, year - 1)?;

        if discount_factor.is_zero() {
            return Err(TcoError::DivisionByZero {
                context: format!("discount factor at year {year}"),
            });
        }

        let mut old = old_asset_year(params, year, inflation_factor, wear_factor)?;
        let mut new = new_asset_year(params, year, inflation_factor)?;

        old.discounted_cash_flow = discount(old.cash_flow, discount_factor)?;
        new.discounted_cash_flow = discount(new.cash_flow, discount_factor)?;

        cumulative_old = accumulate(cumulative_old, old.discounted_cash_flow)?;
        cumulative_new = accumulate(cumulative_new, new.discounted_cash_flow)?;
        old.cumulative = cumulative_old;
        new.cumulative = cumulative_new;

        cumulative_old_series.push(cumulative_old);
        cumulative_new_series.push(cumulative_new);
        downtime_hours_old.push(old.downtime_hours);
        downtime_hours_new.push(new.downtime_hours);
        production_loss_old.push(old.production_loss);

        if break_even_year.is_none() && cumulative_new < cumulative_old {
            break_even_year = Some(year);
        }

        years.push(ProjectionYear {
            year,
            inflation_factor,
            discount_factor,
            wear_factor,
            old,
            new,
        });
    }

    let final_downtime_hours_old = downtime_hours_old.last().copied().unwrap_or(Decimal::ZERO);
    let final_downtime_hours_new = downtime_hours_new.last().copied().unwrap_or(Decimal::ZERO);
    let production_loss_old_total = production_loss_old
        .iter()
        .try_fold(Decimal::ZERO, |acc, loss| accumulate(acc, *loss))?;

    Ok(ProjectionResult {
        break_even_year,
        total_savings: cumulative_old - cumulative_new,
        cumulative_old: cumulative_old_series,
        cumulative_new: cumulative_new_series,
        downtime_hours_old,
        downtime_hours_new,
        production_loss_old,
        final_downtime_hours_old,
        final_downtime_hours_new,
        production_loss_old_total,
        years,
    })
}

/// Run the projection and wrap it in the standard output envelope with
/// warnings for assumptions worth a second look.
pub fn run_projection(params: &ScenarioParams) -> TcoResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();

    let result = project(params)?;
    let warnings = collect_warnings(params, &result);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Life Cycle Cost comparison (discounted, keep vs replace)",
        params,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn old_asset_year(
    params: &ScenarioParams,
    year: u32,
    inflation_factor: Decimal,
    wear_factor: Decimal,
) -> TcoResult<ScenarioYearCost> {
    let energy_escalation = compound_factor(OLD_ENERGY_ESCALATION, year)?;

    let maintenance = product(&[params.old_maintenance_annual, wear_factor, inflation_factor])?;
    let energy = product(&[params.old_energy_annual, energy_escalation, inflation_factor])?;
    let failures = product(&[params.old_failures_base, wear_factor])?;
    let downtime_hours = product(&[failures, params.old_mttr_hours])?;
    let production_loss = product(&[downtime_hours, params.downtime_cost_per_hour, inflation_factor])?;

    scenario_year(maintenance, energy, failures, downtime_hours, production_loss)
}

fn new_asset_year(
    params: &ScenarioParams,
    year: u32,
    inflation_factor: Decimal,
) -> TcoResult<ScenarioYearCost> {
    let maintenance_escalation = compound_factor(NEW_MAINTENANCE_ESCALATION, year)?;
    let energy_escalation = compound_factor(NEW_ENERGY_ESCALATION, year)?;

    let maintenance = product(&[params.new_maintenance_annual, maintenance_escalation, inflation_factor])?;
    let energy = product(&[params.new_energy_annual, energy_escalation, inflation_factor])?;
    let failures = params.new_failures_base;
    let downtime_hours = product(&[failures, params.new_mttr_hours])?;
    let production_loss = product(&[downtime_hours, params.downtime_cost_per_hour, inflation_factor])?;

    scenario_year(maintenance, energy, failures, downtime_hours, production_loss)
}

fn scenario_year(
    maintenance: Money,
    energy: Money,
    failures: Quantity,
    downtime_hours: Quantity,
    production_loss: Money,
) -> TcoResult<ScenarioYearCost> {
    let cash_flow = maintenance
        .checked_add(energy)
        .and_then(|s| s.checked_add(production_loss))
        .ok_or_else(|| TcoError::FinancialImpossibility("Annual cash flow overflows decimal range".into()))?;

    Ok(ScenarioYearCost {
        maintenance,
        energy,
        failures,
        downtime_hours,
        production_loss,
        cash_flow,
        discounted_cash_flow: Decimal::ZERO,
        cumulative: Decimal::ZERO,
    })
}

fn discount(cash_flow: Money, discount_factor: Decimal) -> TcoResult<Money> {
    cash_flow
        .checked_div(discount_factor)
        .ok_or_else(|| TcoError::FinancialImpossibility("Discounted cash flow overflows decimal range".into()))
}

fn accumulate(total: Money, amount: Money) -> TcoResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| TcoError::FinancialImpossibility("Cumulative cost overflows decimal range".into()))
}

/// Overflow-checked product of decimal factors.
fn product(factors: &[Decimal]) -> TcoResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
        .ok_or_else(|| TcoError::FinancialImpossibility("Cost component overflows decimal range".into()))
}

fn collect_warnings(params: &ScenarioParams, result: &ProjectionResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if params.resale_value > params.new_capex {
        warnings.push(format!(
            "Resale value ({}) exceeds the new asset's capex ({}); replacement starts with a net gain",
            params.resale_value, params.new_capex
        ));
    }

    for (name, rate) in [
        ("Discount rate", params.discount_rate),
        ("Inflation rate", params.inflation_rate),
        ("Wear factor", params.old_wear_factor),
    ] {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            warnings.push(format!(
                "{name} of {:.1}% is outside the usual 0-100% range",
                rate * dec!(100)
            ));
        }
    }

    if let Some(last) = result.years.last() {
        if params.old_failures_base > Decimal::ZERO
            && last.wear_factor > WEAR_WARNING_MULTIPLE
        {
            warnings.push(format!(
                "Aging asset failure rate reaches {:.1}x its base by year {}; compounded wear is not capped",
                last.wear_factor, last.year
            ));
        }
    }

    if result.break_even_year.is_none() {
        warnings.push(format!(
            "Replacement does not break even within the {}-year horizon",
            params.horizon_years
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Single-year case where only the aging asset's maintenance costs money.
    fn maintenance_only_params() -> ScenarioParams {
        ScenarioParams {
            horizon_years: 1,
            discount_rate: Decimal::ZERO,
            inflation_rate: Decimal::ZERO,
            downtime_cost_per_hour: Decimal::ZERO,
            old_maintenance_annual: dec!(100),
            old_energy_annual: Decimal::ZERO,
            old_wear_factor: Decimal::ZERO,
            resale_value: Decimal::ZERO,
            old_failures_base: Decimal::ZERO,
            old_mttr_hours: Decimal::ZERO,
            new_capex: dec!(1000),
            new_maintenance_annual: Decimal::ZERO,
            new_energy_annual: Decimal::ZERO,
            new_failures_base: Decimal::ZERO,
            new_mttr_hours: Decimal::ZERO,
        }
    }

    #[test]
    fn test_maintenance_only_single_year() {
        let out = project(&maintenance_only_params()).unwrap();
        assert_eq!(out.cumulative_old, vec![dec!(0), dec!(100)]);
        assert_eq!(out.cumulative_new, vec![dec!(1000), dec!(1000)]);
        assert_eq!(out.break_even_year, None);
        assert_eq!(out.total_savings, dec!(-900));
    }

    #[test]
    fn test_year_zero_values() {
        let mut params = ScenarioParams::default();
        params.new_capex = dec!(8000000);
        params.resale_value = dec!(100000);
        let out = project(&params).unwrap();
        assert_eq!(out.cumulative_old[0], Decimal::ZERO);
        assert_eq!(out.cumulative_new[0], dec!(7900000));
    }

    #[test]
    fn test_resale_above_capex_allowed() {
        let mut params = maintenance_only_params();
        params.resale_value = dec!(1500);
        let out = project(&params).unwrap();
        assert_eq!(out.cumulative_new[0], dec!(-500));
        // -500 < 100 after year 1
        assert_eq!(out.break_even_year, Some(1));
    }

    #[test]
    fn test_wear_factor_first_two_years() {
        let mut params = ScenarioParams::default();
        params.old_wear_factor = dec!(0.15);
        let out = project(&params).unwrap();
        assert_eq!(out.years[0].wear_factor, Decimal::ONE);
        assert_eq!(out.years[1].wear_factor, dec!(1.15));
    }

    #[test]
    fn test_old_failures_compound_with_wear() {
        let mut params = ScenarioParams::default();
        params.old_failures_base = dec!(8);
        params.old_mttr_hours = dec!(4);
        params.old_wear_factor = dec!(0.15);
        let out = project(&params).unwrap();
        // Year 1: 8 failures x 4h; year 2: 8 x 1.15 x 4
        assert_eq!(out.downtime_hours_old[0], dec!(32));
        assert_eq!(out.downtime_hours_old[1], dec!(36.8));
    }

    #[test]
    fn test_new_failures_constant() {
        let params = ScenarioParams::default();
        let out = project(&params).unwrap();
        assert!(out.downtime_hours_new.iter().all(|h| *h == dec!(1)));
    }

    #[test]
    fn test_energy_escalation_year_one() {
        let mut params = maintenance_only_params();
        params.old_maintenance_annual = Decimal::ZERO;
        params.old_energy_annual = dec!(100);
        params.new_energy_annual = dec!(100);
        params.new_maintenance_annual = dec!(100);
        let out = project(&params).unwrap();
        let y1 = &out.years[0];
        assert_eq!(y1.old.energy, dec!(102));
        assert_eq!(y1.new.energy, dec!(101));
        assert_eq!(y1.new.maintenance, dec!(102));
    }

    #[test]
    fn test_production_loss_inflated() {
        let mut params = maintenance_only_params();
        params.old_maintenance_annual = Decimal::ZERO;
        params.inflation_rate = dec!(0.10);
        params.old_failures_base = dec!(2);
        params.old_mttr_hours = dec!(3);
        params.downtime_cost_per_hour = dec!(100);
        let out = project(&params).unwrap();
        // 2 x 3 x 100 x 1.1
        assert_eq!(out.production_loss_old[0], dec!(660));
        assert_eq!(out.production_loss_old_total, dec!(660));
        assert_eq!(out.final_downtime_hours_old, dec!(6));
    }

    #[test]
    fn test_discounting_applied() {
        let mut params = maintenance_only_params();
        params.discount_rate = dec!(0.10);
        params.old_maintenance_annual = dec!(110);
        let out = project(&params).unwrap();
        assert_eq!(out.cumulative_old[1], dec!(100));
    }

    #[test]
    fn test_break_even_first_crossing() {
        let params = ScenarioParams::default();
        let out = project(&params).unwrap();
        if let Some(y) = out.break_even_year {
            let idx = y as usize;
            assert!(out.cumulative_new[idx] < out.cumulative_old[idx]);
            for earlier in 1..idx {
                assert!(out.cumulative_new[earlier] >= out.cumulative_old[earlier]);
            }
        }
    }

    #[test]
    fn test_series_lengths() {
        let params = ScenarioParams::default();
        let out = project(&params).unwrap();
        let n = params.horizon_years as usize;
        assert_eq!(out.cumulative_old.len(), n + 1);
        assert_eq!(out.cumulative_new.len(), n + 1);
        assert_eq!(out.downtime_hours_old.len(), n);
        assert_eq!(out.downtime_hours_new.len(), n);
        assert_eq!(out.production_loss_old.len(), n);
        assert_eq!(out.years.len(), n);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut params = maintenance_only_params();
        params.horizon_years = 0;
        assert!(project(&params).is_err());
    }

    #[test]
    fn test_run_projection_warns_without_break_even() {
        let out = run_projection(&maintenance_only_params()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("does not break even")));
        assert_eq!(
            out.methodology,
            "Life Cycle Cost comparison (discounted, keep vs replace)"
        );
    }

    #[test]
    fn test_run_projection_warns_on_runaway_wear() {
        let mut params = ScenarioParams::default();
        params.horizon_years = 20;
        params.old_wear_factor = dec!(0.30);
        let out = run_projection(&params).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("not capped")));
    }
}
