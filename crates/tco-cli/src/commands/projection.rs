use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use asset_tco_core::format::{format_break_even, format_compact, format_full};
use asset_tco_core::tco::params::ScenarioParams;
use asset_tco_core::tco::projection::{self, ProjectionResult};
use asset_tco_core::tco::risk::{self, RiskAssessment, RiskTier};
use asset_tco_core::types::{with_metadata, ComputationOutput};

use crate::input;

/// Scenario parameters for the keep-vs-replace projection.
///
/// Flag defaults describe a typical plant; percentages are whole numbers
/// bounded like the dashboard sliders. A JSON `--input` file or piped stdin
/// bypasses the slider bounds but not the engine's validation.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file with scenario parameters (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Study horizon in years
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(3..=15))]
    pub years: u32,

    /// Discount rate (WACC) in percent
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(5..=20))]
    pub wacc_pct: u32,

    /// Annual inflation in percent
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub inflation_pct: u32,

    /// Annual failure-rate acceleration of the aging asset, in percent
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(0..=30))]
    pub wear_pct: u32,

    /// Margin lost per hour of downtime
    #[arg(long, default_value = "25000")]
    pub downtime_cost: Decimal,

    /// Aging asset: annual maintenance cost
    #[arg(long, default_value = "350000")]
    pub old_maintenance: Decimal,

    /// Aging asset: annual energy cost
    #[arg(long, default_value = "800000")]
    pub old_energy: Decimal,

    /// Aging asset: failures per year
    #[arg(long, default_value = "8")]
    pub old_failures: Decimal,

    /// Aging asset: mean time to repair, hours
    #[arg(long, default_value = "4")]
    pub old_mttr: Decimal,

    /// Aging asset: resale value today
    #[arg(long, default_value = "100000")]
    pub resale: Decimal,

    /// New asset: purchase price
    #[arg(long, default_value = "8000000")]
    pub capex: Decimal,

    /// New asset: expected annual maintenance cost
    #[arg(long, default_value = "80000")]
    pub new_maintenance: Decimal,

    /// New asset: expected annual energy cost
    #[arg(long, default_value = "450000")]
    pub new_energy: Decimal,

    /// New asset: failures per year
    #[arg(long, default_value = "1")]
    pub new_failures: Decimal,

    /// New asset: mean time to repair, hours
    #[arg(long, default_value = "1")]
    pub new_mttr: Decimal,

    /// Include the full year-by-year cost build-up in the output
    #[arg(long)]
    pub detail: bool,
}

impl ProjectArgs {
    pub fn to_params(&self) -> ScenarioParams {
        ScenarioParams {
            horizon_years: self.years,
            discount_rate: percent(self.wacc_pct),
            inflation_rate: percent(self.inflation_pct),
            downtime_cost_per_hour: self.downtime_cost,
            old_maintenance_annual: self.old_maintenance,
            old_energy_annual: self.old_energy,
            old_wear_factor: percent(self.wear_pct),
            resale_value: self.resale,
            old_failures_base: self.old_failures,
            old_mttr_hours: self.old_mttr,
            new_capex: self.capex,
            new_maintenance_annual: self.new_maintenance,
            new_energy_annual: self.new_energy,
            new_failures_base: self.new_failures,
            new_mttr_hours: self.new_mttr,
        }
    }
}

fn percent(value: u32) -> Decimal {
    Decimal::from(value) / dec!(100)
}

/// Headline figures for the dashboard cards.
#[derive(Debug, Serialize)]
struct ProjectionSummary {
    break_even: String,
    break_even_year: Option<u32>,
    total_savings: Decimal,
    total_savings_display: String,
    final_downtime_hours_old: Decimal,
    final_downtime_hours_new: Decimal,
    production_loss_old_total: Decimal,
    production_loss_old_total_display: String,
    risk_tier: RiskTier,
    risk_ratio: Option<Decimal>,
    risk_message: String,
}

/// One point of the chart series. Downtime is absent for year 0.
#[derive(Debug, Serialize)]
struct YearRow {
    year: u32,
    cumulative_old: Decimal,
    cumulative_new: Decimal,
    downtime_hours_old: Option<Decimal>,
    downtime_hours_new: Option<Decimal>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let detail = args.detail;
    let params = load_params(&args)?;

    let output = projection::run_projection(&params)?;
    let risk = risk::assess_projection(&params, &output.result);
    tracing::info!(
        break_even = ?output.result.break_even_year,
        tier = ?risk.tier,
        "projection complete"
    );

    build_report(&output, &risk, detail)
}

pub fn run_risk(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let params = load_params(&args)?;

    let result = projection::project(&params)?;
    let assessment = risk::assess_projection(&params, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Production loss over horizon / replacement capex",
        &params,
        Vec::new(),
        elapsed,
        assessment,
    );
    Ok(serde_json::to_value(output)?)
}

fn load_params(args: &ProjectArgs) -> Result<ScenarioParams, Box<dyn std::error::Error>> {
    input::resolve(args.input.as_deref(), || Ok(args.to_params()))
}

fn build_report(
    output: &ComputationOutput<ProjectionResult>,
    risk: &RiskAssessment,
    detail: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let result = &output.result;

    let summary = ProjectionSummary {
        break_even: format_break_even(result.break_even_year),
        break_even_year: result.break_even_year,
        total_savings: result.total_savings.round_dp(2),
        total_savings_display: format_compact(result.total_savings),
        final_downtime_hours_old: result.final_downtime_hours_old.round_dp(1),
        final_downtime_hours_new: result.final_downtime_hours_new.round_dp(1),
        production_loss_old_total: result.production_loss_old_total.round_dp(2),
        production_loss_old_total_display: format_full(result.production_loss_old_total),
        risk_tier: risk.tier,
        risk_ratio: risk.ratio.map(|r| r.round_dp(3)),
        risk_message: risk.message.clone(),
    };

    let yearly = year_rows(result);

    let mut report = serde_json::json!({
        "result": summary,
        "yearly": yearly,
        "methodology": output.methodology,
        "assumptions": output.assumptions,
        "warnings": output.warnings,
        "metadata": output.metadata,
    });
    if detail {
        report["projection"] = serde_json::to_value(result)?;
    }
    Ok(report)
}

fn year_rows(result: &ProjectionResult) -> Vec<YearRow> {
    result
        .cumulative_old
        .iter()
        .zip(&result.cumulative_new)
        .enumerate()
        .map(|(i, (old, new))| {
            let downtime = |series: &[Decimal]| {
                i.checked_sub(1)
                    .and_then(|j| series.get(j))
                    .map(|h| h.round_dp(1))
            };
            YearRow {
                year: i as u32,
                cumulative_old: old.round_dp(2),
                cumulative_new: new.round_dp(2),
                downtime_hours_old: downtime(result.downtime_hours_old.as_slice()),
                downtime_hours_new: downtime(result.downtime_hours_new.as_slice()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ProjectArgs,
    }

    fn parse(argv: &[&str]) -> Result<ProjectArgs, clap::Error> {
        let mut full = vec!["tco"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).map(|h| h.args)
    }

    #[test]
    fn test_flag_defaults_match_plant_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.to_params(), ScenarioParams::default());
    }

    #[test]
    fn test_percent_flags_stored_as_fractions() {
        let args = parse(&["--wacc-pct", "8", "--wear-pct", "0"]).unwrap();
        let params = args.to_params();
        assert_eq!(params.discount_rate, dec!(0.08));
        assert!(params.old_wear_factor.is_zero());
    }

    #[test]
    fn test_slider_bounds_enforced() {
        assert!(parse(&["--years", "2"]).is_err());
        assert!(parse(&["--years", "16"]).is_err());
        assert!(parse(&["--wacc-pct", "25"]).is_err());
        assert!(parse(&["--wear-pct", "31"]).is_err());
        assert!(parse(&["--inflation-pct", "11"]).is_err());
    }

    #[test]
    fn test_report_shape() {
        let params = ScenarioParams::default();
        let output = projection::run_projection(&params).unwrap();
        let risk = risk::assess_projection(&params, &output.result);
        let report = build_report(&output, &risk, false).unwrap();

        let yearly = report["yearly"].as_array().unwrap();
        assert_eq!(yearly.len(), params.horizon_years as usize + 1);
        assert!(yearly[0]["downtime_hours_old"].is_null());
        assert!(!yearly[1]["downtime_hours_old"].is_null());
        assert!(report.get("projection").is_none());
        assert!(report["result"]["break_even"].is_string());
    }

    #[test]
    fn test_detail_includes_projection() {
        let params = ScenarioParams::default();
        let output = projection::run_projection(&params).unwrap();
        let risk = risk::assess_projection(&params, &output.result);
        let report = build_report(&output, &risk, true).unwrap();
        assert!(report["projection"]["years"].is_array());
    }
}
