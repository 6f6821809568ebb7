use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use asset_tco_core::scenarios::sensitivity::{self, ProjectionMetric, SensitivityInput};
use asset_tco_core::tco::params::ScenarioParams;
use asset_tco_core::types::SensitivityVariable;

use crate::input;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "discount_rate:0.06:0.18:0.02")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable in format name:min:max:step
    /// (e.g. "old_wear_factor:0:0.30:0.05")
    #[arg(long)]
    pub var2: String,

    /// Projection figure to record in each cell
    #[arg(long, value_enum, default_value = "total-savings")]
    pub metric: MetricArg,

    /// Path to JSON file with base case scenario parameters (defaults to the plant defaults)
    #[arg(long)]
    pub base_inputs: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    TotalSavings,
    BreakEvenYear,
    ProductionLossTotal,
    FinalCumulativeOld,
    FinalCumulativeNew,
}

impl From<MetricArg> for ProjectionMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::TotalSavings => ProjectionMetric::TotalSavings,
            MetricArg::BreakEvenYear => ProjectionMetric::BreakEvenYear,
            MetricArg::ProductionLossTotal => ProjectionMetric::ProductionLossTotal,
            MetricArg::FinalCumulativeOld => ProjectionMetric::FinalCumulativeOld,
            MetricArg::FinalCumulativeNew => ProjectionMetric::FinalCumulativeNew,
        }
    }
}

#[derive(Debug, Serialize)]
struct SensitivityRow {
    var1_value: Decimal,
    var2_value: Decimal,
    output_value: Decimal,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base: ScenarioParams =
        input::resolve(args.base_inputs.as_deref(), || Ok(ScenarioParams::default()))?;

    let sens_input = SensitivityInput {
        base,
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: parse_sens_var(&args.var2)?,
        output_metric: args.metric.into(),
    };

    let output = sensitivity::sensitivity_grid(&sens_input)?;
    tracing::info!(
        rows = output.result.variable_1_values.len(),
        cols = output.result.variable_2_values.len(),
        failed_cells = output.warnings.len(),
        "sensitivity grid evaluated"
    );

    let grid = &output.result;
    let mut rows = Vec::with_capacity(grid.variable_1_values.len() * grid.variable_2_values.len());
    for (i, v1) in grid.variable_1_values.iter().enumerate() {
        for (j, v2) in grid.variable_2_values.iter().enumerate() {
            rows.push(SensitivityRow {
                var1_value: *v1,
                var2_value: *v2,
                output_value: grid.matrix[i][j].round_dp(2),
            });
        }
    }

    Ok(serde_json::json!({
        "result": {
            "variable_1": grid.variable_1_name,
            "variable_2": grid.variable_2_name,
            "output_metric": grid.output_metric,
            "base_case_value": grid.base_case_value.round_dp(2),
            "base_case_position": grid.base_case_position,
        },
        "results": rows,
        "matrix": grid.matrix,
        "methodology": output.methodology,
        "warnings": output.warnings,
        "metadata": output.metadata,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sens_var() {
        let v = parse_sens_var("discount_rate:0.06:0.18:0.02").unwrap();
        assert_eq!(v.name, "discount_rate");
        assert_eq!(v.min, dec!(0.06));
        assert_eq!(v.max, dec!(0.18));
        assert_eq!(v.step, dec!(0.02));
    }

    #[test]
    fn test_parse_sens_var_wrong_arity() {
        assert!(parse_sens_var("discount_rate:0.06:0.18").is_err());
    }

    #[test]
    fn test_parse_sens_var_bad_number() {
        assert!(parse_sens_var("discount_rate:low:0.18:0.02").is_err());
    }
}
