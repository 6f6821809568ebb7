use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TcoError;
use crate::tco::params::ScenarioParams;
use crate::tco::projection::{project, ProjectionResult};
use crate::types::*;
use crate::TcoResult;

/// Upper bound on sweep points per variable.
const MAX_SWEEP_POINTS: usize = 200;

/// Projection figure recorded in each grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMetric {
    TotalSavings,
    /// Break-even year, 0 when the replacement never pays back
    BreakEvenYear,
    ProductionLossTotal,
    FinalCumulativeOld,
    FinalCumulativeNew,
}

impl ProjectionMetric {
    pub fn extract(&self, result: &ProjectionResult) -> Decimal {
        match self {
            ProjectionMetric::TotalSavings => result.total_savings,
            ProjectionMetric::BreakEvenYear => result
                .break_even_year
                .map(Decimal::from)
                .unwrap_or(Decimal::ZERO),
            ProjectionMetric::ProductionLossTotal => result.production_loss_old_total,
            ProjectionMetric::FinalCumulativeOld => {
                result.cumulative_old.last().copied().unwrap_or_default()
            }
            ProjectionMetric::FinalCumulativeNew => {
                result.cumulative_new.last().copied().unwrap_or_default()
            }
        }
    }
}

/// Input for 2-way sensitivity analysis of the keep-vs-replace projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case parameters; swept fields are overridden per cell
    pub base: ScenarioParams,
    /// First field to sweep, named as in `ScenarioParams`
    pub variable_1: SensitivityVariable,
    /// Second field to sweep
    pub variable_2: SensitivityVariable,
    /// Figure measured in each cell
    pub output_metric: ProjectionMetric,
}

/// Output of 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: String,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: ProjectionMetric,
    /// Matrix[i][j] = metric when variable_1 = variable_1_values[i], variable_2 = variable_2_values[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Metric for the unmodified base parameters
    pub base_case_value: Decimal,
    /// Cell closest to the base parameters (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> TcoResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(TcoError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(TcoError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(TcoError::InvalidInput {
                field: format!("variable:{}", var.name),
                reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points; increase the step"),
            });
        }
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| distance(**v, target))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Absolute difference, saturating at `Decimal::MAX`.
fn distance(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).map_or(Decimal::MAX, |d| d.abs())
}

/// Sweep two scenario parameters and record a projection metric per cell.
///
/// Cells whose projection fails are reported as warnings and recorded as zero.
pub fn sensitivity_grid(
    input: &SensitivityInput,
) -> TcoResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.name == input.variable_2.name {
        return Err(TcoError::InvalidInput {
            field: "variable_2".into(),
            reason: "Sensitivity variables must be distinct".into(),
        });
    }

    // Fail fast on unknown names rather than filling the grid with errors
    let base_1 = input.base.field(&input.variable_1.name)?;
    let base_2 = input.base.field(&input.variable_2.name)?;

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;

    let mut matrix = Vec::with_capacity(v1_values.len());

    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let cell = input
                .base
                .with_field(&input.variable_1.name, *v1)
                .and_then(|p| p.with_field(&input.variable_2.name, *v2))
                .and_then(|p| project(&p));
            match cell {
                Ok(result) => row.push(input.output_metric.extract(&result)),
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(Decimal::ZERO);
                }
            }
        }
        matrix.push(row);
    }

    let base_case_value = input.output_metric.extract(&project(&input.base)?);
    let base_row = closest_index(&v1_values, base_1);
    let base_col = closest_index(&v2_values, base_2);

    if distance(v1_values[base_row], base_1) > input.variable_1.step / dec!(2)
        || distance(v2_values[base_col], base_2) > input.variable_2.step / dec!(2)
    {
        warnings.push("Base case lies outside the swept ranges".into());
    }

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.name.clone(),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity Analysis (Life Cycle Cost projection)",
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.name,
            "output_metric": input.output_metric,
            "base": input.base,
        }),
        warnings,
        elapsed,
        output,
    ))
}
