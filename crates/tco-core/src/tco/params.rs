use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::types::{Money, Quantity, Rate};
use crate::TcoResult;

/// Longest horizon the engine accepts.
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Names accepted by [`ScenarioParams::field`] and [`ScenarioParams::with_field`].
pub const FIELD_NAMES: [&str; 15] = [
    "horizon_years",
    "discount_rate",
    "inflation_rate",
    "downtime_cost_per_hour",
    "old_maintenance_annual",
    "old_energy_annual",
    "old_wear_factor",
    "resale_value",
    "old_failures_base",
    "old_mttr_hours",
    "new_capex",
    "new_maintenance_annual",
    "new_energy_annual",
    "new_failures_base",
    "new_mttr_hours",
];

/// Cost and reliability assumptions for the keep-vs-replace comparison.
///
/// JSON input accepts both these field names and the original French keys
/// (`duree_etude`, `taux_actualisation`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Study horizon in years
    #[serde(alias = "duree_etude")]
    pub horizon_years: u32,
    /// Annual discount rate (WACC)
    #[serde(alias = "taux_actualisation")]
    pub discount_rate: Rate,
    /// Annual general inflation rate
    #[serde(alias = "taux_inflation")]
    pub inflation_rate: Rate,
    /// Margin lost per hour of downtime
    #[serde(alias = "cout_arret_horaire")]
    pub downtime_cost_per_hour: Money,

    // --- Aging asset ---
    /// Baseline annual maintenance cost
    #[serde(alias = "maint_old_annuel")]
    pub old_maintenance_annual: Money,
    /// Baseline annual energy cost
    #[serde(alias = "energie_old_annuel")]
    pub old_energy_annual: Money,
    /// Annual acceleration of the failure rate (Weibull-like wear)
    #[serde(alias = "facteur_usure_old")]
    pub old_wear_factor: Rate,
    /// Resale value of the aging asset, credited against the new purchase
    #[serde(alias = "valeur_revente_actuelle")]
    pub resale_value: Money,
    /// Expected failures in year 1
    #[serde(alias = "nb_pannes_old_base")]
    pub old_failures_base: Quantity,
    /// Mean time to repair, hours
    #[serde(alias = "mttr_old")]
    pub old_mttr_hours: Quantity,

    // --- New asset ---
    /// Upfront purchase cost
    #[serde(alias = "capex_new")]
    pub new_capex: Money,
    /// Baseline annual maintenance cost
    #[serde(alias = "maint_new_annuel")]
    pub new_maintenance_annual: Money,
    /// Baseline annual energy cost
    #[serde(alias = "energie_new_annuel")]
    pub new_energy_annual: Money,
    /// Expected failures per year, constant over the horizon
    #[serde(alias = "nb_pannes_new_base")]
    pub new_failures_base: Quantity,
    /// Mean time to repair, hours
    #[serde(alias = "mttr_new")]
    pub new_mttr_hours: Quantity,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        ScenarioParams {
            horizon_years: 7,
            discount_rate: dec!(0.12),
            inflation_rate: dec!(0.03),
            downtime_cost_per_hour: dec!(25000),
            old_maintenance_annual: dec!(350000),
            old_energy_annual: dec!(800000),
            old_wear_factor: dec!(0.15),
            resale_value: dec!(100000),
            old_failures_base: dec!(8),
            old_mttr_hours: dec!(4),
            new_capex: dec!(8000000),
            new_maintenance_annual: dec!(80000),
            new_energy_annual: dec!(450000),
            new_failures_base: dec!(1),
            new_mttr_hours: dec!(1),
        }
    }
}

impl ScenarioParams {
    /// Reject inputs that would produce degenerate or negative cash flows.
    pub fn validate(&self) -> TcoResult<()> {
        if self.horizon_years < 1 {
            return Err(TcoError::InvalidInput {
                field: "horizon_years".into(),
                reason: "Horizon must be at least 1 year".into(),
            });
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(TcoError::InvalidInput {
                field: "horizon_years".into(),
                reason: format!("Horizon must not exceed {MAX_HORIZON_YEARS} years"),
            });
        }

        for (field, rate) in [
            ("discount_rate", self.discount_rate),
            ("inflation_rate", self.inflation_rate),
            ("old_wear_factor", self.old_wear_factor),
        ] {
            if rate <= dec!(-1) {
                return Err(TcoError::InvalidInput {
                    field: field.into(),
                    reason: "Rate must be greater than -100%".into(),
                });
            }
        }

        for (field, value) in [
            ("downtime_cost_per_hour", self.downtime_cost_per_hour),
            ("old_maintenance_annual", self.old_maintenance_annual),
            ("old_energy_annual", self.old_energy_annual),
            ("resale_value", self.resale_value),
            ("old_failures_base", self.old_failures_base),
            ("old_mttr_hours", self.old_mttr_hours),
            ("new_capex", self.new_capex),
            ("new_maintenance_annual", self.new_maintenance_annual),
            ("new_energy_annual", self.new_energy_annual),
            ("new_failures_base", self.new_failures_base),
            ("new_mttr_hours", self.new_mttr_hours),
        ] {
            if value < Decimal::ZERO {
                return Err(TcoError::InvalidInput {
                    field: field.into(),
                    reason: "Must be non-negative".into(),
                });
            }
        }

        Ok(())
    }

    /// Current value of a field, by name.
    pub fn field(&self, name: &str) -> TcoResult<Decimal> {
        let value = match name {
            "horizon_years" => Decimal::from(self.horizon_years),
            "discount_rate" => self.discount_rate,
            "inflation_rate" => self.inflation_rate,
            "downtime_cost_per_hour" => self.downtime_cost_per_hour,
            "old_maintenance_annual" => self.old_maintenance_annual,
            "old_energy_annual" => self.old_energy_annual,
            "old_wear_factor" => self.old_wear_factor,
            "resale_value" => self.resale_value,
            "old_failures_base" => self.old_failures_base,
            "old_mttr_hours" => self.old_mttr_hours,
            "new_capex" => self.new_capex,
            "new_maintenance_annual" => self.new_maintenance_annual,
            "new_energy_annual" => self.new_energy_annual,
            "new_failures_base" => self.new_failures_base,
            "new_mttr_hours" => self.new_mttr_hours,
            _ => return Err(unknown_field(name)),
        };
        Ok(value)
    }

    /// Copy of these parameters with one field replaced by name.
    pub fn with_field(&self, name: &str, value: Decimal) -> TcoResult<ScenarioParams> {
        let mut p = self.clone();
        match name {
            "horizon_years" => {
                p.horizon_years = value
                    .trunc()
                    .to_u32()
                    .filter(|_| value.fract().is_zero())
                    .ok_or_else(|| TcoError::InvalidInput {
                        field: name.into(),
                        reason: format!("{value} is not a whole number of years"),
                    })?;
            }
            "discount_rate" => p.discount_rate = value,
            "inflation_rate" => p.inflation_rate = value,
            "downtime_cost_per_hour" => p.downtime_cost_per_hour = value,
            "old_maintenance_annual" => p.old_maintenance_annual = value,
            "old_energy_annual" => p.old_energy_annual = value,
            "old_wear_factor" => p.old_wear_factor = value,
            "resale_value" => p.resale_value = value,
            "old_failures_base" => p.old_failures_base = value,
            "old_mttr_hours" => p.old_mttr_hours = value,
            "new_capex" => p.new_capex = value,
            "new_maintenance_annual" => p.new_maintenance_annual = value,
            "new_energy_annual" => p.new_energy_annual = value,
            "new_failures_base" => p.new_failures_base = value,
            "new_mttr_hours" => p.new_mttr_hours = value,
            _ => return Err(unknown_field(name)),
        }
        Ok(p)
    }
}

fn unknown_field(name: &str) -> TcoError {
    TcoError::InvalidInput {
        field: name.into(),
        reason: format!("Unknown parameter; expected one of {}", FIELD_NAMES.join(", ")),
    }
}
