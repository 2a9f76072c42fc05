//! Serde documents describing one model evaluation.
//!
//! The input is split the same way the calibration layer hands it over:
//! [`Parameters`] holds the quantities a fit would sample, [`CountryData`]
//! holds the fixed data of the geographic unit. Matrices are lists of rows.

use serde::{Deserialize, Serialize};

use crate::{error::Result, inputs::ModelInputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub r0: f64,
    pub e_cases_n0: f64,
    pub log_relsusceptibility_age: Vec<f64>,
    pub impact_intv_children_effect: f64,
    pub impact_intv_onlychildren_effect: f64,
    /// `N2 x A` multiplicative intervention dampers.
    pub impact_intv: Vec<Vec<f64>>,
}

/// The six `A x A` contact matrices, weekday/weekend for each setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRows {
    pub weekdays_mean: Vec<Vec<f64>>,
    pub weekends_mean: Vec<Vec<f64>>,
    pub school_closure_weekdays: Vec<Vec<f64>>,
    pub school_closure_weekends: Vec<Vec<f64>>,
    pub elementary_school_reopening_weekdays: Vec<Vec<f64>>,
    pub elementary_school_reopening_weekends: Vec<Vec<f64>>,
}

impl ContactRows {
    /// Uses the same matrix for every setting and day kind.
    pub fn uniform(rows: Vec<Vec<f64>>) -> Self {
        ContactRows {
            weekdays_mean: rows.clone(),
            weekends_mean: rows.clone(),
            school_closure_weekdays: rows.clone(),
            school_closure_weekends: rows.clone(),
            elementary_school_reopening_weekdays: rows.clone(),
            elementary_school_reopening_weekends: rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryData {
    pub n0: usize,
    pub elementary_school_reopening_idx: usize,
    pub n2: usize,
    /// `0.0` when schools are open, anything else when closed.
    pub school_status: Vec<f64>,
    pub a: usize,
    pub a_child: usize,
    pub si_cut: usize,
    /// Weekend indicator for days `N0..N2`.
    pub weekend: Vec<bool>,
    pub avg_contact_rate: f64,
    pub contacts: ContactRows,
    /// Serial interval, already reversed, of length `SI_CUT`.
    pub rev_serial_interval: Vec<f64>,
    pub population_by_age: Vec<f64>,
    /// Defaults to `init_a.len()`.
    #[serde(default)]
    pub n_init_a: Option<usize>,
    pub init_a: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub parameters: Parameters,
    pub data: CountryData,
}

impl ModelConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Validates every shape and index and builds the numeric inputs.
    pub fn into_inputs(self) -> Result<ModelInputs> {
        ModelInputs::new(&self.parameters, &self.data)
    }
}
