//! Expected new infections by age group under an age-structured renewal
//! model with school-status policy and susceptible depletion.
//!
//! ```text
//! ModelConfig (JSON / TOML) --into_inputs--> ModelInputs --RenewalEngine--> ExpectedCases
//! ```
//!
//! Each simulated day convolves recent cases with the reversed serial
//! interval ([`kernel`]), mixes the resulting pressure through the contact
//! matrix picked by the day's school policy ([`mixing`]), scales by the
//! susceptible fraction ([`history`]) and relative susceptibility, and
//! appends the row to the case history. [`Strategy`] selects between the
//! explicit loop and the scan form ([`scan`]).

pub mod config;
pub mod contact;
pub mod error;
pub mod history;
pub mod inputs;
pub mod kernel;
pub mod mixing;
pub mod output;
pub mod policy;
pub mod renewal;
pub mod scan;

pub use config::{ContactRows, CountryData, ModelConfig, Parameters};
pub use contact::{ContactMatrices, ContactSetting, DayKind};
pub use error::{EngineError, Result, Shape};
pub use inputs::{Dimensions, ModelInputs};
pub use output::ExpectedCases;
pub use policy::{PolicySchedule, SchoolPolicy};
pub use renewal::{RenewalEngine, Strategy};
