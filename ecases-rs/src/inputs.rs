use std::ops::Range;

use nalgebra::{DMatrix, DVector};

use crate::{
    config::{CountryData, Parameters},
    contact::{ContactMatrices, matrix_from_rows},
    error::{EngineError, Result, Shape},
    kernel::InfectionPressureKernel,
    mixing::ContactMixingSelector,
    policy::PolicySchedule,
};

/// Fixed dimensions of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Seeded days.
    pub n0: usize,
    /// Total simulated days.
    pub n2: usize,
    /// Age groups.
    pub a: usize,
    /// Leading age groups classified as children.
    pub a_child: usize,
    /// Length of the reversed serial-interval kernel.
    pub si_cut: usize,
}

impl Dimensions {
    /// Days computed by the recurrence.
    pub fn simulated_days(&self) -> Range<usize> {
        self.n0..self.n2
    }

    fn validate(&self) -> Result<()> {
        if self.a_child > self.a {
            return Err(EngineError::InvalidDimension {
                name: "A_CHILD",
                reason: format!("{} children groups out of {} age groups", self.a_child, self.a),
            });
        }
        if self.n0 > self.n2 {
            return Err(EngineError::InvalidDimension {
                name: "N0",
                reason: format!("{} seeded days exceed {} total days", self.n0, self.n2),
            });
        }
        Ok(())
    }
}

/// Validated numeric inputs shared by both evaluation strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputs {
    dims: Dimensions,
    r0: f64,
    e_cases_n0: f64,
    log_relsusceptibility_age: DVector<f64>,
    impact_intv_children_effect: f64,
    impact_intv_onlychildren_effect: f64,
    impact_intv: DMatrix<f64>,
    schedule: PolicySchedule,
    avg_contact_rate: f64,
    contacts: ContactMatrices,
    rev_serial_interval: DVector<f64>,
    population_by_age: DVector<f64>,
    n_init_a: usize,
    init_a: Vec<usize>,
}

impl ModelInputs {
    pub fn new(parameters: &Parameters, data: &CountryData) -> Result<Self> {
        let dims = Dimensions {
            n0: data.n0,
            n2: data.n2,
            a: data.a,
            a_child: data.a_child,
            si_cut: data.si_cut,
        };
        dims.validate()?;

        check_len("SCHOOL_STATUS", data.school_status.len(), dims.n2)?;
        check_len("wkend_idx", data.weekend.len(), dims.n2 - dims.n0)?;
        if data.elementary_school_reopening_idx > dims.n2 {
            return Err(EngineError::InvalidPolicyIndex {
                name: "elementary_school_reopening_idx",
                index: data.elementary_school_reopening_idx,
                limit: dims.n2,
            });
        }

        let log_relsusceptibility_age =
            vector_from("log_relsusceptibility_age", &parameters.log_relsusceptibility_age, dims.a)?;
        let impact_intv = matrix_from_rows("impact_intv", &parameters.impact_intv, dims.n2, dims.a)?;
        let contacts = ContactMatrices::from_rows(&data.contacts, dims.a)?;
        let rev_serial_interval =
            vector_from("rev_serial_interval", &data.rev_serial_interval, dims.si_cut)?;

        let population_by_age = vector_from("popByAge_abs", &data.population_by_age, dims.a)?;
        if let Some((age, &value)) = population_by_age
            .iter()
            .enumerate()
            .find(|&(_, &value)| value <= 0.0 || value.is_nan())
        {
            return Err(EngineError::NonPositivePopulation { age, value });
        }
        let avg_contact_rate = data.avg_contact_rate;
        if avg_contact_rate <= 0.0 || !avg_contact_rate.is_finite() {
            return Err(EngineError::InvalidContactRate {
                value: avg_contact_rate,
            });
        }

        let n_init_a = data.n_init_a.unwrap_or(data.init_a.len());
        check_len("init_A", data.init_a.len(), n_init_a)?;
        if n_init_a == 0 && dims.n0 > 0 {
            return Err(EngineError::InvalidDimension {
                name: "N_init_A",
                reason: "seeded days need at least one seeded age group".to_string(),
            });
        }
        if let Some(&age) = data.init_a.iter().find(|&&age| age >= dims.a) {
            return Err(EngineError::InvalidPolicyIndex {
                name: "init_A",
                index: age,
                limit: dims.a,
            });
        }

        Ok(ModelInputs {
            dims,
            r0: parameters.r0,
            e_cases_n0: parameters.e_cases_n0,
            log_relsusceptibility_age,
            impact_intv_children_effect: parameters.impact_intv_children_effect,
            impact_intv_onlychildren_effect: parameters.impact_intv_onlychildren_effect,
            impact_intv,
            schedule: PolicySchedule::new(
                dims.n0,
                data.school_status.clone(),
                data.weekend.clone(),
                data.elementary_school_reopening_idx,
            ),
            avg_contact_rate,
            contacts,
            rev_serial_interval,
            population_by_age,
            n_init_a,
            init_a: data.init_a.clone(),
        })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Probability of infection given contact.
    pub fn rho0(&self) -> f64 {
        self.r0 / self.avg_contact_rate
    }

    /// Expected cases per seeded age group on each of the first `N0` days.
    pub fn seed_value(&self) -> f64 {
        self.e_cases_n0 / self.n_init_a as f64
    }

    pub fn init_a(&self) -> &[usize] {
        &self.init_a
    }

    pub fn n_init_a(&self) -> usize {
        self.n_init_a
    }

    /// `exp(log_relsusceptibility_age)`.
    pub fn relative_susceptibility(&self) -> DVector<f64> {
        self.log_relsusceptibility_age.map(f64::exp)
    }

    /// Row `day` of `impact_intv`.
    pub fn impact_row(&self, day: usize) -> DVector<f64> {
        self.impact_intv.row(day).transpose()
    }

    pub fn schedule(&self) -> &PolicySchedule {
        &self.schedule
    }

    pub fn contacts(&self) -> &ContactMatrices {
        &self.contacts
    }

    /// `(impact_intv_children_effect, impact_intv_onlychildren_effect)`.
    pub fn children_effects(&self) -> (f64, f64) {
        (
            self.impact_intv_children_effect,
            self.impact_intv_onlychildren_effect,
        )
    }

    pub fn rev_serial_interval(&self) -> &DVector<f64> {
        &self.rev_serial_interval
    }

    pub fn population_by_age(&self) -> &DVector<f64> {
        &self.population_by_age
    }

    pub fn pressure_kernel(&self) -> InfectionPressureKernel {
        InfectionPressureKernel::new(self.rev_serial_interval.clone(), self.rho0())
    }

    pub fn mixing_selector(&self) -> ContactMixingSelector<'_> {
        ContactMixingSelector::new(
            &self.contacts,
            self.dims.a_child,
            self.impact_intv_children_effect,
            self.impact_intv_onlychildren_effect,
        )
    }
}

fn check_len(name: &'static str, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(EngineError::ShapeMismatch {
            name,
            expected: Shape::Vector(expected),
            found: Shape::Vector(found),
        });
    }
    Ok(())
}

fn vector_from(name: &'static str, values: &[f64], len: usize) -> Result<DVector<f64>> {
    check_len(name, values.len(), len)?;
    Ok(DVector::from_column_slice(values))
}
