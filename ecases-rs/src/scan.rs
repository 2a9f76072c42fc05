//! Scan-form evaluation of the renewal recurrence.
//!
//! The per-day inputs are laid out up front as a [`DayPlan`] and folded with
//! [`scan`]. The carry keeps a zero-padded window of the last `SI_CUT` rows
//! and a running sum of all rows, so no step reads the full history. Mixing
//! is written as block products over the child and adult slices of the
//! contact matrix.

use nalgebra::{DMatrix, DVector};

use crate::{
    contact::DayKind, inputs::ModelInputs, output::ExpectedCases, policy::SchoolPolicy,
};

/// Folds `step` over `xs`, threading `init` through and collecting one output
/// per element.
pub fn scan<C, X, Y, F>(init: C, xs: impl IntoIterator<Item = X>, mut step: F) -> (C, Vec<Y>)
where
    F: FnMut(C, X) -> (C, Y),
{
    let mut carry = init;
    let mut ys = Vec::new();
    for x in xs {
        let (next, y) = step(carry, x);
        carry = next;
        ys.push(y);
    }
    (carry, ys)
}

/// Everything the recurrence needs for one simulated day besides the carry.
#[derive(Debug, Clone)]
pub struct DayPlan<'a> {
    pub day: usize,
    pub policy: SchoolPolicy,
    pub weekend: bool,
    pub contacts: &'a DMatrix<f64>,
    pub impact: DVector<f64>,
}

pub fn plan_days(inputs: &ModelInputs) -> Vec<DayPlan<'_>> {
    let dims = inputs.dims();
    let schedule = inputs.schedule();
    let matrices = inputs.contacts();
    dims.simulated_days()
        .zip(schedule.weekend_flags())
        .map(|(day, &weekend)| {
            let policy = SchoolPolicy::classify(
                schedule.school_status()[day],
                day,
                schedule.reopening_idx(),
            );
            DayPlan {
                day,
                policy,
                weekend,
                contacts: matrices.get(policy.contact_setting(), DayKind::from_flag(weekend)),
                impact: inputs.impact_row(day),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Carry {
    /// Row `i` holds the cases of day `t - SI_CUT + i`, zero before day 0.
    window: DMatrix<f64>,
    cumulative: DVector<f64>,
}

impl Carry {
    fn push(self, row: &DVector<f64>) -> Carry {
        let (si_cut, a) = self.window.shape();
        let window = DMatrix::from_fn(si_cut, a, |i, age| {
            if i + 1 < si_cut {
                self.window[(i + 1, age)]
            } else {
                row[age]
            }
        });
        Carry {
            window,
            cumulative: self.cumulative + row,
        }
    }
}

/// Pre-depletion expected cases of one planned day.
fn mix_planned(
    plan: &DayPlan<'_>,
    pressure: &DVector<f64>,
    a_child: usize,
    children_effect: f64,
    onlychildren_effect: f64,
) -> DVector<f64> {
    let contacts = plan.contacts;
    let a = contacts.nrows();
    let adults = a - a_child;
    let adult_impact = plan.impact.rows(a_child, adults);

    let (children, adult) = match plan.policy {
        SchoolPolicy::Open | SchoolPolicy::Closed => {
            let children = contacts.columns(0, a_child).tr_mul(pressure);
            let from_children = contacts
                .view((0, a_child), (a_child, adults))
                .tr_mul(&pressure.rows(0, a_child));
            let from_adults = contacts
                .view((a_child, a_child), (adults, adults))
                .tr_mul(&pressure.rows(a_child, adults));
            (children, from_children + from_adults.component_mul(&adult_impact))
        }
        SchoolPolicy::Reopened => {
            let mut with_children = pressure.clone();
            with_children.rows_mut(0, a_child).scale_mut(children_effect);
            let mut with_onlychildren = with_children.clone();
            with_onlychildren.rows_mut(0, a_child).scale_mut(onlychildren_effect);

            let children = contacts.columns(0, a_child).tr_mul(&with_onlychildren) * children_effect;
            let adult = contacts
                .columns(a_child, adults)
                .tr_mul(&with_children)
                .component_mul(&adult_impact);
            (children, adult)
        }
    };
    DVector::from_iterator(a, children.iter().chain(adult.iter()).copied())
}

pub fn simulate(inputs: &ModelInputs) -> ExpectedCases {
    let dims = inputs.dims();
    let kernel = inputs.rev_serial_interval();
    let rho0 = inputs.rho0();
    let population = inputs.population_by_age();
    let relative_susceptibility = inputs.relative_susceptibility();
    let (children_effect, onlychildren_effect) = inputs.children_effects();

    let mut seed = DVector::<f64>::zeros(dims.a);
    for &age in inputs.init_a() {
        seed[age] = inputs.seed_value();
    }

    let empty = Carry {
        window: DMatrix::zeros(dims.si_cut, dims.a),
        cumulative: DVector::zeros(dims.a),
    };
    let init = (0..dims.n0).fold(empty, |carry, _| carry.push(&seed));

    let (_, rows) = scan(init, plan_days(inputs), |carry, plan| {
        let susceptible = carry
            .cumulative
            .zip_map(population, |cases, people| (1.0 - cases / people).max(0.0));

        let mut pressure = DVector::<f64>::zeros(dims.a);
        for (i, weight) in kernel.iter().enumerate() {
            for age in 0..dims.a {
                pressure[age] += weight * carry.window[(i, age)];
            }
        }
        pressure *= rho0;

        let mut row = mix_planned(
            &plan,
            &pressure,
            dims.a_child,
            children_effect,
            onlychildren_effect,
        );
        row.component_mul_assign(&susceptible);
        row.component_mul_assign(&relative_susceptibility);

        (carry.push(&row), row)
    });

    ExpectedCases::new(DMatrix::from_fn(dims.n2, dims.a, |day, age| {
        if day < dims.n0 {
            seed[age]
        } else {
            rows[day - dims.n0][age]
        }
    }))
}
