use log::{debug, trace};

use crate::{
    history::CaseHistory, inputs::ModelInputs, output::ExpectedCases, policy::SchoolPolicy, scan,
};

/// How the day-by-day recurrence is evaluated. Both strategies produce the
/// same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Explicit loop over the case-history arena.
    #[default]
    Sequential,
    /// Fused scan over a precomputed day plan with a sliding window carry.
    Scan,
}

pub struct RenewalEngine {
    inputs: ModelInputs,
}

impl RenewalEngine {
    pub fn new(inputs: ModelInputs) -> RenewalEngine {
        RenewalEngine { inputs }
    }

    pub fn inputs(&self) -> &ModelInputs {
        &self.inputs
    }

    pub fn simulate(&self) -> ExpectedCases {
        self.simulate_with(Strategy::Sequential)
    }

    pub fn simulate_with(&self, strategy: Strategy) -> ExpectedCases {
        let dims = self.inputs.dims();
        debug!(
            "simulating {} days ({} seeded) over {} age groups with {:?} strategy, rho0={}",
            dims.n2,
            dims.n0,
            dims.a,
            strategy,
            self.inputs.rho0()
        );
        let output = match strategy {
            Strategy::Sequential => self.simulate_sequential(),
            Strategy::Scan => scan::simulate(&self.inputs),
        };
        debug!("total expected cases: {}", output.as_matrix().sum());
        output
    }

    fn simulate_sequential(&self) -> ExpectedCases {
        let inputs = &self.inputs;
        let dims = inputs.dims();
        let schedule = inputs.schedule();
        let kernel = inputs.pressure_kernel();
        let selector = inputs.mixing_selector();
        let relative_susceptibility = inputs.relative_susceptibility();

        let mut history =
            CaseHistory::seeded(dims.n2, dims.a, dims.n0, inputs.init_a(), inputs.seed_value());

        let mut previous: Option<SchoolPolicy> = None;
        for day in dims.simulated_days() {
            let susceptible =
                history.cumulative_fraction_susceptible(day, inputs.population_by_age());
            let pressure = kernel.pressure(&history, day);

            let policy = schedule.policy(day);
            let kind = schedule.day_kind(day);
            if previous != Some(policy) {
                debug!("day {day}: school policy {policy:?}");
                previous = Some(policy);
            }

            let mut row = selector.mix(policy, kind, &pressure, &inputs.impact_row(day));
            row.component_mul_assign(&susceptible);
            row.component_mul_assign(&relative_susceptibility);
            trace!("day {day}: {policy:?} {kind:?}, {} expected cases", row.sum());

            history.commit_row(day, &row);
        }
        ExpectedCases::new(history.into_matrix())
    }
}
