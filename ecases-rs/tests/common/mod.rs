#![allow(dead_code)]

use ecases::{ContactRows, CountryData, ModelConfig, Parameters};
use rand::{
    Rng,
    distr::{Distribution, Uniform},
    rngs::StdRng,
};
use rand_distr::StandardNormal;

pub const A: usize = 6;
pub const A_CHILD: usize = 2;
pub const INIT_A: [usize; 2] = [2, 4];

/// `(N0, N2, SI_CUT)` for each randomized configuration.
pub const CONFIGURATIONS: [(usize, usize, usize); 6] =
    [(4, 12, 9), (4, 12, 10), (6, 13, 11), (6, 13, 12), (8, 14, 13), (8, 14, 14)];

fn uniform_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<Vec<f64>> {
    let unit = Uniform::new(0.0, 1.0).unwrap();
    (0..rows)
        .map(|_| (0..cols).map(|_| unit.sample(rng)).collect())
        .collect()
}

/// Random inputs drawn the way the calibration harness exercises the model:
/// everything uniform on `[0, 1)` except standard-normal log relative
/// susceptibilities, a population of at most 12.3 per age group so that
/// depletion kicks in, and 0/1 school status.
pub fn random_config(rng: &mut StdRng, n0: usize, n2: usize, si_cut: usize) -> ModelConfig {
    let parameters = Parameters {
        r0: rng.random(),
        e_cases_n0: rng.random(),
        log_relsusceptibility_age: (0..A)
            .map(|_| Distribution::<f64>::sample(&StandardNormal, rng))
            .collect(),
        impact_intv_children_effect: rng.random(),
        impact_intv_onlychildren_effect: rng.random(),
        impact_intv: uniform_matrix(rng, n2, A),
    };
    let contacts = ContactRows {
        weekends_mean: uniform_matrix(rng, A, A),
        weekdays_mean: uniform_matrix(rng, A, A),
        school_closure_weekends: uniform_matrix(rng, A, A),
        school_closure_weekdays: uniform_matrix(rng, A, A),
        elementary_school_reopening_weekends: uniform_matrix(rng, A, A),
        elementary_school_reopening_weekdays: uniform_matrix(rng, A, A),
    };
    let data = CountryData {
        n0,
        elementary_school_reopening_idx: rng.random_range(n0 + 2..n0 + 6),
        n2,
        school_status: (0..n2).map(|_| f64::from(rng.random_range(0..2u8))).collect(),
        a: A,
        a_child: A_CHILD,
        si_cut,
        weekend: (n0..n2).map(|_| rng.random_bool(0.5)).collect(),
        avg_contact_rate: rng.random_range(0.05..1.0),
        contacts,
        rev_serial_interval: (0..si_cut).map(|_| rng.random::<f64>()).collect(),
        population_by_age: (0..A).map(|_| rng.random_range(0.1..12.3)).collect(),
        n_init_a: Some(INIT_A.len()),
        init_a: INIT_A.to_vec(),
    };
    ModelConfig { parameters, data }
}
