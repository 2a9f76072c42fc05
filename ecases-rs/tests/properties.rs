mod common;

use assert_approx_eq::assert_approx_eq;
use common::{A, A_CHILD, CONFIGURATIONS, INIT_A, random_config};
use ecases::{
    ExpectedCases, ModelConfig, RenewalEngine, SchoolPolicy, Strategy, history::CaseHistory,
};
use nalgebra::DVector;
use rand::{SeedableRng, rngs::StdRng};

fn random_runs() -> Vec<(ModelConfig, ExpectedCases)> {
    let mut rng = StdRng::seed_from_u64(2020);
    CONFIGURATIONS
        .iter()
        .map(|&(n0, n2, si_cut)| {
            let config = random_config(&mut rng, n0, n2, si_cut);
            let output = RenewalEngine::new(config.clone().into_inputs().unwrap()).simulate();
            (config, output)
        })
        .collect()
}

fn history_through(output: &ExpectedCases, days: usize) -> CaseHistory {
    let (n2, a) = output.shape();
    let mut history = CaseHistory::new(n2, a);
    for day in 0..days {
        history.commit_row(day, &output.day(day));
    }
    history
}

#[test]
fn test_shape_and_non_negativity() {
    for (config, output) in random_runs() {
        assert_eq!(output.shape(), (config.data.n2, A));
        assert!(output.as_matrix().iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn test_seed_rows() {
    for (config, output) in random_runs() {
        let seed = config.parameters.e_cases_n0 / INIT_A.len() as f64;
        for day in 0..config.data.n0 {
            for age in 0..A {
                let expected = if INIT_A.contains(&age) { seed } else { 0.0 };
                assert_eq!(output.at(day, age), expected, "day {day} age {age}");
            }
        }
    }
}

#[test]
fn test_depletion_is_monotone() {
    for (config, output) in random_runs() {
        let n2 = config.data.n2;
        let population = DVector::from_vec(config.data.population_by_age.clone());
        let history = history_through(&output, n2);
        let mut previous = DVector::from_element(A, 1.0);
        for day in 0..=n2 {
            let susceptible = history.cumulative_fraction_susceptible(day, &population);
            for age in 0..A {
                assert!((0.0..=1.0).contains(&susceptible[age]));
                assert!(susceptible[age] <= previous[age], "day {day} age {age}");
            }
            previous = susceptible;
        }
    }
}

#[test]
fn test_reopening_boundary_switches_formula() {
    let mut rng = StdRng::seed_from_u64(11);
    let (n0, n2, si_cut) = (4, 12, 9);
    let reopening = 7;
    let mut config = random_config(&mut rng, n0, n2, si_cut);
    config.parameters.r0 = 2.0;
    config.data.avg_contact_rate = 1.0;
    config.data.school_status = vec![0.0; n2];
    config.data.elementary_school_reopening_idx = reopening;
    config.data.population_by_age = vec![1e3; A];

    let inputs = config.into_inputs().unwrap();
    let schedule = inputs.schedule();
    assert_eq!(schedule.policy(reopening - 1), SchoolPolicy::Open);
    assert_eq!(schedule.policy(reopening), SchoolPolicy::Reopened);

    let output = RenewalEngine::new(inputs.clone()).simulate_with(Strategy::Sequential);
    let kernel = inputs.pressure_kernel();
    let selector = inputs.mixing_selector();
    let relative_susceptibility = inputs.relative_susceptibility();

    let expected_row = |day: usize, policy: SchoolPolicy| {
        let history = history_through(&output, day);
        let susceptible = history.cumulative_fraction_susceptible(day, inputs.population_by_age());
        let pressure = kernel.pressure(&history, day);
        let kind = schedule.day_kind(day);
        selector
            .mix(policy, kind, &pressure, &inputs.impact_row(day))
            .component_mul(&susceptible)
            .component_mul(&relative_susceptibility)
    };

    assert_eq!(output.day(reopening - 1), expected_row(reopening - 1, SchoolPolicy::Open));
    assert_eq!(output.day(reopening), expected_row(reopening, SchoolPolicy::Reopened));
    let jump = (expected_row(reopening, SchoolPolicy::Reopened)
        - expected_row(reopening, SchoolPolicy::Open))
    .amax();
    assert!(jump > 1e-6, "no discontinuity at reopening: {jump:e}");
}

#[test]
fn test_policy_transitions_follow_status() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut config = random_config(&mut rng, 4, 12, 9);
    config.data.school_status = vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    config.data.elementary_school_reopening_idx = 9;
    let inputs = config.into_inputs().unwrap();
    assert_eq!(
        inputs.schedule().transitions(),
        vec![
            (4, SchoolPolicy::Open),
            (5, SchoolPolicy::Closed),
            (7, SchoolPolicy::Open),
            (9, SchoolPolicy::Reopened),
        ]
    );
}

/// Recomputes every simulated row from the raw config with plain loops, for
/// schedules without a reopening day.
fn rows_by_hand(config: &ModelConfig, undamped_closure: bool) -> Vec<Vec<f64>> {
    let data = &config.data;
    let parameters = &config.parameters;
    let rho0 = parameters.r0 / data.avg_contact_rate;
    let seed = parameters.e_cases_n0 / data.init_a.len() as f64;

    let mut rows: Vec<Vec<f64>> = (0..data.n0)
        .map(|_| (0..A).map(|age| if INIT_A.contains(&age) { seed } else { 0.0 }).collect())
        .collect();
    for day in data.n0..data.n2 {
        let closed = data.school_status[day] != 0.0;
        let weekend = data.weekend[day - data.n0];
        let contacts = match (closed, weekend) {
            (false, false) => &data.contacts.weekdays_mean,
            (false, true) => &data.contacts.weekends_mean,
            (true, false) => &data.contacts.school_closure_weekdays,
            (true, true) => &data.contacts.school_closure_weekends,
        };

        let mut pressure = vec![0.0; A];
        for (i, weight) in data.rev_serial_interval.iter().enumerate() {
            if day + i >= data.si_cut {
                let past = day + i - data.si_cut;
                for age in 0..A {
                    pressure[age] += weight * rows[past][age];
                }
            }
        }

        let row = (0..A)
            .map(|col| {
                let from = |ages: std::ops::Range<usize>| {
                    ages.map(|age| rho0 * pressure[age] * contacts[age][col]).sum::<f64>()
                };
                let mixed = if col < A_CHILD || (closed && undamped_closure) {
                    from(0..A)
                } else {
                    from(0..A_CHILD) + from(A_CHILD..A) * parameters.impact_intv[day][col]
                };
                let cumulative: f64 = rows.iter().map(|r| r[col]).sum();
                let susceptible = (1.0 - cumulative / data.population_by_age[col]).max(0.0);
                mixed * susceptible * parameters.log_relsusceptibility_age[col].exp()
            })
            .collect();
        rows.push(row);
    }
    rows
}

#[test]
fn test_closed_days_damp_adult_contacts() {
    let mut rng = StdRng::seed_from_u64(19);
    let (n0, n2, si_cut) = (4, 12, 9);
    let mut config = random_config(&mut rng, n0, n2, si_cut);
    config.parameters.r0 = 2.0;
    config.data.avg_contact_rate = 1.0;
    config.data.school_status = (0..n2)
        .map(|day| if (6..9).contains(&day) { 1.0 } else { 0.0 })
        .collect();
    config.data.elementary_school_reopening_idx = n2;
    config.data.population_by_age = vec![1e3; A];
    assert_ne!(config.data.contacts.school_closure_weekdays, config.data.contacts.weekdays_mean);
    assert_ne!(config.data.contacts.school_closure_weekends, config.data.contacts.weekends_mean);

    let expected = rows_by_hand(&config, false);
    let undamped = rows_by_hand(&config, true);
    let engine = RenewalEngine::new(config.into_inputs().unwrap());
    assert_eq!(engine.inputs().schedule().policy(6), SchoolPolicy::Closed);

    for strategy in [Strategy::Sequential, Strategy::Scan] {
        let output = engine.simulate_with(strategy);
        for day in 0..n2 {
            for age in 0..A {
                let want = expected[day][age];
                assert_approx_eq!(output.at(day, age), want, 1e-10 * want.abs().max(1.0));
            }
        }
    }

    // The adult damping is visible on the first closed day.
    let gap = (A_CHILD..A)
        .map(|age| (expected[6][age] - undamped[6][age]).abs())
        .fold(0.0, f64::max);
    assert!(gap > 1e-6, "closure damping has no effect: {gap:e}");
}
