use nalgebra::{DMatrix, DVector};

/// Expected new cases by (day, age group).
///
/// Pre-allocated `N2 x A` arena written once per day in increasing day order.
/// Rows at or past [`committed_days`](CaseHistory::committed_days) are still
/// zero and never read.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseHistory {
    cases: DMatrix<f64>,
    committed: usize,
}

impl CaseHistory {
    pub fn new(days: usize, ages: usize) -> Self {
        CaseHistory {
            cases: DMatrix::zeros(days, ages),
            committed: 0,
        }
    }

    /// History with the first `n0` rows seeded: `value` on every age in
    /// `init_a`, zero elsewhere.
    pub fn seeded(days: usize, ages: usize, n0: usize, init_a: &[usize], value: f64) -> Self {
        let mut history = CaseHistory::new(days, ages);
        let mut seed = DVector::<f64>::zeros(ages);
        for &age in init_a {
            seed[age] = value;
        }
        for day in 0..n0 {
            history.commit_row(day, &seed);
        }
        history
    }

    pub fn days(&self) -> usize {
        self.cases.nrows()
    }

    pub fn ages(&self) -> usize {
        self.cases.ncols()
    }

    /// Number of rows written so far.
    pub fn committed_days(&self) -> usize {
        self.committed
    }

    pub fn at(&self, day: usize, age: usize) -> f64 {
        debug_assert!(day < self.committed, "day {day} has not been committed");
        self.cases[(day, age)]
    }

    /// Writes row `day`. The next uncommitted day is appended; rewriting an
    /// already committed day is only allowed with identical values.
    ///
    /// # Panics
    ///
    /// If `day` skips ahead of the next uncommitted day, lies past the arena,
    /// or rewrites a committed day with different values.
    pub fn commit_row(&mut self, day: usize, row: &DVector<f64>) {
        assert_eq!(row.len(), self.ages(), "row length must match age groups");
        if day < self.committed {
            let unchanged = row
                .iter()
                .enumerate()
                .all(|(age, value)| self.cases[(day, age)] == *value);
            assert!(unchanged, "day {day} is already committed with different values");
            return;
        }
        assert_eq!(day, self.committed, "days must be committed in order");
        assert!(day < self.days(), "day {day} is past the last of {} days", self.days());
        for (age, value) in row.iter().enumerate() {
            self.cases[(day, age)] = *value;
        }
        self.committed += 1;
    }

    /// Fraction of each age group still susceptible given all cases on days
    /// `0..day`, clamped at zero.
    pub fn cumulative_fraction_susceptible(
        &self,
        day: usize,
        population_by_age: &DVector<f64>,
    ) -> DVector<f64> {
        assert!(day <= self.committed, "day {day} reads uncommitted history");
        let mut cumulative = DVector::<f64>::zeros(self.ages());
        for past in 0..day {
            for age in 0..self.ages() {
                cumulative[age] += self.cases[(past, age)];
            }
        }
        DVector::from_fn(self.ages(), |age, _| {
            (1.0 - cumulative[age] / population_by_age[age]).max(0.0)
        })
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.cases
    }
}
