use std::io;

use nalgebra::{DMatrix, DVector};

use crate::error::Result;

/// Expected new cases by day (rows) and age group (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedCases {
    cases: DMatrix<f64>,
}

impl ExpectedCases {
    pub fn new(cases: DMatrix<f64>) -> ExpectedCases {
        ExpectedCases { cases }
    }

    /// `(N2, A)`.
    pub fn shape(&self) -> (usize, usize) {
        self.cases.shape()
    }

    pub fn at(&self, day: usize, age: usize) -> f64 {
        self.cases[(day, age)]
    }

    pub fn day(&self, day: usize) -> DVector<f64> {
        self.cases.row(day).transpose()
    }

    pub fn total_by_day(&self) -> DVector<f64> {
        DVector::from_fn(self.cases.nrows(), |day, _| self.cases.row(day).sum())
    }

    pub fn total_by_age(&self) -> DVector<f64> {
        DVector::from_fn(self.cases.ncols(), |age, _| self.cases.column(age).sum())
    }

    /// Largest elementwise absolute difference. Both results must have the
    /// same shape.
    pub fn max_abs_diff(&self, other: &ExpectedCases) -> f64 {
        assert_eq!(self.shape(), other.shape(), "shapes must match");
        self.cases
            .iter()
            .zip(other.cases.iter())
            .fold(0.0, |acc, (a, b)| f64::max(acc, (a - b).abs()))
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.cases
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.cases
    }

    /// Writes one `day,age_0,...` record per day.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut headers = vec!["day".to_string()];
        headers.extend((0..self.cases.ncols()).map(|age| format!("age_{age}")));
        wtr.write_record(&headers)?;
        for day in 0..self.cases.nrows() {
            let mut record = vec![day.to_string()];
            record.extend(self.cases.row(day).iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
