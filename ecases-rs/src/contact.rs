use nalgebra::DMatrix;

use crate::{
    config::ContactRows,
    error::{EngineError, Result, Shape},
};

/// Which survey-derived contact pattern applies on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactSetting {
    Baseline,
    SchoolClosure,
    ElementaryReopening,
}

impl ContactSetting {
    fn index(self) -> usize {
        match self {
            ContactSetting::Baseline => 0,
            ContactSetting::SchoolClosure => 1,
            ContactSetting::ElementaryReopening => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    pub fn from_flag(weekend: bool) -> Self {
        if weekend {
            DayKind::Weekend
        } else {
            DayKind::Weekday
        }
    }
}

/// The six `A x A` contact matrices. Rows are contactor ages, columns are
/// contactee ages.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMatrices {
    weekdays: [DMatrix<f64>; 3],
    weekends: [DMatrix<f64>; 3],
}

impl ContactMatrices {
    pub fn from_rows(rows: &ContactRows, a: usize) -> Result<Self> {
        Ok(ContactMatrices {
            weekdays: [
                square_matrix("cntct_weekdays_mean", &rows.weekdays_mean, a)?,
                square_matrix("cntct_school_closure_weekdays", &rows.school_closure_weekdays, a)?,
                square_matrix(
                    "cntct_elementary_school_reopening_weekdays",
                    &rows.elementary_school_reopening_weekdays,
                    a,
                )?,
            ],
            weekends: [
                square_matrix("cntct_weekends_mean", &rows.weekends_mean, a)?,
                square_matrix("cntct_school_closure_weekends", &rows.school_closure_weekends, a)?,
                square_matrix(
                    "cntct_elementary_school_reopening_weekends",
                    &rows.elementary_school_reopening_weekends,
                    a,
                )?,
            ],
        })
    }

    pub fn get(&self, setting: ContactSetting, kind: DayKind) -> &DMatrix<f64> {
        match kind {
            DayKind::Weekday => &self.weekdays[setting.index()],
            DayKind::Weekend => &self.weekends[setting.index()],
        }
    }

    pub fn age_groups(&self) -> usize {
        self.weekdays[0].nrows()
    }
}

fn square_matrix(name: &'static str, rows: &[Vec<f64>], a: usize) -> Result<DMatrix<f64>> {
    matrix_from_rows(name, rows, a, a)
}

/// Builds a dense matrix from a list of rows, checking the declared shape.
pub(crate) fn matrix_from_rows(
    name: &'static str,
    rows: &[Vec<f64>],
    nrows: usize,
    ncols: usize,
) -> Result<DMatrix<f64>> {
    let mismatch = |found_cols: usize| EngineError::ShapeMismatch {
        name,
        expected: Shape::Matrix(nrows, ncols),
        found: Shape::Matrix(rows.len(), found_cols),
    };
    if rows.len() != nrows {
        return Err(mismatch(rows.first().map_or(0, Vec::len)));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
        return Err(mismatch(row.len()));
    }
    Ok(DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}
