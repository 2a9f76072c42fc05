use crate::contact::{ContactSetting, DayKind};

/// School-status state of a simulated day. Each variant has its own mixing
/// formula, see [`crate::mixing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolPolicy {
    Open,
    Reopened,
    Closed,
}

impl SchoolPolicy {
    /// Status values are emitted as exactly `0.0` for open schools, so the
    /// comparison is exact on purpose.
    pub fn classify(status: f64, day: usize, reopening_idx: usize) -> Self {
        if status == 0.0 {
            if day < reopening_idx {
                SchoolPolicy::Open
            } else {
                SchoolPolicy::Reopened
            }
        } else {
            SchoolPolicy::Closed
        }
    }

    pub fn contact_setting(self) -> ContactSetting {
        match self {
            SchoolPolicy::Open => ContactSetting::Baseline,
            SchoolPolicy::Reopened => ContactSetting::ElementaryReopening,
            SchoolPolicy::Closed => ContactSetting::SchoolClosure,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SchoolPolicy::Open => 0,
            SchoolPolicy::Reopened => 1,
            SchoolPolicy::Closed => 2,
        }
    }
}

/// Per-day policy inputs: school status for every day, weekend flags for the
/// simulated days `N0..N2`, and the reopening day.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySchedule {
    n0: usize,
    school_status: Vec<f64>,
    weekend: Vec<bool>,
    reopening_idx: usize,
}

impl PolicySchedule {
    pub(crate) fn new(
        n0: usize,
        school_status: Vec<f64>,
        weekend: Vec<bool>,
        reopening_idx: usize,
    ) -> Self {
        PolicySchedule {
            n0,
            school_status,
            weekend,
            reopening_idx,
        }
    }

    pub fn policy(&self, day: usize) -> SchoolPolicy {
        SchoolPolicy::classify(self.school_status[day], day, self.reopening_idx)
    }

    /// Only defined for simulated days (`day >= N0`).
    pub fn day_kind(&self, day: usize) -> DayKind {
        DayKind::from_flag(self.weekend[day - self.n0])
    }

    pub fn reopening_idx(&self) -> usize {
        self.reopening_idx
    }

    pub fn school_status(&self) -> &[f64] {
        &self.school_status
    }

    /// Weekend flags of the simulated days, starting at `N0`.
    pub fn weekend_flags(&self) -> &[bool] {
        &self.weekend
    }

    /// Days of `N0..N2` on which the policy differs from the previous
    /// simulated day, including the first simulated day.
    pub fn transitions(&self) -> Vec<(usize, SchoolPolicy)> {
        let mut out: Vec<(usize, SchoolPolicy)> = Vec::new();
        for day in self.n0..self.school_status.len() {
            let policy = self.policy(day);
            if out.last().is_none_or(|&(_, last)| last != policy) {
                out.push((day, policy));
            }
        }
        out
    }
}
