use nalgebra::DVector;

use crate::history::CaseHistory;

/// Aligned slices of the reversed kernel and of the case history used on one
/// day. Both are truncated from their start so the lengths always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelWindow {
    pub kernel_start: usize,
    pub history_start: usize,
    pub len: usize,
}

/// Convolves recent case history with the reversed serial interval.
#[derive(Debug, Clone, PartialEq)]
pub struct InfectionPressureKernel {
    rev_serial_interval: DVector<f64>,
    rho0: f64,
}

impl InfectionPressureKernel {
    pub fn new(rev_serial_interval: DVector<f64>, rho0: f64) -> Self {
        InfectionPressureKernel {
            rev_serial_interval,
            rho0,
        }
    }

    pub fn si_cut(&self) -> usize {
        self.rev_serial_interval.len()
    }

    pub fn rho0(&self) -> f64 {
        self.rho0
    }

    pub fn window(&self, day: usize) -> KernelWindow {
        let si_cut = self.si_cut();
        let kernel_start = si_cut.saturating_sub(day);
        let history_start = day.saturating_sub(si_cut);
        KernelWindow {
            kernel_start,
            history_start,
            len: si_cut - kernel_start,
        }
    }

    /// Infection pressure contributed by each age group on `day`, before
    /// contact mixing.
    pub fn pressure(&self, history: &CaseHistory, day: usize) -> DVector<f64> {
        let window = self.window(day);
        debug_assert_eq!(window.len, day - window.history_start);

        let mut pressure = DVector::<f64>::zeros(history.ages());
        for i in 0..window.len {
            let weight = self.rev_serial_interval[window.kernel_start + i];
            for age in 0..history.ages() {
                pressure[age] += weight * history.at(window.history_start + i, age);
            }
        }
        pressure *= self.rho0;
        pressure
    }
}
