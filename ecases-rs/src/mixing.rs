//! Contact mixing of infection pressure under each school policy.
//!
//! Output columns `[0, A_CHILD)` are children, the rest adults. Every formula
//! sums `pressure[age] * contacts[age, col]` over contactor ages in increasing
//! age order.

use std::ops::Range;

use nalgebra::{DMatrix, DVector};

use crate::{
    contact::{ContactMatrices, DayKind},
    policy::SchoolPolicy,
};

/// Everything a mixing formula reads for one day.
pub struct MixingTerms<'a> {
    pub pressure: &'a DVector<f64>,
    pub contacts: &'a DMatrix<f64>,
    /// Row of `impact_intv` for the day; only adult entries are read.
    pub impact: &'a DVector<f64>,
    pub a_child: usize,
    pub children_effect: f64,
    pub onlychildren_effect: f64,
}

type MixingFn = fn(&MixingTerms<'_>) -> DVector<f64>;

/// Indexed by [`SchoolPolicy::index`].
const MIXING_TABLE: [MixingFn; 3] = [mix_school_open, mix_school_reopened, mix_school_closed];

pub struct ContactMixingSelector<'a> {
    contacts: &'a ContactMatrices,
    a_child: usize,
    children_effect: f64,
    onlychildren_effect: f64,
}

impl<'a> ContactMixingSelector<'a> {
    pub fn new(
        contacts: &'a ContactMatrices,
        a_child: usize,
        children_effect: f64,
        onlychildren_effect: f64,
    ) -> Self {
        ContactMixingSelector {
            contacts,
            a_child,
            children_effect,
            onlychildren_effect,
        }
    }

    pub fn contacts_for(&self, policy: SchoolPolicy, kind: DayKind) -> &'a DMatrix<f64> {
        self.contacts.get(policy.contact_setting(), kind)
    }

    /// Pre-depletion expected cases for one day.
    pub fn mix(
        &self,
        policy: SchoolPolicy,
        kind: DayKind,
        pressure: &DVector<f64>,
        impact: &DVector<f64>,
    ) -> DVector<f64> {
        let terms = MixingTerms {
            pressure,
            contacts: self.contacts_for(policy, kind),
            impact,
            a_child: self.a_child,
            children_effect: self.children_effect,
            onlychildren_effect: self.onlychildren_effect,
        };
        MIXING_TABLE[policy.index()](&terms)
    }
}

fn column_sum(pressure: &DVector<f64>, contacts: &DMatrix<f64>, ages: Range<usize>, col: usize) -> f64 {
    ages.fold(0.0, |acc, age| acc + pressure[age] * contacts[(age, col)])
}

/// Children columns see everyone; intervention only damps the adult-to-adult
/// contribution.
fn mix_with_adult_damping(terms: &MixingTerms<'_>) -> DVector<f64> {
    let a = terms.pressure.len();
    let a_child = terms.a_child;
    DVector::from_fn(a, |col, _| {
        if col < a_child {
            column_sum(terms.pressure, terms.contacts, 0..a, col)
        } else {
            column_sum(terms.pressure, terms.contacts, 0..a_child, col)
                + column_sum(terms.pressure, terms.contacts, a_child..a, col) * terms.impact[col]
        }
    })
}

pub fn mix_school_open(terms: &MixingTerms<'_>) -> DVector<f64> {
    mix_with_adult_damping(terms)
}

pub fn mix_school_closed(terms: &MixingTerms<'_>) -> DVector<f64> {
    mix_with_adult_damping(terms)
}

/// The children effect is applied to children pressure before mixing and
/// again to children columns after mixing.
pub fn mix_school_reopened(terms: &MixingTerms<'_>) -> DVector<f64> {
    let a = terms.pressure.len();
    let a_child = terms.a_child;

    let mut with_children = terms.pressure.clone();
    for age in 0..a_child {
        with_children[age] *= terms.children_effect;
    }
    let mut with_onlychildren = with_children.clone();
    for age in 0..a_child {
        with_onlychildren[age] *= terms.onlychildren_effect;
    }

    let mut mixed = DVector::from_fn(a, |col, _| {
        if col < a_child {
            column_sum(&with_onlychildren, terms.contacts, 0..a, col)
        } else {
            column_sum(&with_children, terms.contacts, 0..a, col)
        }
    });
    for col in 0..a {
        if col < a_child {
            mixed[col] *= terms.children_effect;
        } else {
            mixed[col] *= terms.impact[col];
        }
    }
    mixed
}
