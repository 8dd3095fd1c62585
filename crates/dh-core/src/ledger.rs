//! The step ledger: which onboarding steps this device has completed.
//!
//! The ledger is an append-only set of completed steps with the sequencing
//! queries the page guard needs. Persistence lives behind
//! [`crate::ports::StepLedgerPort`]; this type is the pure value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::steps::StepId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLedger {
    completed: BTreeSet<StepId>,
}

impl StepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, step: StepId) -> bool {
        self.completed.contains(&step)
    }

    /// Record a step as completed. Idempotent.
    pub fn mark_completed(&mut self, step: StepId) {
        self.completed.insert(step);
    }

    /// Whether every step strictly before `step` is completed.
    ///
    /// The first step trivially satisfies this.
    pub fn prior_steps_completed(&self, step: StepId) -> bool {
        StepId::ALL[..step.index()]
            .iter()
            .all(|s| self.is_completed(*s))
    }

    /// The first step in flow order that is not yet completed.
    ///
    /// When every step is completed this parks on the final step, so the
    /// caller always has a concrete destination.
    pub fn first_incomplete_step(&self) -> StepId {
        StepId::ALL
            .iter()
            .copied()
            .find(|s| !self.is_completed(*s))
            .unwrap_or(StepId::Subscription)
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}
