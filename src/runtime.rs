//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Evx.
//! The Evx project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Evx Runtime Module
//!
//! Drives compiled terms over events: single evaluation, ordered chains and
//! batches. With the `parallel` feature a batch is spread over the Rayon
//! thread pool; output order always matches input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::event::EvEvent;
use crate::operator::{EvOutcome, EvTerm};

/// Evaluates one term, logging failures.
pub fn execute_term(term: &EvTerm, event: EvEvent) -> EvOutcome {
    let outcome = term.evaluate(event);
    if let EvOutcome::Failure { trace, .. } = &outcome {
        log::debug!(
            "runtime.term.failure: term rejected event - term={}, trace={}",
            term.name(),
            trace
        );
    }
    outcome
}

/// Evaluates `term` against every event of the batch.
pub fn evaluate_batch(term: &EvTerm, events: Vec<EvEvent>) -> Vec<EvOutcome> {
    log::debug!(
        "runtime.batch.start: evaluating batch - term={}, events={}",
        term.name(),
        events.len()
    );

    #[cfg(feature = "parallel")]
    let outcomes: Vec<EvOutcome> = events
        .into_par_iter()
        .map(|event| execute_term(term, event))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<EvOutcome> = events
        .into_iter()
        .map(|event| execute_term(term, event))
        .collect();

    outcomes
}

/// Applies terms in order, stopping at the first failure.
///
/// The failing outcome carries the event as it was before the failing term;
/// writes of earlier terms are kept.
pub fn evaluate_chain(terms: &[EvTerm], event: EvEvent) -> EvOutcome {
    let mut current = event;
    for term in terms {
        match execute_term(term, current) {
            EvOutcome::Success(next) => current = next,
            failure => return failure,
        }
    }
    EvOutcome::Success(current)
}

/// Batch outcomes split into accepted events and dead letters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvBatchReport {
    pub accepted: Vec<EvEvent>,
    /// Rejected events paired with their failure trace.
    pub dead_letter: Vec<(EvEvent, String)>,
}

impl EvBatchReport {
    pub fn from_outcomes(outcomes: Vec<EvOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                EvOutcome::Success(event) => report.accepted.push(event),
                EvOutcome::Failure { event, trace } => report.dead_letter.push((event, trace)),
            }
        }

        if !report.dead_letter.is_empty() {
            log::info!(
                "runtime.batch.report: batch had rejections - accepted={}, rejected={}",
                report.accepted_count(),
                report.rejected_count()
            );
        }
        report
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.dead_letter.len()
    }

    pub fn total(&self) -> usize {
        self.accepted_count() + self.rejected_count()
    }
}
