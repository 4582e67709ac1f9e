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

//! # Evx Operator Module
//!
//! This module defines the compiled form of a helper operator, the
//! [`EvTerm`], and the outcome it produces for each event.
//!
//! ## Two-Phase Lifecycle
//!
//! A helper is turned into a term once by an [`EvHelperBuilder`]:
//!
//! - **Build time**: parameters are classified and validated, external
//!   resources (key-value store entries, schema declarations) are resolved.
//!   Any problem is an [`crate::errors::EvError`] and no term is produced.
//! - **Evaluation time**: the term runs against one event at a time and
//!   returns an [`EvOutcome`]. It never raises build-class errors.
//!
//! ## Sharing
//!
//! Terms capture only read-only data and are `Clone + Send + Sync`; cloning a
//! term clones an `Arc`, so many threads can evaluate the same term on
//! different events without coordination.
//!
//! ```rust
//! use evx::event::EvEvent;
//! use evx::operator::{EvOutcome, EvTerm};
//!
//! let term = EvTerm::new("helper.passthrough", |event| EvOutcome::Success(event));
//! assert!(term.evaluate(EvEvent::new()).success());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::event::EvEvent;
use crate::parameter::EvDefinitions;

/// Result of evaluating a term against one event.
///
/// There is no partial success: either the event comes back (possibly
/// written at the term's destination) or it comes back untouched together
/// with a diagnostic trace.
#[derive(Clone, Debug, PartialEq)]
pub enum EvOutcome {
    Success(EvEvent),
    Failure { event: EvEvent, trace: String },
}

impl EvOutcome {
    pub fn failure_of(event: EvEvent, trace: impl Into<String>) -> Self {
        EvOutcome::Failure {
            event,
            trace: trace.into(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, EvOutcome::Success(_))
    }

    pub fn failure(&self) -> bool {
        !self.success()
    }

    /// The event carried by either arm.
    pub fn payload(&self) -> &EvEvent {
        match self {
            EvOutcome::Success(event) => event,
            EvOutcome::Failure { event, .. } => event,
        }
    }

    pub fn trace(&self) -> Option<&str> {
        match self {
            EvOutcome::Success(_) => None,
            EvOutcome::Failure { trace, .. } => Some(trace.as_str()),
        }
    }

    pub fn into_event(self) -> EvEvent {
        match self {
            EvOutcome::Success(event) => event,
            EvOutcome::Failure { event, .. } => event,
        }
    }
}

/// Evaluation closure stored inside a term.
pub type EvTermFn = dyn Fn(EvEvent) -> EvOutcome + Send + Sync;

/// Compiled, named helper operator.
#[derive(Clone)]
pub struct EvTerm {
    name: String,
    func: Arc<EvTermFn>,
}

impl EvTerm {
    #[allow(non_snake_case)]
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(EvEvent) -> EvOutcome + Send + Sync + 'static,
    {
        EvTerm {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, event: EvEvent) -> EvOutcome {
        (self.func)(event)
    }
}

impl fmt::Debug for EvTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvTerm").field("name", &self.name).finish()
    }
}

/// Builds a term from `(destination, helper name, raw parameters, definitions)`.
///
/// Builders are closures so each one can own the collaborators it needs
/// (store manager, scope, schema) from registration onward.
pub type EvHelperBuilder =
    Arc<dyn Fn(&str, &str, &[String], &EvDefinitions) -> Result<EvTerm> + Send + Sync>;

/// Canonical term name: `helper.<name>[<destination>, <params...>]`.
pub fn format_term_name(helper: &str, destination: &str, parameters: &[String]) -> String {
    let mut name = format!("helper.{helper}[{destination}");
    for parameter in parameters {
        name.push_str(", ");
        name.push_str(parameter);
    }
    name.push(']');
    name
}

/// Diagnostic trace for an evaluation failure of `term_name`.
pub fn failure_trace(term_name: &str, reason: impl fmt::Display) -> String {
    format!("{term_name} -> Failure: {reason}")
}
