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

//! # Evx Parameter Module
//!
//! Helper parameters arrive as positional strings. A leading `$` marks a
//! field reference resolved from the event at evaluation time; anything else
//! is a literal fixed at build time. The raw strings are classified once,
//! right after the operator declaration is read, into [`EvParameter`] values so
//! builders never look at the sentinel again.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{EvError, Result};
use crate::event::EvFieldPath;

/// Sentinel marking a field reference.
pub const REFERENCE_ANCHOR: char = '$';

/// One classified helper parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvParameter {
    /// Literal value known at build time.
    Value(String),
    /// Field read from the event at evaluation time.
    Reference(EvFieldPath),
}

impl EvParameter {
    pub fn is_reference(&self) -> bool {
        matches!(self, EvParameter::Reference(_))
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            EvParameter::Value(value) => Some(value.as_str()),
            EvParameter::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&EvFieldPath> {
        match self {
            EvParameter::Reference(path) => Some(path),
            EvParameter::Value(_) => None,
        }
    }
}

impl fmt::Display for EvParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvParameter::Value(value) => f.write_str(value),
            EvParameter::Reference(path) => write!(f, "{}{}", REFERENCE_ANCHOR, path.dotted()),
        }
    }
}

/// Named definitions available while building helpers.
///
/// A `$name` parameter naming a definition is replaced by the definition's
/// value and becomes a literal. An empty set never substitutes anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvDefinitions {
    entries: HashMap<String, Value>,
}

impl EvDefinitions {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entries.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Literal rendering of a definition: strings verbatim, others as JSON.
    fn render(value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Classifies raw parameter strings for `helper`.
pub fn parse_parameters(
    helper: &str,
    raw: &[String],
    definitions: &EvDefinitions,
) -> Result<Vec<EvParameter>> {
    raw.iter()
        .enumerate()
        .map(|(index, text)| match text.strip_prefix(REFERENCE_ANCHOR) {
            Some(name) => {
                if let Some(definition) = definitions.get(name) {
                    return Ok(EvParameter::Value(EvDefinitions::render(definition)));
                }
                EvFieldPath::parse(name)
                    .map(EvParameter::Reference)
                    .map_err(|err| EvError::parameter(helper, index, err.to_string()))
            }
            None => Ok(EvParameter::Value(text.clone())),
        })
        .collect()
}

pub fn check_arity(helper: &str, parameters: &[EvParameter], expected: usize) -> Result<()> {
    if parameters.len() != expected {
        return Err(EvError::arity(helper, expected, parameters.len()));
    }
    Ok(())
}

/// Requires parameter `index` to be a literal and returns it.
pub fn check_value<'a>(helper: &str, parameters: &'a [EvParameter], index: usize) -> Result<&'a str> {
    match parameters.get(index) {
        Some(EvParameter::Value(value)) => Ok(value.as_str()),
        Some(EvParameter::Reference(path)) => Err(EvError::parameter(
            helper,
            index,
            format!("expected a value but got reference '{}'", path.dotted()),
        )),
        None => Err(EvError::parameter(helper, index, "missing parameter")),
    }
}

/// Requires parameter `index` to be a field reference and returns its path.
pub fn check_reference<'a>(
    helper: &str,
    parameters: &'a [EvParameter],
    index: usize,
) -> Result<&'a EvFieldPath> {
    match parameters.get(index) {
        Some(EvParameter::Reference(path)) => Ok(path),
        Some(EvParameter::Value(value)) => Err(EvError::parameter(
            helper,
            index,
            format!("expected a reference but got value '{value}'"),
        )),
        None => Err(EvError::parameter(helper, index, "missing parameter")),
    }
}
