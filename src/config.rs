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

//! # Evx Config Module
//!
//! Declarative operator declarations and the engine configuration that
//! groups them. Both JSON and YAML are accepted:
//!
//! ```yaml
//! scope: decoders
//! definitions:
//!   perms_db: windows_perms
//! operators:
//!   - destination: /file/permissions
//!     helper: kvdb_decode_bitmask
//!     parameters: [$perms_db, access_mask, $event.mask]
//!   - /source/ip: parse_ip($raw.src)
//! ```
//!
//! The second operator uses the shorthand form: a single-entry map from the
//! destination to a `helper(arg, ...)` expression.

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EvError, Result};
use crate::parameter::EvDefinitions;

/// Immutable declaration of one helper operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOperatorSpec")]
pub struct EvOperatorSpec {
    pub destination: String,
    pub helper: String,
    pub parameters: Vec<String>,
}

impl EvOperatorSpec {
    #[allow(non_snake_case)]
    pub fn new(destination: impl Into<String>, helper: impl Into<String>, parameters: Vec<String>) -> Self {
        EvOperatorSpec {
            destination: destination.into(),
            helper: helper.into(),
            parameters,
        }
    }

    /// Parses the `helper(arg1, arg2, $ref)` shorthand.
    ///
    /// Arguments are comma separated and trimmed; `\,` keeps a literal comma.
    pub fn parse_expression(destination: &str, expression: &str) -> Result<Self> {
        let expression = expression.trim();
        let open = expression.find('(').ok_or_else(|| {
            EvError::validation(format!("helper expression '{expression}' has no argument list"))
        })?;
        if !expression.ends_with(')') {
            return Err(EvError::validation(format!(
                "helper expression '{expression}' is not closed"
            )));
        }

        let helper = expression[..open].trim();
        if helper.is_empty()
            || !helper
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(EvError::validation(format!(
                "invalid helper name '{helper}' in '{expression}'"
            )));
        }

        let body = &expression[open + 1..expression.len() - 1];
        Ok(Self::new(destination, helper, split_arguments(body)))
    }
}

fn split_arguments(body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(',') => current.push(','),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    arguments.push(current.trim().to_string());
    arguments
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOperatorSpec {
    Full {
        destination: String,
        helper: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    Shorthand(BTreeMap<String, String>),
}

impl TryFrom<RawOperatorSpec> for EvOperatorSpec {
    type Error = EvError;

    fn try_from(raw: RawOperatorSpec) -> Result<Self> {
        match raw {
            RawOperatorSpec::Full {
                destination,
                helper,
                parameters,
            } => Ok(EvOperatorSpec::new(destination, helper, parameters)),
            RawOperatorSpec::Shorthand(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((destination, expression)), None) => {
                        EvOperatorSpec::parse_expression(&destination, &expression)
                    }
                    _ => Err(EvError::validation(
                        "shorthand operator must map exactly one destination",
                    )),
                }
            }
        }
    }
}

fn default_scope() -> String {
    "default".to_string()
}

/// Engine-level configuration: store scope, definitions and operators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvEngineConfig {
    /// Scope name handed to the key-value store with every handler request.
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub definitions: EvDefinitions,
    #[serde(default)]
    pub operators: Vec<EvOperatorSpec>,
}

impl Default for EvEngineConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            definitions: EvDefinitions::default(),
            operators: Vec::new(),
        }
    }
}

impl EvEngineConfig {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    #[allow(non_snake_case)]
    pub fn operator(mut self, spec: EvOperatorSpec) -> Self {
        self.operators.push(spec);
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Loads a config file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config = match extension.as_str() {
            "json" => Self::from_json_str(&content)?,
            // YAML also reads JSON, so it is the fallback for unknown extensions.
            _ => Self::from_yaml_str(&content)?,
        };

        log::info!(
            "config.load: engine config loaded - path={}, scope={}, operators={}",
            path.display(),
            config.scope,
            config.operators.len()
        );
        Ok(config)
    }
}
