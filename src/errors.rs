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

//! # Evx Error Module
//!
//! This module defines the build-time error type used throughout Evx.
//!
//! ## Error Classes
//!
//! Evx separates two classes of failure:
//!
//! - **Build-time errors** ([`EvError`]): a helper or parser declaration
//!   is malformed, or an external resource it needs cannot be resolved.
//!   They abort construction of that one operator and never reach events.
//! - **Evaluation-time failures**: a compiled term meets event data it
//!   cannot process. Those are not errors at all but the failure arm of
//!   [`crate::operator::EvOutcome`], routed by the caller per event.
//!
//! ## Error Categories
//!
//! - **Arity**: wrong number of helper parameters
//! - **Parameter**: a parameter has the wrong shape (literal vs reference)
//! - **Kvdb**: unknown database, unknown key or unreachable store
//! - **Payload**: stored decode table is malformed
//! - **Range**: decode table key is not a canonical bit position
//! - **Schema**: destination field is already typed incompatibly
//! - **Parser**: literal parser construction failed
//! - **UnknownHelper**: no builder registered under a helper name
//! - **Validation**: any other invalid configuration
//! - **Serde** / **Io**: configuration loading failures

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Evx.
pub type Result<T> = std::result::Result<T, EvError>;

/// Canonical build-time error enumeration for Evx.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EvError {
    /// Helper received the wrong number of parameters.
    #[error("helper '{helper}' expects {expected} parameters, got {actual}")]
    Arity {
        helper: String,
        expected: usize,
        actual: usize,
    },

    /// A parameter is a literal where a reference is required, or the reverse.
    #[error("helper '{helper}' parameter #{index}: {message}")]
    Parameter {
        helper: String,
        index: usize,
        message: String,
    },

    /// The key-value store could not resolve a database or key.
    #[error("kvdb error on database '{database}': {message}")]
    Kvdb { database: String, message: String },

    /// A stored payload does not have the expected structure.
    #[error("malformed payload: {message}")]
    Payload { message: String },

    /// A value lies outside the accepted range.
    #[error("range error: {message}")]
    Range { message: String },

    /// The destination field is declared with an incompatible type.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// A literal parser could not be constructed.
    #[error("parser '{parser}' build failed: {message}")]
    Parser { parser: String, message: String },

    /// No builder is registered under the requested helper name.
    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),
}

impl From<io::Error> for EvError {
    fn from(err: io::Error) -> Self {
        EvError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EvError {
    fn from(err: serde_json::Error) -> Self {
        EvError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for EvError {
    fn from(err: serde_yaml::Error) -> Self {
        EvError::Serde(err.to_string())
    }
}

impl EvError {
    /// Helper to construct arity errors.
    pub fn arity(helper: impl Into<String>, expected: usize, actual: usize) -> Self {
        EvError::Arity {
            helper: helper.into(),
            expected,
            actual,
        }
    }

    /// Helper to construct parameter shape errors.
    pub fn parameter(helper: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        EvError::Parameter {
            helper: helper.into(),
            index,
            message: message.into(),
        }
    }

    /// Helper to construct key-value store errors.
    pub fn kvdb(database: impl Into<String>, message: impl Into<String>) -> Self {
        EvError::Kvdb {
            database: database.into(),
            message: message.into(),
        }
    }

    pub fn payload<T: Into<String>>(message: T) -> Self {
        EvError::Payload {
            message: message.into(),
        }
    }

    pub fn range<T: Into<String>>(message: T) -> Self {
        EvError::Range {
            message: message.into(),
        }
    }

    pub fn schema<T: Into<String>>(message: T) -> Self {
        EvError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct parser build errors.
    pub fn parser(parser: impl Into<String>, message: impl Into<String>) -> Self {
        EvError::Parser {
            parser: parser.into(),
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        EvError::Validation {
            message: message.into(),
        }
    }
}
