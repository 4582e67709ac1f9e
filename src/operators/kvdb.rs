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

//! # KVDB Bitmask Decoder
//!
//! `kvdb_decode_bitmask(<database>, <key>, $<mask field>)` turns a
//! hexadecimal mask such as `"0x1A"` into the list of labels of its set bits.
//!
//! The decode table is read once from the key-value store while the helper
//! is built. It is a JSON object mapping bit positions to labels:
//!
//! ```json
//! {"0": "read", "1": "write", "2": "execute"}
//! ```
//!
//! Keys must be canonical decimal integers in `[0, 31]` and every label must
//! have the same JSON type. The validated table is kept in an `Arc` by the
//! compiled term and never refreshed.
//!
//! Masks are parsed as unsigned 64-bit values but only bits 0 to 31 are
//! looked up in the table; higher bits are accepted and ignored.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{EvError, Result};
use crate::event::{EvEvent, EvFieldPath, EvJsonType};
use crate::kvdb::EvKvdbManager;
use crate::operator::{failure_trace, format_term_name, EvHelperBuilder, EvOutcome, EvTerm};
use crate::parameter::{check_arity, check_reference, check_value, parse_parameters, EvDefinitions};
use crate::schema::{assert_destination_type, EvSchema};

/// Bit positions a decode table may map.
pub const MASK_WINDOW_BITS: u32 = 32;

const PARAMETERS: usize = 3;

/// Validated bit-position-to-label table.
#[derive(Clone, Debug, PartialEq)]
pub struct EvDecodeTable {
    kind: EvJsonType,
    labels: Vec<Option<Value>>,
}

impl EvDecodeTable {
    /// Parses and validates a stored table.
    pub fn parse(raw: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(raw)
            .map_err(|err| EvError::payload(format!("decode table is not valid JSON: {err}")))?;

        let entries = match document {
            Value::Object(entries) => entries,
            other => {
                return Err(EvError::payload(format!(
                    "decode table must be an object, got {}",
                    EvJsonType::of(&other)
                )))
            }
        };

        let kind = entries
            .values()
            .next()
            .map(EvJsonType::of)
            .ok_or_else(|| EvError::payload("decode table is empty"))?;

        let mut labels = vec![None; MASK_WINDOW_BITS as usize];
        for (key, value) in entries {
            let bit = parse_bit_position(&key)?;
            let value_kind = EvJsonType::of(&value);
            if value_kind != kind {
                return Err(EvError::payload(format!(
                    "heterogeneous decode table: bit '{key}' holds {value_kind}, expected {kind}"
                )));
            }
            labels[bit as usize] = Some(value);
        }

        Ok(Self { kind, labels })
    }

    /// JSON type shared by every label.
    pub fn kind(&self) -> EvJsonType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.labels.iter().filter(|label| label.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, bit: u32) -> Option<&Value> {
        self.labels.get(bit as usize)?.as_ref()
    }

    /// Labels of the set bits of `mask`, lowest bit first.
    pub fn decode(&self, mask: u64) -> Vec<Value> {
        (0..MASK_WINDOW_BITS)
            .filter(|bit| mask & (1u64 << bit) != 0)
            .filter_map(|bit| self.labels[bit as usize].clone())
            .collect()
    }
}

/// Canonical decimal key in `[0, 31]`: digits only, no sign, no leading zero.
pub fn parse_bit_position(key: &str) -> Result<u32> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if !canonical {
        return Err(EvError::range(format!(
            "decode table key '{key}' is not a canonical bit position"
        )));
    }

    match key.parse::<u32>() {
        Ok(bit) if bit < MASK_WINDOW_BITS => Ok(bit),
        _ => Err(EvError::range(format!(
            "decode table key '{key}' is outside [0, {}]",
            MASK_WINDOW_BITS - 1
        ))),
    }
}

/// `0x`-prefixed hexadecimal literal that fits in 64 bits.
pub fn parse_mask(text: &str) -> std::result::Result<u64, &'static str> {
    let digits = text
        .strip_prefix("0x")
        .ok_or("mask must start with '0x'")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("mask is not a hexadecimal literal");
    }
    u64::from_str_radix(digits, 16).map_err(|_| "mask does not fit in 64 bits")
}

/// Builder for `kvdb_decode_bitmask`, bound to a store manager and scope.
#[allow(non_snake_case)]
pub fn kvdb_decode_bitmask_factory(
    kvdb: Arc<dyn EvKvdbManager>,
    scope: impl Into<String>,
    schema: Arc<dyn EvSchema>,
) -> EvHelperBuilder {
    let scope = scope.into();
    Arc::new(
        move |destination: &str, name: &str, raw: &[String], definitions: &EvDefinitions| {
            build_decode_bitmask(
                kvdb.as_ref(),
                &scope,
                schema.as_ref(),
                destination,
                name,
                raw,
                definitions,
            )
        },
    )
}

fn build_decode_bitmask(
    kvdb: &dyn EvKvdbManager,
    scope: &str,
    schema: &dyn EvSchema,
    destination: &str,
    name: &str,
    raw: &[String],
    definitions: &EvDefinitions,
) -> Result<EvTerm> {
    let target = EvFieldPath::parse(destination)?;
    let parameters = parse_parameters(name, raw, definitions)?;
    check_arity(name, &parameters, PARAMETERS)?;
    let database = check_value(name, &parameters, 0)?;
    let key = check_value(name, &parameters, 1)?;
    let source = check_reference(name, &parameters, 2)?.clone();
    assert_destination_type(schema, name, &target, EvJsonType::Array)?;

    let table = {
        let handler = kvdb.get_handler(database, scope)?;
        let stored = handler.get(key)?;
        Arc::new(EvDecodeTable::parse(&stored)?)
    };

    let term_name = format_term_name(name, destination, raw);
    log::debug!(
        "helper.decode_bitmask.build: decode table loaded - term={}, database={}, key={}, labels={}, kind={}",
        term_name,
        database,
        key,
        table.len(),
        table.kind()
    );

    Ok(EvTerm::new(term_name.clone(), move |event| {
        decode_event(&term_name, &table, &source, &target, event)
    }))
}

fn read_mask(source: &EvFieldPath, event: &EvEvent) -> std::result::Result<u64, String> {
    match event.get(source) {
        Some(Value::String(text)) => parse_mask(text).map_err(|reason| format!("{reason}: '{text}'")),
        Some(other) => Err(format!(
            "reference '{}' is {}, not a string",
            source.dotted(),
            EvJsonType::of(other)
        )),
        None => Err(format!("reference '{}' not found", source.dotted())),
    }
}

fn decode_event(
    term_name: &str,
    table: &EvDecodeTable,
    source: &EvFieldPath,
    target: &EvFieldPath,
    mut event: EvEvent,
) -> EvOutcome {
    let mask = match read_mask(source, &event) {
        Ok(mask) => mask,
        Err(reason) => return EvOutcome::failure_of(event, failure_trace(term_name, reason)),
    };

    if mask == 0 {
        let trace = failure_trace(term_name, "mask has no bit set");
        return EvOutcome::failure_of(event, trace);
    }

    let labels = table.decode(mask);
    if labels.is_empty() {
        let trace = failure_trace(term_name, format!("no set bit of mask 0x{mask:X} is mapped"));
        return EvOutcome::failure_of(event, trace);
    }

    if !event.set(target, Value::Array(labels)) {
        let trace = failure_trace(term_name, format!("cannot write '{target}'"));
        return EvOutcome::failure_of(event, trace);
    }
    EvOutcome::Success(event)
}
