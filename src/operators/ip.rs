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

//! `parse_ip($<field>)`: validates a whole field as an IP literal with the
//! HLP `ip` parser and copies it, verbatim, to the destination.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::Result;
use crate::event::{EvEvent, EvFieldPath, EvJsonType};
use crate::hlp::{get_ip_parser, EvParser, EvParserParams};
use crate::operator::{failure_trace, format_term_name, EvHelperBuilder, EvOutcome, EvTerm};
use crate::parameter::{check_arity, check_reference, parse_parameters, EvDefinitions};
use crate::schema::{assert_destination_type, EvSchema};

#[allow(non_snake_case)]
pub fn parse_ip_factory(schema: Arc<dyn EvSchema>) -> EvHelperBuilder {
    Arc::new(
        move |destination: &str, name: &str, raw: &[String], definitions: &EvDefinitions| {
            build_parse_ip(schema.as_ref(), destination, name, raw, definitions)
        },
    )
}

fn build_parse_ip(
    schema: &dyn EvSchema,
    destination: &str,
    name: &str,
    raw: &[String],
    definitions: &EvDefinitions,
) -> Result<EvTerm> {
    let target = EvFieldPath::parse(destination)?;
    let parameters = parse_parameters(name, raw, definitions)?;
    check_arity(name, &parameters, 1)?;
    let source = check_reference(name, &parameters, 0)?.clone();
    assert_destination_type(schema, name, &target, EvJsonType::String)?;

    // Empty stop token: the literal has to run to the end of the field.
    let parser = get_ip_parser(
        EvParserParams {
            name: name.to_string(),
            target: target.pointer(),
        },
        vec![String::new()],
        Vec::new(),
    )?;

    let term_name = format_term_name(name, destination, raw);
    Ok(EvTerm::new(term_name.clone(), move |event| {
        parse_event(&term_name, &parser, &source, &target, event)
    }))
}

fn parse_event(
    term_name: &str,
    parser: &EvParser,
    source: &EvFieldPath,
    target: &EvFieldPath,
    mut event: EvEvent,
) -> EvOutcome {
    let parsed = match event.get(source) {
        Some(Value::String(text)) => parser.parse(text).map_err(|failure| failure.to_string()),
        Some(_) => Err(format!("reference '{}' is not a string", source.dotted())),
        None => Err(format!("reference '{}' not found", source.dotted())),
    };

    match parsed {
        Ok(parsed) => {
            if event.set(target, parsed.value) {
                EvOutcome::Success(event)
            } else {
                let trace = failure_trace(term_name, format!("cannot write '{target}'"));
                EvOutcome::failure_of(event, trace)
            }
        }
        Err(reason) => EvOutcome::failure_of(event, failure_trace(term_name, reason)),
    }
}
