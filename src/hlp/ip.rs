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

//! IP literal parser.
//!
//! One forward scan: an IPv4 dotted quad is tried first, then an IPv6
//! literal. The matched text is returned verbatim as a JSON string; no case
//! folding or zero compression is applied.

use serde_json::Value;

use crate::errors::Result;
use crate::hlp::{
    at_stop, reject_options, require_stop_tokens, EvParseFailure, EvParsed, EvParser,
    EvParserParams,
};

const PARSER: &str = "ip";
const IPV4_GROUPS: usize = 4;
const IPV6_GROUPS: usize = 8;
const HEXTET_DIGITS: usize = 4;

/// Builds the IP literal parser.
///
/// Fails when `options` is not empty (this parser has none) or when no stop
/// token is given.
pub fn get_ip_parser(
    params: EvParserParams,
    stop_tokens: Vec<String>,
    options: Vec<String>,
) -> Result<EvParser> {
    let name = if params.name.is_empty() {
        PARSER.to_string()
    } else {
        params.name
    };
    reject_options(&name, &options)?;
    require_stop_tokens(&name, &stop_tokens)?;

    let parser_name = name.clone();
    Ok(EvParser::new(name, move |input: &str| {
        match scan_ip(input, &stop_tokens) {
            Ok(len) => Ok(EvParsed {
                value: Value::String(input[..len].to_string()),
                consumed: len,
            }),
            Err(message) => Err(EvParseFailure {
                parser: parser_name.clone(),
                message: message.to_string(),
            }),
        }
    }))
}

/// Length of the IP literal at the start of `input`, bounded by a stop token.
pub fn scan_ip(input: &str, stop_tokens: &[String]) -> std::result::Result<usize, &'static str> {
    let bytes = input.as_bytes();

    let v4 = scan_ipv4(bytes);
    if let Some(len) = v4 {
        if at_stop(&input[len..], stop_tokens) {
            return Ok(len);
        }
    }

    match scan_ipv6(bytes) {
        Some(len) if at_stop(&input[len..], stop_tokens) => Ok(len),
        Some(_) => Err("IPv6 literal not followed by a stop token"),
        None if v4.is_some() => Err("IPv4 literal not followed by a stop token"),
        None => Err("expected an IPv4 or IPv6 literal"),
    }
}

/// Exactly four dot-separated octets; returns the bytes they span.
fn scan_ipv4(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    for group in 0..IPV4_GROUPS {
        if group > 0 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
        pos += scan_octet(&bytes[pos..])?;
    }
    Some(pos)
}

/// Whole digit run, 1-3 digits, no leading zero, at most 255.
fn scan_octet(bytes: &[u8]) -> Option<usize> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    if digits > 1 && bytes[0] == b'0' {
        return None;
    }
    let value = bytes[..digits]
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    (value <= 255).then_some(digits)
}

fn scan_ipv6(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    let mut groups = 0;
    let mut compressed = false;

    if bytes.starts_with(b"::") {
        compressed = true;
        pos = 2;
    }
    // After a single ':' (or at the very start) a hextet is mandatory.
    let mut need_group = !compressed;

    loop {
        let hex = bytes[pos..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if hex == 0 {
            if need_group {
                return None;
            }
            break;
        }

        // Dotted quad tail fills the last two groups and ends the literal.
        if bytes.get(pos + hex) == Some(&b'.') {
            pos += scan_ipv4(&bytes[pos..])?;
            groups += 2;
            break;
        }

        if hex > HEXTET_DIGITS {
            return None;
        }
        pos += hex;
        groups += 1;
        if groups > IPV6_GROUPS {
            return None;
        }

        if bytes[pos..].starts_with(b"::") {
            if compressed {
                return None;
            }
            compressed = true;
            pos += 2;
            need_group = false;
        } else if bytes.get(pos) == Some(&b':') {
            pos += 1;
            need_group = true;
        } else {
            break;
        }
    }

    let complete = if compressed {
        groups < IPV6_GROUPS
    } else {
        groups == IPV6_GROUPS
    };
    complete.then_some(pos)
}
