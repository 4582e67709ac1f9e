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

//! # Evx HLP Tests - IP Parser
//!
//! Tests for the IPv4/IPv6 literal parser.
//!
//! ## Test Categories
//!
//! - **Grammar Tests**: Accepted and rejected literals with their length
//! - **Stop Token Tests**: Literals bounded by a stop token
//! - **Build Tests**: Stop token and option validation
//! - **Property Tests**: Every standard address rendering is consumed whole
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test hlp_ip
//! ```

use std::net::{Ipv4Addr, Ipv6Addr};

use evx::{get_ip_parser, EvError, EvParser, EvParserParams, EvParserRegistry};
use proptest::prelude::*;
use serde_json::json;

fn parser(stop: &str) -> EvParser {
    get_ip_parser(EvParserParams::default(), vec![stop.to_string()], Vec::new()).unwrap()
}

/// Asserts a match of `expected` bytes whose value is the matched text.
fn assert_match(input: &str, stop: &str, expected: usize) {
    let parsed = parser(stop)
        .parse(input)
        .unwrap_or_else(|failure| panic!("{input:?} rejected: {failure}"));
    assert_eq!(parsed.consumed, expected, "{input:?}");
    assert_eq!(parsed.value, json!(&input[..expected]), "{input:?}");
}

fn assert_no_match(input: &str, stop: &str) {
    assert!(parser(stop).parse(input).is_err(), "{input:?} accepted");
}

/// Tests IPv4 dotted quads.
#[test]
fn test_ipv4_literals() {
    let accepted = [
        "0.0.0.0",
        "0.0.0.1",
        "0.0.0.10",
        "0.0.0.100",
        "0.0.1.0",
        "0.0.10.0",
        "0.0.100.0",
        "0.1.0.0",
        "0.10.0.0",
        "0.100.0.0",
        "1.0.0.0",
        "10.0.0.0",
        "100.0.0.0",
        "100.20.0.55",
        "192.168.0.1",
        "192.168.1.1",
        "255.255.255.255",
    ];
    for input in accepted {
        assert_match(input, "", input.len());
    }

    let rejected = [
        "256.168.0.1",
        "100.500.0.1",
        "20.200.1000.1",
        "20.200.0.950",
        "20.200.0.a",
        "10.20.30.40.50",
        ".20.30.40",
        "10..30.40",
        "10.20..40",
        "10.20.30.",
        "10 .20.30.40",
        "10.20.30. 40",
        "10.-20.30.40",
        "10.20.-30.40",
        "10.20.30.-40",
        "10x.20.30.40",
        "10.20x.30.40",
        "10.20.30x.40",
        "10.20.30.40x",
        "127.1",
        "0xc0.0xa8.0x8c.0xff",
        "001.002.003.004",
    ];
    for input in rejected {
        assert_no_match(input, "");
    }
}

/// Tests IPv6 literals, compressed or not, with and without IPv4 tails.
#[test]
fn test_ipv6_literals() {
    let accepted = [
        "2345:425:2CA1:0000:0000:567:5673:23b5",
        "2345:0425:2CA1:0:0:0567:5673:23b5",
        "2345:0425:2CA1::0567:5673:23b5",
        "::1",
        "0:0:0:0:0:0:0:1",
        "::",
        "0:0:0:0:0:0:0:0",
        "2001:db8::1",
        "2001:DB8::1",
        "2001:db8:0:0:0:0:2:1",
        "2001:db8::2:1",
        "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        "ff00::",
        "::ffff:0:0.0.0.0",
        "1:2:3:4:5:6:77.77.88.88",
        "1::1.2.3.4",
    ];
    for input in accepted {
        assert_match(input, "", input.len());
    }

    let rejected = [
        "0:0:0:0:0:0:0:0:0",
        "2001:db8:x:0:0:0:2:1",
        "2001:db8:0.0:0:0:2:1",
        "fffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        "1::2::3",
        ":::",
    ];
    for input in rejected {
        assert_no_match(input, "");
    }
}

/// Tests literals followed by a stop token.
///
/// The stop token is not consumed.
#[test]
fn test_stop_tokens() {
    let bounded = [
        "2345:425:2CA1:0000:0000:567:5673:23b5",
        "2345:0425:2CA1:0:0:0567:5673:23b5",
        "2345:0425:2CA1::0567:5673:23b5",
        "::1",
        "0:0:0:0:0:0:0:1",
        "::",
        "0:0:0:0:0:0:0:0",
        "2001:db8::1",
        "2001:DB8::1",
        "2001:db8:0:0:0:0:2:1",
        "2001:db8::2:1",
        "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        "ff00::",
        "::ffff:0:0.0.0.0",
    ];
    for literal in bounded {
        assert_match(&format!("{literal}###"), "###", literal.len());
    }

    assert_match("192.168.0.1:8080", ":", 11);
    assert_match("192.168.1.1 ", " ", 11);
    assert_match(":: ", " ", 2);

    assert_no_match("555.168.1.1 ", " ");
    assert_no_match("192.168.1.1192", "192");
    assert_no_match("192.168.1.1 ", "");
}

/// Tests that any of several stop tokens ends the literal.
#[test]
fn test_multiple_stop_tokens() {
    let parser = get_ip_parser(
        EvParserParams::default(),
        vec![" ".to_string(), ",".to_string()],
        Vec::new(),
    )
    .unwrap();
    assert_eq!(parser.parse("10.0.0.1,10.0.0.2").unwrap().consumed, 8);
    assert_eq!(parser.parse("::1 rest").unwrap().consumed, 3);
    assert_eq!(parser.parse("10.0.0.1").unwrap().consumed, 8);
    assert!(parser.parse("10.0.0.1;").is_err());
}

/// Tests parser construction.
#[test]
fn test_build() {
    let params = EvParserParams::default;

    assert!(get_ip_parser(params(), vec![String::new()], vec![]).is_ok());
    assert!(get_ip_parser(params(), vec![" ".to_string()], vec![]).is_ok());

    assert!(matches!(
        get_ip_parser(params(), vec![], vec![]),
        Err(EvError::Parser { .. })
    ));
    assert!(matches!(
        get_ip_parser(params(), vec![], vec![String::new()]),
        Err(EvError::Parser { .. })
    ));
    assert!(matches!(
        get_ip_parser(params(), vec![" ".to_string()], vec![" ".to_string()]),
        Err(EvError::Parser { .. })
    ));
}

/// Tests that failures name the parser.
#[test]
fn test_failure_reports_parser_name() {
    let named = get_ip_parser(
        EvParserParams {
            name: "src_ip".to_string(),
            target: "/source/ip".to_string(),
        },
        vec![String::new()],
        vec![],
    )
    .unwrap();
    assert_eq!(named.name(), "src_ip");
    let failure = named.parse("not an ip").unwrap_err();
    assert_eq!(failure.parser, "src_ip");

    assert_eq!(parser("").name(), "ip");
}

/// Tests building through the parser registry.
#[test]
fn test_registry_builds_ip() {
    let registry = EvParserRegistry::with_defaults();
    let parser = registry
        .build("ip", EvParserParams::default(), vec![String::new()], vec![])
        .unwrap();
    assert_eq!(parser.parse("::1").unwrap().consumed, 3);
    assert!(registry
        .build("mac", EvParserParams::default(), vec![String::new()], vec![])
        .is_err());
}

proptest! {
    /// Any IPv4 address rendered by the standard library is consumed whole.
    #[test]
    fn prop_ipv4_display_is_consumed(bits in any::<u32>()) {
        let text = Ipv4Addr::from(bits).to_string();
        let parsed = parser("").parse(&text).unwrap();
        prop_assert_eq!(parsed.consumed, text.len());
    }

    /// Same for IPv6, including compressed and IPv4-mapped renderings.
    #[test]
    fn prop_ipv6_display_is_consumed(bits in any::<u128>()) {
        let text = Ipv6Addr::from(bits).to_string();
        let parsed = parser(" ").parse(&format!("{text} tail")).unwrap();
        prop_assert_eq!(parsed.consumed, text.len());
    }
}
