//! Typed value extraction from natural-language requirements
//!
//! Runs a fixed ordered set of patterns over the lower-cased requirement
//! and scores each hit: a base confidence, a boost when a type-specific
//! keyword appears near the match, and a boost when the value passes its
//! format check. Bare integers and malformed IPs are post-filtered to
//! suppress noise.

use confgen_core::ExtractedValue;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Base confidence for any pattern hit
pub const BASE_CONFIDENCE: f64 = 0.7;

/// Boost when a context keyword appears within the window
pub const CONTEXT_BOOST: f64 = 0.1;

/// Boost when the value passes its format validity check
pub const VALIDITY_BOOST: f64 = 0.1;

/// Characters of surrounding text kept as context on each side
pub const CONTEXT_WINDOW: usize = 30;

/// Bare integers above this are dropped unless near a parameter keyword
pub const BARE_INTEGER_LIMIT: i64 = 100;

/// Context words that mark an integer as a parameter value
const PARAMETER_CONTEXT_WORDS: [&str; 6] = ["index", "id", "number", "count", "priority", "weight"];

/// Context keywords per value type
const CONTEXT_KEYWORDS: [(&str, &[&str]); 4] = [
    (
        "ipv4_address",
        &["ip", "address", "vip", "real", "server", "host", "gateway", "gw"],
    ),
    ("port", &["port", "service"]),
    ("vlan_id", &["vlan", "vlanid"]),
    ("quoted_string", &["name", "called", "named"]),
];

/// Extraction patterns, probed in this order
fn extraction_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                "ipv4_address",
                Regex::new(r"\b(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\b").unwrap(),
            ),
            (
                "ipv4_netmask",
                Regex::new(r"\b(255\.255\.255\.\d{1,3})\b").unwrap(),
            ),
            (
                "ipv4_cidr",
                Regex::new(r"\b(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2})\b").unwrap(),
            ),
            ("port", Regex::new(r"\bport\s+(\d{1,5})\b").unwrap()),
            ("vlan_id", Regex::new(r"\bvlan\s+(\d{1,4})\b").unwrap()),
            ("integer", Regex::new(r"\b(\d+)\b").unwrap()),
            ("quoted_string", Regex::new(r#""([^"]+)""#).unwrap()),
        ]
    })
}

/// Extracts concrete values from requirement text
#[derive(Debug, Default)]
pub struct RequirementExtractor;

impl RequirementExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract values, grouped by type with per-type encounter order
    pub fn extract(&self, requirement: &str) -> BTreeMap<String, Vec<ExtractedValue>> {
        let text = requirement.to_lowercase();
        let mut extracted: BTreeMap<String, Vec<ExtractedValue>> = BTreeMap::new();

        for (value_type, pattern) in extraction_patterns() {
            for captures in pattern.captures_iter(&text) {
                let value = &captures[1];

                let entries = extracted.entry(value_type.to_string()).or_default();
                if entries.iter().any(|e| e.value == value) {
                    continue;
                }

                let context = surrounding_context(&text, value);
                let confidence = score_confidence(value_type, value, &context);
                entries.push(ExtractedValue::new(value, *value_type, confidence, context));
            }
        }

        if let Some(integers) = extracted.get_mut("integer") {
            integers.retain(|e| is_parameter_integer(&e.value, &e.context));
        }
        if let Some(addresses) = extracted.get_mut("ipv4_address") {
            addresses.retain(|e| is_valid_ipv4(&e.value));
        }
        extracted.retain(|_, entries| !entries.is_empty());

        tracing::debug!(
            "extracted {} value types from requirement",
            extracted.len()
        );
        extracted
    }
}

/// Context window around the first occurrence of a value
fn surrounding_context(text: &str, value: &str) -> String {
    let Some(pos) = text.find(value) else {
        return String::new();
    };
    let start = pos.saturating_sub(CONTEXT_WINDOW);
    let end = (pos + value.len() + CONTEXT_WINDOW).min(text.len());
    text[start..end].trim().to_string()
}

fn score_confidence(value_type: &str, value: &str, context: &str) -> f64 {
    let mut confidence = BASE_CONFIDENCE;

    let keywords = CONTEXT_KEYWORDS
        .iter()
        .find(|(t, _)| *t == value_type)
        .map(|(_, words)| *words)
        .unwrap_or(&[]);
    if keywords.iter().any(|k| context.contains(k)) {
        confidence += CONTEXT_BOOST;
    }

    let valid = match value_type {
        "ipv4_address" => is_valid_ipv4(value),
        "port" => in_numeric_range(value, 1, 65535),
        "vlan_id" => in_numeric_range(value, 1, 4094),
        _ => false,
    };
    if valid {
        confidence += VALIDITY_BOOST;
    }

    confidence.min(1.0)
}

/// Keep a bare integer only when small or near a parameter context word
fn is_parameter_integer(value: &str, context: &str) -> bool {
    if PARAMETER_CONTEXT_WORDS.iter().any(|w| context.contains(w)) {
        return true;
    }
    value
        .parse::<i64>()
        .map(|n| n <= BARE_INTEGER_LIMIT)
        .unwrap_or(false)
}

fn is_valid_ipv4(value: &str) -> bool {
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| o.parse::<u32>().map(|n| n <= 255).unwrap_or(false))
}

fn in_numeric_range(value: &str, min: i64, max: i64) -> bool {
    value
        .parse::<i64>()
        .map(|n| n >= min && n <= max)
        .unwrap_or(false)
}
