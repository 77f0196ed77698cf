//! Per-key value patterns across instances of one module path
//!
//! Keys are collected from sub-lines (`key value`, or a bare flag whose
//! value is the key itself) and typed through an ordered rule cascade.
//! The cascade order is a deliberate precedence: vocabulary checks first,
//! then key-name hints, then generic pattern matching.

use confgen_core::ModuleBlock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Occurrence rate above which a key is considered required
pub const REQUIRED_RATE: f64 = 0.8;

/// Number of example values retained per key
const EXAMPLE_LIMIT: usize = 5;

/// Flag vocabulary (boolean-like switches)
const FLAG_VALUES: [&str; 8] = ["ena", "dis", "on", "off", "enabled", "disabled", "e", "d"];

/// IP version vocabulary
const IP_VERSION_VALUES: [&str; 4] = ["v4", "v6", "ipv4", "ipv6"];

/// Keys whose numeric values are ports
const PORT_KEYS: [&str; 4] = ["port", "dport", "rport", "sport"];

/// Key-name overrides applied before generic pattern matching
const NETMASK_KEYS: [&str; 2] = ["mask", "broad"];
const IPV4_KEYS: [&str; 9] = [
    "addr", "rip", "vip", "gw", "peer", "prima", "secon", "prisrv", "secsrv",
];
const STRING_KEYS: [&str; 5] = ["name", "uname", "wcomm", "rcomm", "index"];

/// Generic type patterns, probed in this exact order against the first value
fn type_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                "ipv4_address",
                Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap(),
            ),
            (
                "ipv4_netmask",
                Regex::new(r"^255\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap(),
            ),
            (
                "ipv6_address",
                Regex::new(r"^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$").unwrap(),
            ),
            ("integer", Regex::new(r"^\d+$").unwrap()),
            (
                "port",
                Regex::new(r"^([1-9]\d{0,4}|[1-5]\d{4}|6[0-4]\d{3}|65[0-4]\d{2}|655[0-2]\d|6553[0-5])$")
                    .unwrap(),
            ),
            ("quoted_string", Regex::new(r#"^"[^"]*"$"#).unwrap()),
            ("hex_string", Regex::new(r"^[0-9a-fA-F]+$").unwrap()),
            (
                "mac_address",
                Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").unwrap(),
            ),
        ]
    })
}

/// A detected value pattern for one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePattern {
    /// Original key from the configuration, e.g. `addr`
    pub key: String,

    /// Detected type (ipv4_address, integer, flag, ...)
    pub detected_type: String,

    /// All values seen, in encounter order
    pub values: Vec<String>,

    /// How many instances carried this key
    pub frequency: usize,

    /// frequency / instance count
    pub occurrence_rate: f64,

    /// Present in more than 80% of instances
    pub is_required: bool,

    /// First distinct values, order preserved
    pub example_values: Vec<String>,
}

/// Patterns for all keys of one module path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternSet {
    pub patterns: BTreeMap<String, ValuePattern>,
    pub total_modules: usize,
}

/// Extracts value patterns from instances sharing one module path
#[derive(Debug, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract patterns from a group of module instances
    pub fn extract(&self, modules: &[ModuleBlock]) -> PatternSet {
        // key -> values in encounter order
        let mut key_values: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for module in modules {
            for line in &module.sub_lines {
                if let Some((key, value)) = parse_sub_line(line) {
                    key_values.entry(key).or_default().push(value);
                }
            }
        }

        let mut patterns = BTreeMap::new();
        for (key, values) in key_values {
            let detected_type = detect_type(&key, &values);
            let frequency = values.len();
            let occurrence_rate = frequency as f64 / modules.len().max(1) as f64;

            let mut example_values: Vec<String> = Vec::new();
            for value in &values {
                if !example_values.contains(value) {
                    example_values.push(value.clone());
                    if example_values.len() == EXAMPLE_LIMIT {
                        break;
                    }
                }
            }

            log::debug!("key {key}: type {detected_type}, {frequency} occurrences");

            patterns.insert(
                key.clone(),
                ValuePattern {
                    key,
                    detected_type,
                    values,
                    frequency,
                    occurrence_rate,
                    is_required: occurrence_rate > REQUIRED_RATE,
                    example_values,
                },
            );
        }

        PatternSet {
            patterns,
            total_modules: modules.len(),
        }
    }
}

/// Split a sub-line into a key/value pair
///
/// A line without a value is a bare flag; its value is the key itself.
fn parse_sub_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.split_once(char::is_whitespace) {
        Some((key, value)) => Some((key.to_string(), value.trim_start().to_string())),
        None => Some((line.to_string(), line.to_string())),
    }
}

/// Detect the type of a key from its name and observed values
fn detect_type(key: &str, values: &[String]) -> String {
    let all_in = |vocabulary: &[&str]| values.iter().all(|v| vocabulary.contains(&v.as_str()));

    if all_in(&FLAG_VALUES) {
        return "flag".to_string();
    }

    if all_in(&IP_VERSION_VALUES) {
        return "ip_version".to_string();
    }

    let all_numeric_in = |min: i64, max: i64| {
        values
            .iter()
            .all(|v| v.parse::<i64>().map(|n| n >= min && n <= max).unwrap_or(false))
    };

    if key == "vlan" && all_numeric_in(1, 4094) {
        return "vlan_id".to_string();
    }

    if PORT_KEYS.contains(&key) && all_numeric_in(1, 65535) {
        return "port".to_string();
    }

    // Key-name overrides take precedence over generic pattern matching
    if NETMASK_KEYS.contains(&key) {
        return "ipv4_netmask".to_string();
    }
    if IPV4_KEYS.contains(&key) {
        return "ipv4_address".to_string();
    }
    if STRING_KEYS.contains(&key) {
        return "string".to_string();
    }

    // Probe patterns against the first value; types are assumed consistent
    if let Some(sample) = values.first() {
        for (type_name, pattern) in type_patterns() {
            if pattern.is_match(sample) {
                return type_name.to_string();
            }
        }
    }

    if !values.is_empty() && values.iter().all(|v| v.chars().all(|c| c.is_ascii_digit())) {
        return "integer".to_string();
    }

    "string".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::ModuleBlock;

    fn instance(sub_lines: &[&str]) -> ModuleBlock {
        let mut block = ModuleBlock::new(1);
        block.module_path = "/c/l3/if".to_string();
        block.sub_lines = sub_lines.iter().map(|s| s.to_string()).collect();
        block
    }

    #[test]
    fn test_extract_patterns_basic() {
        let modules = vec![
            instance(&["ena", "ipver v4", "addr 10.250.18.26", "mask 255.255.255.0", "vlan 818"]),
            instance(&[
                "ena",
                "ipver v4",
                "addr 10.250.20.26",
                "mask 255.255.255.0",
                "vlan 820",
                "peer 10.250.20.27",
            ]),
        ];

        let set = PatternExtractor::new().extract(&modules);

        assert_eq!(set.total_modules, 2);
        assert_eq!(set.patterns["ena"].detected_type, "flag");
        assert_eq!(set.patterns["ipver"].detected_type, "ip_version");
        assert_eq!(set.patterns["addr"].detected_type, "ipv4_address");
        assert_eq!(set.patterns["mask"].detected_type, "ipv4_netmask");
        assert_eq!(set.patterns["vlan"].detected_type, "vlan_id");
        assert_eq!(set.patterns["peer"].detected_type, "ipv4_address");

        // peer appears in 1 of 2 instances
        let peer = &set.patterns["peer"];
        assert_eq!(peer.frequency, 1);
        assert!(!peer.is_required);
        assert!(set.patterns["addr"].is_required);
    }

    #[test]
    fn test_flag_without_value_uses_key_as_value() {
        assert_eq!(
            parse_sub_line("ena"),
            Some(("ena".to_string(), "ena".to_string()))
        );
        assert_eq!(
            parse_sub_line("name \"server1\""),
            Some(("name".to_string(), "\"server1\"".to_string()))
        );
    }

    #[test]
    fn test_key_name_override_beats_regex() {
        // "index" values may look numeric, but the key-name override wins
        let values = vec!["1".to_string(), "2".to_string()];
        assert_eq!(detect_type("index", &values), "string");
    }

    #[test]
    fn test_port_key_with_range() {
        let values = vec!["443".to_string(), "8443".to_string()];
        assert_eq!(detect_type("rport", &values), "port");

        // Out-of-range values fall through the port rule
        let values = vec!["70000".to_string()];
        assert_ne!(detect_type("rport", &values), "port");
    }

    #[test]
    fn test_vlan_detection() {
        let values = vec!["818".to_string(), "820".to_string()];
        assert_eq!(detect_type("vlan", &values), "vlan_id");

        let values = vec!["5000".to_string()];
        assert_ne!(detect_type("vlan", &values), "vlan_id");
    }

    #[test]
    fn test_generic_patterns() {
        assert_eq!(
            detect_type("timeout", &vec!["30".to_string()]),
            "integer"
        );
        assert_eq!(
            detect_type("label", &vec!["\"backend pool\"".to_string()]),
            "quoted_string"
        );
        assert_eq!(
            detect_type("hwaddr", &vec!["00:11:22:33:44:55".to_string()]),
            "mac_address"
        );
        assert_eq!(
            detect_type("note", &vec!["free text".to_string()]),
            "string"
        );
    }

    #[test]
    fn test_example_values_first_five_distinct() {
        let lines: Vec<String> = ["a", "b", "a", "c", "d", "e", "f"]
            .iter()
            .map(|v| format!("tag {v}"))
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let modules = vec![instance(&line_refs)];
        let set = PatternExtractor::new().extract(&modules);
        assert_eq!(set.patterns["tag"].example_values, vec!["a", "b", "c", "d", "e"]);
    }
}
