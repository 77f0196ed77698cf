//! Parameter matching: binding extracted values to template slots
//!
//! For each template parameter the matcher either auto-fills a
//! high-confidence learned default, binds the best-scoring unused
//! extracted value of a compatible type, or falls back to a learned
//! default. Every extracted value is consumed at most once per call.

use confgen_core::{
    AssignmentSource, ExtractedValue, LearnedDefault, ParameterSchema, ValueAssignment,
};
use std::collections::{BTreeMap, BTreeSet};

/// Defaults at or above this confidence are assigned before user matching
pub const AUTO_FILL_CONFIDENCE: f64 = 0.90;

/// Minimum match score for binding a user value
pub const MATCH_ACCEPT_THRESHOLD: f64 = 0.5;

/// Minimum default confidence for the fallback on required parameters
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.70;

/// Type-component score when the value-type name appears in the parameter name
pub const SCORE_TYPE_SEMANTIC: f64 = 0.35;
/// Type-component score for an exact type match
pub const SCORE_TYPE_EXACT: f64 = 0.3;
/// Type-component score for a compatible type
pub const SCORE_TYPE_COMPATIBLE: f64 = 0.2;
/// Type-component score for any other pairing
pub const SCORE_TYPE_GENERIC: f64 = 0.1;

/// Score added per keyword overlap, up to the cap
pub const SCORE_KEYWORD_STEP: f64 = 0.1;
pub const SCORE_KEYWORD_CAP: f64 = 0.4;

/// Weight of the extraction confidence in the match score
pub const SCORE_CONFIDENCE_WEIGHT: f64 = 0.2;

/// Score added when the value passes the parameter's validation
pub const SCORE_VALIDATION_BONUS: f64 = 0.1;

/// Value types compatible with each parameter type
const TYPE_COMPATIBILITY: [(&str, &[&str]); 7] = [
    ("ipv4_address", &["ipv4", "ipv4_address"]),
    ("ipv4_netmask", &["ipv4", "ipv4_netmask"]),
    ("port", &["port", "integer"]),
    ("vlan_id", &["vlan", "vlan_id", "integer"]),
    ("integer", &["integer", "port", "vlan_id"]),
    ("string", &["string", "quoted_string"]),
    ("flag", &["flag"]),
];

/// Matches extracted values to template parameters
#[derive(Debug, Default)]
pub struct ParameterMatcher;

impl ParameterMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Produce assignments for a template's parameters
    ///
    /// `defaults` is keyed by original configuration key. With
    /// `auto_fill_high_confidence`, parameters whose learned default is at
    /// or above [`AUTO_FILL_CONFIDENCE`] are filled immediately; these
    /// model values that are effectively fixed regardless of user text.
    pub fn match_parameters(
        &self,
        parameters: &BTreeMap<String, ParameterSchema>,
        extracted: &BTreeMap<String, Vec<ExtractedValue>>,
        defaults: &BTreeMap<String, LearnedDefault>,
        auto_fill_high_confidence: bool,
    ) -> Vec<ValueAssignment> {
        let mut assignments = Vec::new();
        let mut used: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();

        for (param_name, schema) in parameters {
            let learned = defaults.get(&schema.original_key);

            if auto_fill_high_confidence {
                if let Some(info) = learned {
                    if info.confidence >= AUTO_FILL_CONFIDENCE {
                        if let Some(default) = &info.default {
                            assignments.push(ValueAssignment::new(
                                param_name.clone(),
                                schema.param_type.clone(),
                                default.clone(),
                                AssignmentSource::Default,
                                info.confidence,
                                schema.original_key.clone(),
                            ));
                            continue;
                        }
                    }
                }
            }

            if let Some(assignment) =
                self.bind_user_value(param_name, schema, extracted, &mut used)
            {
                assignments.push(assignment);
                continue;
            }

            if let Some(info) = learned {
                if let Some(default) = &info.default {
                    if info.confidence >= DEFAULT_CONFIDENCE_FLOOR || !schema.required {
                        assignments.push(ValueAssignment::new(
                            param_name.clone(),
                            schema.param_type.clone(),
                            default.clone(),
                            AssignmentSource::Default,
                            info.confidence,
                            schema.original_key.clone(),
                        ));
                    }
                }
            }
            // Otherwise the parameter stays unassigned; assembly reports it
            // as missing when it was required
        }

        assignments
    }

    /// Bind the best-scoring unused extracted value, if any clears the bar
    fn bind_user_value(
        &self,
        param_name: &str,
        schema: &ParameterSchema,
        extracted: &BTreeMap<String, Vec<ExtractedValue>>,
        used: &mut BTreeMap<&str, BTreeSet<usize>>,
    ) -> Option<ValueAssignment> {
        let mut best: Option<(f64, &'static str, usize, &ExtractedValue)> = None;

        for &value_type in compatible_types(&schema.param_type) {
            let Some(candidates) = extracted.get(value_type) else {
                continue;
            };
            for (idx, candidate) in candidates.iter().enumerate() {
                if used
                    .get(value_type)
                    .map(|set| set.contains(&idx))
                    .unwrap_or(false)
                {
                    continue;
                }

                let score = match_score(param_name, schema, candidate, value_type);
                if best.map(|(s, _, _, _)| score > s).unwrap_or(true) {
                    best = Some((score, value_type, idx, candidate));
                }
            }
        }

        let (score, value_type, idx, candidate) = best?;
        if score < MATCH_ACCEPT_THRESHOLD {
            return None;
        }

        used.entry(value_type).or_default().insert(idx);

        Some(ValueAssignment::new(
            param_name,
            schema.param_type.clone(),
            candidate.value.clone(),
            AssignmentSource::User,
            score,
            schema.original_key.clone(),
        ))
    }
}

/// Value types compatible with a parameter type, most specific first
fn compatible_types(param_type: &str) -> &'static [&'static str] {
    TYPE_COMPATIBILITY
        .iter()
        .find(|(t, _)| *t == param_type)
        .map(|(_, compatibles)| *compatibles)
        .unwrap_or(&["string"])
}

/// Weighted match score in [0, 1]
pub fn match_score(
    param_name: &str,
    schema: &ParameterSchema,
    candidate: &ExtractedValue,
    value_type: &str,
) -> f64 {
    let keywords = parameter_keywords(param_name);

    // Type component: a value-type named in the parameter itself beats an
    // exact declared-type match (`real_port` wants the port, whatever the
    // schema calls it)
    let type_score = if keywords.iter().any(|k| k == value_type) {
        SCORE_TYPE_SEMANTIC
    } else if value_type == schema.param_type {
        SCORE_TYPE_EXACT
    } else if compatible_types(&schema.param_type).contains(&value_type) {
        SCORE_TYPE_COMPATIBLE
    } else {
        SCORE_TYPE_GENERIC
    };

    let context = candidate.context.to_lowercase();
    let value_text = candidate.value.to_lowercase();
    let mut keyword_score = 0.0;
    for keyword in &keywords {
        if context.contains(keyword.as_str()) || value_text.contains(keyword.as_str()) {
            keyword_score += SCORE_KEYWORD_STEP;
        }
    }
    let keyword_score = keyword_score.min(SCORE_KEYWORD_CAP);

    let confidence_score = candidate.confidence * SCORE_CONFIDENCE_WEIGHT;

    let validation_score = if validate_value(&candidate.value, schema) {
        SCORE_VALIDATION_BONUS
    } else {
        0.0
    };

    (type_score + keyword_score + confidence_score + validation_score).min(1.0)
}

/// Split a parameter name into lowercase keywords longer than two chars
///
/// Splits on underscores first, then on internal case boundaries.
pub fn parameter_keywords(param_name: &str) -> Vec<String> {
    let mut keywords = Vec::new();

    for part in param_name.split('_') {
        let mut word = String::new();
        for ch in part.chars() {
            if ch.is_uppercase() && !word.is_empty() {
                push_keyword(&mut keywords, &word);
                word.clear();
            }
            word.push(ch);
        }
        push_keyword(&mut keywords, &word);
    }

    keywords
}

fn push_keyword(keywords: &mut Vec<String>, word: &str) {
    if word.len() > 2 {
        keywords.push(word.to_lowercase());
    }
}

/// Validate a value against a parameter's constraints
fn validate_value(value: &str, schema: &ParameterSchema) -> bool {
    match schema.param_type.as_str() {
        "port" | "integer" | "vlan_id" => {
            let Ok(number) = value.parse::<i64>() else {
                return false;
            };
            match schema.range {
                Some((min, max)) => number >= min && number <= max,
                None => true,
            }
        }
        "ipv4_address" | "ipv4_netmask" => {
            let octets: Vec<&str> = value.split('.').collect();
            octets.len() == 4
                && octets
                    .iter()
                    .all(|o| o.parse::<u32>().map(|n| n <= 255).unwrap_or(false))
        }
        _ => match &schema.options {
            Some(options) => options.iter().any(|o| o == value),
            None => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted_port(value: &str, context: &str) -> ExtractedValue {
        ExtractedValue::new(value, "port", 0.9, context)
    }

    fn one_extraction(value_type: &str, values: Vec<ExtractedValue>) -> BTreeMap<String, Vec<ExtractedValue>> {
        let mut map = BTreeMap::new();
        map.insert(value_type.to_string(), values);
        map
    }

    #[test]
    fn test_parameter_keywords() {
        assert_eq!(parameter_keywords("real_port"), vec!["real", "port"]);
        assert_eq!(parameter_keywords("serviceGroupId"), vec!["service", "group"]);
        // Short tokens are dropped
        assert_eq!(parameter_keywords("ip_address"), vec!["address"]);
    }

    #[test]
    fn test_semantic_boost_beats_plain_compatibility() {
        let real_port = ParameterSchema::new("real_port", "rport", "integer", true);
        let group = ParameterSchema::new("group", "group", "integer", true);
        let candidate = extracted_port("80", "on port 80");

        let semantic = match_score("real_port", &real_port, &candidate, "port");
        let plain = match_score("group", &group, &candidate, "port");
        assert!(semantic > plain);
        assert!(semantic >= SCORE_TYPE_SEMANTIC);
    }

    #[test]
    fn test_each_value_consumed_at_most_once() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "a_port".to_string(),
            ParameterSchema::new("a_port", "port", "port", true),
        );
        parameters.insert(
            "b_port".to_string(),
            ParameterSchema::new("b_port", "dport", "port", true),
        );

        let extracted = one_extraction(
            "port",
            vec![extracted_port("80", "port 80"), extracted_port("443", "port 443")],
        );

        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &extracted,
            &BTreeMap::new(),
            false,
        );

        let user_values: Vec<&str> = assignments
            .iter()
            .filter(|a| a.source == AssignmentSource::User)
            .map(|a| a.value.as_str())
            .collect();
        assert_eq!(user_values.len(), 2);
        assert_ne!(user_values[0], user_values[1]);
    }

    #[test]
    fn test_auto_fill_high_confidence_default() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "ip_version".to_string(),
            ParameterSchema::new("ip_version", "ipver", "ip_version", true),
        );

        let mut defaults = BTreeMap::new();
        defaults.insert(
            "ipver".to_string(),
            LearnedDefault {
                default: Some("v4".to_string()),
                confidence: 0.95,
                distribution: BTreeMap::new(),
                total_samples: 20,
            },
        );

        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &BTreeMap::new(),
            &defaults,
            true,
        );

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].value, "v4");
        assert_eq!(assignments[0].source, AssignmentSource::Default);
    }

    #[test]
    fn test_default_floor_blocks_weak_default_on_required() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "subnet_mask".to_string(),
            ParameterSchema::new("subnet_mask", "mask", "ipv4_netmask", true),
        );

        let mut defaults = BTreeMap::new();
        defaults.insert(
            "mask".to_string(),
            LearnedDefault {
                default: Some("255.255.255.0".to_string()),
                confidence: 0.6,
                distribution: BTreeMap::new(),
                total_samples: 5,
            },
        );

        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &BTreeMap::new(),
            &defaults,
            false,
        );
        assert!(assignments.is_empty());

        // The same default is acceptable for an optional parameter
        parameters.get_mut("subnet_mask").unwrap().required = false;
        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &BTreeMap::new(),
            &defaults,
            false,
        );
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].source, AssignmentSource::Default);
    }

    #[test]
    fn test_user_value_binding_for_vip() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "virtual_ip_address".to_string(),
            ParameterSchema::new("virtual_ip_address", "vip", "ipv4_address", true),
        );

        let extracted = one_extraction(
            "ipv4_address",
            vec![ExtractedValue::new(
                "192.168.1.100",
                "ipv4_address",
                0.9,
                "create vip 192.168.1.100 on port 80",
            )],
        );

        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &extracted,
            &BTreeMap::new(),
            false,
        );

        assert_eq!(assignments.len(), 1);
        let assignment = &assignments[0];
        assert_eq!(assignment.value, "192.168.1.100");
        assert_eq!(assignment.source, AssignmentSource::User);
        assert!(assignment.confidence >= MATCH_ACCEPT_THRESHOLD);
    }

    #[test]
    fn test_below_threshold_leaves_parameter_unassigned() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "flag_param".to_string(),
            ParameterSchema::new("flag_param", "ena", "flag", true),
        );

        // No flag values extracted and no defaults: nothing to assign
        let extracted = one_extraction("integer", vec![ExtractedValue::new("7", "integer", 0.7, "")]);
        let assignments = ParameterMatcher::new().match_parameters(
            &parameters,
            &extracted,
            &BTreeMap::new(),
            false,
        );
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_validation_respects_schema_range() {
        let schema = ParameterSchema::new("vlan_id", "vlan", "vlan_id", true).with_range(1, 4094);
        assert!(validate_value("818", &schema));
        assert!(!validate_value("5000", &schema));
        assert!(!validate_value("abc", &schema));
    }
}
