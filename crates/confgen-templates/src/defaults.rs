//! Statistical default calculation
//!
//! A parameter earns a learned default when one value accounts for at
//! least [`DEFAULT_THRESHOLD`] of all observed samples. The threshold is
//! inclusive: a value at exactly 70% qualifies.

use crate::patterns::PatternSet;
use confgen_core::{LearnedDefault, TemplatedModule};
use std::collections::BTreeMap;

/// Minimum majority share for a value to become the learned default
pub const DEFAULT_THRESHOLD: f64 = 0.70;

/// Calculates default values from observed value distributions
#[derive(Debug)]
pub struct DefaultCalculator {
    threshold: f64,
}

impl Default for DefaultCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl DefaultCalculator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Calculate defaults for every key of a pattern set
    pub fn calculate(&self, patterns: &PatternSet) -> BTreeMap<String, LearnedDefault> {
        patterns
            .patterns
            .iter()
            .map(|(key, pattern)| (key.clone(), self.calculate_for(&pattern.values)))
            .collect()
    }

    /// Calculate the default for a single value list
    pub fn calculate_for(&self, values: &[String]) -> LearnedDefault {
        if values.is_empty() {
            return LearnedDefault::default();
        }

        // Count in encounter order so ties resolve to the first-seen value
        let mut counts: Vec<(&String, usize)> = Vec::new();
        for value in values {
            match counts.iter_mut().find(|(v, _)| *v == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value, 1)),
            }
        }

        let total = values.len();
        let mut most_common = String::new();
        let mut most_count = 0usize;
        for (value, count) in &counts {
            if *count > most_count {
                most_common = (*value).clone();
                most_count = *count;
            }
        }
        let confidence = most_count as f64 / total as f64;

        let distribution: BTreeMap<String, f64> = counts
            .iter()
            .map(|(value, count)| ((*value).clone(), *count as f64 / total as f64))
            .collect();

        LearnedDefault {
            default: (confidence >= self.threshold).then_some(most_common),
            confidence,
            distribution,
            total_samples: total,
        }
    }

    /// Copy calculated defaults into a template's parameter schemas
    ///
    /// Schemas are matched by their original configuration key.
    pub fn apply_defaults(
        &self,
        template: &mut TemplatedModule,
        defaults: &BTreeMap<String, LearnedDefault>,
    ) {
        template.learned_defaults = defaults.clone();

        for schema in template.parameters.values_mut() {
            if let Some(info) = defaults.get(&schema.original_key) {
                schema.default = info.default.clone();
                schema.default_confidence = info.confidence;
            }
        }
    }
}
