//! Per-pattern option overrides

use fuzzspan_core::{Flex, FuzzyFunc, SearchOptions, TrimRule, TrimSet};
use serde::{Deserialize, Serialize};

/// How pattern trim rules combine with the matcher defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimResolution {
    /// Pattern rules replace the defaults when given
    #[default]
    PatternFirst,
    /// Only the matcher defaults are used
    InstanceOnly,
    /// Pattern rules are added to the defaults
    Union,
}

/// Search options set on a single pattern; `None` falls back to the matcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_func: Option<FuzzyFunc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_r1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_r2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<Flex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimmers: Option<Vec<TrimRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_trimmers: Option<Vec<TrimRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_trimmers: Option<Vec<TrimRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
}

impl PatternOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill unset fields from `defaults`
    pub fn resolve(&self, defaults: &SearchOptions, trim: TrimResolution) -> SearchOptions {
        SearchOptions {
            fuzzy_func: self.fuzzy_func.unwrap_or(defaults.fuzzy_func),
            min_r1: self.min_r1.unwrap_or(defaults.min_r1),
            min_r2: self.min_r2.unwrap_or(defaults.min_r2),
            ignore_case: self.ignore_case.unwrap_or(defaults.ignore_case),
            flex: self.flex.unwrap_or(defaults.flex),
            trims: TrimSet {
                trimmers: merge(&self.trimmers, &defaults.trims.trimmers, trim),
                start_trimmers: merge(&self.start_trimmers, &defaults.trims.start_trimmers, trim),
                end_trimmers: merge(&self.end_trimmers, &defaults.trims.end_trimmers, trim),
            },
            n: self.n.unwrap_or(defaults.n),
        }
    }
}

fn merge(pattern: &Option<Vec<TrimRule>>, defaults: &[TrimRule], trim: TrimResolution) -> Vec<TrimRule> {
    match (trim, pattern) {
        (TrimResolution::InstanceOnly, _) | (_, None) => defaults.to_vec(),
        (TrimResolution::PatternFirst, Some(rules)) => rules.clone(),
        (TrimResolution::Union, Some(rules)) => {
            let mut merged = defaults.to_vec();
            for rule in rules {
                if !merged.contains(rule) {
                    merged.push(*rule);
                }
            }
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> SearchOptions {
        SearchOptions {
            fuzzy_func: FuzzyFunc::Simple,
            trims: TrimSet::both([TrimRule::Punct]),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_options_keep_defaults() {
        let opts = PatternOptions::default();
        assert!(opts.is_empty());
        assert_eq!(opts.resolve(&defaults(), TrimResolution::default()), defaults());
    }

    #[test]
    fn test_field_overrides() {
        let opts = PatternOptions {
            ignore_case: Some(false),
            min_r2: Some(90.0),
            flex: Some(Flex::Tokens(1)),
            ..Default::default()
        };
        let resolved = opts.resolve(&defaults(), TrimResolution::PatternFirst);
        assert!(!resolved.ignore_case);
        assert_eq!(resolved.min_r2, 90.0);
        assert_eq!(resolved.min_r1, 75.0);
        assert_eq!(resolved.flex, Flex::Tokens(1));
        assert_eq!(resolved.fuzzy_func, FuzzyFunc::Simple);
    }

    #[test]
    fn test_trim_resolution_modes() {
        let opts = PatternOptions {
            trimmers: Some(vec![TrimRule::Stop]),
            ..Default::default()
        };
        let d = defaults();

        let pattern_first = opts.resolve(&d, TrimResolution::PatternFirst);
        assert_eq!(pattern_first.trims.trimmers, vec![TrimRule::Stop]);

        let instance_only = opts.resolve(&d, TrimResolution::InstanceOnly);
        assert_eq!(instance_only.trims.trimmers, vec![TrimRule::Punct]);

        let union = opts.resolve(&d, TrimResolution::Union);
        assert_eq!(union.trims.trimmers, vec![TrimRule::Punct, TrimRule::Stop]);
    }

    #[test]
    fn test_explicit_empty_trimmers_clear_defaults() {
        let opts = PatternOptions {
            trimmers: Some(Vec::new()),
            ..Default::default()
        };
        let resolved = opts.resolve(&defaults(), TrimResolution::PatternFirst);
        assert!(resolved.trims.is_empty());
    }

    #[test]
    fn test_json_skips_unset_fields() {
        let opts = PatternOptions {
            ignore_case: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&opts).unwrap(), r#"{"ignore_case":false}"#);
        let parsed: PatternOptions = serde_json::from_str(r#"{"flex": "default"}"#).unwrap();
        assert_eq!(parsed.flex, Some(Flex::Default));
    }
}
