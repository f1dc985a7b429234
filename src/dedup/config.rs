//! Serializable dedup configuration

use super::handler::DedupHandlerBuilder;
use super::key_map::KeyOrder;
use super::policy::DedupPolicy;
use super::resolve::{join_replace_attr, join_resolve_key, BuiltinConflict, ReplaceAttr, ResolveKey};
use crate::core::{DedupError, Result};
use crate::sinks::{ResolveReplaceOptions, SinkPreset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dedup settings that can live in a config file
///
/// Every field is optional in JSON:
///
/// ```
/// use log_dedup::{DedupConfig, DedupPolicy, SinkPreset};
///
/// let config = DedupConfig::from_json(r#"{"policy": "overwrite", "sinks": ["stackdriver"]}"#).unwrap();
/// assert_eq!(config.policy, DedupPolicy::Overwrite);
/// assert_eq!(config.sinks, vec![SinkPreset::Stackdriver]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DedupConfig {
    pub policy: DedupPolicy,
    pub key_order: KeyOrder,
    pub builtin_conflict: BuiltinConflict,
    /// Sinks whose reserved field names attributes must avoid, in order
    pub sinks: Vec<SinkPreset>,
    /// Let sinks that support it write the record message under their own
    /// summary field (`message`) instead of `msg`
    pub overwrite_summary: bool,
}

impl DedupConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, preset) in self.sinks.iter().enumerate() {
            if self.sinks[..i].contains(preset) {
                return Err(DedupError::config(
                    "DedupConfig",
                    format!("sink preset '{}' listed more than once", preset),
                ));
            }
        }
        if !self.sinks.is_empty() && self.builtin_conflict != BuiltinConflict::Increment {
            return Err(DedupError::config(
                "DedupConfig",
                format!(
                    "builtin_conflict '{}' cannot be combined with sink presets, which reserve their own builtin keys",
                    self.builtin_conflict
                ),
            ));
        }
        Ok(())
    }

    fn options(&self) -> ResolveReplaceOptions {
        ResolveReplaceOptions {
            overwrite_summary: self.overwrite_summary,
        }
    }

    /// Key resolver for the dedup middleware
    pub fn resolve_key(&self) -> Arc<dyn ResolveKey> {
        let options = self.options();
        let resolvers = self
            .sinks
            .iter()
            .map(|preset| preset.resolve_key(&options))
            .collect();
        join_resolve_key(resolvers).unwrap_or_else(|| Arc::new(self.builtin_conflict))
    }

    /// Attribute replacer for the final sink, if any preset is configured
    pub fn replace_attr(&self) -> Option<Arc<dyn ReplaceAttr>> {
        let options = self.options();
        join_replace_attr(
            self.sinks
                .iter()
                .map(|preset| preset.replace_attr(&options))
                .collect(),
        )
    }

    pub fn builder(&self) -> DedupHandlerBuilder {
        DedupHandlerBuilder::new()
            .policy(self.policy)
            .key_order(self.key_order)
            .shared_resolve_key(self.resolve_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = DedupConfig::from_json("{}").expect("empty config");
        assert_eq!(config, DedupConfig::default());
        assert_eq!(config.policy, DedupPolicy::Increment);
        assert!(config.replace_attr().is_none());
    }

    #[test]
    fn test_duplicate_presets_rejected() {
        let err = DedupConfig::from_json(r#"{"sinks": ["graylog", "graylog"]}"#)
            .expect_err("duplicate preset");
        assert!(matches!(err, DedupError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_builtin_conflict_with_sinks_rejected() {
        let config = DedupConfig {
            builtin_conflict: BuiltinConflict::Drop,
            sinks: vec![SinkPreset::Graylog],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let err = DedupConfig::from_json(r#"{"policy": "merge"}"#).expect_err("bad policy");
        assert!(matches!(err, DedupError::JsonError(_)));
    }

    #[test]
    fn test_resolver_without_sinks_uses_builtin_conflict() {
        let config = DedupConfig {
            builtin_conflict: BuiltinConflict::Drop,
            ..Default::default()
        };
        assert_eq!(config.resolve_key().resolve_key(&[], "msg", 0), None);
        assert_eq!(
            config.resolve_key().resolve_key(&[], "user", 1),
            Some("user#01".to_string())
        );
    }

    #[test]
    fn test_resolver_with_sinks() {
        let config = DedupConfig {
            sinks: vec![SinkPreset::Stackdriver, SinkPreset::Graylog],
            ..Default::default()
        };
        let resolver = config.resolve_key();
        assert_eq!(
            resolver.resolve_key(&[], "level", 0),
            Some("severity#01".to_string())
        );
        assert_eq!(
            resolver.resolve_key(&[], "timestamp", 0),
            Some("timestampRenamed".to_string())
        );
        assert!(config.replace_attr().is_some());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = DedupConfig {
            policy: DedupPolicy::Append,
            key_order: KeyOrder::CaseInsensitive,
            sinks: vec![SinkPreset::Cloudwatch],
            overwrite_summary: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains(r#""key_order":"case_insensitive""#));
        assert_eq!(DedupConfig::from_json(&json).expect("parse"), config);
    }
}
