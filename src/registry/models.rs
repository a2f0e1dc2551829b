use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    /// Fields written by other tools, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleRecord {
    pub fn new(url: impl Into<String>, docker_tag: Option<String>) -> Self {
        Self {
            url: url.into(),
            docker_tag,
            ..Default::default()
        }
    }

    pub fn docker_tag_or_empty(&self) -> &str {
        self.docker_tag.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_module: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk shape of the store file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleRecord>,
    #[serde(default)]
    pub rules: BTreeMap<String, Rule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryConfig {
    /// Maps each referenced module to the first rule (by name) using it.
    pub fn used_modules(&self) -> BTreeMap<String, String> {
        let mut used = BTreeMap::new();
        for (rule_name, rule) in &self.rules {
            if let Some(module) = rule.processing_module.as_deref() {
                if module.is_empty() {
                    continue;
                }
                used.entry(module.to_string())
                    .or_insert_with(|| rule_name.clone());
            }
        }
        used
    }
}
