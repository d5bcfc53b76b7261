use serde::{Deserialize, Serialize};

use super::BackendFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    Good,
    High,
    VeryHigh,
}

/// A registered model. Immutable once handed to the model manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub key: String,
    pub family: BackendFamily,
    pub backend_identifier: String,
    pub display_name: String,
    pub description: String,
    pub quality_tier: QualityTier,
    pub size: String,
    pub language_tag: String,
}

impl ModelDescriptor {
    pub fn new(
        family: BackendFamily,
        key: impl Into<String>,
        backend_identifier: impl Into<String>,
    ) -> Self {
        let key = key.into();
        Self {
            display_name: key.clone(),
            key,
            family,
            backend_identifier: backend_identifier.into(),
            description: String::new(),
            quality_tier: QualityTier::Medium,
            size: String::new(),
            language_tag: "it".to_string(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_quality(mut self, quality_tier: QualityTier) -> Self {
        self.quality_tier = quality_tier;
        self
    }

    pub fn with_language(mut self, language_tag: impl Into<String>) -> Self {
        self.language_tag = language_tag.into();
        self
    }

    pub fn with_details(mut self, description: impl Into<String>, size: impl Into<String>) -> Self {
        self.description = description.into();
        self.size = size.into();
        self
    }
}
