// Review translation request/response types
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the bad review was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Appstore,
    Restaurant,
    Ecommerce,
    Hotel,
    Other,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 5] = [
        SourceCategory::Appstore,
        SourceCategory::Restaurant,
        SourceCategory::Ecommerce,
        SourceCategory::Hotel,
        SourceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Appstore => "appstore",
            SourceCategory::Restaurant => "restaurant",
            SourceCategory::Ecommerce => "ecommerce",
            SourceCategory::Hotel => "hotel",
            SourceCategory::Other => "other",
        }
    }

    /// Label used inside the English prompt template.
    pub fn label_en(&self) -> &'static str {
        match self {
            SourceCategory::Appstore => "App Store app",
            SourceCategory::Restaurant => "restaurant",
            SourceCategory::Ecommerce => "e-commerce product",
            SourceCategory::Hotel => "hotel",
            SourceCategory::Other => "product/service",
        }
    }

    /// Label used inside the Chinese prompt template.
    pub fn label_zh(&self) -> &'static str {
        match self {
            SourceCategory::Appstore => "App Store 应用",
            SourceCategory::Restaurant => "餐厅",
            SourceCategory::Ecommerce => "电商商品",
            SourceCategory::Hotel => "酒店",
            SourceCategory::Other => "产品/服务",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output language requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
    Ja,
    De,
    Fr,
    Ko,
    Es,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Zh,
        Language::Ja,
        Language::De,
        Language::Fr,
        Language::Ko,
        Language::Es,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Ko => "ko",
            Language::Es => "es",
        }
    }

    /// English name of the language, used when asking the model for output in it.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Chinese",
            Language::Ja => "Japanese",
            Language::De => "German",
            Language::Fr => "French",
            Language::Ko => "Korean",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Body of `POST /translate-review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub review: String,
    pub source: SourceCategory,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl TranslationRequest {
    /// Paid token, if one was actually supplied. Blank strings count as absent.
    pub fn token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }

    /// Device identifier for the free trial. Blank strings count as absent.
    pub fn device_id(&self) -> Option<&str> {
        non_blank(self.device_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// The two perspectives extracted from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspectives {
    pub user_really_means: String,
    pub boss_hears: String,
}

/// Response of `POST /translate-review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original: String,
    pub user_really_means: String,
    pub boss_hears: String,
    pub source: SourceCategory,
    pub language: Language,
}

impl TranslationResult {
    pub fn new(
        original: impl Into<String>,
        perspectives: Perspectives,
        source: SourceCategory,
        language: Language,
    ) -> Self {
        Self {
            original: original.into(),
            user_really_means: perspectives.user_really_means,
            boss_hears: perspectives.boss_hears,
            source,
            language,
        }
    }
}

/// Response of `GET /trial-status/:device_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatus {
    pub has_free_trial: bool,
    pub uses_remaining: u32,
}
