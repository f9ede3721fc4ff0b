//! Analysis request and response types

use serde::{Deserialize, Serialize};

/// One interpretation of a submitted image
///
/// `category` is kept as the raw wire string; use [`Intent::category`] for
/// the typed value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub label: String,
    pub confidence: f32,
    pub category: String,
    pub reasoning: String,
}

impl Intent {
    /// Typed category, unknown values map to [`IntentCategory::Other`]
    pub fn category(&self) -> IntentCategory {
        IntentCategory::from_wire(&self.category)
    }
}

/// Intent categories in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntentCategory {
    Need,
    Emotion,
    Object,
    Activity,
    Other,
}

impl IntentCategory {
    pub const ALL: [IntentCategory; 5] = [
        IntentCategory::Need,
        IntentCategory::Emotion,
        IntentCategory::Object,
        IntentCategory::Activity,
        IntentCategory::Other,
    ];

    /// Parse a wire category, case-insensitive
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "need" => IntentCategory::Need,
            "emotion" => IntentCategory::Emotion,
            "object" => IntentCategory::Object,
            "activity" => IntentCategory::Activity,
            _ => IntentCategory::Other,
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            IntentCategory::Need => "Need",
            IntentCategory::Emotion => "Emotion",
            IntentCategory::Object => "Object",
            IntentCategory::Activity => "Activity",
            IntentCategory::Other => "Other",
        }
    }
}

/// Body of the analysis request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 raster image with no data URI prefix
    pub image_base64: String,
}

/// Body of a successful analysis response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub intents: Vec<Intent>,
}
