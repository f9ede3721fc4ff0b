//! Presentation of analysis results
//!
//! Pure transform from a list of intents into grouped, labelled entries.

use std::fmt;

use crate::domain::{Intent, IntentCategory};

/// Shown when there is nothing to present
pub const EMPTY_MESSAGE: &str = "No analysis results yet. Draw or upload an image to get started.";

/// Category tag colors from the app theme
pub mod colors {
    pub const NEED: &str = "#E8F5E9";
    pub const EMOTION: &str = "#FFF3E0";
    pub const OBJECT: &str = "#E3F2FD";
    pub const ACTIVITY: &str = "#F3E5F5";
}

/// Tag color for a category, unknown categories share the object color
pub fn category_color(category: IntentCategory) -> &'static str {
    match category {
        IntentCategory::Need => colors::NEED,
        IntentCategory::Emotion => colors::EMOTION,
        IntentCategory::Activity => colors::ACTIVITY,
        IntentCategory::Object | IntentCategory::Other => colors::OBJECT,
    }
}

/// One displayable intent
#[derive(Debug, Clone, PartialEq)]
pub struct IntentView {
    pub label: String,
    pub category: IntentCategory,
    /// Category string as received
    pub raw_category: String,
    /// Confidence rounded to a whole percentage, 0..=100
    pub confidence_percent: u8,
    pub reasoning: String,
    pub tag_color: &'static str,
}

impl From<&Intent> for IntentView {
    fn from(intent: &Intent) -> Self {
        let category = intent.category();
        Self {
            label: intent.label.clone(),
            category,
            raw_category: intent.category.clone(),
            confidence_percent: confidence_percent(intent.confidence),
            reasoning: intent.reasoning.clone(),
            tag_color: category_color(category),
        }
    }
}

/// Intents of one category, most confident first
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: IntentCategory,
    pub label: &'static str,
    pub intents: Vec<IntentView>,
}

/// What the results area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty { message: &'static str },
    Groups(Vec<CategoryGroup>),
}

impl ResultsView {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultsView::Empty { .. })
    }

    /// Total number of intents across all groups
    pub fn len(&self) -> usize {
        match self {
            ResultsView::Empty { .. } => 0,
            ResultsView::Groups(groups) => groups.iter().map(|g| g.intents.len()).sum(),
        }
    }
}

/// Group intents by category in display order
///
/// Within a group intents are ordered by descending confidence; ties keep
/// their original order.
pub fn present(intents: &[Intent]) -> ResultsView {
    if intents.is_empty() {
        return ResultsView::Empty {
            message: EMPTY_MESSAGE,
        };
    }

    let groups = IntentCategory::ALL
        .iter()
        .filter_map(|&category| {
            let mut entries: Vec<(f32, IntentView)> = intents
                .iter()
                .filter(|intent| intent.category() == category)
                .map(|intent| (intent.confidence, IntentView::from(intent)))
                .collect();
            if entries.is_empty() {
                return None;
            }
            entries.sort_by(|a, b| b.0.total_cmp(&a.0));
            Some(CategoryGroup {
                category,
                label: category.label(),
                intents: entries.into_iter().map(|(_, view)| view).collect(),
            })
        })
        .collect();

    ResultsView::Groups(groups)
}

fn confidence_percent(confidence: f32) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Empty { message } => writeln!(f, "{message}"),
            ResultsView::Groups(groups) => {
                for group in groups {
                    writeln!(f, "{}", group.label)?;
                    for intent in &group.intents {
                        writeln!(
                            f,
                            "  - {} ({}%): {}",
                            intent.label, intent.confidence_percent, intent.reasoning
                        )?;
                    }
                }
                Ok(())
            }
        }
    }
}
