use crate::domain::Intent;
use crate::results::{ResultsView, present};

/// What the drawing screen displays besides the canvas
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenState {
    /// Intents of the last applied analysis
    pub intents: Vec<Intent>,
    /// An analysis is in flight; new analysis requests are refused
    pub is_analyzing: bool,
    /// The single user-visible error, latest wins
    pub error_message: Option<String>,
    /// Blocking prompt shown when the picker was denied access
    pub permission_prompt: Option<String>,
}

impl ScreenState {
    pub fn can_analyze(&self) -> bool {
        !self.is_analyzing
    }

    pub fn results(&self) -> ResultsView {
        present(&self.intents)
    }

    /// Reset everything shown next to the canvas
    pub fn clear(&mut self) {
        self.intents.clear();
        self.is_analyzing = false;
        self.error_message = None;
        self.permission_prompt = None;
    }
}
