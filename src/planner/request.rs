//! Form input for a plan submission and its validation.

use serde::Deserialize;

use crate::error::ValidationError;

/// Raw form fields as submitted. Absent fields deserialize to empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlanForm {
    pub single_name: String,
    pub style_tone: String,
    pub youtube_channel: String,
}

/// A submission that passed validation and may start generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub single_name: String,
    pub style_tone: String,
    /// Channel exactly as typed, present only when it contains non-whitespace.
    pub youtube_channel: Option<String>,
}

impl PlanForm {
    pub fn new(
        single_name: impl Into<String>,
        style_tone: impl Into<String>,
        youtube_channel: impl Into<String>,
    ) -> Self {
        Self {
            single_name: single_name.into(),
            style_tone: style_tone.into(),
            youtube_channel: youtube_channel.into(),
        }
    }

    /// Check that both required fields are filled in. Only the channel is
    /// trimmed; a name or style of spaces still counts as provided.
    pub fn validate(&self) -> Result<PlanRequest, ValidationError> {
        if self.single_name.is_empty() || self.style_tone.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let youtube_channel = if self.youtube_channel.trim().is_empty() {
            None
        } else {
            Some(self.youtube_channel.clone())
        };

        Ok(PlanRequest {
            single_name: self.single_name.clone(),
            style_tone: self.style_tone.clone(),
            youtube_channel,
        })
    }
}
