//! Driving-action labels.
//!
//! A label is an ordered vector of `f32` fields extracted from the free-text
//! `action` column of the label table. At the dataset boundary the layout is
//! `[x, y, turn_left, turn_right]`; see [`TURN_LEFT`] and [`TURN_RIGHT`].

use crate::error::LabelError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Field index of the "turn left" indicator.
pub const TURN_LEFT: usize = 2;
/// Field index of the "turn right" indicator.
pub const TURN_RIGHT: usize = 3;
/// Number of fields in a label read from the label table.
pub const LABEL_WIDTH: usize = 4;

// Signed or unsigned decimal, or an integer literal.
static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d*\.\d+|\d+)").expect("numeric literal pattern is valid")
});

/// Ordered numeric fields describing a driving action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Label {
    fields: Vec<f32>,
}

impl Label {
    pub fn new(fields: Vec<f32>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[f32] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.fields.get(index).copied()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.fields
    }

    /// Mirrors the turn encoding: a left turn becomes a right turn and vice versa.
    /// Labels with neither indicator set are returned untouched.
    pub fn swap_turn_indicators(mut self) -> Result<Self, LabelError> {
        if self.fields.len() <= TURN_RIGHT {
            return Err(LabelError::MissingTurnFields {
                found: self.fields.len(),
            });
        }

        let left = self.fields[TURN_LEFT] == 1.0;
        let right = self.fields[TURN_RIGHT] == 1.0;
        match (left, right) {
            (true, false) => {
                self.fields[TURN_LEFT] = 0.0;
                self.fields[TURN_RIGHT] = 1.0;
            }
            (false, true) => {
                self.fields[TURN_LEFT] = 1.0;
                self.fields[TURN_RIGHT] = 0.0;
            }
            (true, true) => {
                tracing::warn!(fields = ?self.fields, "both turn indicators set, leaving label unchanged");
            }
            (false, false) => {}
        }
        Ok(self)
    }

    /// Reverses the whole field order.
    pub fn reversed(mut self) -> Self {
        self.fields.reverse();
        self
    }
}

impl From<Vec<f32>> for Label {
    fn from(fields: Vec<f32>) -> Self {
        Self::new(fields)
    }
}

/// How a horizontal mirror rewrites the label.
///
/// The two policies describe incompatible label schemas and are never combined;
/// each [`RandomHorizontalFlip`](crate::transforms::vision::RandomHorizontalFlip)
/// carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFlipPolicy {
    /// Exchange the turn-left (index 2) and turn-right (index 3) indicators.
    #[default]
    SwapTurnIndicators,
    /// Reverse the entire field sequence.
    ReverseFields,
}

impl LabelFlipPolicy {
    pub fn apply(self, label: Label) -> Result<Label, LabelError> {
        match self {
            LabelFlipPolicy::SwapTurnIndicators => label.swap_turn_indicators(),
            LabelFlipPolicy::ReverseFields => Ok(label.reversed()),
        }
    }
}

/// Extracts every numeric literal of `text`, left to right.
///
/// `"forward, speed=0.75, steer=-12"` parses to `[0.75, -12.0]`. Text without
/// any literal is a data-quality error, never an empty label.
pub fn parse_label(text: &str) -> Result<Label, LabelError> {
    let fields = NUMERIC_LITERAL
        .find_iter(text)
        .map(|m| {
            let token = m.as_str();
            token.parse::<f32>().map_err(|_| LabelError::InvalidNumber {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err(LabelError::NoNumericFields {
            text: text.to_string(),
        });
    }
    Ok(Label::new(fields))
}
