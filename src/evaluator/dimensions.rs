use serde::{Deserialize, Serialize};

use crate::model::{DimensionInput, WeightInput};

/// Parsed physical dimensions in centimeters plus weight in kilograms.
/// Length, width and height are always positive; weight is floored at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl CanonicalDimensions {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// Parses raw dimension and weight input into canonical form.
///
/// Free text must contain at least three numeric tokens; after unit markers
/// (cm, mm, in, inch) are stripped, the first three tokens are taken as
/// length, width and height in that order. No unit conversion is performed
/// even when a marker was present: upstream feeds declare centimeters, and a
/// marker is treated as decoration. Returns `None` when fewer than three
/// tokens are found or any of the first three is not a positive finite
/// number.
pub fn parse(
    dimensions: Option<&DimensionInput>,
    weight: Option<&WeightInput>,
) -> Option<CanonicalDimensions> {
    let (length, width, height, inline_weight) = match dimensions? {
        DimensionInput::Text(text) => {
            let (l, w, h) = parse_text(text)?;
            (l, w, h, None)
        }
        DimensionInput::Explicit {
            length,
            width,
            height,
            weight,
        } => (*length, *width, *height, *weight),
    };

    let all_positive = [length, width, height]
        .iter()
        .all(|d| d.is_finite() && *d > 0.0);
    if !all_positive {
        return None;
    }

    // An inline weight on structured input wins over the separate field.
    let weight = match inline_weight {
        Some(w) if w.is_finite() => w.max(0.0),
        Some(_) => 0.0,
        None => parse_weight(weight),
    };

    Some(CanonicalDimensions {
        length,
        width,
        height,
        weight,
    })
}

/// Parses the standalone weight input as a single float in kilograms.
/// Missing or non-numeric input yields 0; negative values floor to 0.
pub fn parse_weight(weight: Option<&WeightInput>) -> f64 {
    let value = match weight {
        None => 0.0,
        Some(WeightInput::Number(n)) => *n,
        Some(WeightInput::Text(text)) => numeric_tokens(text).into_iter().next().unwrap_or(0.0),
    };
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn parse_text(text: &str) -> Option<(f64, f64, f64)> {
    let mut cleaned = text.to_lowercase();
    for marker in ["inch", "cm", "mm", "in"] {
        cleaned = cleaned.replace(marker, "");
    }

    let tokens = numeric_tokens(&cleaned);
    if tokens.len() < 3 {
        return None;
    }
    Some((tokens[0], tokens[1], tokens[2]))
}

/// Extracts numeric tokens (integer or decimal) in left-to-right order.
/// Any non-digit, non-dot character acts as a separator.
fn numeric_tokens(text: &str) -> Vec<f64> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current.push(ch);
        } else {
            flush_token(&mut tokens, &mut current);
        }
    }
    flush_token(&mut tokens, &mut current);

    tokens
}

fn flush_token(tokens: &mut Vec<f64>, buffer: &mut String) {
    if buffer.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(value) = buffer.parse::<f64>() {
            tokens.push(value);
        }
    }
    buffer.clear();
}
