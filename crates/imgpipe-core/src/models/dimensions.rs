use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SIZE_SEPARATOR;
use crate::error::ParseError;

/// Exact output size requested by a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a `"<width>x<height>"` size string.
    ///
    /// Both parts must be positive integers; anything else is a `ParseError::Size`.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::Size {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.split(SIZE_SEPARATOR);
        let (width, height) = match (parts.next(), parts.next(), parts.next()) {
            (Some(w), Some(h), None) => (w, h),
            _ => return Err(invalid("expected <width>x<height>")),
        };

        let width = Self::parse_side(width).ok_or_else(|| invalid("width is not a positive integer"))?;
        let height =
            Self::parse_side(height).ok_or_else(|| invalid("height is not a positive integer"))?;

        Ok(Self { width, height })
    }

    fn parse_side(side: &str) -> Option<u32> {
        let side = side.trim();
        if side.is_empty() || !side.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        side.parse::<u32>().ok().filter(|v| *v > 0)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.width, SIZE_SEPARATOR, self.height)
    }
}
