//! Video Status Value Object

use serde::{Deserialize, Serialize};

/// Processing state of a video part
///
/// Only `Ready` parts are visible, playable, or counted in duration
/// totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    Ready,
}

impl VideoStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, VideoStatus::Ready)
    }

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Ready => "ready",
        }
    }

    /// Parse a storage value; anything unknown is treated as not ready
    pub fn from_db(s: &str) -> Self {
        match s {
            "ready" => VideoStatus::Ready,
            _ => VideoStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ready_is_ready() {
        assert!(VideoStatus::Ready.is_ready());
        assert!(!VideoStatus::Pending.is_ready());
        assert!(!VideoStatus::from_db("processing").is_ready());
    }
}
