//! User Progress Entity
//!
//! Per-(user, video part) watch state. Rows are created lazily on the
//! first progress report and reset in place, never deleted.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::value_object::ids::{ProgressId, VideoPartId};

/// Watch position and completion state for one video part
#[derive(Debug, Clone)]
pub struct UserProgress {
    pub progress_id: ProgressId,
    pub user_id: UserId,
    pub video_part_id: VideoPartId,
    /// Seconds watched, capped at the video's duration on write
    pub progress_seconds: i64,
    /// Sticky: cleared only by an explicit reset
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_watched_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Clamp a reported watch position into `[0, duration]`
pub fn cap_progress(reported: i64, duration_seconds: i64) -> i64 {
    reported.clamp(0, duration_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_progress() {
        assert_eq!(cap_progress(90, 180), 90);
        assert_eq!(cap_progress(240, 180), 180);
        assert_eq!(cap_progress(180, 180), 180);
        assert_eq!(cap_progress(0, 180), 0);
    }
}
