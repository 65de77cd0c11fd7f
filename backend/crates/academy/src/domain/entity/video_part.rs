//! Video Part Entity

use crate::domain::value_object::{
    ids::{LessonId, VideoPartId},
    video_status::VideoStatus,
};

/// A playable segment of a lesson
#[derive(Debug, Clone)]
pub struct VideoPart {
    pub video_part_id: VideoPartId,
    pub lesson_id: LessonId,
    /// 1-based ordering within the lesson
    pub part_number: i32,
    pub title: Option<String>,
    /// Key of the media file in the object store
    pub object_key: String,
    pub status: VideoStatus,
    pub duration_seconds: i64,
}

impl VideoPart {
    pub fn is_playable(&self) -> bool {
        self.status.is_ready()
    }
}
