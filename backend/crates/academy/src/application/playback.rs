//! Playback URL Use Case
//!
//! Issues a time-limited playback URL for a ready video part of a
//! gated course. Pure computation over stored keys: no rows are
//! written, and the progress tracker is not involved.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::MediaConfig;
use crate::application::gate::CourseAccess;
use crate::domain::repository::CatalogRepository;
use crate::domain::value_object::ids::VideoPartId;
use crate::error::{AcademyError, AcademyResult};

/// Playback URL output
pub struct PlaybackUrlOutput {
    pub video_part_id: VideoPartId,
    pub url: String,
    pub duration_seconds: i64,
    /// Seconds the URL stays valid
    pub expires_in: i64,
}

/// Playback URL use case
pub struct PlaybackUrlUseCase<C>
where
    C: CatalogRepository,
{
    catalog: Arc<C>,
    media: Arc<MediaConfig>,
}

impl<C> PlaybackUrlUseCase<C>
where
    C: CatalogRepository,
{
    pub fn new(catalog: Arc<C>, media: Arc<MediaConfig>) -> Self {
        Self { catalog, media }
    }

    pub async fn execute(
        &self,
        access: &CourseAccess,
        video_part_id: VideoPartId,
    ) -> AcademyResult<PlaybackUrlOutput> {
        let (part, course_id) = self
            .catalog
            .find_video_part_with_course(video_part_id)
            .await?
            .ok_or(AcademyError::VideoNotFound)?;

        // The part must sit inside the gated course and be ready
        if course_id != access.course.course_id || !part.is_playable() {
            return Err(AcademyError::VideoNotFound);
        }

        let signed = self.media.sign(&part.object_key, Utc::now());

        Ok(PlaybackUrlOutput {
            video_part_id,
            url: signed.url,
            duration_seconds: part.duration_seconds,
            expires_in: self.media.url_ttl_secs(),
        })
    }
}
