//! Enrollment Gate
//!
//! The single authorization decision for gated course endpoints. On
//! success the resolved course and enrollment are handed back so
//! downstream logic never re-queries them.

use auth::models::user_id::UserId;
use chrono::Utc;

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::entity::video_part::VideoPart;
use crate::domain::repository::{CatalogRepository, EnrollmentRepository};
use crate::domain::value_object::ids::{CourseId, VideoPartId};
use crate::error::{AcademyError, AcademyResult};

/// Proof that a user may access a course's gated content
#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub course: Course,
    pub enrollment: Enrollment,
}

/// Resolve whether `user_id` may access the course behind `slug`
///
/// Distinguishes three failures: unknown course (404), no qualifying
/// enrollment (403), and a qualifying enrollment past its expiry (403).
pub async fn ensure_enrollment<C, E>(
    catalog: &C,
    enrollments: &E,
    user_id: UserId,
    slug: &str,
) -> AcademyResult<CourseAccess>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
{
    let course = catalog
        .find_course_by_slug(slug)
        .await?
        .ok_or(AcademyError::CourseNotFound)?;

    let enrollment = enrollments
        .find_enrollment(user_id, course.course_id)
        .await?
        .filter(|e| e.payment_status.grants_access())
        .ok_or(AcademyError::NotEnrolled)?;

    if enrollment.is_expired(Utc::now()) {
        return Err(AcademyError::EnrollmentExpired);
    }

    Ok(CourseAccess { course, enrollment })
}

/// Resolve whether `user_id` may touch `video_part_id` at all
///
/// Used by the progress endpoints, which are addressed by video rather
/// than by course. Every denial collapses into one opaque 403 so the
/// response does not reveal whether the video exists.
pub async fn ensure_video_access<C, E>(
    catalog: &C,
    enrollments: &E,
    user_id: UserId,
    video_part_id: VideoPartId,
) -> AcademyResult<(VideoPart, CourseId)>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
{
    let (part, course_id) = catalog
        .find_video_part_with_course(video_part_id)
        .await?
        .ok_or(AcademyError::VideoAccessDenied)?;

    enrollments
        .find_enrollment(user_id, course_id)
        .await?
        .filter(|e| e.grants_access(Utc::now()))
        .ok_or(AcademyError::VideoAccessDenied)?;

    Ok((part, course_id))
}
