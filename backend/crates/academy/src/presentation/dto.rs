//! API DTOs (Data Transfer Objects)
//!
//! Presentation shapes for the course and progress endpoints. Rollup
//! math stays in the domain; these types only rename and format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{
    CourseDetailOutput, CourseProgressOutput, CourseRollup, EnrollOutput, LessonWithParts,
    MarkCompleteOutput, ModuleLessonsOutput, PlaybackUrlOutput, ProgressOverviewOutput,
    ReportProgressOutput,
};
use crate::domain::entity::course::Course;
use crate::domain::repository::{CourseOverview, ModuleOverview, RecentActivity};
use crate::domain::rollup::{self, CoursePart, Totals};

// ============================================================================
// Shared fragments
// ============================================================================

/// Price block: raw minor units plus display string
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub cents: i64,
    pub formatted: String,
}

impl From<&Course> for PriceDto {
    fn from(course: &Course) -> Self {
        Self {
            cents: course.price_cents,
            formatted: course.formatted_price(),
        }
    }
}

/// Watch statistics over a set of video parts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatsDto {
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_duration_seconds: i64,
    pub watched_duration_seconds: i64,
    pub percent_complete: i64,
}

impl From<Totals> for ProgressStatsDto {
    fn from(t: Totals) -> Self {
        Self {
            total_videos: t.total_videos,
            completed_videos: t.completed_videos,
            total_duration_seconds: t.total_seconds,
            watched_duration_seconds: t.watched_seconds,
            percent_complete: t.percent(),
        }
    }
}

// ============================================================================
// Course listing
// ============================================================================

/// One course in the catalog listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListItemDto {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub price: PriceDto,
    pub is_enrolled: bool,
    pub module_count: i64,
    pub lesson_count: i64,
    pub total_duration_seconds: i64,
    pub total_duration: String,
}

impl CourseListItemDto {
    pub fn from_overview(overview: &CourseOverview, is_enrolled: bool) -> Self {
        let course = &overview.course;
        Self {
            id: course.course_id.get(),
            slug: course.slug.as_str().to_string(),
            title: course.title.clone(),
            description: course.description.clone(),
            created_at: course.created_at,
            price: PriceDto::from(course),
            is_enrolled,
            module_count: overview.module_count,
            lesson_count: overview.lesson_count,
            total_duration_seconds: overview.total_duration_seconds,
            total_duration: rollup::format_duration(overview.total_duration_seconds),
        }
    }
}

// ============================================================================
// Course detail
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub price: PriceDto,
}

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.course_id.get(),
            slug: course.slug.as_str().to_string(),
            title: course.title.clone(),
            description: course.description.clone(),
            is_published: course.is_published,
            created_at: course.created_at,
            price: PriceDto::from(course),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOverviewDto {
    pub id: i64,
    pub module_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub lesson_count: i64,
    pub total_duration_seconds: i64,
    pub total_duration: String,
}

impl From<&ModuleOverview> for ModuleOverviewDto {
    fn from(overview: &ModuleOverview) -> Self {
        Self {
            id: overview.module.module_id.get(),
            module_number: overview.module.module_number,
            title: overview.module.title.clone(),
            description: overview.module.description.clone(),
            sort_order: overview.module.sort_order,
            lesson_count: overview.lesson_count,
            total_duration_seconds: overview.total_duration_seconds,
            total_duration: rollup::format_duration(overview.total_duration_seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
    pub enrolled_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub course: CourseDto,
    pub modules: Vec<ModuleOverviewDto>,
    pub is_enrolled: bool,
    pub enrollment: Option<EnrollmentDto>,
    pub progress: Option<ProgressStatsDto>,
}

impl From<CourseDetailOutput> for CourseDetailResponse {
    fn from(output: CourseDetailOutput) -> Self {
        Self {
            course: CourseDto::from(&output.course),
            modules: output.modules.iter().map(Into::into).collect(),
            is_enrolled: output.enrollment.is_some(),
            enrollment: output.enrollment.map(|e| EnrollmentDto {
                enrolled_at: e.enrolled_at,
                expires_at: e.expires_at,
            }),
            progress: output.progress.map(Into::into),
        }
    }
}

// ============================================================================
// Module lessons
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPartProgressDto {
    pub id: i64,
    pub part_number: i32,
    pub title: Option<String>,
    pub duration_seconds: i64,
    pub duration: String,
    pub progress_seconds: i64,
    pub completed: bool,
    pub last_watched_at: Option<DateTime<Utc>>,
}

impl From<&CoursePart> for VideoPartProgressDto {
    fn from(part: &CoursePart) -> Self {
        Self {
            id: part.video_part_id.get(),
            part_number: part.part_number,
            title: part.video_title.clone(),
            duration_seconds: part.duration_seconds,
            duration: rollup::format_duration(part.duration_seconds),
            progress_seconds: part.progress_seconds,
            completed: part.completed,
            last_watched_at: part.last_watched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressDto {
    pub watched_seconds: i64,
    pub total_seconds: i64,
    pub percent_complete: i64,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: i64,
    pub lesson_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_seconds: i64,
    pub duration: String,
    pub sort_order: i32,
    pub is_preview: bool,
    pub video_parts: Vec<VideoPartProgressDto>,
    pub progress: LessonProgressDto,
}

impl From<&LessonWithParts> for LessonDto {
    fn from(entry: &LessonWithParts) -> Self {
        Self {
            id: entry.lesson.lesson_id.get(),
            lesson_number: entry.lesson.lesson_number,
            title: entry.lesson.title.clone(),
            description: entry.lesson.description.clone(),
            duration_seconds: entry.lesson.duration_seconds,
            duration: rollup::format_duration(entry.lesson.duration_seconds),
            sort_order: entry.lesson.sort_order,
            is_preview: entry.lesson.is_preview,
            video_parts: entry.parts.iter().map(Into::into).collect(),
            progress: LessonProgressDto {
                watched_seconds: entry.totals.watched_seconds,
                total_seconds: entry.totals.total_seconds,
                percent_complete: entry.totals.percent(),
                is_completed: entry.totals.is_complete(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    pub id: i64,
    pub module_number: i32,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleLessonsResponse {
    pub module: ModuleDto,
    pub lessons: Vec<LessonDto>,
}

impl From<ModuleLessonsOutput> for ModuleLessonsResponse {
    fn from(output: ModuleLessonsOutput) -> Self {
        Self {
            module: ModuleDto {
                id: output.module.module_id.get(),
                module_number: output.module.module_number,
                title: output.module.title.clone(),
                description: output.module.description.clone(),
            },
            lessons: output.lessons.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Playback
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackUrlResponse {
    pub video_id: i64,
    pub url: String,
    pub duration_seconds: i64,
    /// Seconds the URL stays valid
    pub expires_in: i64,
}

impl From<PlaybackUrlOutput> for PlaybackUrlResponse {
    fn from(output: PlaybackUrlOutput) -> Self {
        Self {
            video_id: output.video_part_id.get(),
            url: output.url,
            duration_seconds: output.duration_seconds,
            expires_in: output.expires_in,
        }
    }
}

// ============================================================================
// Enroll
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub enrollment_id: i64,
    pub course: EnrolledCourseRefDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourseRefDto {
    pub id: i64,
    pub title: String,
}

impl From<EnrollOutput> for EnrollResponse {
    fn from(output: EnrollOutput) -> Self {
        Self {
            enrollment_id: output.enrollment.enrollment_id.get(),
            course: EnrolledCourseRefDto {
                id: output.course.course_id.get(),
                title: output.course.title,
            },
        }
    }
}

// ============================================================================
// Progress reporting
// ============================================================================

/// Progress report body; the value is validated in the use case so a
/// non-numeric payload gets the same enveloped 400 as a negative one
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProgressRequest {
    #[serde(default)]
    pub progress_seconds: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProgressResponse {
    pub video_part_id: i64,
    pub progress_seconds: i64,
    pub duration_seconds: i64,
    pub percent_complete: i64,
}

impl From<ReportProgressOutput> for ReportProgressResponse {
    fn from(output: ReportProgressOutput) -> Self {
        Self {
            video_part_id: output.video_part_id.get(),
            progress_seconds: output.progress_seconds,
            duration_seconds: output.duration_seconds,
            percent_complete: output.percent_complete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCompleteResponse {
    pub video_part_id: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub lesson_complete: bool,
    pub course_complete: bool,
}

impl From<MarkCompleteOutput> for MarkCompleteResponse {
    fn from(output: MarkCompleteOutput) -> Self {
        Self {
            video_part_id: output.video_part_id.get(),
            completed: true,
            completed_at: output.completed_at,
            lesson_complete: output.lesson_complete,
            course_complete: output.course_complete,
        }
    }
}

// ============================================================================
// Progress overview
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgressDto {
    pub enrolled_courses: i64,
    pub completed_videos: i64,
    pub total_watch_time_seconds: i64,
    pub total_watch_time_formatted: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressSummaryDto {
    pub course_id: i64,
    pub slug: String,
    pub title: String,
    pub enrolled_at: DateTime<Utc>,
    pub last_activity: Option<DateTime<Utc>>,
    pub progress: ProgressStatsDto,
}

impl From<&CourseRollup> for CourseProgressSummaryDto {
    fn from(rollup: &CourseRollup) -> Self {
        Self {
            course_id: rollup.course.course_id.get(),
            slug: rollup.course.slug.clone(),
            title: rollup.course.title.clone(),
            enrolled_at: rollup.course.enrolled_at,
            last_activity: rollup.last_activity,
            progress: rollup.totals.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityDto {
    pub id: i64,
    pub video_part_id: i64,
    pub progress_seconds: i64,
    pub completed: bool,
    pub last_watched_at: Option<DateTime<Utc>>,
    pub video: RecentVideoDto,
    pub lesson: RecentLessonDto,
    pub module: RecentModuleDto,
    pub course: RecentCourseDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentVideoDto {
    pub part_number: i32,
    pub title: Option<String>,
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLessonDto {
    pub id: i64,
    pub number: i32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentModuleDto {
    pub id: i64,
    pub number: i32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCourseDto {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

impl From<&RecentActivity> for RecentActivityDto {
    fn from(activity: &RecentActivity) -> Self {
        Self {
            id: activity.progress_id,
            video_part_id: activity.video_part_id,
            progress_seconds: activity.progress_seconds,
            completed: activity.completed,
            last_watched_at: activity.last_watched_at,
            video: RecentVideoDto {
                part_number: activity.part_number,
                title: activity.video_title.clone(),
                duration_seconds: activity.duration_seconds,
            },
            lesson: RecentLessonDto {
                id: activity.lesson_id,
                number: activity.lesson_number,
                title: activity.lesson_title.clone(),
            },
            module: RecentModuleDto {
                id: activity.module_id,
                number: activity.module_number,
                title: activity.module_title.clone(),
            },
            course: RecentCourseDto {
                id: activity.course_id,
                slug: activity.course_slug.clone(),
                title: activity.course_title.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverviewResponse {
    pub overall: OverallProgressDto,
    pub courses: Vec<CourseProgressSummaryDto>,
    pub recent_activity: Vec<RecentActivityDto>,
}

impl From<ProgressOverviewOutput> for ProgressOverviewResponse {
    fn from(output: ProgressOverviewOutput) -> Self {
        Self {
            overall: OverallProgressDto {
                enrolled_courses: output.enrolled_courses,
                completed_videos: output.completed_videos,
                total_watch_time_seconds: output.total_watch_seconds,
                total_watch_time_formatted: rollup::format_duration(output.total_watch_seconds),
            },
            courses: output.courses.iter().map(Into::into).collect(),
            recent_activity: output.recent_activity.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Course progress detail
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRollupDto {
    pub module_id: i64,
    pub module_number: i32,
    pub title: String,
    pub progress: ModuleRollupProgressDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRollupProgressDto {
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_duration_seconds: i64,
    pub watched_duration_seconds: i64,
    pub percent_complete: i64,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgressDto {
    pub video_part_id: i64,
    pub part_number: i32,
    pub title: Option<String>,
    pub duration_seconds: i64,
    pub progress_seconds: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_watched_at: Option<DateTime<Utc>>,
    pub lesson_id: i64,
    pub lesson_number: i32,
    pub lesson_title: String,
    pub module_id: i64,
    pub module_number: i32,
}

impl From<&CoursePart> for VideoProgressDto {
    fn from(part: &CoursePart) -> Self {
        Self {
            video_part_id: part.video_part_id.get(),
            part_number: part.part_number,
            title: part.video_title.clone(),
            duration_seconds: part.duration_seconds,
            progress_seconds: part.progress_seconds,
            completed: part.completed,
            completed_at: part.completed_at,
            last_watched_at: part.last_watched_at,
            lesson_id: part.lesson_id.get(),
            lesson_number: part.lesson_number,
            lesson_title: part.lesson_title.clone(),
            module_id: part.module_id.get(),
            module_number: part.module_number,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextVideoDto {
    pub video_part_id: i64,
    pub part_number: i32,
    pub title: Option<String>,
    pub lesson_id: i64,
    pub lesson_number: i32,
    pub lesson_title: String,
    pub module_id: i64,
    pub module_number: i32,
    pub module_title: String,
    /// Where the player should resume
    pub resume_at: i64,
}

impl From<&CoursePart> for NextVideoDto {
    fn from(part: &CoursePart) -> Self {
        Self {
            video_part_id: part.video_part_id.get(),
            part_number: part.part_number,
            title: part.video_title.clone(),
            lesson_id: part.lesson_id.get(),
            lesson_number: part.lesson_number,
            lesson_title: part.lesson_title.clone(),
            module_id: part.module_id.get(),
            module_number: part.module_number,
            module_title: part.module_title.clone(),
            resume_at: part.progress_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressResponse {
    pub enrolled_at: DateTime<Utc>,
    pub modules: Vec<ModuleRollupDto>,
    pub videos: Vec<VideoProgressDto>,
    pub next_video: Option<NextVideoDto>,
}

impl From<CourseProgressOutput> for CourseProgressResponse {
    fn from(output: CourseProgressOutput) -> Self {
        Self {
            enrolled_at: output.enrollment.enrolled_at,
            modules: output
                .modules
                .iter()
                .map(|m| ModuleRollupDto {
                    module_id: m.module_id.get(),
                    module_number: m.module_number,
                    title: m.title.clone(),
                    progress: ModuleRollupProgressDto {
                        total_videos: m.totals.total_videos,
                        completed_videos: m.totals.completed_videos,
                        total_duration_seconds: m.totals.total_seconds,
                        watched_duration_seconds: m.totals.watched_seconds,
                        percent_complete: m.totals.percent(),
                        is_complete: m.totals.is_complete(),
                    },
                })
                .collect(),
            videos: output.videos.iter().map(Into::into).collect(),
            next_video: output.next_video.as_ref().map(Into::into),
        }
    }
}
