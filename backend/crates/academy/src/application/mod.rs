//! Application Layer
//!
//! Use cases and media configuration.

pub mod config;
pub mod course_detail;
pub mod course_progress;
pub mod enroll;
pub mod gate;
pub mod list_courses;
pub mod mark_complete;
pub mod module_lessons;
pub mod playback;
pub mod progress_overview;
pub mod report_progress;
pub mod reset_progress;

// Re-exports
pub use config::MediaConfig;
pub use course_detail::{CourseDetailOutput, CourseDetailUseCase};
pub use course_progress::{CourseProgressOutput, CourseProgressUseCase};
pub use enroll::{EnrollOutput, EnrollUseCase};
pub use gate::{CourseAccess, ensure_enrollment};
pub use list_courses::{ListCoursesOutput, ListCoursesUseCase};
pub use mark_complete::{MarkCompleteOutput, MarkCompleteUseCase};
pub use module_lessons::{LessonWithParts, ModuleLessonsOutput, ModuleLessonsUseCase};
pub use playback::{PlaybackUrlOutput, PlaybackUrlUseCase};
pub use progress_overview::{CourseRollup, ProgressOverviewOutput, ProgressOverviewUseCase};
pub use report_progress::{ReportProgressOutput, ReportProgressUseCase};
pub use reset_progress::ResetProgressUseCase;
