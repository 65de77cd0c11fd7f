//! Typed IDs for the course hierarchy

use kernel::id::Id;

pub struct CourseMarker;
pub type CourseId = Id<CourseMarker>;

pub struct ModuleMarker;
pub type ModuleId = Id<ModuleMarker>;

pub struct LessonMarker;
pub type LessonId = Id<LessonMarker>;

pub struct VideoPartMarker;
pub type VideoPartId = Id<VideoPartMarker>;

pub struct EnrollmentMarker;
pub type EnrollmentId = Id<EnrollmentMarker>;

pub struct ProgressMarker;
pub type ProgressId = Id<ProgressMarker>;
