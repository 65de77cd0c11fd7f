//! Lesson Entity

use crate::domain::value_object::ids::{LessonId, ModuleId};

/// A lesson within a module; long lessons split into video parts
#[derive(Debug, Clone)]
pub struct Lesson {
    pub lesson_id: LessonId,
    pub module_id: ModuleId,
    pub lesson_number: i32,
    pub title: String,
    pub description: Option<String>,
    /// May be derived by summing the lesson's video parts
    pub duration_seconds: i64,
    pub sort_order: i32,
    /// Preview lessons are shown in marketing contexts
    pub is_preview: bool,
}
