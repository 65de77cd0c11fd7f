//! Progress Rollups
//!
//! Pure aggregation over flat hierarchy rows. The repository fetches
//! one `CoursePart` per ready video part (hierarchy order, with the
//! viewer's progress joined in) and everything here is arithmetic over
//! that slice, so the percentage semantics are unit-testable without a
//! database.
//!
//! Numeric rules:
//! - `percent = round(watched / total * 100)`, with a zero total
//!   defined as 0%
//! - a completed part contributes its full duration to `watched`;
//!   an in-flight part contributes its capped `progress_seconds`
//! - pending parts never reach this module: they are excluded at the
//!   query layer, so they count toward neither side of the ratio

use chrono::{DateTime, Utc};

use crate::domain::value_object::ids::{LessonId, ModuleId, VideoPartId};

/// One ready video part with the viewer's progress joined in
///
/// Slices are ordered by (module sort_order, module_number, lesson
/// sort_order, lesson_number, part_number) when fetched.
#[derive(Debug, Clone)]
pub struct CoursePart {
    pub module_id: ModuleId,
    pub module_number: i32,
    pub module_title: String,
    pub lesson_id: LessonId,
    pub lesson_number: i32,
    pub lesson_title: String,
    pub video_part_id: VideoPartId,
    pub part_number: i32,
    pub video_title: Option<String>,
    pub duration_seconds: i64,
    /// Zero when no progress row exists yet
    pub progress_seconds: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set whenever a progress row exists
    pub last_watched_at: Option<DateTime<Utc>>,
}

impl CoursePart {
    /// Seconds this part contributes to a watched-duration total
    pub fn watched_seconds(&self) -> i64 {
        if self.completed {
            self.duration_seconds
        } else {
            self.progress_seconds
        }
    }

    /// A progress row exists for the viewer
    pub fn has_progress(&self) -> bool {
        self.last_watched_at.is_some()
    }
}

/// Aggregated watch totals over a set of parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_seconds: i64,
    pub watched_seconds: i64,
}

impl Totals {
    /// Integer percent complete; a zero total is 0%, not a division error
    pub fn percent(&self) -> i64 {
        percent(self.watched_seconds, self.total_seconds)
    }

    /// Complete means every part is completed and there is at least one
    pub fn is_complete(&self) -> bool {
        self.total_videos > 0 && self.completed_videos == self.total_videos
    }
}

/// `round(watched / total * 100)` with 0/0 defined as 0
pub fn percent(watched_seconds: i64, total_seconds: i64) -> i64 {
    if total_seconds <= 0 {
        return 0;
    }
    (watched_seconds as f64 / total_seconds as f64 * 100.0).round() as i64
}

/// Aggregate totals over a slice of parts
pub fn totals(parts: &[CoursePart]) -> Totals {
    let mut acc = Totals::default();
    for part in parts {
        acc.total_videos += 1;
        if part.completed {
            acc.completed_videos += 1;
        }
        acc.total_seconds += part.duration_seconds;
        acc.watched_seconds += part.watched_seconds();
    }
    acc
}

/// Totals per module, in first-seen (hierarchy) order
pub fn module_totals(parts: &[CoursePart]) -> Vec<(ModuleId, Totals)> {
    group_totals(parts, |part| part.module_id)
}

/// Totals per lesson, in first-seen (hierarchy) order
pub fn lesson_totals(parts: &[CoursePart]) -> Vec<(LessonId, Totals)> {
    group_totals(parts, |part| part.lesson_id)
}

fn group_totals<K: Copy + PartialEq>(
    parts: &[CoursePart],
    key: impl Fn(&CoursePart) -> K,
) -> Vec<(K, Totals)> {
    let mut groups: Vec<(K, Totals)> = Vec::new();
    for part in parts {
        let k = key(part);
        let entry = match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, totals)) => totals,
            None => {
                groups.push((k, Totals::default()));
                &mut groups.last_mut().expect("just pushed").1
            }
        };
        entry.total_videos += 1;
        if part.completed {
            entry.completed_videos += 1;
        }
        entry.total_seconds += part.duration_seconds;
        entry.watched_seconds += part.watched_seconds();
    }
    groups
}

/// First part without completion, in hierarchy order
pub fn next_incomplete(parts: &[CoursePart]) -> Option<&CoursePart> {
    parts.iter().find(|part| !part.completed)
}

/// Whether every ready part of `lesson_id` is completed
pub fn lesson_complete(parts: &[CoursePart], lesson_id: LessonId) -> bool {
    let mut seen = false;
    for part in parts.iter().filter(|p| p.lesson_id == lesson_id) {
        if !part.completed {
            return false;
        }
        seen = true;
    }
    seen
}

/// Whether every ready part of the course is completed
pub fn course_complete(parts: &[CoursePart]) -> bool {
    totals(parts).is_complete()
}

/// Seconds as a coarse human duration: `0m`, `45m`, `2h 30m`
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0m".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(
        module_id: i64,
        lesson_id: i64,
        video_part_id: i64,
        duration: i64,
        progress: i64,
        completed: bool,
    ) -> CoursePart {
        CoursePart {
            module_id: ModuleId::from_i64(module_id),
            module_number: module_id as i32,
            module_title: format!("Module {}", module_id),
            lesson_id: LessonId::from_i64(lesson_id),
            lesson_number: lesson_id as i32,
            lesson_title: format!("Lesson {}", lesson_id),
            video_part_id: VideoPartId::from_i64(video_part_id),
            part_number: video_part_id as i32,
            video_title: None,
            duration_seconds: duration,
            progress_seconds: progress,
            completed,
            completed_at: None,
            last_watched_at: if progress > 0 || completed {
                Some(Utc::now())
            } else {
                None
            },
        }
    }

    #[test]
    fn test_percent_rounding_and_zero_total() {
        assert_eq!(percent(90, 180), 50);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(10, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(180, 180), 100);
    }

    #[test]
    fn test_half_watched_single_video_is_fifty_percent() {
        // 180s video watched to 90s
        let parts = vec![part(0, 1, 1, 180, 90, false)];
        assert_eq!(totals(&parts).percent(), 50);
    }

    #[test]
    fn test_completed_part_counts_full_duration() {
        // Completed with only 90s reported still contributes 180s
        let parts = vec![part(0, 1, 1, 180, 90, true)];
        let t = totals(&parts);
        assert_eq!(t.watched_seconds, 180);
        assert_eq!(t.percent(), 100);
        assert!(t.is_complete());
    }

    #[test]
    fn test_empty_slice_is_zero_and_never_complete() {
        let t = totals(&[]);
        assert_eq!(t.percent(), 0);
        assert!(!t.is_complete());
    }

    #[test]
    fn test_module_totals_preserve_order() {
        let parts = vec![
            part(1, 1, 1, 100, 100, true),
            part(1, 2, 2, 100, 0, false),
            part(2, 3, 3, 200, 50, false),
        ];

        let modules = module_totals(&parts);
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].0, ModuleId::from_i64(1));
        assert_eq!(modules[0].1.percent(), 50);
        assert_eq!(modules[1].0, ModuleId::from_i64(2));
        assert_eq!(modules[1].1.percent(), 25);
    }

    #[test]
    fn test_lesson_and_course_completion() {
        let mut parts = vec![
            part(1, 1, 1, 100, 0, true),
            part(1, 1, 2, 100, 0, true),
            part(1, 2, 3, 100, 0, false),
        ];

        assert!(lesson_complete(&parts, LessonId::from_i64(1)));
        assert!(!lesson_complete(&parts, LessonId::from_i64(2)));
        // A lesson with no ready parts is not "complete"
        assert!(!lesson_complete(&parts, LessonId::from_i64(99)));
        assert!(!course_complete(&parts));

        parts[2].completed = true;
        assert!(course_complete(&parts));
    }

    #[test]
    fn test_next_incomplete_follows_hierarchy_order() {
        let parts = vec![
            part(1, 1, 1, 100, 0, true),
            part(1, 1, 2, 100, 30, false),
            part(2, 2, 3, 100, 0, false),
        ];

        let next = next_incomplete(&parts).unwrap();
        assert_eq!(next.video_part_id, VideoPartId::from_i64(2));

        let all_done: Vec<CoursePart> = parts
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.completed = true;
                p
            })
            .collect();
        assert!(next_incomplete(&all_done).is_none());
    }

    #[test]
    fn test_completion_only_operations_never_lower_percent() {
        // Completing parts one by one is monotone non-decreasing
        let mut parts = vec![
            part(1, 1, 1, 120, 30, false),
            part(1, 1, 2, 60, 0, false),
            part(1, 2, 3, 180, 90, false),
        ];

        let mut last = totals(&parts).percent();
        for i in 0..parts.len() {
            parts[i].completed = true;
            let now = totals(&parts).percent();
            assert!(now >= last, "percent dropped from {} to {}", last, now);
            last = now;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_newly_published_part_can_lower_a_finished_course() {
        // Documented behavior: 100% can drop when a new part becomes ready
        let mut parts = vec![part(1, 1, 1, 100, 0, true)];
        assert_eq!(totals(&parts).percent(), 100);

        parts.push(part(1, 1, 2, 100, 0, false));
        let t = totals(&parts);
        assert_eq!(t.percent(), 50);
        assert!(!t.is_complete());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(2700), "45m");
        assert_eq!(format_duration(9000), "2h 30m");
        assert_eq!(format_duration(3600), "1h 0m");
    }
}
