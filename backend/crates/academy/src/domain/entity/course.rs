//! Course Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{ids::CourseId, slug::Slug};

/// A sellable course owning an ordered set of modules
#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    pub slug: Slug,
    pub title: String,
    pub description: Option<String>,
    /// Price in minor currency units; zero means free
    pub price_cents: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Free courses allow direct self-enrollment
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// Human-readable price, e.g. `Free` or `$997.00`
    pub fn formatted_price(&self) -> String {
        if self.price_cents == 0 {
            "Free".to_string()
        } else {
            format!("${:.2}", self.price_cents as f64 / 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(price_cents: i64) -> Course {
        Course {
            course_id: CourseId::from_i64(1),
            slug: Slug::from_db("ai-launchpad-academy"),
            title: "AI Launchpad Academy".to_string(),
            description: None,
            price_cents,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(course(0).formatted_price(), "Free");
        assert_eq!(course(99700).formatted_price(), "$997.00");
        assert_eq!(course(150).formatted_price(), "$1.50");
    }

    #[test]
    fn test_is_free() {
        assert!(course(0).is_free());
        assert!(!course(1).is_free());
    }
}
