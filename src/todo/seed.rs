use super::color::Color;
use super::task::{Category, Priority, Task};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Build the default state used on first start or when persisted state is unusable
///
/// Every call generates fresh ids; timestamps are set to `now`.
pub fn default_categories(now: DateTime<Utc>) -> Vec<Category> {
    vec![
        seed_category(
            "Personal",
            Color::rgb(0xFF, 0x65, 0x84),
            "🏠",
            &[
                ("Meditation", "Morning meditation session", false, Priority::Medium),
                ("Grocery shopping", "Buy fruits and vegetables", true, Priority::High),
            ],
            now,
        ),
        seed_category(
            "Work",
            Color::rgb(0x6C, 0x63, 0xFF),
            "💼",
            &[(
                "Update portfolio",
                "Add recent projects to portfolio",
                false,
                Priority::High,
            )],
            now,
        ),
        seed_category(
            "Fitness",
            Color::rgb(0x06, 0xD6, 0xA0),
            "💪",
            &[("Go for a run", "5K morning run", false, Priority::Medium)],
            now,
        ),
    ]
}

fn seed_category(
    name: &str,
    color: Color,
    icon: &str,
    tasks: &[(&str, &str, bool, Priority)],
    now: DateTime<Utc>,
) -> Category {
    let id = Uuid::new_v4().to_string();
    let tasks = tasks
        .iter()
        .map(|&(title, description, completed, priority)| Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
            category_id: id.clone(),
            priority,
            created_at: now,
            updated_at: now,
            due_date: None,
        })
        .collect();

    Category {
        id,
        name: name.to_string(),
        color,
        icon: icon.to_string(),
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::serde_impl::check_invariants;

    #[test]
    fn test_seed_is_consistent() {
        let seed = default_categories(Utc::now());
        assert_eq!(seed.len(), 3);
        assert!(check_invariants(&seed).is_ok());
    }

    #[test]
    fn test_seed_names_in_order() {
        let names: Vec<_> = default_categories(Utc::now())
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Personal", "Work", "Fitness"]);
    }
}
