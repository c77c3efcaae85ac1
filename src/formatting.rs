//! Plain-text rendering of store contents for the command line

use crate::selectors::{CompletionStats, TaskView};
use crate::todo::{Category, Task};
use chrono::{DateTime, Local, Utc};

fn checkbox(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

/// Due date as a local calendar day
fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn push_task_line(out: &mut String, task: &Task, exclude_description: bool) {
    out.push_str(&format!(
        "  {} {} ({}) [{}]\n",
        checkbox(task),
        task.title,
        task.priority,
        task.id
    ));
    if let Some(due) = task.due_date {
        out.push_str(&format!("      Due: {}\n", format_due(due)));
    }
    if !exclude_description && !task.description.is_empty() {
        out.push_str(&format!("      {}\n", task.description.replace('\n', "\n      ")));
    }
}

/// Render every category with its tasks in list order
pub fn format_categories(categories: &[Category], exclude_description: bool) -> String {
    if categories.is_empty() {
        return "No categories".to_string();
    }

    let mut result = String::new();
    for category in categories {
        result.push_str(&format!(
            "{} {} ({}, {}) [{}]\n",
            category.icon,
            category.name,
            category.color,
            match category.tasks.len() {
                1 => "1 task".to_string(),
                n => format!("{} tasks", n),
            },
            category.id
        ));
        for task in &category.tasks {
            push_task_line(&mut result, task, exclude_description);
        }
    }
    result
}

/// Render a derived view
pub fn format_task_views(views: &[TaskView], exclude_description: bool) -> String {
    if views.is_empty() {
        return "No tasks found".to_string();
    }

    let mut result = format!("Found {} task(s):\n\n", views.len());
    for view in views {
        result.push_str(&format!("{} {}\n", view.category_icon, view.category_name));
        push_task_line(&mut result, &view.task, exclude_description);
    }
    result
}

pub fn format_stats(stats: &CompletionStats) -> String {
    format!(
        "{} of {} task(s) completed ({}%)",
        stats.completed, stats.total, stats.percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{Color, Priority};

    fn task(title: &str, completed: bool) -> Task {
        let now = "2025-03-01T09:00:00Z".parse().unwrap();
        Task {
            id: format!("id-{}", title),
            title: title.to_string(),
            description: "line one\nline two".to_string(),
            completed,
            category_id: "c".to_string(),
            priority: Priority::High,
            created_at: now,
            updated_at: now,
            due_date: None,
        }
    }

    #[test]
    fn test_format_categories() {
        let categories = vec![Category {
            id: "c".to_string(),
            name: "Work".to_string(),
            color: Color::rgb(0x6C, 0x63, 0xFF),
            icon: "💼".to_string(),
            tasks: vec![task("Ship", false), task("Plan", true)],
        }];

        let out = format_categories(&categories, false);
        assert!(out.starts_with("💼 Work (#6C63FF, 2 tasks) [c]\n"));
        assert!(out.contains("  [ ] Ship (high) [id-Ship]\n"));
        assert!(out.contains("  [x] Plan (high) [id-Plan]\n"));
        assert!(out.contains("      line one\n      line two\n"));

        let terse = format_categories(&categories, true);
        assert!(!terse.contains("line one"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_categories(&[], false), "No categories");
        assert_eq!(format_task_views(&[], false), "No tasks found");
    }

    #[test]
    fn test_format_stats() {
        let stats = CompletionStats {
            total: 4,
            completed: 1,
            percentage: 25,
        };
        assert_eq!(format_stats(&stats), "1 of 4 task(s) completed (25%)");
    }
}
