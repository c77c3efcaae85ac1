//! Derived views over a store snapshot
//!
//! Every selector is a pure function of the categories (and, for date-based
//! views, a "now" instant whose time zone defines the calendar day). They
//! keep store order; sorting is a separate, explicit step.

use crate::store::Snapshot;
use crate::todo::{Category, Color, Priority, Task};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone};
use std::rc::Rc;
use std::str::FromStr;

/// A task decorated with its category's presentation fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    pub category_name: String,
    pub category_color: Color,
    pub category_icon: String,
}

impl TaskView {
    fn new(category: &Category, task: &Task) -> Self {
        Self {
            task: task.clone(),
            category_name: category.name.clone(),
            category_color: category.color,
            category_icon: category.icon.clone(),
        }
    }
}

/// Calendar day of a task's due date, as seen from `tz`
pub fn due_day<Tz: TimeZone>(task: &Task, tz: &Tz) -> Option<NaiveDate> {
    task.due_date.map(|due| due.with_timezone(tz).date_naive())
}

/// Pending task whose due day is strictly before `today`
pub fn is_overdue<Tz: TimeZone>(task: &Task, today: NaiveDate, tz: &Tz) -> bool {
    task.is_pending() && due_day(task, tz).is_some_and(|day| day < today)
}

/// Every task, category by category, in store order
pub fn all_tasks(categories: &[Category]) -> Vec<TaskView> {
    categories
        .iter()
        .flat_map(|c| c.tasks.iter().map(move |t| TaskView::new(c, t)))
        .collect()
}

/// Tasks due on the calendar day of `now`
pub fn today<Tz: TimeZone>(categories: &[Category], now: &DateTime<Tz>) -> Vec<TaskView> {
    let tz = now.timezone();
    let day = now.date_naive();
    select(categories, |t| due_day(t, &tz) == Some(day))
}

/// High-priority tasks
pub fn important(categories: &[Category]) -> Vec<TaskView> {
    select(categories, |t| t.priority == Priority::High)
}

/// Pending tasks due before the calendar day of `now`
pub fn overdue<Tz: TimeZone>(categories: &[Category], now: &DateTime<Tz>) -> Vec<TaskView> {
    let tz = now.timezone();
    let day = now.date_naive();
    select(categories, |t| is_overdue(t, day, &tz))
}

/// Tasks not yet completed
pub fn pending(categories: &[Category]) -> Vec<TaskView> {
    select(categories, Task::is_pending)
}

/// Completed tasks
pub fn completed(categories: &[Category]) -> Vec<TaskView> {
    select(categories, |t| t.completed)
}

fn select(categories: &[Category], keep: impl Fn(&Task) -> bool) -> Vec<TaskView> {
    categories
        .iter()
        .flat_map(|c| {
            c.tasks
                .iter()
                .filter(|t| keep(t))
                .map(move |t| TaskView::new(c, t))
        })
        .collect()
}

/// One category's list split the way the task list shows it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySections {
    /// Pending and past due
    pub overdue: Vec<Task>,
    /// Pending and not overdue
    pub upcoming: Vec<Task>,
    pub completed: Vec<Task>,
}

/// Partition a category into overdue, upcoming and completed tasks
pub fn category_sections<Tz: TimeZone>(category: &Category, now: &DateTime<Tz>) -> CategorySections {
    let tz = now.timezone();
    let day = now.date_naive();
    let mut sections = CategorySections::default();

    for task in &category.tasks {
        if task.completed {
            sections.completed.push(task.clone());
        } else if is_overdue(task, day, &tz) {
            sections.overdue.push(task.clone());
        } else {
            sections.upcoming.push(task.clone());
        }
    }
    sections
}

/// Completion filter offered by the Today and Important views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "Invalid filter '{}'. Valid options are: all, pending, completed",
                other
            )),
        }
    }
}

/// Keep the views matching `filter`
pub fn filter_status(mut views: Vec<TaskView>, filter: StatusFilter) -> Vec<TaskView> {
    match filter {
        StatusFilter::All => {}
        StatusFilter::Pending => views.retain(|v| v.task.is_pending()),
        StatusFilter::Completed => views.retain(|v| v.task.completed),
    }
    views
}

/// Stable sort, high priority first
pub fn sort_by_priority(views: &mut [TaskView]) {
    views.sort_by_key(|v| v.task.priority.rank());
}

/// Stable sort, earliest due date first, undated tasks last
pub fn sort_by_due_date(views: &mut [TaskView]) {
    views.sort_by_key(|v| (v.task.due_date.is_none(), v.task.due_date));
}

/// Progress summary shown above a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    /// Completed share rounded to the nearest whole percent
    pub percentage: u8,
}

pub fn completion_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> CompletionStats {
    let (total, completed) = tasks
        .into_iter()
        .fold((0usize, 0usize), |(total, done), t| {
            (total + 1, done + usize::from(t.completed))
        });
    let percentage = if total == 0 {
        0
    } else {
        // Round half up in integer arithmetic
        ((completed * 200 + total) / (total * 2)) as u8
    };

    CompletionStats {
        total,
        completed,
        percentage,
    }
}

/// All derived views for one snapshot and calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedViews {
    pub all: Vec<TaskView>,
    pub today: Vec<TaskView>,
    pub important: Vec<TaskView>,
    pub overdue: Vec<TaskView>,
    pub pending: Vec<TaskView>,
    pub completed: Vec<TaskView>,
    pub stats: CompletionStats,
}

impl DerivedViews {
    pub fn compute<Tz: TimeZone>(categories: &[Category], now: &DateTime<Tz>) -> Self {
        Self {
            all: all_tasks(categories),
            today: today(categories, now),
            important: important(categories),
            overdue: overdue(categories, now),
            pending: pending(categories),
            completed: completed(categories),
            stats: completion_stats(categories.iter().flat_map(|c| &c.tasks)),
        }
    }
}

/// Memoizes `DerivedViews` by snapshot identity and calendar day
#[derive(Default)]
pub struct ViewCache {
    entry: Option<(Snapshot, NaiveDate, FixedOffset, Rc<DerivedViews>)>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views for `snapshot` at `now`, recomputed only when either changed
    pub fn get<Tz: TimeZone>(&mut self, snapshot: &Snapshot, now: &DateTime<Tz>) -> Rc<DerivedViews> {
        let day = now.date_naive();
        let offset = now.offset().fix();

        if let Some((cached, cached_day, cached_offset, views)) = &self.entry
            && cached.same_as(snapshot)
            && *cached_day == day
            && *cached_offset == offset
        {
            return Rc::clone(views);
        }

        let views = Rc::new(DerivedViews::compute(snapshot, now));
        self.entry = Some((snapshot.clone(), day, offset, Rc::clone(&views)));
        views
    }
}
