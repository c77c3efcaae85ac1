//! toodo - command-line front end
//!
//! Drives the store against the on-disk key-value storage. The library in
//! `toodo` does the actual work.

use anyhow::{Result, bail};
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toodo::selectors::{self, StatusFilter};
use toodo::{Config, FileStore, Store, formatting, validation};
use tracing_subscriber::EnvFilter;

/// toodo - organize tasks into categories; order decides priority
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the persisted state (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every category and its tasks in order
    List {
        /// Hide task descriptions
        #[arg(long)]
        brief: bool,
    },
    /// Create an empty category
    AddCategory {
        name: String,
        #[arg(long, default_value = "#6C63FF")]
        color: String,
        #[arg(long, default_value = "📁")]
        icon: String,
    },
    /// Delete a category and all of its tasks
    RemoveCategory { category_id: String },
    /// Add a task to the end of a category
    Add {
        category_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a task
    Remove { category_id: String, task_id: String },
    /// Mark a task done, or pending again
    Toggle { category_id: String, task_id: String },
    /// Move a task into the slot of another task and re-infer priorities
    Reorder {
        category_id: String,
        from_task_id: String,
        to_task_id: String,
    },
    /// Set a task's priority by hand
    Priority {
        category_id: String,
        task_id: String,
        priority: String,
    },
    /// Show a derived view
    View {
        #[arg(value_enum)]
        view: View,
        #[arg(long, default_value = "all")]
        filter: String,
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// Show completion statistics
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum View {
    Today,
    Important,
    Overdue,
    Pending,
    Completed,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortKey {
    Priority,
    Due,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(store: &mut Store, command: Command) -> Result<String> {
    let output = match command {
        Command::List { brief } => formatting::format_categories(&store.list_categories(), brief),
        Command::AddCategory { name, color, icon } => {
            let color = validation::parse_color(&color)?;
            let id = store.add_category(&name, color, &icon)?;
            format!("Category created with ID: {}", id)
        }
        Command::RemoveCategory { category_id } => {
            store.remove_category(&category_id);
            format!("Category {} removed", category_id)
        }
        Command::Add {
            category_id,
            title,
            description,
            priority,
            due,
        } => {
            let priority = validation::parse_priority(&priority)?;
            let due = due
                .map(|d| validation::parse_due_date(&d, &Local))
                .transpose()?;
            let id = store.add_task(&category_id, &title, &description, priority, due)?;
            format!("Task created with ID: {}", id)
        }
        Command::Remove {
            category_id,
            task_id,
        } => {
            store.remove_task(&category_id, &task_id);
            format!("Task {} removed", task_id)
        }
        Command::Toggle {
            category_id,
            task_id,
        } => {
            store.toggle_task_completion(&category_id, &task_id);
            let snapshot = store.list_categories();
            match snapshot.find_task(&task_id) {
                Some((_, task)) if task.completed => format!("Task {} completed", task_id),
                Some(_) => format!("Task {} marked pending", task_id),
                None => bail!("Task {} not found", task_id),
            }
        }
        Command::Reorder {
            category_id,
            from_task_id,
            to_task_id,
        } => {
            store.reorder(&category_id, &from_task_id, &to_task_id)?;
            let snapshot = store.list_categories();
            match snapshot.find_category(&category_id) {
                Some(category) => formatting::format_categories(std::slice::from_ref(category), true),
                None => String::new(),
            }
        }
        Command::Priority {
            category_id,
            task_id,
            priority,
        } => {
            let priority = validation::parse_priority(&priority)?;
            store.update_task_priority(&category_id, &task_id, priority)?;
            format!("Task {} priority set to {}", task_id, priority)
        }
        Command::View { view, filter, sort } => {
            let filter: StatusFilter = filter.parse().map_err(anyhow::Error::msg)?;
            let snapshot = store.list_categories();
            let now = Local::now();
            let views = match view {
                View::Today => selectors::today(&snapshot, &now),
                View::Important => selectors::important(&snapshot),
                View::Overdue => selectors::overdue(&snapshot, &now),
                View::Pending => selectors::pending(&snapshot),
                View::Completed => selectors::completed(&snapshot),
            };
            let mut views = selectors::filter_status(views, filter);
            match sort {
                Some(SortKey::Priority) => selectors::sort_by_priority(&mut views),
                Some(SortKey::Due) => selectors::sort_by_due_date(&mut views),
                None => {}
            }
            formatting::format_task_views(&views, false)
        }
        Command::Stats => {
            let snapshot = store.list_categories();
            let stats = selectors::completion_stats(snapshot.iter().flat_map(|c| &c.tasks));
            formatting::format_stats(&stats)
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    init_logging(&config);

    let mut store = Store::open(FileStore::new(config.resolve_data_dir()?));
    let output = run(&mut store, args.command)?;
    println!("{}", output);
    Ok(())
}
