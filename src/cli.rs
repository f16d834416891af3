use clap::{Parser, Subcommand};

use crate::auth::{Auth, Session};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::tasks::project::{is_due_today, is_overdue, project, stats};
use crate::tasks::types::{
    parse_deadline, Priority, PriorityFilter, SortBy, Status, StatusFilter, TaskDraft, TaskFilters,
    TaskPatch,
};
use crate::tasks::TaskEngine;
use time::OffsetDateTime;

#[derive(Parser)]
#[command(name = "taskflow", about = "Single-user task tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Update name and email
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Change the account password
    Passwd {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Add a task
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Deadline date, YYYY-MM-DD
        #[arg(long)]
        deadline: String,
    },
    /// List tasks, filtered and sorted
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
        #[arg(long, default_value = "deadline")]
        sort: SortBy,
    },
    /// Edit fields of a task; omitted flags keep their values
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Toggle a task between completed and incomplete
    Done { id: String },
    /// Delete a task
    Rm { id: String },
}

/// The CLI counterpart of the original route guard: commands that operate on
/// tasks or the profile demand a session up front.
fn require_session(store: &mut dyn Store) -> Result<Session> {
    Auth::new(store)
        .current_session()?
        .ok_or(Error::NotAuthenticated)
}

pub fn run(cli: Cli, store: &mut dyn Store) -> Result<()> {
    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let session = Auth::new(store).register(&name, &email, &password)?;
            println!("registered and logged in as {}", session.user.email);
        }
        Command::Login { email, password } => {
            let session = Auth::new(store).login(&email, &password)?;
            println!("logged in as {}", session.user.email);
        }
        Command::Logout => {
            Auth::new(store).logout()?;
            println!("logged out");
        }
        Command::Whoami => {
            let session = require_session(store)?;
            println!(
                "{} <{}> (id {})",
                session.user.name, session.user.email, session.user.id
            );
        }
        Command::Profile { name, email } => {
            require_session(store)?;
            let profile = Auth::new(store).update_profile(&name, &email)?;
            println!("profile updated: {} <{}>", profile.name, profile.email);
        }
        Command::Passwd { current, new } => {
            require_session(store)?;
            Auth::new(store).change_password(&current, &new)?;
            println!("password changed");
        }
        Command::Add {
            title,
            description,
            priority,
            deadline,
        } => {
            let session = require_session(store)?;
            let deadline = parse_deadline(&deadline)?;
            let task = TaskEngine::new(store, &session).create(TaskDraft {
                title,
                description,
                priority,
                status: Status::Incomplete,
                deadline,
            })?;
            println!("added task {} ({})", task.id, task.title);
        }
        Command::List {
            status,
            priority,
            sort,
        } => {
            let session = require_session(store)?;
            let tasks = TaskEngine::new(store, &session).list()?;
            let filters = TaskFilters {
                status,
                priority,
                sort_by: sort,
            };
            let now = OffsetDateTime::now_utc();
            for task in project(&tasks, &filters) {
                let check = match task.status {
                    Status::Completed => "x",
                    Status::Incomplete => " ",
                };
                let marker = if is_overdue(&task, now) {
                    " OVERDUE"
                } else if is_due_today(&task, now) {
                    " due today"
                } else {
                    ""
                };
                println!(
                    "[{}] {}  {}  {} (due {}){}",
                    check,
                    task.id,
                    task.priority,
                    task.title,
                    task.deadline.date(),
                    marker
                );
            }
            let s = stats(&tasks, now);
            println!(
                "{} total, {} completed, {} remaining, {} overdue",
                s.total, s.completed, s.incomplete, s.overdue
            );
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            status,
            deadline,
        } => {
            let session = require_session(store)?;
            let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
            let task = TaskEngine::new(store, &session).update(
                &id,
                TaskPatch {
                    title,
                    description,
                    priority,
                    status,
                    deadline,
                },
            )?;
            println!("updated task {} ({})", task.id, task.title);
        }
        Command::Done { id } => {
            let session = require_session(store)?;
            let task = TaskEngine::new(store, &session).toggle_status(&id)?;
            println!("task {} is now {}", task.id, task.status);
        }
        Command::Rm { id } => {
            let session = require_session(store)?;
            TaskEngine::new(store, &session).remove(&id)?;
            println!("removed task {id}");
        }
    }
    Ok(())
}
