//! Task management commands.
//!
//! - `missions task add <email> <title> <description>` - Add a task
//! - `missions task list <email>` - List a user's tasks
//! - `missions task delete <email> <id>` - Delete one task

use crate::cli::TaskCommands;
use crate::cli::commands::open_storage;
use crate::cli::prompt::Prompter;
use crate::error::Result;
use crate::model::{Outcome, Task};
use crate::storage::SqliteStorage;
use crate::validate::parse_task_id;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct TaskListOutput<'a> {
    email: &'a str,
    tasks: Vec<Task>,
    count: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    deleted: bool,
    id: i64,
}

/// Execute a task command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the operation fails.
pub fn execute(command: &TaskCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    match command {
        TaskCommands::Add {
            email,
            title,
            description,
        } => execute_add(&mut storage, email, title, description, json),
        TaskCommands::List { email } => execute_list(&storage, email, json),
        TaskCommands::Delete { email, id, yes } => {
            execute_delete(&mut storage, email, id, *yes, json)
        }
    }
}

fn execute_add(
    storage: &mut SqliteStorage,
    email: &str,
    title: &str,
    description: &str,
    json: bool,
) -> Result<()> {
    let task = storage.create_task(email, title, description)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!(
            "{} {} : {}",
            "Task added:".green(),
            task.display_title(),
            task.display_description()
        );
        println!("  ID: {}", task.id);
    }

    Ok(())
}

fn execute_list(storage: &SqliteStorage, email: &str, json: bool) -> Result<()> {
    if json {
        let tasks = storage.list_tasks_for_user(email)?;
        let output = TaskListOutput {
            email,
            count: tasks.len(),
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let count = storage.each_task_for_user(email, |task| {
        println!("[{}] {}", task.id, task.display_title().bold());
        println!("     {}", task.display_description());
        Ok(())
    })?;

    if count == 0 {
        println!("No tasks for {email}.");
    }

    Ok(())
}

fn execute_delete(
    storage: &mut SqliteStorage,
    email: &str,
    raw_id: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let id = parse_task_id(raw_id)?;

    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stderr());

    let outcome = storage.delete_task(email, id, |task| {
        if yes {
            return Ok(true);
        }
        prompter.confirm(&format!(
            "Are you sure you want to delete task {} ({})?",
            task.id,
            task.display_title()
        ))
    })?;

    let deleted = matches!(outcome, Outcome::Applied(_));

    if json {
        let output = DeleteOutput { deleted, id };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if deleted {
        println!("{} {id}", "Deleted task:".green());
    } else {
        println!("Nothing deleted.");
        println!("Use --yes to skip confirmation.");
    }

    Ok(())
}
