//! User management commands.
//!
//! - `missions user add <name> <email>` - Register a user
//! - `missions user list` - List all users
//! - `missions user update <email>` - Change name and/or email
//! - `missions user delete <email>` - Delete a user and their tasks

use crate::cli::UserCommands;
use crate::cli::commands::open_storage;
use crate::cli::prompt::Prompter;
use crate::error::{Error, Result};
use crate::model::{Outcome, User};
use crate::storage::SqliteStorage;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct UserListOutput {
    users: Vec<User>,
    count: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    deleted: bool,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tasks_removed: Option<usize>,
}

/// Execute a user command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the operation fails.
pub fn execute(command: &UserCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    match command {
        UserCommands::Add { name, email } => execute_add(&mut storage, name, email, json),
        UserCommands::List => execute_list(&storage, json),
        UserCommands::Update {
            email,
            name,
            new_email,
        } => execute_update(
            &mut storage,
            email,
            name.as_deref(),
            new_email.as_deref(),
            json,
        ),
        UserCommands::Delete { email, yes } => execute_delete(&mut storage, email, *yes, json),
    }
}

fn execute_add(storage: &mut SqliteStorage, name: &str, email: &str, json: bool) -> Result<()> {
    let user = storage.create_user(name, email)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("{} {}", "User added:".green(), user.name);
        println!("  ID:    {}", user.id);
        println!("  Email: {}", user.email);
    }

    Ok(())
}

fn execute_list(storage: &SqliteStorage, json: bool) -> Result<()> {
    if json {
        let users = storage.list_users()?;
        let output = UserListOutput {
            count: users.len(),
            users,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let count = storage.each_user(|user| {
        println!("ID:    {}", user.id);
        println!("Name:  {}", user.name);
        println!("Email: {}", user.email);
        println!();
        Ok(())
    })?;

    if count == 0 {
        println!("No users found.");
        println!("\nAdd one with: missions user add <name> <email>");
    }

    Ok(())
}

fn execute_update(
    storage: &mut SqliteStorage,
    email: &str,
    name: Option<&str>,
    new_email: Option<&str>,
    json: bool,
) -> Result<()> {
    if name.is_none() && new_email.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --name and/or --email".to_string(),
        ));
    }

    let user = storage.update_user(email, name, new_email)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("{} {}", "User updated:".green(), user.name);
        println!("  Email: {}", user.email);
    }

    Ok(())
}

fn execute_delete(storage: &mut SqliteStorage, email: &str, yes: bool, json: bool) -> Result<()> {
    // Prompts go to stderr so stdout stays parseable
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stderr());

    let outcome = storage.delete_user(email, |user| {
        if yes {
            return Ok(true);
        }
        prompter.confirm(&format!("Are you sure you want to delete: {}?", user.name))
    })?;

    let output = match outcome {
        Outcome::Applied(deleted) => DeleteOutput {
            deleted: true,
            email: deleted.user.email,
            tasks_removed: Some(deleted.tasks_removed),
        },
        Outcome::Declined => DeleteOutput {
            deleted: false,
            email: email.to_string(),
            tasks_removed: None,
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(tasks) = output.tasks_removed {
        println!("{} {}", "Deleted user:".green(), output.email);
        if tasks > 0 {
            println!("  Deleted {tasks} associated tasks");
        }
    } else {
        println!("Nothing deleted.");
        println!("Use --yes to skip confirmation.");
    }

    Ok(())
}
