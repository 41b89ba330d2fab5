//! Interactive menu.
//!
//! The default mode when no subcommand is given. Each selection prompts
//! for its inputs, runs exactly one storage operation and prints the
//! result. Operation errors are printed and the menu comes back; only a
//! failing terminal ends the loop early.

use crate::cli::commands::open_storage;
use crate::cli::prompt::Prompter;
use crate::error::{Error, Result};
use crate::model::Outcome;
use crate::storage::SqliteStorage;
use crate::validate::parse_task_id;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddUser,
    AddTask,
    QueryUsers,
    QueryTasks,
    UpdateUser,
    DeleteUser,
    DeleteTask,
    Exit,
}

impl MenuChoice {
    /// All entries, in display order.
    pub const ALL: [Self; 8] = [
        Self::AddUser,
        Self::AddTask,
        Self::QueryUsers,
        Self::QueryTasks,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::DeleteTask,
        Self::Exit,
    ];

    /// Key the operator types to pick this entry.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AddUser => "1",
            Self::AddTask => "2",
            Self::QueryUsers => "3",
            Self::QueryTasks => "4",
            Self::UpdateUser => "5",
            Self::DeleteUser => "6",
            Self::DeleteTask => "7",
            Self::Exit => "8",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddUser => "Add User",
            Self::AddTask => "Add Task",
            Self::QueryUsers => "Query Users",
            Self::QueryTasks => "Query Tasks",
            Self::UpdateUser => "Update User",
            Self::DeleteUser => "Delete User",
            Self::DeleteTask => "Delete Task",
            Self::Exit => "Exit",
        }
    }

    /// Parse a menu selection. Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|choice| choice.key() == input)
    }
}

/// Execute the menu against stdin/stdout.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the terminal fails.
pub fn execute(db_path: Option<&PathBuf>) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    run(&mut storage, &mut prompter)
}

/// Run the menu loop until Exit or end of input.
///
/// # Errors
///
/// Returns an error only if reading or writing the terminal fails.
pub fn run<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    loop {
        print_menu(prompter.output())?;

        let Some(selection) = prompter.ask("Enter an option: ")? else {
            writeln!(prompter.output())?;
            break;
        };

        let Some(choice) = MenuChoice::from_input(&selection) else {
            writeln!(prompter.output(), "Please select a valid option.")?;
            continue;
        };

        if choice == MenuChoice::Exit {
            writeln!(prompter.output(), "Goodbye.")?;
            break;
        }

        debug!(?choice, "Menu selection");
        match dispatch(choice, storage, prompter) {
            Ok(()) => {}
            Err(Error::Io(e)) => return Err(Error::Io(e)),
            Err(e) => report(prompter.output(), &e)?,
        }
    }

    Ok(())
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\nOptions:")?;
    for choice in MenuChoice::ALL {
        writeln!(out, "{}. {}", choice.key(), choice.label())?;
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, err: &Error) -> Result<()> {
    writeln!(out, "{} {err}", "Error:".red())?;
    if let Some(hint) = err.hint() {
        writeln!(out, "  {hint}")?;
    }
    Ok(())
}

fn dispatch<R: BufRead, W: Write>(
    choice: MenuChoice,
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    match choice {
        MenuChoice::AddUser => add_user(storage, prompter),
        MenuChoice::AddTask => add_task(storage, prompter),
        MenuChoice::QueryUsers => query_users(storage, prompter),
        MenuChoice::QueryTasks => query_tasks(storage, prompter),
        MenuChoice::UpdateUser => update_user(storage, prompter),
        MenuChoice::DeleteUser => delete_user(storage, prompter),
        MenuChoice::DeleteTask => delete_task(storage, prompter),
        MenuChoice::Exit => Ok(()),
    }
}

// End of input while answering a prompt abandons the operation; the loop
// then sees end of input again and exits.

fn add_user<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(name) = prompter.ask("Enter user name: ")? else {
        return Ok(());
    };
    let Some(email) = prompter.ask("Enter email address: ")? else {
        return Ok(());
    };

    let user = storage.create_user(&name, &email)?;
    writeln!(prompter.output(), "User: {} added", user.name)?;
    Ok(())
}

fn add_task<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(email) = prompter.ask("Enter email of the user to add tasks: ")? else {
        return Ok(());
    };

    // Fail before asking for the rest
    if storage.get_user_by_email(&email)?.is_none() {
        return Err(Error::UserNotFound { email });
    }

    let Some(title) = prompter.ask("Enter the title: ")? else {
        return Ok(());
    };
    let Some(description) = prompter.ask("Enter the description: ")? else {
        return Ok(());
    };

    let task = storage.create_task(&email, &title, &description)?;
    writeln!(
        prompter.output(),
        "Added to database --> {} : {}",
        task.display_title(),
        task.display_description()
    )?;
    Ok(())
}

fn query_users<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let out = prompter.output();
    let count = storage.each_user(|user| {
        writeln!(out, "ID: {}\nName: {}\nEmail: {}", user.id, user.name, user.email)?;
        Ok(())
    })?;

    if count == 0 {
        writeln!(out, "No users yet.")?;
    }
    Ok(())
}

fn query_tasks<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(email) = prompter.ask("Enter email of the user for tasks: ")? else {
        return Ok(());
    };

    let out = prompter.output();
    let count = storage.each_task_for_user(&email, |task| {
        writeln!(
            out,
            "Task Title: {}\nTask Description: {}",
            task.display_title(),
            task.display_description()
        )?;
        Ok(())
    })?;

    if count == 0 {
        writeln!(out, "No tasks for this user.")?;
    }
    Ok(())
}

fn update_user<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(email) = prompter.ask("Enter the email of the user to update: ")? else {
        return Ok(());
    };

    let Some(current) = storage.get_user_by_email(&email)? else {
        return Err(Error::UserNotFound { email });
    };

    let Some(name) = prompter.ask(&format!(
        "Enter a new name (leave blank to keep '{}'): ",
        current.name
    ))?
    else {
        return Ok(());
    };
    let Some(new_email) = prompter.ask("Enter a new email (leave blank to stay the same): ")?
    else {
        return Ok(());
    };

    // Blank answers mean "keep"
    let name = Some(name.as_str()).filter(|s| !s.is_empty());
    let new_email = Some(new_email.as_str()).filter(|s| !s.is_empty());

    let user = storage.update_user(&email, name, new_email)?;
    writeln!(
        prompter.output(),
        "User was updated: {} <{}>",
        user.name,
        user.email
    )?;
    Ok(())
}

fn delete_user<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(email) = prompter.ask("Enter the email of the user to delete: ")? else {
        return Ok(());
    };

    let outcome = storage.delete_user(&email, |user| {
        prompter.confirm(&format!("Are you sure you want to delete: {}?", user.name))
    })?;

    match outcome {
        Outcome::Applied(deleted) => writeln!(
            prompter.output(),
            "User was deleted ({} tasks removed).",
            deleted.tasks_removed
        )?,
        Outcome::Declined => writeln!(prompter.output(), "Nothing deleted.")?,
    }
    Ok(())
}

fn delete_task<R: BufRead, W: Write>(
    storage: &mut SqliteStorage,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(email) = prompter.ask("Enter the email to show linked tasks: ")? else {
        return Ok(());
    };

    let out = prompter.output();
    let count = storage.each_task_for_user(&email, |task| {
        writeln!(out, "Task ID: {}\nTitle: {}", task.id, task.display_title())?;
        Ok(())
    })?;

    if count == 0 {
        writeln!(out, "No tasks to delete.")?;
        return Ok(());
    }

    let Some(raw_id) = prompter.ask("Enter the ID of the task to delete: ")? else {
        return Ok(());
    };
    let task_id = parse_task_id(&raw_id)?;

    let outcome = storage.delete_task(&email, task_id, |task| {
        prompter.confirm(&format!("Are you sure you want to delete: {}?", task.id))
    })?;

    match outcome {
        Outcome::Applied(_) => writeln!(prompter.output(), "Task was deleted.")?,
        Outcome::Declined => writeln!(prompter.output(), "Nothing deleted.")?,
    }
    Ok(())
}
