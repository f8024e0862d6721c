//! Commands accepted on the list screen.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    /// Set the form's task text.
    Task(String),
    /// Set the form's due date; empty clears it.
    Due(String),
    Done(bool),
    Submit,
    /// 1-based position in the displayed list.
    Edit(usize),
    Delete(usize),
    Cancel,
    Notices,
    Dismiss(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, type `help`")]
    Unknown(String),
    #[error("`{0}` needs a position")]
    MissingPosition(&'static str),
    #[error("`{0}` is not a position")]
    BadPosition(String),
}

pub const HELP: &str = "\
commands:
  list | refresh       fetch the list again
  task <text>          set the task text
  due [<datetime>]     set the due date (e.g. 2024-05-01T09:30); empty means now
  done | undone        set the completed flag
  submit               add the todo, or update the one being edited
  edit <n>             load item n into the form
  delete <n>           delete item n
  cancel               stop editing and clear the form
  notices              show failures since last dismissed
  dismiss <n>          dismiss notice n
  help                 show this text
  quit                 leave";

fn position(name: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingPosition(name));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadPosition(arg.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        Ok(match word.to_ascii_lowercase().as_str() {
            "list" | "ls" | "refresh" => Command::Refresh,
            "task" => Command::Task(arg.to_string()),
            "due" => Command::Due(arg.to_string()),
            "done" => Command::Done(true),
            "undone" => Command::Done(false),
            "submit" | "save" => Command::Submit,
            "edit" => Command::Edit(position("edit", arg)?),
            "delete" | "rm" => Command::Delete(position("delete", arg)?),
            "cancel" => Command::Cancel,
            "notices" => Command::Notices,
            "dismiss" => Command::Dismiss(position("dismiss", arg)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        })
    }
}
