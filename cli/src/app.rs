//! The two screens of the terminal front end.
//!
//! Input and output are generic so tests can drive a whole session from a
//! byte buffer.

use std::io::{BufRead, Write};

use todo_core::{render_rows, ListManager, Session, SyncOutcome, TodoClient, Transport};
use tracing::info;

use crate::command::{Command, HELP};

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Prefills the first login attempt.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Read one line without its terminator. `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> anyhow::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    Ok(read_line(input)?)
}

/// Show the login screen until the service accepts the credentials.
/// Returns `false` if input ran out first.
pub fn login<T, R, W>(config: &Config, transport: &T, input: &mut R, out: &mut W) -> anyhow::Result<bool>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut session = Session::new(TodoClient::new(&config.base_url));
    let mut prefill = (config.username.clone(), config.password.clone());

    loop {
        writeln!(out, "== Login ==")?;
        if let Some(msg) = session.error_message() {
            writeln!(out, "{msg}")?;
        }

        let username = match prefill.0.take() {
            Some(u) => u,
            None => match prompt(input, out, "Username: ")? {
                Some(u) => u,
                None => return Ok(false),
            },
        };
        let password = match prefill.1.take() {
            Some(p) => p,
            None => match prompt(input, out, "Password: ")? {
                Some(p) => p,
                None => return Ok(false),
            },
        };
        session.set_username(username);
        session.set_password(password);

        let Some(request) = session.begin_submit() else {
            continue;
        };
        writeln!(out, "{}", session.submit_label())?;
        out.flush()?;
        if session.complete(transport.execute(&request)).is_ok() {
            info!("signed in");
            return Ok(true);
        }
    }
}

fn render<T: Transport, W: Write>(list: &ListManager<T>, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "== Todos ==")?;
    let rows = render_rows(list.items());
    if rows.is_empty() {
        writeln!(out, "  (nothing to do)")?;
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }

    let form = list.form();
    let due = if form.due_date.is_empty() { "now" } else { form.due_date.as_str() };
    let done = if form.completed { "yes" } else { "no" };
    writeln!(
        out,
        "-- form: task={:?} due={due} completed={done} [{}]",
        form.task,
        list.submit_label()
    )?;

    let notices = list.notices();
    if !notices.is_empty() {
        writeln!(out, "!! {} notice(s), type `notices` to read", notices.len())?;
    }
    Ok(())
}

fn report<W: Write>(outcome: &SyncOutcome, out: &mut W) -> std::io::Result<()> {
    if outcome.mutation.is_err() {
        writeln!(out, "!! {} did not go through", outcome.kind)?;
    }
    if outcome.refresh.is_err() {
        writeln!(out, "!! list may be out of date")?;
    }
    Ok(())
}

/// Run the list screen until `quit` or end of input.
pub fn todos<T, R, W>(config: &Config, transport: &T, input: &mut R, out: &mut W) -> anyhow::Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut list = ListManager::new(TodoClient::new(&config.base_url), transport);
    let _ = list.activate();
    render(&list, out)?;

    while let Some(line) = prompt(input, out, "> ")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Refresh => {
                let _ = list.refresh();
            }
            Command::Task(text) => list.form_mut().task = text,
            Command::Due(due) => list.form_mut().due_date = due,
            Command::Done(done) => list.form_mut().completed = done,
            Command::Submit => match list.submit() {
                Ok(outcome) => report(&outcome, out)?,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
            Command::Edit(n) => match list.items().get(n - 1).cloned() {
                Some(item) => list.begin_edit(&item),
                None => {
                    writeln!(out, "no item {n}")?;
                    continue;
                }
            },
            Command::Delete(n) => match list.items().get(n - 1).map(|item| item.id.clone()) {
                Some(id) => {
                    let outcome = list.delete(&id);
                    report(&outcome, out)?;
                }
                None => {
                    writeln!(out, "no item {n}")?;
                    continue;
                }
            },
            Command::Cancel => list.cancel_edit(),
            Command::Notices => {
                if list.notices().is_empty() {
                    writeln!(out, "no notices")?;
                }
                for (i, notice) in list.notices().iter().enumerate() {
                    if notice.count > 1 {
                        writeln!(out, "{:>3}. {} (x{})", i + 1, notice.message, notice.count)?;
                    } else {
                        writeln!(out, "{:>3}. {}", i + 1, notice.message)?;
                    }
                }
                continue;
            }
            Command::Dismiss(n) => {
                if list.dismiss_notice(n - 1).is_none() {
                    writeln!(out, "no notice {n}")?;
                }
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        }
        render(&list, out)?;
    }
    Ok(())
}

/// Login, then the list.
pub fn run<T, R, W>(config: &Config, transport: &T, input: &mut R, out: &mut W) -> anyhow::Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    if login(config, transport, input, out)? {
        todos(config, transport, input, out)?;
    }
    Ok(())
}
