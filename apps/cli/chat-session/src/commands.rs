//! Parsing of lines typed at the prompt.

use crate::error::AppError;

/// Separates the full name from an optional bio in `signup`.
const BIO_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignUp {
        email: String,
        password: String,
        full_name: String,
        bio: Option<String>,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    SetName(String),
    SetBio(String),
    SetAvatar(String),
    WhoAmI,
    Online,
    Status,
    Reconnect,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`AppError::Command`] with a usage hint for unknown commands or
/// missing arguments.
pub fn parse(line: &str) -> Result<Option<Command>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "signup" | "register" => parse_sign_up(rest)?,
        "login" => {
            let (email, password) = email_and_password(rest, "login <email> <password>")?;
            Command::Login { email, password }
        }
        "logout" => Command::Logout,
        "name" => Command::SetName(required(rest, "name <full name>")?),
        "bio" => Command::SetBio(required(rest, "bio <text>")?),
        "avatar" => Command::SetAvatar(required(rest, "avatar <image url or data uri>")?),
        "whoami" | "me" => Command::WhoAmI,
        "online" => Command::Online,
        "status" => Command::Status,
        "reconnect" => Command::Reconnect,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(AppError::command(format!(
                "Unknown command '{other}'. Type 'help' for a list of commands."
            )));
        }
    };

    Ok(Some(command))
}

fn parse_sign_up(rest: &str) -> Result<Command, AppError> {
    const USAGE: &str = "signup <email> <password> <full name> [| <bio>]";

    let (credentials, bio) = match rest.split_once(BIO_SEPARATOR) {
        Some((head, bio)) => (head.trim(), Some(bio.trim().to_string())),
        None => (rest, None),
    };

    let mut parts = credentials.splitn(3, char::is_whitespace);
    let (Some(email), Some(password), Some(full_name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(usage(USAGE));
    };

    let full_name = full_name.trim();
    if email.is_empty() || password.is_empty() || full_name.is_empty() {
        return Err(usage(USAGE));
    }

    Ok(Command::SignUp {
        email: email.to_string(),
        password: password.to_string(),
        full_name: full_name.to_string(),
        bio: bio.filter(|b| !b.is_empty()),
    })
}

fn email_and_password(rest: &str, usage_text: &str) -> Result<(String, String), AppError> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(email), Some(password), None) => Ok((email.to_string(), password.to_string())),
        _ => Err(usage(usage_text)),
    }
}

fn required(rest: &str, usage_text: &str) -> Result<String, AppError> {
    if rest.is_empty() {
        Err(usage(usage_text))
    } else {
        Ok(rest.to_string())
    }
}

#[track_caller]
fn usage(text: &str) -> AppError {
    AppError::command(format!("Usage: {text}"))
}
