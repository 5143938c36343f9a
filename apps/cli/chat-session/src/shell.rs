//! Prompt loop: reads commands, runs them against the session, prints results.
//!
//! Outcome notices are printed by the session's notifier; this module only
//! prints what the user asked to see (profile, online list, status).

use crate::commands::{Command, parse};
use crate::error::AppError;

use common::ErrorLocation;
use models::{AuthMode, Credentials, ModelError, ProfileUpdate, ProfileUpdateBuilder, UserProfile};
use session_core::{
    ConnectOutcome, LinkStatus, Notifier, RestoreOutcome, SessionManager, TokenStore,
};

use std::io::Write;

use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const PROMPT: &str = "> ";

pub const HELP_TEXT: &str = "\
Commands:
  signup <email> <password> <full name> [| <bio>]   create an account
  login <email> <password>                          sign in
  logout                                            sign out
  name <full name>                                  change your display name
  bio <text>                                        change your bio
  avatar <image url or data uri>                    change your profile picture
  whoami                                            show your profile
  online                                            list users online right now
  status                                            show session and connection state
  reconnect                                         reopen the realtime connection
  help                                              show this text
  quit                                              leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Start-up line describing how the restore went.
pub fn describe_restore(outcome: &RestoreOutcome) -> String {
    match outcome {
        RestoreOutcome::Restored(user) => format!("Welcome back, {}.", user.full_name),
        RestoreOutcome::Unreachable => {
            "Could not reach the server; your saved session will be checked next time.".to_string()
        }
        RestoreOutcome::NoToken | RestoreOutcome::Rejected | RestoreOutcome::Superseded => {
            "Not signed in. Type 'help' for commands.".to_string()
        }
    }
}

/// Reads lines from `input` until `quit` or end of input.
///
/// Parse errors are printed and the loop continues.
///
/// # Errors
///
/// Returns [`AppError::App`] if reading input or writing output fails.
pub async fn run<S, N, R, W>(
    session: &SessionManager<S, N>,
    input: R,
    out: &mut W,
) -> Result<(), AppError>
where
    S: TokenStore,
    N: Notifier,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{PROMPT}").and_then(|()| out.flush()).map_err(output_error)?;

        let Some(line) = lines.next_line().await.map_err(|e| AppError::App {
            message: format!("Failed to read input: {e}"),
            location: ErrorLocation::caller(),
        })?
        else {
            debug!("End of input");
            writeln!(out).map_err(output_error)?;
            return Ok(());
        };

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e.user_message()).map_err(output_error)?;
                continue;
            }
        };

        if execute(session, command, out).await? == Flow::Quit {
            return Ok(());
        }
    }
}

/// Runs one command.
///
/// Invalid profile input is printed and the session is left untouched.
///
/// # Errors
///
/// Returns [`AppError::App`] if writing output fails.
pub async fn execute<S, N, W>(
    session: &SessionManager<S, N>,
    command: Command,
    out: &mut W,
) -> Result<Flow, AppError>
where
    S: TokenStore,
    N: Notifier,
    W: Write,
{
    match command {
        Command::SignUp {
            email,
            password,
            full_name,
            bio,
        } => {
            let mut credentials = Credentials::sign_up(email, password, full_name);
            if let Some(bio) = bio {
                credentials = credentials.with_bio(bio);
            }
            session.login(AuthMode::SignUp, &credentials).await;
        }
        Command::Login { email, password } => {
            session
                .login(AuthMode::Login, &Credentials::login(email, password))
                .await;
        }
        Command::Logout => {
            session.logout().await;
        }
        Command::SetName(name) => {
            update_profile(session, ProfileUpdate::builder().with_full_name(name), out).await?;
        }
        Command::SetBio(bio) => {
            update_profile(session, ProfileUpdate::builder().with_bio(bio), out).await?;
        }
        Command::SetAvatar(picture) => {
            update_profile(session, ProfileUpdate::builder().with_profile_pic(picture), out)
                .await?;
        }
        Command::WhoAmI => {
            let text = match session.current_user().await {
                Some(user) => describe_user(&user),
                None => "Not signed in.".to_string(),
            };
            writeln!(out, "{text}").map_err(output_error)?;
        }
        Command::Online => {
            let me = session.current_user().await.map(|u| u.id);
            let online = session.online_users().await;
            let others: Vec<_> = online.iter().filter(|id| Some(*id) != me.as_ref()).collect();

            if others.is_empty() {
                writeln!(out, "Nobody else is online.").map_err(output_error)?;
            } else {
                writeln!(out, "Online ({}):", others.len()).map_err(output_error)?;
                for id in others {
                    writeln!(out, "  {id}").map_err(output_error)?;
                }
            }
        }
        Command::Status => {
            let snapshot = session.snapshot().await;
            let account = match &snapshot.user {
                Some(user) if snapshot.is_authenticated() => format!("signed in as {}", user.email),
                _ => "signed out".to_string(),
            };
            let link = match session.realtime_status().await {
                LinkStatus::Disconnected => "disconnected",
                LinkStatus::Connecting(_) => "connecting",
                LinkStatus::Connected(_) => "connected",
            };
            writeln!(out, "Session: {account}; realtime: {link}").map_err(output_error)?;
        }
        Command::Reconnect => {
            let text = match session.reconnect_realtime().await {
                Ok(ConnectOutcome::Opened) => "Realtime connection opened.".to_string(),
                Ok(ConnectOutcome::AlreadyOpen) => {
                    "Realtime connection is already open.".to_string()
                }
                Ok(ConnectOutcome::Skipped) => "Not signed in.".to_string(),
                Ok(ConnectOutcome::Superseded) => {
                    "Session changed while connecting; not reconnected.".to_string()
                }
                Err(e) => {
                    warn!("Reconnect failed: {e}");
                    "Could not reach the realtime server.".to_string()
                }
            };
            writeln!(out, "{text}").map_err(output_error)?;
        }
        Command::Help => {
            writeln!(out, "{HELP_TEXT}").map_err(output_error)?;
        }
        Command::Quit => {
            info!("Quit requested");
            return Ok(Flow::Quit);
        }
    }

    Ok(Flow::Continue)
}

fn describe_user(user: &UserProfile) -> String {
    let mut text = format!("{} <{}> ({})", user.full_name, user.email, user.id);
    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        text.push_str(&format!("\nBio: {bio}"));
    }
    if let Some(picture) = user.profile_pic.as_deref().filter(|p| !p.is_empty()) {
        text.push_str(&format!("\nPicture: {picture}"));
    }
    text
}

async fn update_profile<S, N, W>(
    session: &SessionManager<S, N>,
    builder: ProfileUpdateBuilder,
    out: &mut W,
) -> Result<(), AppError>
where
    S: TokenStore,
    N: Notifier,
    W: Write,
{
    match build_update(builder) {
        Ok(update) => {
            session.update_profile(&update).await;
        }
        Err(e) => {
            debug!("Profile update refused locally: {e}");
            writeln!(out, "{}", e.user_message()).map_err(output_error)?;
        }
    }
    Ok(())
}

fn build_update(builder: ProfileUpdateBuilder) -> Result<ProfileUpdate, AppError> {
    builder.build().map_err(|e| match e {
        ModelError::Validation { message, .. } => AppError::command(message),
    })
}

#[track_caller]
fn output_error(error: std::io::Error) -> AppError {
    AppError::App {
        message: format!("Failed to write output: {error}"),
        location: ErrorLocation::caller(),
    }
}
