use chat_session::error::AppError;
use chat_session::logger::initialize as LoggerInitialize;
use chat_session::notifier::TerminalNotifier;
use chat_session::paths::AppPaths;
use chat_session::shell;

use session_core::{ClientConfig, CoreError, FileTokenStore, SessionManager};

use std::io::stdout;
use std::process::ExitCode;

use log::{error, info};
use tokio::io::{BufReader, stdin};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let paths = AppPaths::from_platform();
    paths.ensure()?;

    // Initialize logger FIRST
    LoggerInitialize(&paths.log_dir)?;

    info!("chat-session starting");
    info!("Config directory: {}", paths.config_dir.display());
    info!("Log directory: {}", paths.log_dir.display());

    let mut config = ClientConfig::load(&paths.config_dir).map_err(CoreError::from)?;
    config.apply_env_overrides().map_err(CoreError::from)?;

    let store = FileTokenStore::new(&paths.config_dir, &config.storage.token_file);
    let session = SessionManager::new(&config, store, TerminalNotifier)?;

    let restored = session.restore().await;
    info!("Restore finished: {restored:?}");
    println!("{}", shell::describe_restore(&restored));

    let mut out = stdout();
    let result = shell::run(&session, BufReader::new(stdin()), &mut out).await;

    session.shutdown().await;
    info!("chat-session exiting");

    result
}
