mod commands;
mod logger;
mod notifier;
mod shell;
