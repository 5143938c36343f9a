mod config;
mod realtime_endpoint;
mod session_state;
mod token_store;
