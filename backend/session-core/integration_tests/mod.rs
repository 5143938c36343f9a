mod auth_client;
mod helpers;
mod realtime;
mod session;
