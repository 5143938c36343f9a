mod auth;
mod presence;
mod profile_update;
mod realtime;
