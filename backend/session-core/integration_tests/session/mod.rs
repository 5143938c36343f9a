mod login_logout;
mod presence;
mod profile;
mod restore;
mod stale;
