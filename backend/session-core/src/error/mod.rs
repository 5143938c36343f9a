pub mod api;
pub mod config;
pub mod realtime;
pub mod session;
pub mod store;

pub use api::ApiError;
pub use config::ConfigError;
pub use realtime::RealtimeError;
pub use session::SessionError;
pub use store::StoreError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Realtime(#[from] realtime::RealtimeError),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Session(#[from] session::SessionError),
}
