//! MailChimp Bridge - REST facade over the MailChimp Marketing API
//!
//! Keeps local copies of lists and members in SQLite and mirrors every
//! create/update/delete to MailChimp.
//!
//! ```text
//! mailchimp-bridge/src/
//! ├── api/        # axum routes and handlers
//! ├── services/   # local/remote consistency procedure
//! ├── db/         # SQLite pool, migrations, repositories
//! ├── config.rs   # environment configuration
//! ├── state.rs    # shared application state
//! └── error.rs    # service error -> AppError bridge
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use logger::init_logger_with_file;
pub use state::AppState;
