//! Job-application intake service: multipart submissions with an optional
//! resume file, persisted records, listing, and read-back of stored files.

pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod uploads;

pub use routes::build_router;
pub use state::AppState;
