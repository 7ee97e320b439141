pub mod app;
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod submission;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
