pub mod app;
pub mod cli;
pub mod client;
pub mod error;
pub mod extract;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use app::App;
pub use cli::{Cli, Commands};
pub use cli::output::OutputFormat;
pub use error::AppError;
pub use models::Config;
