pub mod config;
pub mod error;
pub mod types;

pub use config::HydroConfig;
pub use error::{HydroError, Result};
pub use types::*;
