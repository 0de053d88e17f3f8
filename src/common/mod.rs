mod config;
mod error;
mod models;

pub(crate) use self::config::*;
pub use error::*;
pub use models::*;
