pub mod cloudflare;
pub mod common;
pub mod config;
pub mod ipecho;
pub mod service;

pub use crate::config::*;
