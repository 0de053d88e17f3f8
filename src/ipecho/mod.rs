mod models;
mod resolver;

pub use resolver::*;
