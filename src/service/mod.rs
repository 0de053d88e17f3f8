mod scheduler;
mod updater;

pub use scheduler::*;
pub use updater::*;
