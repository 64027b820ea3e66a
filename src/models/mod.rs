// Data models

pub mod progress;
pub mod workout;

pub use progress::*;
pub use workout::*;
