pub mod column;
pub mod config;
pub mod note;
pub mod target;

pub use column::*;
pub use config::*;
pub use note::*;
pub use target::*;
