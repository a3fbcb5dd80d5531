pub mod api;
pub mod board;
pub mod cli;
pub mod io;
pub mod model;
pub mod tui;
