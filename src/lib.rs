//! Booktracker application library
//!
//! Book CRUD and read-status filtering, wired onto the booktracker kernel,
//! database, and HTTP crates.

pub mod app;
pub mod modules;

pub use app::App;
pub use modules::books;
