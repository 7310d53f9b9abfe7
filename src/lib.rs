//! Core library for the agenda-tools command line applications.
//!
//! Records live in a SQLite database managed by [`store`], with the record
//! types in [`model`]. The sheet layouts and row schemas used for Excel
//! exchange sit in [`flatten`], the workbook adapters in [`io`], and the
//! orchestration of exports and imports under [`sync`]. [`calendar`] renders
//! month grids and [`shell`] drives the interactive menus.

pub mod calendar;
pub mod config;
pub mod error;
pub mod flatten;
pub mod io;
pub mod logging;
pub mod model;
pub mod shell;
pub mod store;
pub mod sync;

pub use error::{Result, ToolError};
