//! Utilities shared by the library and the command line
//!
//! - [`logging`] - stderr sink for the `log` facade
//! - [`progress`] - progress bars that compile away without the `progress` feature

pub mod logging;
pub mod progress;
