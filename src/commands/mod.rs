//! Command module for the usage meter
//!
//! One-shot output is handled directly in `main`; commands that own a run loop live
//! here.

pub mod watch;

pub use watch::{run_watch, run_watch_until};
