//! Application-level orchestration utilities.
//!
//! This module owns the request lifecycle task used by the TUI and the
//! post-request step that turns a finished form into a report. UI/CLI layers
//! call into this module to keep responsibilities separated.

#[cfg_attr(not(feature = "tui"), allow(dead_code))]
mod controller;
mod post_process;

#[cfg(feature = "tui")]
pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use post_process::build_report;
