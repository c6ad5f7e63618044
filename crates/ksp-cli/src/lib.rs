//! CLI library components for Kickstarter success prediction.

pub mod commands;
pub mod logging;
