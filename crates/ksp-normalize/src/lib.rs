//! Campaign normalization and dataset assembly.
//!
//! Turns raw Kickstarter rows into canonical clean records and collects many
//! batches into one deduplicated, labelled training table.
//!
//! # Example
//!
//! ```ignore
//! use ksp_normalize::{assemble, normalize};
//!
//! let clean = normalize(&batch)?;
//! let table = assemble(&batches)?;
//! println!("{} training rows", table.len());
//! ```
//!
//! # Behavior
//!
//! - **Fail fast**: a malformed category, an out-of-range timestamp or a
//!   deadline before the launch date fails the whole batch
//! - **Sentinel sub-category**: campaigns without a sub-category get `"None"`
//! - **Date-level duration**: `days` is the difference of UTC calendar dates

mod assembler;
mod error;
mod normalizer;

pub mod category;
pub mod duration;

pub use assembler::{assemble, assemble_clean};
pub use error::{AssembleError, NormalizeError, Result};
pub use normalizer::{TERMINAL_STATES, filter_terminal_states, normalize, normalize_record};
