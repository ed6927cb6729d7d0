//! Recursive traversal of descriptor graphs and their data.
//!
//! Two families live here:
//!
//! - [`foreach_occurrence`] walks one structure and reports every place a
//!   named element or dimension occurs, either cell by cell or as whole
//!   arrays and lists.
//! - [`traverse_and_process`] walks two structures of nominally the same
//!   format side by side and reports the points where they diverge,
//!   without descending below them.

mod divergence;
mod occurrence;

pub use divergence::{traverse_and_process, Divergence};
pub use occurrence::{foreach_occurrence, Occurrence, Target};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
