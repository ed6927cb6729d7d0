//! Karma Scan - streaming aggregates over structure data.
//!
//! Every scan reads values of one numeric element type from a byte image at
//! caller-supplied byte offsets, converts them to `f64` a block at a time,
//! drops blanked values (at or above the too-big sentinel) and feeds the
//! rest into an accumulator. Accumulators are never reset by a scan, so
//! one accumulator can gather several slices.
//!
//! - [`Scanner`]: the scan routines, configured by [`ScanConfig`]
//! - [`ComplexConversion`]: how complex values become one real number
//! - [`Extremes`], [`Histogram`], [`Stats`]: accumulators

mod accumulate;
mod config;
mod convert;
mod error;
mod scanner;

pub use accumulate::{Extremes, Histogram, Stats};
pub use config::ScanConfig;
pub use convert::ComplexConversion;
pub use error::{Result, ScanError};
pub use scanner::Scanner;
