//! Stack growth guard for recursive descent.
//!
//! Packet descriptors nest arbitrarily: a packet may hold an array whose
//! element packet holds a list whose element packet holds another array,
//! and so on. Every algorithm in the engine (descriptor copy, data copy,
//! name resolution, traversal) walks that tree recursively, so a hostile
//! or merely very deep structure could exhaust the native stack.
//!
//! Wrap each recursive step in [`ensure_sufficient_stack`]:
//!
//! ```text
//! fn copy_packet(&self, ...) -> bool {
//!     ensure_sufficient_stack(|| {
//!         // ... recurse into nested arrays and lists ...
//!     })
//! }
//! ```
//!
//! On native targets the stack is grown on demand via `stacker`; on wasm32
//! the closure is called directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm32 manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
