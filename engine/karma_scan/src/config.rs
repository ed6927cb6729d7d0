//! Scan configuration.

use karma_types::TOO_BIG;

/// Tunables shared by every scan.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanConfig {
    /// Values converted per block. Bounds working memory regardless of
    /// slice length.
    pub block_size: usize,
    /// Values at or above this are blanked.
    pub too_big: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            block_size: 1024,
            too_big: TOO_BIG,
        }
    }
}

impl ScanConfig {
    /// A block size of zero is raised to one.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    #[must_use]
    pub fn with_too_big(mut self, too_big: f64) -> Self {
        self.too_big = too_big;
        self
    }
}
