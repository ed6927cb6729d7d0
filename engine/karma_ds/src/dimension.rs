//! Dimension descriptors.
//!
//! A dimension has a name, a length and a mapping from index to world
//! coordinate. Regular dimensions map linearly between a first and last
//! coordinate; random dimensions carry one explicit coordinate per index.

use crate::{DsError, Result};

/// Which neighbouring index to pick when a coordinate falls between two.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SearchBias {
    /// Index at or below the coordinate.
    Lower,
    /// Index at or above the coordinate.
    Upper,
    /// Nearest index.
    Closest,
}

/// One axis of an array.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionDescriptor {
    name: String,
    length: usize,
    first_coord: f64,
    last_coord: f64,
    minimum: f64,
    maximum: f64,
    /// Explicit coordinates; `None` for a regular dimension.
    coordinates: Option<Vec<f64>>,
}

impl DimensionDescriptor {
    /// Allocate a dimension spanning `first..=last`.
    ///
    /// When `regular` is false the linear coordinates are materialised into
    /// an explicit table, which callers may then edit with
    /// [`coordinates_mut`](Self::coordinates_mut).
    pub fn new(
        name: impl Into<String>,
        length: usize,
        first: f64,
        last: f64,
        regular: bool,
    ) -> Result<Self> {
        let name = name.into();
        if length == 0 {
            return Err(DsError::EmptyDimension(name));
        }
        let mut dim = Self {
            name,
            length,
            first_coord: first,
            last_coord: last,
            minimum: first.min(last),
            maximum: first.max(last),
            coordinates: None,
        };
        if !regular {
            let coords = (0..length).map(|i| dim.coordinate(i)).collect();
            dim.coordinates = Some(coords);
        }
        Ok(dim)
    }

    /// Linear dimension.
    pub fn regular(name: impl Into<String>, length: usize, first: f64, last: f64) -> Result<Self> {
        Self::new(name, length, first, last, true)
    }

    /// Dimension with explicit coordinates. Monotonicity is not required.
    pub fn random(name: impl Into<String>, coordinates: Vec<f64>) -> Result<Self> {
        let name = name.into();
        let (Some(&first), Some(&last)) = (coordinates.first(), coordinates.last()) else {
            return Err(DsError::EmptyDimension(name));
        };
        let mut dim = Self {
            name,
            length: coordinates.len(),
            first_coord: first,
            last_coord: last,
            minimum: first,
            maximum: first,
            coordinates: Some(coordinates),
        };
        dim.recompute_extremes();
        Ok(dim)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn first_coord(&self) -> f64 {
        self.first_coord
    }

    #[inline]
    pub fn last_coord(&self) -> f64 {
        self.last_coord
    }

    #[inline]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[inline]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[inline]
    pub fn is_regular(&self) -> bool {
        self.coordinates.is_none()
    }

    /// Explicit coordinate table of a random dimension.
    #[inline]
    pub fn coordinates(&self) -> Option<&[f64]> {
        self.coordinates.as_deref()
    }

    /// Edit the coordinate table of a random dimension.
    ///
    /// The cached minimum and maximum are refreshed when `f` returns.
    pub fn coordinates_mut<R>(&mut self, f: impl FnOnce(&mut [f64]) -> R) -> Option<R> {
        let coords = self.coordinates.as_mut()?;
        let result = f(coords);
        self.recompute_extremes();
        Some(result)
    }

    fn recompute_extremes(&mut self) {
        if let Some(coords) = &self.coordinates {
            self.minimum = coords.iter().copied().fold(f64::INFINITY, f64::min);
            self.maximum = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            self.first_coord = coords[0];
            self.last_coord = coords[coords.len() - 1];
        }
    }

    /// World coordinate of `index`.
    ///
    /// # Panics
    ///
    /// If `index >= self.length()`.
    pub fn coordinate(&self, index: usize) -> f64 {
        assert!(index < self.length, "coordinate index {index} out of range");
        if let Some(coords) = &self.coordinates {
            return coords[index];
        }
        if self.length == 1 {
            return self.first_coord;
        }
        let step = (self.last_coord - self.first_coord) / (self.length - 1) as f64;
        self.first_coord + index as f64 * step
    }

    /// Index whose coordinate best matches `coord`, clamped to the
    /// dimension.
    ///
    /// For random dimensions [`SearchBias::Lower`] and
    /// [`SearchBias::Upper`] assume ascending coordinates.
    pub fn coord_index(&self, coord: f64, bias: SearchBias) -> usize {
        let last = self.length - 1;
        if let Some(coords) = &self.coordinates {
            return match bias {
                SearchBias::Closest => coords
                    .iter()
                    .enumerate()
                    .min_by(|a, b| (a.1 - coord).abs().total_cmp(&(b.1 - coord).abs()))
                    .map_or(0, |(i, _)| i),
                SearchBias::Lower => coords.iter().rposition(|&c| c <= coord).unwrap_or(0),
                SearchBias::Upper => coords.iter().position(|&c| c >= coord).unwrap_or(last),
            };
        }
        if last == 0 || self.first_coord == self.last_coord {
            return 0;
        }
        let real = (coord - self.first_coord) / (self.last_coord - self.first_coord) * last as f64;
        let index = match bias {
            SearchBias::Lower => real.floor(),
            SearchBias::Upper => real.ceil(),
            SearchBias::Closest => real.round(),
        };
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(last)
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
