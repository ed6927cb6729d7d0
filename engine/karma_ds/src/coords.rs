//! Odometer-style iteration over N-dimensional coordinate spaces.
//!
//! The least significant (last) coordinate advances fastest; overflow
//! carries into the next more significant coordinate, and iteration ends
//! when the most significant coordinate overflows. Copying tiled arrays,
//! reordering, traversal and offset collection all walk coordinates this
//! way.

use smallvec::SmallVec;

/// Coordinate vector of an array of typical rank, kept inline.
pub type Coords = SmallVec<[usize; 8]>;

/// Mutable cursor over every coordinate of a shape.
#[derive(Clone, Debug)]
pub struct Odometer {
    lengths: Coords,
    coords: Coords,
    done: bool,
}

impl Odometer {
    /// Start at the origin. A shape containing a zero length has no
    /// coordinates at all; a shape with no dimensions has exactly one
    /// (the empty vector).
    pub fn new(lengths: &[usize]) -> Self {
        Self {
            lengths: lengths.iter().copied().collect(),
            coords: lengths.iter().map(|_| 0).collect(),
            done: lengths.contains(&0),
        }
    }

    /// Current coordinate, or `None` once the space is exhausted.
    #[inline]
    pub fn current(&self) -> Option<&[usize]> {
        (!self.done).then_some(self.coords.as_slice())
    }

    /// Step to the next coordinate. Returns `false` when the most
    /// significant dimension overflows.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        for dim in (0..self.lengths.len()).rev() {
            self.coords[dim] += 1;
            if self.coords[dim] < self.lengths[dim] {
                return true;
            }
            self.coords[dim] = 0;
        }
        self.done = true;
        false
    }
}

/// Call `f` on every coordinate of `lengths` in odometer order.
///
/// Stops early and returns `false` as soon as `f` does.
pub fn for_each_coordinate(lengths: &[usize], mut f: impl FnMut(&[usize]) -> bool) -> bool {
    let mut odometer = Odometer::new(lengths);
    while let Some(coords) = odometer.current() {
        if !f(coords) {
            return false;
        }
        odometer.advance();
    }
    true
}
