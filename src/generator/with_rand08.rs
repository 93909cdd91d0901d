//! Integration with `rand` (v0.8) crate.

use std::sync::Mutex;

use super::{RandSource, V7Generator};
use crate::time::{StdSystemTime, TimeSource};
use rand::{CryptoRng, RngCore};

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
///
/// The wrapped generator is kept behind a mutex so that a [`V7Generator`] can draw from it through
/// a shared reference. A poisoned lock is reported as a failed draw.
#[derive(Debug, Default)]
pub struct Adapter<T>(Mutex<T>);

impl<T> Adapter<T> {
    /// Wraps `rng`.
    pub const fn new(rng: T) -> Self {
        Self(Mutex::new(rng))
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> T {
        self.0
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T: RngCore + CryptoRng> RandSource for Adapter<T> {
    fn try_next_u64(&self) -> Option<u64> {
        let mut rng = self.0.lock().ok()?;
        let mut bytes = [0u8; 8];
        rng.try_fill_bytes(&mut bytes).ok()?;
        Some(u64::from_be_bytes(bytes))
    }
}

impl<T: RngCore + CryptoRng> V7Generator<Adapter<T>> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] and [`CryptoRng`] from `rand` (v0.8) crate, and the system clock.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use uuid7p::V7Generator;
    ///
    /// let g = V7Generator::with_rand08(StdRng::from_entropy());
    /// println!("{}", g.generate());
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::with_rand_and_time_sources(Adapter::new(rng), StdSystemTime)
    }
}

impl<T: RngCore + CryptoRng, S: TimeSource> V7Generator<Adapter<T>, S> {
    /// Creates a generator object with a specified random number generator from `rand` (v0.8)
    /// crate and a specified clock.
    pub const fn with_rand08_and_time_source(rng: T, time_source: S) -> Self {
        Self::with_rand_and_time_sources(Adapter::new(rng), time_source)
    }
}
