//! UUIDv7 generator and related types.

use std::sync::{Mutex, PoisonError};

use crate::time::{monotonic_sequence, StdSystemTime, TimeSource, Timestamp};
use crate::{layout, Precision, Uuid, Version};

pub mod with_rand08;

/// A trait that defines the random number source interface for [`V7Generator`].
///
/// Implementations should draw from a cryptographically secure generator.
pub trait RandSource {
    /// Returns the next uniformly random `u64`, or `None` if the source failed to produce one.
    fn try_next_u64(&self) -> Option<u64>;
}

/// The default [`RandSource`] that reads from the operating system through
/// [`rand::rngs::OsRng`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct OsRandSource;

impl RandSource for OsRandSource {
    fn try_next_u64(&self) -> Option<u64> {
        use rand::RngCore;
        let mut bytes = [0u8; 8];
        rand::rngs::OsRng.try_fill_bytes(&mut bytes).ok()?;
        Some(u64::from_be_bytes(bytes))
    }
}

/// Represents a UUIDv7 generator that packs the current time under a selectable [`Precision`].
///
/// The precision is the only mutable state. It is guarded by a mutex that is held just long enough
/// to read or replace the value, so a generator can be shared by reference across threads. A call
/// to [`generate`](Self::generate) racing with [`set_precision`](Self::set_precision) may use
/// either the old or the new precision.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use uuid7p::{Precision, V7Generator};
///
/// let g = V7Generator::new().with_precision(Precision::Mid);
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// | Method        | Timestamp     | Sequence                        |
/// | ------------- | ------------- | ------------------------------- |
/// | [`generate`]  | Time source   | Monotonic reading of the source |
/// | [`convert`]   | Argument      | Monotonic reading, if attached  |
///
/// [`generate`]: V7Generator::generate
/// [`convert`]: V7Generator::convert
#[derive(Debug)]
pub struct V7Generator<R = OsRandSource, T = StdSystemTime> {
    precision: Mutex<Precision>,

    /// The random number source used by the generator.
    rand_source: R,

    /// The clock used by the generator.
    time_source: T,
}

impl V7Generator {
    /// Creates a generator with the default random number source and system clock.
    pub const fn new() -> Self {
        Self::with_rand_and_time_sources(OsRandSource, StdSystemTime)
    }
}

impl Default for V7Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandSource, T: TimeSource> V7Generator<R, T> {
    /// Creates a generator with a random number source and a clock.
    pub const fn with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            precision: Mutex::new(Precision::Default),
            rand_source,
            time_source,
        }
    }

    /// Returns the generator with its precision replaced by `precision`.
    pub fn with_precision(self, precision: Precision) -> Self {
        self.set_precision(precision);
        self
    }

    /// Returns the precision that the next identifier will be encoded with.
    pub fn precision(&self) -> Precision {
        *self.precision.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the precision used by subsequent calls.
    pub fn set_precision(&self, precision: Precision) {
        *self.precision.lock().unwrap_or_else(PoisonError::into_inner) = precision;
        tracing::debug!(%precision, "uuid7p: precision changed");
    }

    /// Generates a new UUIDv7 object from the current time.
    pub fn generate(&self) -> Uuid {
        self.convert(&self.time_source.now())
    }

    /// Generates a UUIDv7 object from the `timestamp` passed.
    ///
    /// The sequence field is taken from the monotonic reading attached to `timestamp`, or set to
    /// zero if there is none. This makes it possible to reconstruct an identifier for a historical
    /// instant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7p::{Precision, Timestamp, V7Generator};
    ///
    /// let g = V7Generator::new().with_precision(Precision::Low);
    /// let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
    /// assert_eq!(g.decode(&g.convert(&t)).unix_secs(), 1_704_067_200);
    /// ```
    pub fn convert(&self, timestamp: &Timestamp) -> Uuid {
        let precision = self.precision();
        let sequence = monotonic_sequence(timestamp, Some(precision.sequence_bits()));
        let random = self.fill_random(precision.random_bits());
        layout::encode(timestamp, precision, sequence, random)
    }

    /// Extracts the timestamp from a UUIDv7, regardless of the current precision.
    ///
    /// Returns [`Timestamp::EPOCH`] if `uuid` is not a UUIDv7 of the `10` variant. See
    /// [`layout::decode()`] for details.
    pub fn decode(&self, uuid: &Uuid) -> Timestamp {
        layout::decode(uuid)
    }

    /// Draws a uniformly random integer of `bits` bits, or zero if the random source fails.
    fn fill_random(&self, bits: u32) -> u64 {
        debug_assert!(bits < u64::BITS);
        match self.rand_source.try_next_u64() {
            Some(n) => n & ((1 << bits) - 1),
            None => {
                tracing::warn!(bits, "uuid7p: random source failed; filling random bits with zeros");
                0
            }
        }
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuid7p::V7Generator;
///
/// V7Generator::new()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{i}] {e}"));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V7Generator<R, T> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for V7Generator<R, T> {}

/// A generator selected by UUID version.
///
/// Only version 7 is implemented; any other version yields [`Generator::Unimplemented`], whose
/// operations all return `None`.
///
/// # Examples
///
/// ```rust
/// use uuid7p::{Generator, Version};
///
/// let g = Generator::new(Version::V7);
/// let x = g.generate().unwrap();
/// assert_eq!(x.version(), Some(Version::V7));
///
/// assert!(Generator::new(Version::V4).generate().is_none());
/// ```
#[derive(Debug)]
pub enum Generator<R = OsRandSource, T = StdSystemTime> {
    /// Version 7 generator
    TimeOrdered(V7Generator<R, T>),

    /// A version with no generator behind it
    Unimplemented(Version),
}

impl Generator {
    /// Creates a generator for `version` with the default random number source and system clock.
    pub fn new(version: Version) -> Self {
        Self::with_rand_and_time_sources(version, OsRandSource, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> Generator<R, T> {
    /// Creates a generator for `version` with a random number source and a clock.
    pub fn with_rand_and_time_sources(version: Version, rand_source: R, time_source: T) -> Self {
        match version {
            Version::V7 => Self::TimeOrdered(V7Generator::with_rand_and_time_sources(
                rand_source,
                time_source,
            )),
            _ => Self::Unimplemented(version),
        }
    }

    /// Returns the version the generator was created for.
    pub const fn version(&self) -> Version {
        match self {
            Self::TimeOrdered(_) => Version::V7,
            Self::Unimplemented(version) => *version,
        }
    }

    /// Returns the inner UUIDv7 generator, if any.
    pub const fn as_v7(&self) -> Option<&V7Generator<R, T>> {
        match self {
            Self::TimeOrdered(g) => Some(g),
            Self::Unimplemented(_) => None,
        }
    }

    /// Generates a new UUID from the current time.
    pub fn generate(&self) -> Option<Uuid> {
        self.as_v7().map(V7Generator::generate)
    }

    /// Generates a UUID from the `timestamp` passed.
    pub fn convert(&self, timestamp: &Timestamp) -> Option<Uuid> {
        self.as_v7().map(|g| g.convert(timestamp))
    }

    /// Extracts the timestamp from a UUID.
    pub fn decode(&self, uuid: &Uuid) -> Option<Timestamp> {
        self.as_v7().map(|g| g.decode(uuid))
    }
}
