//! Timestamps, time sources, and the monotonic sequence extractor

#[cfg(not(feature = "std"))]
use core as std;

use std::time::Duration;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Represents an instant as whole seconds and sub-second nanoseconds since the Unix epoch,
/// optionally paired with a reading of a monotonic clock.
///
/// The monotonic reading is attached only to timestamps taken from a clock that provides one
/// (e.g., [`StdSystemTime`]). Timestamps built from arbitrary instants carry none, which makes the
/// sequence field of identifiers encoded from them zero.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Timestamp {
    secs: u64,
    nanos: u32,
    monotonic: Option<u64>,
}

impl Timestamp {
    /// The Unix epoch (1970-01-01T00:00:00Z) without a monotonic reading.
    ///
    /// Decoding returns this value for identifiers that are not time-ordered UUIDs.
    pub const EPOCH: Self = Self {
        secs: 0,
        nanos: 0,
        monotonic: None,
    };

    /// Creates a timestamp from seconds and nanoseconds since the Unix epoch.
    ///
    /// Nanoseconds of one second or more are carried over into `secs`, saturating at
    /// `u64::MAX` seconds.
    pub const fn from_unix(secs: u64, nanos: u32) -> Self {
        Self {
            secs: secs.saturating_add((nanos / NANOS_PER_SEC) as u64),
            nanos: nanos % NANOS_PER_SEC,
            monotonic: None,
        }
    }

    /// Creates a timestamp from nanoseconds since the Unix epoch.
    pub const fn from_unix_nanos(unix_nanos: u64) -> Self {
        Self::from_unix(
            unix_nanos / NANOS_PER_SEC as u64,
            (unix_nanos % NANOS_PER_SEC as u64) as u32,
        )
    }

    /// Returns a copy of this timestamp carrying the monotonic clock `reading`.
    pub const fn with_monotonic(self, reading: u64) -> Self {
        Self {
            monotonic: Some(reading),
            ..self
        }
    }

    /// Returns a copy of this timestamp with the monotonic clock reading stripped.
    pub const fn without_monotonic(self) -> Self {
        Self {
            monotonic: None,
            ..self
        }
    }

    /// Returns the whole seconds since the Unix epoch.
    pub const fn unix_secs(&self) -> u64 {
        self.secs
    }

    /// Returns the fractional part of the timestamp in nanoseconds (`0..1_000_000_000`).
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns the nanoseconds since the Unix epoch.
    pub const fn unix_nanos(&self) -> u128 {
        self.secs as u128 * NANOS_PER_SEC as u128 + self.nanos as u128
    }

    /// Returns the monotonic clock reading attached to the timestamp, if any.
    pub const fn monotonic(&self) -> Option<u64> {
        self.monotonic
    }

    /// Returns the current timestamp with a monotonic clock reading attached.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn now() -> Self {
        StdSystemTime.now()
    }
}

impl From<Duration> for Timestamp {
    /// Interprets `src` as the time elapsed since the Unix epoch.
    fn from(src: Duration) -> Self {
        Self::from_unix(src.as_secs(), src.subsec_nanos())
    }
}

impl From<Timestamp> for Duration {
    fn from(src: Timestamp) -> Self {
        Duration::new(src.secs, src.nanos)
    }
}

/// Extracts a disambiguation counter of at most `width` bits from the monotonic reading of
/// `timestamp`.
///
/// Returns zero if the timestamp carries no monotonic reading. Returns the whole reading if
/// `width` is `None` or not less than 64.
///
/// # Examples
///
/// ```rust
/// use uuid7p::{monotonic_sequence, Timestamp};
///
/// let t = Timestamp::from_unix(1_704_067_200, 0);
/// assert_eq!(monotonic_sequence(&t, Some(8)), 0);
/// assert_eq!(monotonic_sequence(&t.with_monotonic(0x1234), Some(8)), 0x34);
/// assert_eq!(monotonic_sequence(&t.with_monotonic(0x1234), None), 0x1234);
/// ```
pub const fn monotonic_sequence(timestamp: &Timestamp, width: Option<u32>) -> u64 {
    match (timestamp.monotonic, width) {
        (None, _) => 0,
        (Some(reading), Some(width)) if width < u64::BITS => reading & ((1 << width) - 1),
        (Some(reading), _) => reading,
    }
}

/// A trait that defines the clock interface consumed by [`V7Generator`](crate::V7Generator).
pub trait TimeSource {
    /// Returns the current timestamp, with a monotonic reading attached if the clock has one.
    fn now(&self) -> Timestamp;
}

/// The default [`TimeSource`] that pairs [`std::time::SystemTime`] with a process-local reading of
/// [`std::time::Instant`].
///
/// The monotonic reading is the number of nanoseconds elapsed since the first reading taken in the
/// process.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
impl TimeSource for StdSystemTime {
    fn now(&self) -> Timestamp {
        use std::time;
        let origin = monotonic_origin();
        let since_epoch = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards");
        let reading = time::Instant::now().saturating_duration_since(origin);
        Timestamp::from(since_epoch).with_monotonic(reading.as_nanos() as u64)
    }
}

#[cfg(feature = "std")]
fn monotonic_origin() -> std::time::Instant {
    static ORIGIN: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    *ORIGIN.get_or_init(std::time::Instant::now)
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::Timestamp;
    use std::{error, fmt, time};

    impl TryFrom<time::SystemTime> for Timestamp {
        type Error = time::SystemTimeError;

        /// Fails if `src` is earlier than the Unix epoch.
        fn try_from(src: time::SystemTime) -> Result<Self, Self::Error> {
            src.duration_since(time::UNIX_EPOCH).map(Self::from)
        }
    }

    impl TryFrom<Timestamp> for time::SystemTime {
        type Error = SystemTimeRangeError;

        /// Fails if `src` is later than the platform's `SystemTime` can represent.
        fn try_from(src: Timestamp) -> Result<Self, Self::Error> {
            time::UNIX_EPOCH
                .checked_add(time::Duration::from(src))
                .ok_or(SystemTimeRangeError)
        }
    }

    /// Error converting a [`Timestamp`] out of the range of [`std::time::SystemTime`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SystemTimeRangeError;

    impl fmt::Display for SystemTimeRangeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("timestamp out of range for SystemTime")
        }
    }

    impl error::Error for SystemTimeRangeError {}
}

#[cfg(feature = "std")]
pub use std_ext::SystemTimeRangeError;

#[cfg(test)]
mod tests {
    use super::{monotonic_sequence, Timestamp};

    /// Normalizes nanoseconds of one second or more
    #[test]
    fn normalizes_nanoseconds_of_one_second_or_more() {
        let t = Timestamp::from_unix(10, 2_500_000_000);
        assert_eq!(t.unix_secs(), 12);
        assert_eq!(t.subsec_nanos(), 500_000_000);
        assert_eq!(t, Timestamp::from_unix_nanos(12_500_000_000));
        assert_eq!(t.unix_nanos(), 12_500_000_000);
    }

    /// Saturates seconds instead of overflowing
    #[test]
    fn saturates_seconds_instead_of_overflowing() {
        let t = Timestamp::from_unix(u64::MAX, 1_000_000_000);
        assert_eq!(t.unix_secs(), u64::MAX);
        assert_eq!(t.subsec_nanos(), 0);

        let t = Timestamp::from_unix(u64::MAX - 1, u32::MAX);
        assert_eq!(t.unix_secs(), u64::MAX);
        assert_eq!(t.subsec_nanos(), u32::MAX % 1_000_000_000);
        assert_eq!(std::time::Duration::from(t).as_secs(), u64::MAX);
    }

    /// Rejects timestamps beyond the range of SystemTime
    #[cfg(feature = "std")]
    #[test]
    fn rejects_timestamps_beyond_the_range_of_system_time() {
        use super::SystemTimeRangeError;
        use std::time::SystemTime;

        let far = Timestamp::from_unix(u64::MAX, 999_999_999);
        assert_eq!(SystemTime::try_from(far), Err(SystemTimeRangeError));
        assert!(!SystemTimeRangeError.to_string().is_empty());

        let t = Timestamp::from_unix(1_704_067_200, 123_456_700);
        let st = SystemTime::try_from(t).unwrap();
        assert_eq!(Timestamp::try_from(st).unwrap(), t);
    }

    /// Produces distinct consecutive monotonic readings
    #[cfg(feature = "std")]
    #[cfg_attr(not(target_os = "linux"), ignore = "needs a nanosecond monotonic clock")]
    #[test]
    fn produces_distinct_consecutive_monotonic_readings() {
        use super::{StdSystemTime, TimeSource};
        use std::collections::HashSet;

        let mut s = HashSet::with_capacity(1 << 20);
        for _ in 0..(1 << 20) {
            let reading = StdSystemTime.now().monotonic().unwrap();
            assert!(s.insert(reading), "duplicate reading {reading}");
        }
    }

    /// Returns zero sequence without monotonic reading
    #[test]
    fn returns_zero_sequence_without_monotonic_reading() {
        let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
        assert_eq!(t.monotonic(), None);
        for width in [None, Some(8), Some(12), Some(14), Some(64)] {
            assert_eq!(monotonic_sequence(&t, width), 0);
        }
        let t = t.with_monotonic(u64::MAX).without_monotonic();
        assert_eq!(monotonic_sequence(&t, Some(8)), 0);
    }

    /// Never returns sequence wider than requested
    #[test]
    fn never_returns_sequence_wider_than_requested() {
        let t = Timestamp::from_unix(1_704_067_200, 0);
        let readings = [0, 1, 255, 256, 4095, 4096, 16383, 16384, u64::MAX - 1, u64::MAX];
        for width in [8u32, 12, 14] {
            for reading in readings {
                let seq = monotonic_sequence(&t.with_monotonic(reading), Some(width));
                assert!(seq < 1 << width, "width {width}: {seq}");
                assert_eq!(seq, reading % (1 << width));
            }
            for _ in 0..10_000 {
                let reading: u64 = rand::random();
                assert!(monotonic_sequence(&t.with_monotonic(reading), Some(width)) < 1 << width);
            }
        }
        assert_eq!(
            monotonic_sequence(&t.with_monotonic(u64::MAX), Some(64)),
            u64::MAX
        );
    }

    /// Attaches monotonic reading to current timestamp
    #[cfg(feature = "std")]
    #[test]
    fn attaches_monotonic_reading_to_current_timestamp() {
        use std::time::SystemTime;

        let before = Timestamp::try_from(SystemTime::now()).unwrap();
        let a = Timestamp::now();
        let b = Timestamp::now();
        assert!(a.monotonic().is_some());
        assert!(a.monotonic() <= b.monotonic());
        assert!(before.unix_secs() <= a.unix_secs());
        assert_eq!(
            Timestamp::try_from(SystemTime::try_from(a).unwrap()).unwrap(),
            a.without_monotonic()
        );
    }
}
