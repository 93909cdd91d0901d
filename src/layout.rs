//! Bit layout of precision-profiled UUIDv7
//!
//! Every profile shares the same frame; they differ in how the 12-bit `subsec_b` field and the
//! 62 bits after `var` are split between time, sequence, and random bits.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            unix_ts                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |unix_ts|       subsec_a        |  ver  |       subsec_b        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        tail                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            tail                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! | Precision      | `subsec_a` | `subsec_b`    | `tail`                                    |
//! | -------------- | ---------- | ------------- | ----------------------------------------- |
//! | Low            | msec       | seq (12 bits) | rand (62 bits)                            |
//! | Mid            | msec       | usec          | seq (14 bits), rand (48 bits)             |
//! | High (Default) | msec       | usec          | nsec (14 bits), seq (8 bits), rand (40 bits) |

#[cfg(not(feature = "std"))]
use core as std;

use std::fmt;

use crate::{Timestamp, Uuid, Variant, Version};

const UNIX_TS_BITS: u32 = 36;
const SUBSEC_A_BITS: u32 = 12;
const SUBSEC_B_BITS: u32 = 12;
const SUBSEC_C_BITS: u32 = 14;
const VERSION_BITS: u32 = 4;
const VARIANT_BITS: u32 = 2;
const TAIL_BITS: u32 = 64 - VARIANT_BITS;

const LOW_SEQ_BITS: u32 = 12;
const MID_SEQ_BITS: u32 = 14;
const HIGH_SEQ_BITS: u32 = 8;
const LOW_RAND_BITS: u32 = TAIL_BITS;
const MID_RAND_BITS: u32 = TAIL_BITS - MID_SEQ_BITS;
const HIGH_RAND_BITS: u32 = TAIL_BITS - SUBSEC_C_BITS - HIGH_SEQ_BITS;

/// The variant tag written to the top two bits of the lower half.
const VARIANT_TAG: u64 = 0b10;

/// Returns a mask of the lowest `bits` bits.
const fn mask(bits: u32) -> u64 {
    (1 << bits) - 1
}

/// Selects how sub-second time is split between the time fields and the sequence and random
/// fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Precision {
    /// Alias for [`Precision::High`].
    #[default]
    Default,
    /// Millisecond precision with a 12-bit sequence and 62 random bits.
    Low,
    /// Microsecond precision with a 14-bit sequence and 48 random bits.
    Mid,
    /// Nanosecond precision with an 8-bit sequence and 40 random bits.
    High,
}

impl Precision {
    /// Returns the width of the monotonic sequence field.
    pub const fn sequence_bits(self) -> u32 {
        match self {
            Self::Low => LOW_SEQ_BITS,
            Self::Mid => MID_SEQ_BITS,
            Self::High | Self::Default => HIGH_SEQ_BITS,
        }
    }

    /// Returns the width of the random field.
    pub const fn random_bits(self) -> u32 {
        match self {
            Self::Low => LOW_RAND_BITS,
            Self::Mid => MID_RAND_BITS,
            Self::High | Self::Default => HIGH_RAND_BITS,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "high (default)",
            Self::Low => "low",
            Self::Mid => "middle",
            Self::High => "high",
        })
    }
}

/// Packs `timestamp`, `sequence`, and `random` into a UUIDv7 under the `precision` profile.
///
/// The seconds are truncated to 36 bits, and `sequence` and `random` are truncated to
/// [`Precision::sequence_bits()`] and [`Precision::random_bits()`] respectively.
///
/// # Examples
///
/// ```rust
/// use uuid7p::{layout, Precision, Timestamp};
///
/// let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
/// let x = layout::encode(&t, Precision::High, 0xab, 0x12_3456_789a);
/// assert_eq!(x.to_string(), "06592008-007b-71c8-8315-ab123456789a");
/// ```
pub const fn encode(timestamp: &Timestamp, precision: Precision, sequence: u64, random: u64) -> Uuid {
    let unix_ts = timestamp.unix_secs() & mask(UNIX_TS_BITS);
    let nanos = timestamp.subsec_nanos() as u64;
    let msec = (nanos / 1_000_000) % 1000;
    let usec = (nanos / 1000) % 1000;
    let nsec = nanos % 1000;

    let sequence = sequence & mask(precision.sequence_bits());
    let random = random & mask(precision.random_bits());

    let (subsec_b, tail) = match precision {
        Precision::Low => (sequence, random),
        Precision::Mid => (usec, (sequence << MID_RAND_BITS) | random),
        Precision::High | Precision::Default => (
            usec,
            (nsec << (HIGH_SEQ_BITS + HIGH_RAND_BITS)) | (sequence << HIGH_RAND_BITS) | random,
        ),
    };

    Uuid::from_fields_v7(
        unix_ts,
        msec as u16,
        (subsec_b & mask(SUBSEC_B_BITS)) as u16,
        tail,
    )
}

/// Extracts the timestamp from a UUIDv7, reading the sub-second fields at their
/// [`Precision::High`] positions.
///
/// # Invalid input yields the epoch
///
/// This function never fails. If the version is not 7 or the variant is not `10`, it returns
/// [`Timestamp::EPOCH`] instead of an error, so callers that need to tell malformed input from a
/// genuine epoch identifier must check [`Uuid::version()`] and [`Uuid::variant()`] themselves.
///
/// A sub-second field holding 1000 or more is read as zero. The precision used at encoding is not
/// stored, so identifiers produced under [`Precision::Low`] or [`Precision::Mid`] decode to the
/// correct second and millisecond (and, for `Mid`, microsecond), while their sequence and random
/// bits are misread as finer sub-second digits.
///
/// # Examples
///
/// ```rust
/// use uuid7p::{layout, Timestamp, Uuid};
///
/// let x: Uuid = "06592008-007b-71c8-8315-ab123456789a".parse()?;
/// assert_eq!(layout::decode(&x), Timestamp::from_unix(1_704_067_200, 123_456_789));
/// assert_eq!(layout::decode(&Uuid::NIL), Timestamp::EPOCH);
/// # Ok::<(), uuid7p::ParseError>(())
/// ```
pub const fn decode(uuid: &Uuid) -> Timestamp {
    let (hi, lo) = uuid.halves();

    let version = (hi >> SUBSEC_B_BITS) & mask(VERSION_BITS);
    let variant = lo >> TAIL_BITS;
    if version != Version::V7 as u64 || variant != VARIANT_TAG {
        return Timestamp::EPOCH;
    }

    let unix_ts = hi >> (64 - UNIX_TS_BITS);
    let msec = below_1000((hi >> (VERSION_BITS + SUBSEC_B_BITS)) & mask(SUBSEC_A_BITS));
    let usec = below_1000(hi & mask(SUBSEC_B_BITS));
    let nsec = below_1000((lo & mask(TAIL_BITS)) >> (HIGH_SEQ_BITS + HIGH_RAND_BITS));

    Timestamp::from_unix(unix_ts, (msec * 1_000_000 + usec * 1000 + nsec) as u32)
}

/// Replaces a three-digit sub-second field value out of range with zero.
const fn below_1000(value: u64) -> u64 {
    if value < 1000 {
        value
    } else {
        0
    }
}

/// Returns true if `uuid` carries the version and variant tags that [`decode()`] accepts.
pub const fn is_decodable(uuid: &Uuid) -> bool {
    matches!(uuid.version(), Some(Version::V7)) && matches!(uuid.variant(), Variant::Var10)
}
