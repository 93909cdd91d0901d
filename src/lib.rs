//! Time-ordered UUID version 7 with selectable sub-second precision
//!
//! ```rust
//! use uuid7p::uuid7;
//!
//! let uuid = uuid7();
//! println!("{}", uuid); // e.g., "06592008-007b-71c8-8315-ab123456789a"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! # Field and bit layout
//!
//! This implementation packs the Unix time in seconds, milliseconds, microseconds and (at the
//! highest precision) nanoseconds into separate fields, so that a UUID sorts by its creation time
//! and the full timestamp can be recovered from it:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            unix_ts                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |unix_ts|         msec          |  ver  |     usec or seq       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|     nsec or seq       |     seq       |       rand        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 36-bit `unix_ts` field holds the whole seconds since the Unix epoch.
//! - The 12-bit `msec` field holds the milliseconds within the second.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 2-bit `var` field is set at `10`.
//! - The rest is divided by the [`Precision`] in effect: [`Precision::Low`] spends it on a
//!   12-bit sequence and 62 random bits, [`Precision::Mid`] on microseconds, a 14-bit sequence and
//!   48 random bits, and [`Precision::High`] (the default) on microseconds, nanoseconds, an 8-bit
//!   sequence and 40 random bits.
//!
//! See the [`layout`] module for the exact positions of each profile. The sequence is taken from
//! the monotonic clock reading attached to the [`Timestamp`], and the random bits are drawn from a
//! cryptographically strong source.
//!
//! # Decoding
//!
//! ```rust
//! use uuid7p::{decode, uuid7_at, Timestamp};
//!
//! let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
//! assert_eq!(decode(&uuid7_at(&t)), t);
//! ```
//!
//! [`decode()`] reads the timestamp back regardless of the precision the UUID was created with,
//! and returns [`Timestamp::EPOCH`] for anything that is not a UUIDv7 of the `10` variant.
//!
//! # Text forms
//!
//! [`Uuid`] renders into the canonical, short (32 hex digits), braced, URN and base64 forms, and
//! [`Uuid::parse_str()`] accepts any of them:
//!
//! ```rust
//! use uuid7p::Uuid;
//!
//! let x: Uuid = "06592008-007b-71c8-8315-ab123456789a".parse()?;
//! assert_eq!(&x.encode_short() as &str, "06592008007b71c88315ab123456789a");
//! assert_eq!(&x.encode_base64() as &str, "BlkgCAB7cciDFasSNFZ4mg");
//! assert_eq!(Uuid::parse_str("urn:uuid:06592008-007b-71c8-8315-ab123456789a")?, x);
//! # Ok::<(), uuid7p::ParseError>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `std` enables, among others, the generator, the system clock and the conversions from and to
//!   [`std::time::SystemTime`]. Without `std`, this crate provides the [`Uuid`] type, its text
//!   forms and the [`layout`] functions under `no_std` environments that provide `alloc` (base64
//!   parsing allocates its decoding tables).
//! - `global_gen` (implies `std`) enables the process-wide default generator behind [`uuid7()`].
//!
//! Optional features:
//!
//! - `serde` enables serialization and deserialization of [`Uuid`] objects.
//! - `uuid` enables the conversions between [`Uuid`] and the `uuid` crate's `Uuid`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{Uuid, Variant, Version};

mod text;
pub use text::{ParseError, ParseErrorKind};

pub mod layout;
#[doc(inline)]
pub use layout::{decode, Precision};

mod time;
pub use time::{monotonic_sequence, TimeSource, Timestamp};

#[cfg(feature = "std")]
pub use time::{StdSystemTime, SystemTimeRangeError};

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod generator;
#[cfg(feature = "std")]
pub use generator::{Generator, OsRandSource, RandSource, V7Generator};

#[cfg(feature = "global_gen")]
mod entry;
#[cfg(feature = "global_gen")]
pub use entry::{precision, set_precision, uuid7, uuid7_at};
