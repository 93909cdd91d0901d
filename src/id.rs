#[cfg(not(feature = "std"))]
use core as std;

use std::fmt;

/// Represents a Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID from its most and least significant 64-bit halves.
    pub const fn from_halves(hi: u64, lo: u64) -> Self {
        Self((((hi as u128) << 64) | lo as u128).to_be_bytes())
    }

    /// Returns the most and least significant 64-bit halves as big-endian integers.
    pub const fn halves(&self) -> (u64, u64) {
        let n = u128::from_be_bytes(self.0);
        ((n >> 64) as u64, n as u64)
    }

    /// Creates a UUIDv7 from field values of the precision-profiled layout.
    ///
    /// `unix_ts` fills the 36-bit seconds field, `subsec_a` and `subsec_b` the two 12-bit fields
    /// around the version, and `tail` the 62 bits following the variant. The version and variant
    /// bits are set to `0111` and `10`.
    ///
    /// # Panics
    ///
    /// Panics if any argument exceeds the width of its field.
    pub const fn from_fields_v7(unix_ts: u64, subsec_a: u16, subsec_b: u16, tail: u64) -> Self {
        if unix_ts >= 1 << 36 || subsec_a >= 1 << 12 || subsec_b >= 1 << 12 || tail >= 1 << 62 {
            panic!("invalid field value");
        }

        Self::from_halves(
            (unix_ts << 28) | ((subsec_a as u64) << 16) | (0x7 << 12) | subsec_b as u64,
            (0b10 << 62) | tail,
        )
    }

    /// Returns the version field, or `None` if the field holds a value that names no version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7p::{Uuid, Version};
    ///
    /// let x = Uuid::from_fields_v7(0x6592_0080, 123, 456, 0);
    /// assert_eq!(x.version(), Some(Version::V7));
    /// assert_eq!(Uuid::NIL.version(), None);
    /// ```
    pub const fn version(&self) -> Option<Version> {
        Version::from_u8(self.0[6] >> 4)
    }

    /// Returns the variant field value.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Var0,
            0b100..=0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

/// The 4-bit version tag of a UUID.
///
/// Only [`Version::V7`] has a generator; the others are recognized when reading the tag and
/// resolve to [`Generator::Unimplemented`](crate::Generator::Unimplemented).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum Version {
    /// Gregorian time-based UUID
    V1 = 0b0001,
    /// DCE security UUID
    V2 = 0b0010,
    /// MD5 name-based UUID
    V3 = 0b0011,
    /// Random UUID
    V4 = 0b0100,
    /// SHA-1 name-based UUID
    V5 = 0b0101,
    /// Reordered Gregorian time-based UUID
    V6 = 0b0110,
    /// Unix time-ordered UUID
    V7 = 0b0111,
    /// Custom UUID
    V8 = 0b1000,
}

impl Version {
    /// Returns the version named by the 4-bit tag `value`, if any.
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0b0001 => Self::V1,
            0b0010 => Self::V2,
            0b0011 => Self::V3,
            0b0100 => Self::V4,
            0b0101 => Self::V5,
            0b0110 => Self::V6,
            0b0111 => Self::V7,
            0b1000 => Self::V8,
            _ => return None,
        })
    }
}

impl From<Version> for u8 {
    fn from(src: Version) -> Self {
        src as u8
    }
}

/// The variant field of a UUID, identifying its layout family.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// `0xxx`: reserved for NCS backward compatibility
    Var0,
    /// `10xx`: the RFC 4122 layout, written by every UUIDv7
    Var10,
    /// `110x`: reserved for Microsoft backward compatibility
    Var110,
    /// `111x`: reserved for future definition
    VarReserved,
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    /// Accepts any of the textual forms or 16 raw bytes; other input types are rejected.
    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Uuid::parse_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Uuid::from_slice(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uuid, Variant, Version};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16, u16, u64), &'static str)] {
        const MAX_UINT36: u64 = (1 << 36) - 1;
        const MAX_UINT12: u16 = (1 << 12) - 1;
        const MAX_UINT62: u64 = (1 << 62) - 1;

        &[
            ((0, 0, 0, 0), "00000000-0000-7000-8000-000000000000"),
            ((MAX_UINT36, 0, 0, 0), "ffffffff-f000-7000-8000-000000000000"),
            ((0, MAX_UINT12, 0, 0), "00000000-0fff-7000-8000-000000000000"),
            ((0, 0, MAX_UINT12, 0), "00000000-0000-7fff-8000-000000000000"),
            ((0, 0, 0, MAX_UINT62), "00000000-0000-7000-bfff-ffffffffffff"),
            (
                (MAX_UINT36, MAX_UINT12, MAX_UINT12, MAX_UINT62),
                "ffffffff-ffff-7fff-bfff-ffffffffffff",
            ),
            (
                (0x6592_0080, 123, 456, 0x0315_0000_0000_0000),
                "06592008-007b-71c8-8315-000000000000",
            ),
        ]
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        for (fs, text) in prepare_cases() {
            let from_fields = Uuid::from_fields_v7(fs.0, fs.1, fs.2, fs.3);
            assert_eq!(&from_fields.encode() as &str, *text);
            assert_eq!(from_fields.version(), Some(Version::V7));
            assert_eq!(from_fields.variant(), Variant::Var10);
            #[cfg(feature = "std")]
            assert_eq!(&from_fields.to_string(), text);
            #[cfg(feature = "uuid")]
            assert_eq!(&uuid::Uuid::from(from_fields).to_string(), text);
        }
    }

    /// Panics on field value out of range
    #[test]
    #[should_panic(expected = "invalid field value")]
    fn panics_on_field_value_out_of_range() {
        Uuid::from_fields_v7(1 << 36, 0, 0, 0);
    }

    /// Reads version and variant tags
    #[test]
    fn reads_version_and_variant_tags() {
        assert_eq!(Uuid::NIL.version(), None);
        assert_eq!(Uuid::NIL.variant(), Variant::Var0);
        assert_eq!(Uuid::MAX.version(), None);
        assert_eq!(Uuid::MAX.variant(), Variant::VarReserved);

        for n in 0u8..16 {
            let mut bytes = [0u8; 16];
            bytes[6] = n << 4;
            assert_eq!(Uuid::from(bytes).version().map(u8::from), (1..=8).contains(&n).then_some(n));
        }

        let with_byte8 = |b: u8| {
            let mut bytes = [0u8; 16];
            bytes[8] = b;
            Uuid::from(bytes).variant()
        };
        assert_eq!(with_byte8(0x7f), Variant::Var0);
        assert_eq!(with_byte8(0x80), Variant::Var10);
        assert_eq!(with_byte8(0xbf), Variant::Var10);
        assert_eq!(with_byte8(0xc0), Variant::Var110);
        assert_eq!(with_byte8(0xdf), Variant::Var110);
        assert_eq!(with_byte8(0xe0), Variant::VarReserved);
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert_eq!(
            &Uuid::NIL.encode() as &str,
            "00000000-0000-0000-0000-000000000000"
        );

        assert_eq!(
            &Uuid::MAX.encode() as &str,
            "ffffffff-ffff-ffff-ffff-ffffffffffff"
        );
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2, fs.3);
            assert_eq!(Uuid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Uuid::from(u128::from(e)), e);
            let (hi, lo) = e.halves();
            assert_eq!(Uuid::from_halves(hi, lo), e);
            assert_eq!(hi >> 28, fs.0);
            assert_eq!(lo & ((1 << 62) - 1), fs.3);
            #[cfg(feature = "uuid")]
            assert_eq!(Uuid::from(<uuid::Uuid>::from(e)), e);
            #[cfg(feature = "uuid")]
            assert_eq!(uuid::Uuid::from(e).as_u128(), u128::from(e));
        }
    }
}
