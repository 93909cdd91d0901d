//! Default generator and entry point functions

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Precision, Timestamp, Uuid, V7Generator};

/// Returns the process-wide global generator, creating one if none exists.
fn global_gen() -> &'static V7Generator {
    static G: sync::OnceLock<V7Generator> = sync::OnceLock::new();
    G.get_or_init(Default::default)
}

/// Generates a UUIDv7 object from the current time.
///
/// This function employs a process-wide generator that reads the operating system's random number
/// source and packs the timestamp under the precision set by [`set_precision()`] (nanosecond
/// precision unless changed).
///
/// # Examples
///
/// ```rust
/// let uuid = uuid7p::uuid7();
/// println!("{uuid}"); // e.g., "06592008-007b-71c8-8315-ab123456789a"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuid7p::uuid7().to_string();
/// ```
pub fn uuid7() -> Uuid {
    global_gen().generate()
}

/// Generates a UUIDv7 object from the `timestamp` passed, using the process-wide generator.
///
/// # Examples
///
/// ```rust
/// use uuid7p::{decode, uuid7_at, Timestamp};
///
/// let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
/// assert_eq!(decode(&uuid7_at(&t)).unix_secs(), 1_704_067_200);
/// ```
pub fn uuid7_at(timestamp: &Timestamp) -> Uuid {
    global_gen().convert(timestamp)
}

/// Returns the precision of the process-wide generator.
pub fn precision() -> Precision {
    global_gen().precision()
}

/// Replaces the precision of the process-wide generator.
///
/// The change applies to every thread, and calls to [`uuid7()`] running concurrently may use
/// either the old or the new precision.
pub fn set_precision(precision: Precision) {
    global_gen().set_precision(precision)
}

#[cfg(test)]
mod tests {
    use super::{precision, uuid7, uuid7_at};
    use crate::{decode, Precision, Timestamp, Variant, Version};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid7().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        for _ in 0..10_000 {
            let ts_now = Timestamp::now().unix_nanos() as i128;
            let ts = decode(&uuid7()).unix_nanos() as i128;
            assert!((ts - ts_now).abs() < 1_000_000_000);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, bin) in bins.iter().enumerate().skip(88) {
            let p = *bin as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid7();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(Version::V7));
        }
    }

    /// Converts arbitrary timestamps at default precision
    #[test]
    fn converts_arbitrary_timestamps_at_default_precision() {
        assert_eq!(precision(), Precision::Default);
        let t = Timestamp::from_unix(1_704_067_200, 123_456_789);
        for _ in 0..1_000 {
            assert_eq!(decode(&uuid7_at(&t)), t);
        }
    }

    /// Generates no duplicates under multithreading
    #[test]
    fn generates_no_duplicates_under_multithreading() -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(uuid7()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
