//! # Amora Scanner
//!
//! Batch scanning of announcement sequences.
//!
//! Both pipelines are pure functions over a finite slice: no streaming, no
//! background work, no shared state. Output order equals input order. Cost
//! per announcement is one scalar multiplication, one Poseidon, and a byte
//! compare; only the ~1/256 of announcements that pass the view tag pay
//! for a second scalar multiplication, a point addition, and the address
//! hash.
//!
//! "No match" is a normal outcome, not an error. Curve errors from
//! well-formed announcements propagate — they mean malformed input, and
//! swallowing them would silently hide payments.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use starknet_crypto::FieldElement;
use tracing::{debug, info};

use amora_core::{Announcement, Result, StealthKeys, StealthPayment, ViewingKey, WatchOnlyPayment};
use amora_stealth::discovery::{scan_announcement, scan_announcement_watch_only, ScanOutcome};

/// Counters from one scan run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Announcements examined.
    pub scanned: u64,
    /// Announcements that passed the view-tag filter.
    pub tag_matches: u64,
    /// Announcements confirmed as payments.
    pub discoveries: u64,
}

impl ScanStats {
    /// Fraction of announcements the view tag filtered out, in percent.
    pub fn filter_efficiency(&self) -> f64 {
        if self.scanned == 0 {
            0.0
        } else {
            ((self.scanned - self.tag_matches) as f64 / self.scanned as f64) * 100.0
        }
    }
}

/// Scans announcements with the full key set, recovering spending keys.
///
/// Returns every confirmed payment in input order.
pub fn scan_announcements(
    announcements: &[Announcement],
    keys: &StealthKeys,
    class_hash: &FieldElement,
) -> Result<Vec<StealthPayment>> {
    Ok(scan_announcements_with_stats(announcements, keys, class_hash)?.0)
}

/// [`scan_announcements`] plus counters.
pub fn scan_announcements_with_stats(
    announcements: &[Announcement],
    keys: &StealthKeys,
    class_hash: &FieldElement,
) -> Result<(Vec<StealthPayment>, ScanStats)> {
    let mut payments = Vec::new();
    let mut stats = ScanStats::default();

    for announcement in announcements {
        stats.scanned += 1;
        match scan_announcement(announcement, keys, class_hash)? {
            ScanOutcome::TagMismatch => {}
            ScanOutcome::AddressMismatch => {
                stats.tag_matches += 1;
                debug!(
                    stealth_address = %amora_core::serde_felt::to_hex(&announcement.stealth_address),
                    "view-tag collision rejected by address check"
                );
            }
            ScanOutcome::Match(payment) => {
                stats.tag_matches += 1;
                stats.discoveries += 1;
                payments.push(payment);
            }
        }
    }

    info!(
        scanned = stats.scanned,
        tag_matches = stats.tag_matches,
        discoveries = stats.discoveries,
        "scan complete"
    );
    Ok((payments, stats))
}

/// Scans announcements with a watch-only capability.
///
/// Identical pipeline minus the spending-key derivation.
pub fn scan_with_viewing_key(
    announcements: &[Announcement],
    key: &ViewingKey,
    class_hash: &FieldElement,
) -> Result<Vec<WatchOnlyPayment>> {
    Ok(scan_with_viewing_key_stats(announcements, key, class_hash)?.0)
}

/// [`scan_with_viewing_key`] plus counters.
pub fn scan_with_viewing_key_stats(
    announcements: &[Announcement],
    key: &ViewingKey,
    class_hash: &FieldElement,
) -> Result<(Vec<WatchOnlyPayment>, ScanStats)> {
    let mut payments = Vec::new();
    let mut stats = ScanStats::default();

    for announcement in announcements {
        stats.scanned += 1;
        match scan_announcement_watch_only(announcement, key, class_hash)? {
            ScanOutcome::TagMismatch => {}
            ScanOutcome::AddressMismatch => stats.tag_matches += 1,
            ScanOutcome::Match(payment) => {
                stats.tag_matches += 1;
                stats.discoveries += 1;
                payments.push(payment);
            }
        }
    }

    info!(
        scanned = stats.scanned,
        discoveries = stats.discoveries,
        "watch-only scan complete"
    );
    Ok((payments, stats))
}
