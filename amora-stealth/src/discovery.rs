//! Recipient-side payment discovery.
//!
//! Per announcement the recipient runs a short pipeline:
//!
//! ```text
//! shared secret -> view-tag check -> address reconstruction -> spending key
//! ```
//!
//! The view tag rejects ~255/256 of foreign announcements with one scalar
//! multiplication and one Poseidon; only tag hits pay for the point
//! addition and the address hash. Reconstruction defends against view-tag
//! collisions: a tag hit whose rebuilt address differs is still "not
//! ours". Curve failures are errors, never a "no match".

use starknet_crypto::FieldElement;

use amora_core::{Announcement, Result, StealthKeys, StealthPayment, ViewingKey, WatchOnlyPayment};
use amora_crypto::contract_address::compute_account_address;
use amora_crypto::curve::add_mod_order;
use amora_crypto::hash::{poseidon, view_tag_matches};
use amora_crypto::keys::shared_secret;

use crate::payment::derive_stealth_public_key;

/// Where an announcement left the scan pipeline.
#[derive(Debug)]
pub enum ScanOutcome<P> {
    /// The view tag did not match; ~255/256 of foreign announcements.
    TagMismatch,
    /// The tag matched but the reconstructed address did not: a view-tag
    /// collision with someone else's payment.
    AddressMismatch,
    /// The announcement pays us.
    Match(P),
}

impl<P> ScanOutcome<P> {
    /// True for a tag hit, regardless of the final verdict.
    pub fn passed_tag(&self) -> bool {
        !matches!(self, ScanOutcome::TagMismatch)
    }

    /// The payment, if the announcement matched.
    pub fn into_match(self) -> Option<P> {
        match self {
            ScanOutcome::Match(payment) => Some(payment),
            _ => None,
        }
    }
}

/// Derives the one-time spending key `(k_spend + H(s)) mod N`.
pub fn derive_stealth_private_key(
    spending_secret: &FieldElement,
    shared: &FieldElement,
) -> FieldElement {
    add_mod_order(spending_secret, &poseidon(&[*shared]))
}

/// Runs the full pipeline for one announcement.
pub fn scan_announcement(
    announcement: &Announcement,
    keys: &StealthKeys,
    class_hash: &FieldElement,
) -> Result<ScanOutcome<StealthPayment>> {
    announcement.validate()?;
    let shared = shared_secret(&keys.viewing.secret, &announcement.ephemeral_public_key)?;
    if !view_tag_matches(&shared, announcement.view_tag) {
        return Ok(ScanOutcome::TagMismatch);
    }

    let stealth_public_key = derive_stealth_public_key(&keys.spending.public, &shared)?;
    let expected = compute_account_address(&stealth_public_key, class_hash);
    if expected != announcement.stealth_address {
        return Ok(ScanOutcome::AddressMismatch);
    }

    let stealth_private_key = derive_stealth_private_key(&keys.spending.secret, &shared);
    Ok(ScanOutcome::Match(StealthPayment {
        announcement: announcement.clone(),
        shared_secret: shared,
        stealth_public_key,
        stealth_private_key,
    }))
}

/// Runs the pipeline with a watch-only capability: identical up to the
/// address confirmation, then stops short of the spending key.
pub fn scan_announcement_watch_only(
    announcement: &Announcement,
    key: &ViewingKey,
    class_hash: &FieldElement,
) -> Result<ScanOutcome<WatchOnlyPayment>> {
    announcement.validate()?;
    let shared = shared_secret(&key.viewing_secret, &announcement.ephemeral_public_key)?;
    if !view_tag_matches(&shared, announcement.view_tag) {
        return Ok(ScanOutcome::TagMismatch);
    }

    let stealth_public_key = derive_stealth_public_key(&key.spending_public_key, &shared)?;
    let expected = compute_account_address(&stealth_public_key, class_hash);
    if expected != announcement.stealth_address {
        return Ok(ScanOutcome::AddressMismatch);
    }

    Ok(ScanOutcome::Match(WatchOnlyPayment {
        announcement: announcement.clone(),
        shared_secret: shared,
        stealth_public_key,
    }))
}

/// Convenience form of [`scan_announcement`]: `None` for any miss.
pub fn check_announcement(
    announcement: &Announcement,
    keys: &StealthKeys,
    class_hash: &FieldElement,
) -> Result<Option<StealthPayment>> {
    Ok(scan_announcement(announcement, keys, class_hash)?.into_match())
}

/// Convenience form of [`scan_announcement_watch_only`].
pub fn check_announcement_watch_only(
    announcement: &Announcement,
    key: &ViewingKey,
    class_hash: &FieldElement,
) -> Result<Option<WatchOnlyPayment>> {
    Ok(scan_announcement_watch_only(announcement, key, class_hash)?.into_match())
}
