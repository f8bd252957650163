//! Announcement event parsing.
//!
//! The registry's `Announcement` event carries its data fields in a fixed
//! order:
//!
//! ```text
//! [stealth_address, caller_address, ephemeral_pub, view_tag, metadata_len, metadata...]
//! ```
//!
//! Records with fewer than four data fields are malformed. A declared
//! metadata length that runs past the end of the record is tolerated and
//! truncated at the data length.

use starknet_crypto::FieldElement;

use amora_core::constants::MIN_EVENT_DATA_FIELDS;
use amora_core::{AmoraError, Announcement, Result};

use crate::felt_str::felt_to_u64;

/// Parses one announcement event record.
pub fn announcement_from_event(
    data: &[FieldElement],
    block_number: Option<u64>,
    transaction_hash: Option<FieldElement>,
) -> Result<Announcement> {
    if data.len() < MIN_EVENT_DATA_FIELDS {
        return Err(AmoraError::InvalidFormat(format!(
            "announcement event has {} data fields, need at least {MIN_EVENT_DATA_FIELDS}",
            data.len()
        )));
    }

    let view_tag = felt_to_u64(&data[3])
        .filter(|tag| *tag < 256)
        .ok_or_else(|| AmoraError::InvalidFormat("announcement view tag is not a byte".into()))?
        as u8;

    let declared = data
        .get(MIN_EVENT_DATA_FIELDS)
        .and_then(felt_to_u64)
        .map(|len| len as usize)
        .unwrap_or(usize::MAX);
    let tail: &[FieldElement] = data.get(MIN_EVENT_DATA_FIELDS + 1..).unwrap_or_default();
    let metadata = tail[..declared.min(tail.len())].to_vec();

    let announcement = Announcement {
        stealth_address: data[0],
        caller_address: Some(data[1]),
        ephemeral_public_key: data[2],
        view_tag,
        metadata,
        block_number,
        transaction_hash,
    };
    announcement.validate()?;
    Ok(announcement)
}
