//! The memo codec.
//!
//! A UTF-8 memo packs into felts as a byte-length prefix followed by
//! 31-byte big-endian chunks: each chunk felt is the integer value of its
//! bytes, so the chunk's first byte is the most significant. The length
//! prefix drives decoding; the last chunk is partial when the length is
//! not a multiple of 31. The empty string encodes as the single felt `0`.

use starknet_crypto::FieldElement;

use amora_core::constants::MEMO_CHUNK_SIZE;
use amora_core::{AmoraError, Result};

use crate::felt_str::felt_to_u64;

/// Encodes a UTF-8 memo into its felt representation.
pub fn encode_memo(memo: &str) -> Vec<FieldElement> {
    let bytes = memo.as_bytes();
    let mut out = Vec::with_capacity(1 + bytes.len() / MEMO_CHUNK_SIZE + 1);
    out.push(FieldElement::from(bytes.len()));
    for chunk in bytes.chunks(MEMO_CHUNK_SIZE) {
        out.push(chunk_to_felt(chunk));
    }
    out
}

/// Decodes a felt-encoded memo back to a string.
pub fn decode_memo(felts: &[FieldElement]) -> Result<String> {
    let (length, chunks) = felts
        .split_first()
        .ok_or_else(|| AmoraError::InvalidFormat("memo encoding is empty".into()))?;
    let total = felt_to_u64(length)
        .ok_or_else(|| AmoraError::InvalidFormat("memo length prefix is not a byte count".into()))?
        as usize;

    let expected_chunks = total.div_ceil(MEMO_CHUNK_SIZE);
    if chunks.len() != expected_chunks {
        return Err(AmoraError::InvalidFormat(format!(
            "memo of {total} bytes needs {expected_chunks} chunks, got {}",
            chunks.len()
        )));
    }

    let mut bytes = Vec::with_capacity(total);
    let mut remaining = total;
    for chunk in chunks {
        let take = remaining.min(MEMO_CHUNK_SIZE);
        let be = chunk.to_bytes_be();
        // A chunk of `take` bytes may not carry value above them.
        if be[..32 - take].iter().any(|b| *b != 0) {
            return Err(AmoraError::InvalidFormat(
                "memo chunk exceeds its byte width".into(),
            ));
        }
        bytes.extend_from_slice(&be[32 - take..]);
        remaining -= take;
    }

    String::from_utf8(bytes)
        .map_err(|_| AmoraError::InvalidFormat("memo is not valid UTF-8".into()))
}

fn chunk_to_felt(chunk: &[u8]) -> FieldElement {
    let mut buf = [0u8; 32];
    buf[32 - chunk.len()..].copy_from_slice(chunk);
    // At most 31 bytes, so the value stays below 2^248 and always fits.
    FieldElement::from_bytes_be(&buf).unwrap_or(FieldElement::ZERO)
}
