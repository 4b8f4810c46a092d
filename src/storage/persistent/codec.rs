//! Binary codec for artifact files.
//!
//! Each file holds exactly one artifact, serialized as:
//! - magic bytes identifying draftlift files
//! - a codec version byte for forward compatibility
//! - a length-prefixed JSON payload
//! - a CRC32 trailer for corruption detection

use std::io::{Error as IoError, ErrorKind, Read, Result as IoResult};

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Serialize};

/// Current codec version.
const CODEC_VERSION: u8 = 1;

/// Magic bytes identifying draftlift artifact files.
pub const MAGIC: [u8; 4] = *b"DLFT";

/// Largest payload the decoder will accept (64 MB). Real artifacts are a few
/// megabytes at most; anything larger is a corrupt length prefix.
const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Serializes a value into a framed, checksummed byte buffer.
///
/// Format:
/// ```text
/// [magic: 4 bytes][version: 1 byte][length: 4 bytes LE][data: N bytes JSON][crc32: 4 bytes LE]
/// ```
pub fn encode<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let data = serde_json::to_vec(value).map_err(|e| {
        IoError::new(ErrorKind::InvalidData, format!("serialization failed: {e}"))
    })?;

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let crc = hasher.finalize();

    let len = u32::try_from(data.len()).map_err(|_| {
        IoError::new(ErrorKind::InvalidData, "payload exceeds u32 length prefix")
    })?;

    let mut out = Vec::with_capacity(4 + 1 + 4 + data.len() + 4);
    out.extend_from_slice(&MAGIC);
    out.push(CODEC_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&crc.to_le_bytes());

    Ok(out)
}

/// Deserializes a value from a reader, verifying magic, version, and CRC.
///
/// # Errors
/// - `InvalidData` if the magic or codec version is wrong, the checksum
///   fails, or the payload does not deserialize.
pub fn decode<T: DeserializeOwned>(reader: &mut impl Read) -> IoResult<T> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            "not a draftlift artifact file (bad magic)",
        ));
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;
    if version[0] != CODEC_VERSION {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!(
                "unsupported codec version: {} (expected {CODEC_VERSION})",
                version[0]
            ),
        ));
    }

    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_PAYLOAD_SIZE {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("payload length {len} exceeds maximum {MAX_PAYLOAD_SIZE}"),
        ));
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;

    let mut crc_bytes = [0u8; 4];
    reader.read_exact(&mut crc_bytes)?;
    let stored_crc = u32::from_le_bytes(crc_bytes);

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let computed_crc = hasher.finalize();
    if stored_crc != computed_crc {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("checksum mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}"),
        ));
    }

    serde_json::from_slice(&data).map_err(|e| {
        IoError::new(ErrorKind::InvalidData, format!("deserialization failed: {e}"))
    })
}
