//! On-disk framing for persisted objects.
//!
//! Layout (little endian):
//!
//! ```text
//! +-------+---------+-------------+------------------+
//! | magic | version | payload len | bincode payload  |
//! |  u32  |   u16   |     u32     |  payload len B   |
//! +-------+---------+-------------+------------------+
//! ```

use crate::storage::error::{StorageError, StorageResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub const FRAME_MAGIC: u32 = 0x5047_4442;
pub const FRAME_VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 10;

pub fn encode<T: Serialize>(value: &T) -> StorageResult<Bytes> {
    let payload = bincode::serialize(value)?;
    let len = payload_len(payload.len())?;
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u32_le(FRAME_MAGIC);
    buf.put_u16_le(FRAME_VERSION);
    buf.put_u32_le(len);
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// The header length field for a payload of `len` bytes.
fn payload_len(len: usize) -> StorageResult<u32> {
    u32::try_from(len).map_err(|_| StorageError::PayloadTooLarge { len, max: u32::MAX })
}

/// Decodes a frame read from `path`; the path only feeds error messages.
pub fn decode<T: DeserializeOwned>(path: &Path, data: &[u8]) -> StorageResult<T> {
    let corrupted = |reason: String| StorageError::Corrupted {
        path: path.to_path_buf(),
        reason,
    };

    if data.len() < HEADER_SIZE {
        return Err(corrupted(format!(
            "frame too short: {} bytes, header needs {}",
            data.len(),
            HEADER_SIZE
        )));
    }

    let mut buf = data;
    let magic = buf.get_u32_le();
    if magic != FRAME_MAGIC {
        return Err(corrupted(format!("bad magic {:#010x}", magic)));
    }
    let version = buf.get_u16_le();
    if version != FRAME_VERSION {
        return Err(corrupted(format!("unsupported version {}", version)));
    }
    let len = buf.get_u32_le() as usize;
    if buf.remaining() != len {
        return Err(corrupted(format!(
            "payload length {} does not match header {}",
            buf.remaining(),
            len
        )));
    }

    bincode::deserialize(buf).map_err(|e| corrupted(e.to_string()))
}
