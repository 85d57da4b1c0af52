//! Binary payload encoding for log lines.
//!
//! Payloads are rendered as lowercase hex or standard padded base64 into a
//! caller-supplied buffer. The buffer length counts one terminator byte, so
//! an encoding that needs exactly `out.len()` bytes of text does not fit.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

/// Size of the stack buffer the channel facades encode into.
pub const ENCODE_CAPACITY: usize = 512;

/// Text encoding for binary payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Two lowercase hex digits per byte.
    #[default]
    Hex,
    /// RFC 4648 base64 with padding.
    Base64,
}

/// Failures while encoding a payload. The log line is dropped on any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The encoded text (plus terminator) does not fit in the output buffer.
    #[error("encoded payload needs {needed} bytes, buffer holds {capacity}")]
    Overflow {
        /// Bytes required, including the terminator.
        needed: usize,
        /// Bytes available.
        capacity: usize,
    },

    /// The underlying encoder reported a failure.
    #[error("payload encoder failed")]
    Internal,
}

impl Encoding {
    /// Length of the encoded text for `len` input bytes, without terminator.
    pub fn encoded_len(self, len: usize) -> Option<usize> {
        match self {
            Self::Hex => len.checked_mul(2),
            Self::Base64 => base64::encoded_len(len, true),
        }
    }
}

/// Encode `data` into `out`, returning the encoded text.
///
/// Nothing is written to `out` when the result would not fit.
pub fn encode<'a>(
    data: &[u8],
    encoding: Encoding,
    out: &'a mut [u8],
) -> Result<&'a str, EncodeError> {
    let capacity = out.len();
    let needed = encoding
        .encoded_len(data.len())
        .and_then(|len| len.checked_add(1))
        .ok_or(EncodeError::Overflow {
            needed: usize::MAX,
            capacity,
        })?;

    if needed > capacity {
        return Err(EncodeError::Overflow { needed, capacity });
    }

    let text_len = needed - 1;
    let text = &mut out[..text_len];
    match encoding {
        Encoding::Hex => hex::encode_to_slice(data, text).map_err(|_| EncodeError::Internal)?,
        Encoding::Base64 => {
            let written = BASE64
                .encode_slice(data, text)
                .map_err(|_| EncodeError::Internal)?;
            if written != text_len {
                return Err(EncodeError::Internal);
            }
        }
    }

    std::str::from_utf8(&out[..text_len]).map_err(|_| EncodeError::Internal)
}
