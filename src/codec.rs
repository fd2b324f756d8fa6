//! ModelCodec - stable byte encoding of a model's fitted state.
//!
//! Every artifact starts with a one-byte format tag so stored bytes outlive
//! the process that wrote them:
//!
//! - `0x01` fixed layout: `mean` and `std` as little-endian `f64` (16 bytes)
//! - `0x02` bitcode envelope carrying the state plus creation time and
//!   training-set size (what `encode` writes today)

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FORMAT_FIXED_F64: u8 = 0x01;
pub const FORMAT_ENVELOPE: u8 = 0x02;

const FIXED_F64_LEN: usize = 16;

/// Fitted parameters of the anomaly model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub mean: f64,
    pub std: f64,
}

impl ModelState {
    pub fn new(mean: f64, std: f64) -> Self {
        ModelState { mean, std }
    }
}

/// A decoded artifact: the state plus whatever metadata its format carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub state: ModelState,
    pub created_at_ms: Option<i64>,
    pub points_used: Option<u64>,
}

impl Artifact {
    pub fn bare(state: ModelState) -> Self {
        Artifact {
            state,
            created_at_ms: None,
            points_used: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    mean: f64,
    std: f64,
    created_at_ms: Option<i64>,
    points_used: Option<u64>,
}

/// Error type for encoding and decoding stored values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("artifact payload is empty")]
    Empty,
    #[error("unknown artifact format tag {0:#04x}")]
    UnknownFormat(u8),
    #[error("artifact format {format:#04x} expects {expected} payload bytes, got {actual}")]
    Length {
        format: u8,
        expected: usize,
        actual: usize,
    },
    #[error("artifact payload error: {0}")]
    Payload(String),
    #[error("malformed version identifier {0:?}")]
    MalformedVersion(String),
}

/// Encoder/decoder for artifact bytes.
pub struct ModelCodec;

impl ModelCodec {
    /// Encode an artifact in the current format.
    pub fn encode(artifact: &Artifact) -> Result<Vec<u8>, CodecError> {
        let envelope = Envelope {
            mean: artifact.state.mean,
            std: artifact.state.std,
            created_at_ms: artifact.created_at_ms,
            points_used: artifact.points_used,
        };
        let body = bitcode::serialize(&envelope)
            .map_err(|e| CodecError::Payload(format!("envelope serialize: {e}")))?;

        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(FORMAT_ENVELOPE);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Encode just the parameters in the fixed layout.
    pub fn encode_fixed(state: &ModelState) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FIXED_F64_LEN + 1);
        bytes.push(FORMAT_FIXED_F64);
        bytes.extend_from_slice(&state.mean.to_le_bytes());
        bytes.extend_from_slice(&state.std.to_le_bytes());
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Artifact, CodecError> {
        let (&tag, body) = bytes.split_first().ok_or(CodecError::Empty)?;
        match tag {
            FORMAT_FIXED_F64 => decode_fixed(body),
            FORMAT_ENVELOPE => decode_envelope(body),
            other => Err(CodecError::UnknownFormat(other)),
        }
    }
}

fn decode_fixed(body: &[u8]) -> Result<Artifact, CodecError> {
    if body.len() != FIXED_F64_LEN {
        return Err(CodecError::Length {
            format: FORMAT_FIXED_F64,
            expected: FIXED_F64_LEN,
            actual: body.len(),
        });
    }
    let (mean, std) = body.split_at(8);
    let read = |half: &[u8]| {
        half.try_into()
            .map(f64::from_le_bytes)
            .map_err(|_| CodecError::Payload("fixed layout slice".into()))
    };
    Ok(Artifact::bare(ModelState::new(read(mean)?, read(std)?)))
}

fn decode_envelope(body: &[u8]) -> Result<Artifact, CodecError> {
    let envelope: Envelope = bitcode::deserialize(body)
        .map_err(|e| CodecError::Payload(format!("envelope deserialize: {e}")))?;
    Ok(Artifact {
        state: ModelState::new(envelope.mean, envelope.std),
        created_at_ms: envelope.created_at_ms,
        points_used: envelope.points_used,
    })
}
