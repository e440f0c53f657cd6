//! Detached ECDSA signature over the typed authorization digest.
//!
//! The engine never recovers the signer locally — signer identity and digest
//! correctness are verified by the ledger when the transfer executes. What the
//! engine does enforce, before any network call, is that the 65-byte encoding
//! decomposes into its canonical `(r, s, v)` components.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FlipcoreError, Result};

/// The canonical components of a 65-byte recoverable ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl EcdsaSignature {
    /// Decompose a 0x-prefixed hex blob into signature components.
    ///
    /// Accepts recovery ids in both conventions (0/1 and 27/28), normalizing
    /// to 27/28. Anything that is not exactly 65 decodable bytes with a sane
    /// recovery id is rejected here, keeping malformed input off the ledger.
    ///
    /// # Errors
    /// Returns [`FlipcoreError::MalformedSignature`] on any structural defect.
    pub fn parse(blob: &str) -> Result<Self> {
        let stripped = blob
            .strip_prefix("0x")
            .or_else(|| blob.strip_prefix("0X"))
            .unwrap_or(blob);

        let bytes = hex::decode(stripped).map_err(|e| FlipcoreError::MalformedSignature {
            reason: format!("not hex: {e}"),
        })?;
        if bytes.len() != 65 {
            return Err(FlipcoreError::MalformedSignature {
                reason: format!("expected 65 bytes, got {}", bytes.len()),
            });
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        if r == [0u8; 32] || s == [0u8; 32] {
            return Err(FlipcoreError::MalformedSignature {
                reason: "zero r/s component".to_string(),
            });
        }

        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v @ (27 | 28) => v,
            other => {
                return Err(FlipcoreError::MalformedSignature {
                    reason: format!("recovery id {other} out of range"),
                });
            }
        };

        Ok(Self { r, s, v })
    }
}

impl TryFrom<String> for EcdsaSignature {
    type Error = FlipcoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<EcdsaSignature> for String {
    fn from(sig: EcdsaSignature) -> Self {
        sig.to_string()
    }
}

impl fmt::Display for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}{}{:02x}",
            hex::encode(self.r),
            hex::encode(self.s),
            self.v
        )
    }
}
