//! Identifiers used throughout flipcore.
//!
//! Ledger-facing identifiers (`Address`, `AuthNonce`, `TxHash`) are fixed-size
//! byte arrays carried as 0x-prefixed hex on the wire. Per-request attempt
//! ids use UUIDv7 for time-ordered lexicographic sorting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FlipcoreError;

fn decode_fixed_hex<const N: usize>(raw: &str) -> Result<[u8; N], String> {
    let stripped = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if stripped.len() != N * 2 {
        return Err(format!(
            "expected {} hex characters, got {}",
            N * 2,
            stripped.len()
        ));
    }
    let bytes = hex::decode(stripped).map_err(|e| e.to_string())?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte ledger account address.
///
/// Parsed from 0x-prefixed hex in any case; displayed and compared in
/// canonical lowercase, so equality is case-insensitive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    /// Short form for log lines (first 4 bytes).
    #[must_use]
    pub fn short(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Address {
    type Err = FlipcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<20>(s)
            .map(Self)
            .map_err(FlipcoreError::MalformedAddress)
    }
}

impl TryFrom<String> for Address {
    type Error = FlipcoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// AuthNonce
// ---------------------------------------------------------------------------

/// The signer-chosen 32-byte unique token of a transfer authorization.
///
/// Opaque to the engine: uniqueness per payer is the signer's responsibility,
/// enforced downstream by the replay guard and the ledger's own nonce
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthNonce(pub [u8; 32]);

impl FromStr for AuthNonce {
    type Err = FlipcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<32>(s)
            .map(Self)
            .map_err(FlipcoreError::MalformedNonce)
    }
}

impl TryFrom<String> for AuthNonce {
    type Error = FlipcoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuthNonce> for String {
    fn from(nonce: AuthNonce) -> Self {
        nonce.to_string()
    }
}

impl fmt::Display for AuthNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// A 32-byte confirmed-transaction identifier returned by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Deterministic hash for ledger implementations that synthesize their
    /// own transaction identifiers (the in-memory reference ledger).
    #[must_use]
    pub fn deterministic(tag: &str, sequence: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"flipcore:tx:v1:");
        hasher.update(tag.as_bytes());
        hasher.update(sequence.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }
}

impl FromStr for TxHash {
    type Err = FlipcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<32>(s)
            .map(Self)
            .map_err(|e| FlipcoreError::InvalidPayload {
                reason: format!("bad transaction hash: {e}"),
            })
    }
}

impl TryFrom<String> for TxHash {
    type Error = FlipcoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.to_string()
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// AttemptId
// ---------------------------------------------------------------------------

/// Unique identifier for one wager attempt. Uses UUIDv7 for time-ordered
/// sorting in logs; never persisted beyond the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wager:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ReplayKey
// ---------------------------------------------------------------------------

/// The unit of replay tracking: `lowercase(payer) + "-" + nonce`.
///
/// Derived, never parsed — both components render in canonical lowercase hex,
/// so two authorizations differing only in address case collide, which is the
/// point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayKey(String);

impl ReplayKey {
    #[must_use]
    pub fn derive(payer: &Address, nonce: &AuthNonce) -> Self {
        Self(format!("{payer}-{nonce}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
