//! System-wide constants for the flipcore settlement engine.

/// Minimum accepted bet in base units (0.05 units of a 6-decimal asset).
pub const MIN_BET_UNITS: u128 = 50_000;

/// Maximum accepted bet in base units (1000 units of a 6-decimal asset).
pub const MAX_BET_UNITS: u128 = 1_000_000_000;

/// Decimal places of the wagered asset's base-unit representation.
pub const ASSET_DECIMALS: u32 = 6;

/// Production win probability for a single draw.
pub const WIN_PROBABILITY: f64 = 0.30;

/// Payout multiplier applied to the bet amount on a win.
pub const PAYOUT_MULTIPLIER: u32 = 2;

/// Retention window for consumed replay keys, in seconds.
///
/// Replay protection is bounded, not permanent: once a key expires the same
/// nonce is technically replayable if its signature is still live.
pub const REPLAY_RETENTION_SECS: u64 = 3_600;

/// Maximum replay-guard entries before oldest-first eviction kicks in.
pub const MAX_REPLAY_ENTRIES: usize = 100_000;

/// Minimum native-currency balance (in wei-scale units) the settlement
/// account must hold before a payout is submitted.
pub const GAS_RESERVE_FLOOR: u128 = 1_000_000_000_000_000; // 0.001 native

/// Protocol version of the x402 payment envelope.
pub const X402_VERSION: u32 = 1;

/// The only payment scheme this engine accepts.
pub const SCHEME_EXACT: &str = "exact";

/// Default ledger network identifier.
pub const NETWORK_BASE: &str = "base";

/// USDC contract address on the default network.
pub const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// Maximum client-side timeout advertised in the capability document.
pub const MAX_TIMEOUT_SECS: u64 = 3_600;

/// Default API listen port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "flipcore";
