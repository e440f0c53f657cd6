//! The settlement-ledger contract.

use std::future::Future;

use flipcore_types::{
    Address, EcdsaSignature, Result, TokenAmount, TransferAuthorization, TransferReceipt,
};

/// Thin client over the external ledger: submits transfers, waits for
/// confirmation, reads balances.
///
/// Futures are `Send` so implementations can be driven from multi-threaded
/// runtimes. Every method that submits a transaction commits the caller to
/// waiting for its outcome — there is no cancellation, and a timeout layered
/// on top must be treated as *unknown outcome*, reconciled out-of-band
/// against the ledger, never as a safe abort.
pub trait SettlementLedger: Send + Sync {
    /// The service-controlled ledger identity used to collect bets and
    /// disburse payouts.
    fn settlement_account(&self) -> Address;

    /// Submit the pull-transfer for a bet and wait for confirmation.
    ///
    /// Must not be called twice for the same authorization: the replay guard
    /// enforces that one layer up, and the ledger's own nonce registry
    /// rejects a reused authorization as a defensive backstop.
    ///
    /// # Errors
    /// `CollectionRejected` when the ledger refuses or reverts the transfer
    /// (bad signer, stale window, consumed nonce, unfunded payer). No funds
    /// moved in that case.
    fn collect_bet(
        &self,
        authorization: &TransferAuthorization,
        signature: &EcdsaSignature,
    ) -> impl Future<Output = Result<TransferReceipt>> + Send;

    /// Submit the payout push-transfer and wait for confirmation.
    ///
    /// Before submission the implementation must check that the settlement
    /// account holds enough native currency for gas and enough of the asset
    /// to cover `amount`, failing fast with a distinguishable precondition
    /// error instead of submitting a transaction that would revert or stall.
    /// The checks are advisory against concurrent payouts — per-identity
    /// transaction ordering on the ledger is the correctness backstop.
    ///
    /// # Errors
    /// `InsufficientGasReserve` / `InsufficientAssetReserve` on a failed
    /// precondition; `PayoutRejected` when the submitted transfer fails.
    fn disburse_payout(
        &self,
        recipient: Address,
        amount: TokenAmount,
    ) -> impl Future<Output = Result<TransferReceipt>> + Send;

    /// Read-only balance query for the wagered asset.
    fn asset_balance(&self, address: Address) -> impl Future<Output = Result<TokenAmount>> + Send;

    /// Read-only balance query for the native gas currency.
    fn native_balance(&self, address: Address) -> impl Future<Output = Result<TokenAmount>> + Send;
}
