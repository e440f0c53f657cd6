//! In-memory reference ledger.
//!
//! Emulates the subset of chain behavior the engine depends on:
//! authorization validity windows, a per-(payer, nonce) consumed registry,
//! per-address asset and native balances, monotonic block numbers, and
//! deterministic transaction hashes. Used by the test suites and the dev
//! gateway; a production deployment implements [`SettlementLedger`] against
//! a real RPC client instead.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use flipcore_types::{
    Address, AuthNonce, EcdsaSignature, FlipcoreError, Result, TokenAmount,
    TransferAuthorization, TransferReceipt, TxHash,
};

use crate::client::SettlementLedger;

#[derive(Debug, Default)]
struct ChainState {
    asset_balances: HashMap<Address, u128>,
    native_balances: HashMap<Address, u128>,
    consumed_nonces: HashSet<(Address, AuthNonce)>,
    block_number: u64,
    tx_sequence: u64,
    collection_attempts: u64,
    payout_attempts: u64,
    reject_payouts: bool,
}

/// A self-contained ledger emulation behind the [`SettlementLedger`] trait.
#[derive(Debug)]
pub struct InMemoryLedger {
    settlement_account: Address,
    gas_reserve_floor: TokenAmount,
    state: Mutex<ChainState>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new(settlement_account: Address, gas_reserve_floor: TokenAmount) -> Self {
        Self {
            settlement_account,
            gas_reserve_floor,
            state: Mutex::new(ChainState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().expect("ledger state lock poisoned")
    }

    /// Seed an asset balance (faucet; not part of the ledger contract).
    pub fn credit_asset(&self, address: Address, amount: TokenAmount) {
        let mut chain = self.lock();
        *chain.asset_balances.entry(address).or_insert(0) += amount.units();
    }

    /// Seed a native-currency balance.
    pub fn credit_native(&self, address: Address, amount: TokenAmount) {
        let mut chain = self.lock();
        *chain.native_balances.entry(address).or_insert(0) += amount.units();
    }

    /// Drain a native-currency balance (test scaffolding for gas-starved
    /// precondition paths).
    pub fn drain_native(&self, address: Address) {
        self.lock().native_balances.remove(&address);
    }

    /// How many collection transfers were attempted (including rejected
    /// ones). The validation suites assert this stays at zero for
    /// pre-ledger rejections.
    #[must_use]
    pub fn collection_attempts(&self) -> u64 {
        self.lock().collection_attempts
    }

    /// How many payout transfers were attempted.
    #[must_use]
    pub fn payout_attempts(&self) -> u64 {
        self.lock().payout_attempts
    }

    /// Force every subsequent payout submission to fail after its
    /// preconditions pass. **Never use in production.**
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn set_reject_payouts(&self, reject: bool) {
        self.lock().reject_payouts = reject;
    }

    fn next_receipt(chain: &mut ChainState, tag: &str, amount: TokenAmount) -> TransferReceipt {
        chain.tx_sequence += 1;
        chain.block_number += 1;
        TransferReceipt {
            tx_hash: TxHash::deterministic(tag, chain.tx_sequence),
            block_number: chain.block_number,
            amount,
        }
    }

    fn now_unix() -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

impl SettlementLedger for InMemoryLedger {
    fn settlement_account(&self) -> Address {
        self.settlement_account
    }

    async fn collect_bet(
        &self,
        authorization: &TransferAuthorization,
        _signature: &EcdsaSignature,
    ) -> Result<TransferReceipt> {
        let now = Self::now_unix();
        let mut chain = self.lock();
        chain.collection_attempts += 1;

        // The ledger's own verification of the authorization. Signer
        // recovery is out of scope for the emulation; the structural
        // signature checks already ran in the validator.
        if now <= authorization.valid_after {
            return Err(FlipcoreError::CollectionRejected {
                reason: "authorization not yet valid".to_string(),
            });
        }
        if now >= authorization.valid_before {
            return Err(FlipcoreError::CollectionRejected {
                reason: "authorization expired".to_string(),
            });
        }

        let nonce_key = (authorization.from, authorization.nonce);
        if chain.consumed_nonces.contains(&nonce_key) {
            return Err(FlipcoreError::CollectionRejected {
                reason: "authorization nonce already used".to_string(),
            });
        }

        let value = authorization.value.units();
        let payer_balance = chain
            .asset_balances
            .get(&authorization.from)
            .copied()
            .unwrap_or(0);
        if payer_balance < value {
            return Err(FlipcoreError::CollectionRejected {
                reason: "transfer amount exceeds payer balance".to_string(),
            });
        }

        chain
            .asset_balances
            .insert(authorization.from, payer_balance - value);
        *chain.asset_balances.entry(authorization.to).or_insert(0) += value;
        chain.consumed_nonces.insert(nonce_key);

        let receipt = Self::next_receipt(&mut chain, "transfer", authorization.value);
        tracing::info!(
            from = %authorization.from.short(),
            value = %authorization.value,
            tx = %receipt.tx_hash,
            block = receipt.block_number,
            "bet collection confirmed"
        );
        Ok(receipt)
    }

    async fn disburse_payout(
        &self,
        recipient: Address,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        let mut chain = self.lock();
        chain.payout_attempts += 1;

        let native = chain
            .native_balances
            .get(&self.settlement_account)
            .copied()
            .unwrap_or(0);
        if native < self.gas_reserve_floor.units() {
            return Err(FlipcoreError::InsufficientGasReserve {
                needed: self.gas_reserve_floor,
                available: TokenAmount(native),
            });
        }

        let reserve = chain
            .asset_balances
            .get(&self.settlement_account)
            .copied()
            .unwrap_or(0);
        if reserve < amount.units() {
            return Err(FlipcoreError::InsufficientAssetReserve {
                needed: amount,
                available: TokenAmount(reserve),
            });
        }

        if chain.reject_payouts {
            return Err(FlipcoreError::PayoutRejected {
                reason: "payout transaction reverted".to_string(),
            });
        }

        chain
            .asset_balances
            .insert(self.settlement_account, reserve - amount.units());
        *chain.asset_balances.entry(recipient).or_insert(0) += amount.units();

        let receipt = Self::next_receipt(&mut chain, "payout", amount);
        tracing::info!(
            recipient = %recipient.short(),
            amount = %amount,
            tx = %receipt.tx_hash,
            block = receipt.block_number,
            "payout confirmed"
        );
        Ok(receipt)
    }

    async fn asset_balance(&self, address: Address) -> Result<TokenAmount> {
        Ok(TokenAmount(
            self.lock().asset_balances.get(&address).copied().unwrap_or(0),
        ))
    }

    async fn native_balance(&self, address: Address) -> Result<TokenAmount> {
        Ok(TokenAmount(
            self.lock()
                .native_balances
                .get(&address)
                .copied()
                .unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement() -> Address {
        "0xea55e1a310202453685d91dcf654db9d38a286a3".parse().unwrap()
    }

    fn payer() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn sig() -> EcdsaSignature {
        EcdsaSignature {
            r: [0x11; 32],
            s: [0x22; 32],
            v: 27,
        }
    }

    fn ledger() -> InMemoryLedger {
        let ledger = InMemoryLedger::new(settlement(), TokenAmount(1_000_000_000_000_000));
        ledger.credit_asset(payer(), TokenAmount(10_000_000));
        ledger.credit_asset(settlement(), TokenAmount(2_000_000_000));
        ledger.credit_native(settlement(), TokenAmount(1_000_000_000_000_000_000));
        ledger
    }

    #[tokio::test]
    async fn collect_moves_funds_and_consumes_nonce() {
        let ledger = ledger();
        let auth = TransferAuthorization::dummy(payer(), settlement(), 50_000);

        let receipt = ledger.collect_bet(&auth, &sig()).await.unwrap();
        assert_eq!(receipt.amount, TokenAmount(50_000));
        assert!(receipt.block_number > 0);

        assert_eq!(
            ledger.asset_balance(payer()).await.unwrap(),
            TokenAmount(9_950_000)
        );
        assert_eq!(
            ledger.asset_balance(settlement()).await.unwrap(),
            TokenAmount(2_000_050_000)
        );
    }

    #[tokio::test]
    async fn reused_nonce_rejected() {
        let ledger = ledger();
        let auth = TransferAuthorization::dummy(payer(), settlement(), 50_000);

        ledger.collect_bet(&auth, &sig()).await.unwrap();
        let err = ledger.collect_bet(&auth, &sig()).await.unwrap_err();
        assert!(matches!(err, FlipcoreError::CollectionRejected { .. }));

        // Only the first transfer moved funds.
        assert_eq!(
            ledger.asset_balance(payer()).await.unwrap(),
            TokenAmount(9_950_000)
        );
    }

    #[tokio::test]
    async fn stale_window_rejected_without_moving_funds() {
        let ledger = ledger();
        let mut auth = TransferAuthorization::dummy(payer(), settlement(), 50_000);
        auth.valid_before = 1; // long past

        let err = ledger.collect_bet(&auth, &sig()).await.unwrap_err();
        assert!(matches!(err, FlipcoreError::CollectionRejected { .. }));
        assert_eq!(
            ledger.asset_balance(payer()).await.unwrap(),
            TokenAmount(10_000_000)
        );
        assert_eq!(ledger.collection_attempts(), 1);
    }

    #[tokio::test]
    async fn unfunded_payer_rejected() {
        let ledger = ledger();
        let stranger: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();
        let auth = TransferAuthorization::dummy(stranger, settlement(), 50_000);

        let err = ledger.collect_bet(&auth, &sig()).await.unwrap_err();
        assert!(matches!(err, FlipcoreError::CollectionRejected { .. }));
    }

    #[tokio::test]
    async fn payout_happy_path() {
        let ledger = ledger();
        let receipt = ledger
            .disburse_payout(payer(), TokenAmount(100_000))
            .await
            .unwrap();
        assert_eq!(receipt.amount, TokenAmount(100_000));
        assert_eq!(
            ledger.asset_balance(payer()).await.unwrap(),
            TokenAmount(10_100_000)
        );
        assert_eq!(
            ledger.asset_balance(settlement()).await.unwrap(),
            TokenAmount(1_999_900_000)
        );
    }

    #[tokio::test]
    async fn payout_fails_fast_on_gas_reserve() {
        let ledger = ledger();
        ledger.drain_native(settlement());

        let err = ledger
            .disburse_payout(payer(), TokenAmount(100_000))
            .await
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::InsufficientGasReserve { .. }));
        // Nothing was submitted; asset balances untouched.
        assert_eq!(
            ledger.asset_balance(settlement()).await.unwrap(),
            TokenAmount(2_000_000_000)
        );
    }

    #[tokio::test]
    async fn payout_fails_fast_on_asset_reserve() {
        let ledger = InMemoryLedger::new(settlement(), TokenAmount(1));
        ledger.credit_native(settlement(), TokenAmount(10));
        ledger.credit_asset(settlement(), TokenAmount(50_000));

        let err = ledger
            .disburse_payout(payer(), TokenAmount(100_000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlipcoreError::InsufficientAssetReserve {
                needed: TokenAmount(100_000),
                available: TokenAmount(50_000),
            }
        ));
    }

    #[tokio::test]
    async fn injected_submission_failure_is_distinct_from_preconditions() {
        let ledger = ledger();
        ledger.set_reject_payouts(true);

        let err = ledger
            .disburse_payout(payer(), TokenAmount(100_000))
            .await
            .unwrap_err();
        assert!(matches!(err, FlipcoreError::PayoutRejected { .. }));
    }

    #[tokio::test]
    async fn tx_hashes_are_unique_per_transfer() {
        let ledger = ledger();
        let a = TransferAuthorization::dummy(payer(), settlement(), 50_000);
        let b = TransferAuthorization::dummy(payer(), settlement(), 60_000);

        let ra = ledger.collect_bet(&a, &sig()).await.unwrap();
        let rb = ledger.collect_bet(&b, &sig()).await.unwrap();
        assert_ne!(ra.tx_hash, rb.tx_hash);
        assert!(rb.block_number > ra.block_number);
    }
}
