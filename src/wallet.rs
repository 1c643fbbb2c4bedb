//! Wallet Composition
//!
//! Ties the codec, balance tracker, fee estimator and transfer executor
//! together around the identity supplied by an external auth collaborator.
//! Identity is passed in explicitly; there is no ambient singleton. A sign-in
//! re-parameterizes the tracker (resetting its state) and rebuilds the
//! per-identity executor; a sign-out tears the periodic refresh down.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::account_id::{AccountIdentifier, Principal, Subaccount};
use crate::balance::{BalanceState, BalanceTracker};
use crate::config::ClientConfig;
use crate::error::TransferFailure;
use crate::fee::FeeEstimator;
use crate::ledger::{LedgerService, Tokens};
use crate::transfer::{TransferExecutor, TransferReceipt, TransferRequest};

struct Session {
    principal: Principal,
    account: AccountIdentifier,
    executor: TransferExecutor,
}

/// In-memory client over the remote ledger for one user at a time.
pub struct Wallet {
    ledger: Arc<dyn LedgerService>,
    config: ClientConfig,
    tracker: Arc<BalanceTracker>,
    fees: FeeEstimator,
    session: Option<Session>,
}

impl Wallet {
    pub fn new(ledger: Arc<dyn LedgerService>, config: ClientConfig) -> Self {
        Self {
            tracker: Arc::new(BalanceTracker::new(ledger.clone())),
            fees: FeeEstimator::new(ledger.clone()),
            ledger,
            config,
            session: None,
        }
    }

    /// React to an identity becoming available.
    ///
    /// Derives the account address, binds the balance tracker (which fires
    /// the initial refresh), starts the periodic refresh when configured,
    /// and builds the per-identity transfer executor.
    pub async fn sign_in(&mut self, principal: Principal, subaccount: Option<Subaccount>) {
        let account = AccountIdentifier::from_principal(&principal, subaccount.as_ref());
        info!("signing in account {}", account);

        self.tracker.bind(account).await;
        if let Some(interval_ms) = self.config.auto_refresh_interval_ms {
            self.tracker
                .start_auto_refresh(Duration::from_millis(interval_ms));
        }

        let executor = TransferExecutor::new(self.ledger.clone(), self.tracker.clone(), subaccount);
        self.session = Some(Session {
            principal,
            account,
            executor,
        });
    }

    /// React to the identity being cleared: stop the periodic refresh and
    /// reset balance state.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            info!("signing out account {}", session.account);
        }
        self.tracker.clear().await;
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Account address of the signed-in identity.
    pub fn account_id(&self) -> Option<AccountIdentifier> {
        self.session.as_ref().map(|s| s.account)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.session.as_ref().map(|s| &s.principal)
    }

    /// Current balance snapshot.
    pub async fn balance(&self) -> BalanceState {
        self.tracker.state().await
    }

    /// Request a balance refresh.
    pub async fn refresh_balance(&self) {
        self.tracker.refresh().await;
    }

    /// Estimate the current transfer fee (advisory, never errors).
    pub async fn estimate_fee(&self) -> Tokens {
        self.fees.estimate().await
    }

    /// Whether a given destination text would be accepted.
    pub fn validate_address(&self, text: &str) -> bool {
        crate::account_id::parse_user_input(text).is_some()
    }

    /// Submit a transfer from the signed-in identity.
    pub async fn transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferFailure> {
        match &self.session {
            Some(session) => session.executor.transfer(request).await,
            None => Err(TransferFailure::NoIdentity),
        }
    }

    /// Advisory in-flight flag for caller-side backpressure.
    pub fn is_transferring(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.executor.is_transferring())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceStatus;
    use crate::ledger::TransferResult;
    use crate::ledger::mock::MockLedger;

    fn principal(tag: u8) -> Principal {
        Principal::from_slice(&[tag; 10]).unwrap()
    }

    fn config_without_timer() -> ClientConfig {
        ClientConfig {
            auto_refresh_interval_ms: None,
            ..ClientConfig::default()
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn sign_in_derives_account_and_loads_balance() {
        let ledger = Arc::new(MockLedger::new());
        ledger.set_balance(Ok(Tokens::from_e8s(42)));
        let mut wallet = Wallet::new(ledger.clone(), config_without_timer());

        let p = principal(1);
        wallet.sign_in(p.clone(), None).await;
        settle().await;

        assert_eq!(
            wallet.account_id(),
            Some(AccountIdentifier::from_principal(&p, None))
        );
        let balance = wallet.balance().await;
        assert_eq!(balance.status, BalanceStatus::Ready);
        assert_eq!(balance.e8s, 42);
    }

    #[tokio::test]
    async fn transfer_without_session_yields_no_identity() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Wallet::new(ledger, config_without_timer());

        let result = wallet
            .transfer(TransferRequest {
                to: "00".repeat(32),
                amount: "1".into(),
                memo: None,
                fee: None,
            })
            .await;
        assert_eq!(result, Err(TransferFailure::NoIdentity));
    }

    #[tokio::test]
    async fn sign_out_resets_balance_state() {
        let ledger = Arc::new(MockLedger::new());
        ledger.set_balance(Ok(Tokens::from_e8s(42)));
        let mut wallet = Wallet::new(ledger, config_without_timer());

        wallet.sign_in(principal(1), None).await;
        settle().await;
        wallet.sign_out().await;

        assert!(!wallet.is_signed_in());
        assert_eq!(wallet.account_id(), None);
        let balance = wallet.balance().await;
        assert_eq!(balance.status, BalanceStatus::Unknown);
        assert_eq!(balance.e8s, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn identity_change_rebinds_and_sign_out_stops_timer() {
        let ledger = Arc::new(MockLedger::new());
        let mut wallet = Wallet::new(ledger.clone(), ClientConfig::default());

        wallet.sign_in(principal(1), None).await;
        settle().await;
        assert_eq!(ledger.balance_calls(), 1);

        // Identity changes: new initial load, timer restarted
        wallet.sign_in(principal(2), None).await;
        settle().await;
        assert_eq!(ledger.balance_calls(), 2);

        tokio::time::advance(Duration::from_millis(30_000)).await;
        settle().await;
        assert_eq!(ledger.balance_calls(), 3);

        wallet.sign_out().await;
        tokio::time::advance(Duration::from_millis(120_000)).await;
        settle().await;
        assert_eq!(ledger.balance_calls(), 3, "timer must stop at sign-out");
    }

    #[tokio::test]
    async fn subaccount_changes_the_derived_account() {
        let ledger = Arc::new(MockLedger::new());
        let mut wallet = Wallet::new(ledger.clone(), config_without_timer());

        let p = principal(3);
        wallet.sign_in(p.clone(), Some(Subaccount([9u8; 32]))).await;
        let with_sub = wallet.account_id().unwrap();
        assert_ne!(with_sub, AccountIdentifier::from_principal(&p, None));

        // The executor forwards the session subaccount
        settle().await;
        wallet
            .transfer(TransferRequest {
                to: AccountIdentifier::from_principal(&p, None).to_hex(),
                amount: "0.1".into(),
                memo: None,
                fee: None,
            })
            .await
            .unwrap();
        let args = ledger.last_transfer_args().unwrap();
        assert_eq!(args.from_subaccount, Some(Subaccount([9u8; 32])));
    }

    #[tokio::test]
    async fn validate_address_matches_parser() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Wallet::new(ledger, config_without_timer());

        let p = principal(4);
        assert!(wallet.validate_address(&p.to_text()));
        assert!(wallet.validate_address(&AccountIdentifier::from_principal(&p, None).to_hex()));
        assert!(!wallet.validate_address("nope !"));
    }

    #[tokio::test]
    async fn successful_transfer_reports_block_height() {
        let ledger = Arc::new(MockLedger::new());
        ledger.set_transfer_result(Ok(TransferResult::Committed { block_height: 27 }));
        let mut wallet = Wallet::new(ledger.clone(), config_without_timer());

        let p = principal(5);
        wallet.sign_in(p.clone(), None).await;
        settle().await;
        let before = ledger.balance_calls();

        let receipt = wallet
            .transfer(TransferRequest {
                to: AccountIdentifier::from_principal(&principal(6), None).to_hex(),
                amount: "2".into(),
                memo: Some(1),
                fee: None,
            })
            .await
            .unwrap();
        assert_eq!(receipt.block_height, 27);

        settle().await;
        assert_eq!(ledger.balance_calls(), before + 1);
    }
}
