use tracing::info;

use crate::api::{Ledger, LedgerError, LottoContract};
use crate::state::{Account, ViewState};

/// Connection state resolved once at startup and passed to every component.
pub struct Session<L> {
    account_id: Option<String>,
    contract: LottoContract<L>,
    owner_id: String,
    /// Raw ledger balance of the signer (yocto), 0 when signed out
    wallet_balance: u128,
}

impl<L: Ledger> Session<L> {
    /// Fetch the owner id and the signer's ledger balance. No retries: any
    /// failure is returned to the caller.
    pub async fn bootstrap(
        contract: LottoContract<L>,
        account_id: Option<String>,
    ) -> Result<Self, LedgerError> {
        let owner_id = contract.get_owner_id().await?;
        let wallet_balance = match &account_id {
            Some(id) => contract.ledger().account_balance(id).await?,
            None => 0,
        };

        info!(
            contract = contract.contract_id(),
            account_id = ?account_id,
            owner_id = %owner_id,
            "session ready"
        );

        Ok(Self {
            account_id,
            contract,
            owner_id,
            wallet_balance,
        })
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.account_id.is_some()
    }

    pub fn contract(&self) -> &LottoContract<L> {
        &self.contract
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Whether the connected account may run owner actions.
    pub fn is_owner(&self) -> bool {
        self.account_id.as_deref() == Some(self.owner_id.as_str())
    }

    pub fn wallet_balance(&self) -> u128 {
        self.wallet_balance
    }

    /// Signed-in account with its claimable balance from `state`.
    pub fn account(&self, state: &ViewState) -> Option<Account> {
        let account_id = self.account_id.as_deref()?;
        Some(Account {
            claimable: state.claimable(),
            ..Account::new(account_id, self.wallet_balance)
        })
    }
}
