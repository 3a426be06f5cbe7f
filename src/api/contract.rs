use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{FunctionCall, Ledger, LedgerError, DEFAULT_GAS};
use crate::state::{AccountInfo, Jackpot, Ticket};

/// Typed proxy over the lottery contract's view and change methods.
pub struct LottoContract<L> {
    ledger: L,
    contract_id: String,
    gas: u64,
}

impl<L: Ledger> LottoContract<L> {
    pub fn new(ledger: L, contract_id: impl Into<String>) -> Self {
        Self {
            ledger,
            contract_id: contract_id.into(),
            gas: DEFAULT_GAS,
        }
    }

    /// Override the gas attached to change calls.
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    async fn view<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T, LedgerError> {
        debug!(method, "view call");
        let value = self
            .ledger
            .view_function(&self.contract_id, method, args)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn change(&self, method: &str, args: Value, deposit: u128) -> Result<Value, LedgerError> {
        let call = FunctionCall {
            contract_id: self.contract_id.clone(),
            method: method.to_string(),
            args,
            gas: self.gas,
            deposit,
        };
        info!(method, gas = self.gas, deposit = %deposit, "change call");
        self.ledger.call_function(&call).await
    }

    // =========================================================================
    // VIEW METHODS
    // =========================================================================

    pub async fn get_owner_id(&self) -> Result<String, LedgerError> {
        self.view("get_owner_id", json!({})).await
    }

    /// Claimable balance held by the contract for `account_id` (yocto).
    pub async fn get_account_balance(&self, account_id: &str) -> Result<u128, LedgerError> {
        let raw: String = self
            .view("get_account_balance", json!({ "account_id": account_id }))
            .await?;
        raw.parse()
            .map_err(|_| LedgerError::Contract(format!("bad balance: {}", raw)))
    }

    pub async fn get_jackpots(&self) -> Result<Vec<Jackpot>, LedgerError> {
        self.view("get_jackpots", json!({})).await
    }

    pub async fn get_account_info_or_default(
        &self,
        account_id: &str,
    ) -> Result<AccountInfo, LedgerError> {
        self.view("get_account_info_or_default", json!({ "account_id": account_id }))
            .await
    }

    pub async fn get_account_tickets(&self, account_id: &str) -> Result<Vec<Ticket>, LedgerError> {
        self.view("get_account_tickets", json!({ "account_id": account_id }))
            .await
    }

    // =========================================================================
    // CHANGE METHODS
    // =========================================================================

    /// Initialize the contract.
    pub async fn new_contract(&self, owner_id: &str) -> Result<(), LedgerError> {
        self.change("new", json!({ "owner_id": owner_id }), 0).await?;
        Ok(())
    }

    pub async fn set_owner_id(&self, owner_id: &str) -> Result<(), LedgerError> {
        self.change("set_owner_id", json!({ "owner_id": owner_id }), 0)
            .await?;
        Ok(())
    }

    /// Open a new jackpot seeded with `amount` (yocto).
    pub async fn create_jackpot(&self, amount: u128) -> Result<(), LedgerError> {
        self.change("create_jackpot", json!({}), amount).await?;
        Ok(())
    }

    pub async fn deposit(&self, amount: u128) -> Result<(), LedgerError> {
        self.change("deposit", json!({}), amount).await?;
        Ok(())
    }

    pub async fn withdraw(&self) -> Result<(), LedgerError> {
        self.change("withdraw", json!({}), 0).await?;
        Ok(())
    }

    pub async fn buy_ticket(&self, picked_numbers: [u8; 6]) -> Result<(), LedgerError> {
        self.change("buy_ticket", json!({ "picked_numbers": picked_numbers }), 0)
            .await?;
        Ok(())
    }

    pub async fn draw_jackpot(&self, force_win: bool) -> Result<(), LedgerError> {
        self.change("draw_jackpot", json!({ "force_win": force_win }), 0)
            .await?;
        Ok(())
    }
}
