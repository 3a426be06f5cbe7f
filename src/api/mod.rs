pub mod contract;
pub mod rpc;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

use serde_json::Value;
use thiserror::Error;

pub use contract::LottoContract;
pub use rpc::{NearLedger, RpcClient};
pub use wallet::{RelayWallet, Wallet, WalletError};

/// Gas attached to every change call (200 Tgas).
pub const DEFAULT_GAS: u64 = 200_000_000_000_000;

/// A change-method invocation, handed to the wallet for signing.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub contract_id: String,
    pub method: String,
    pub args: Value,
    pub gas: u64,
    /// Attached value (yocto)
    pub deposit: u128,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rpc error {name}: {message}")]
    Rpc { name: String, message: String },
    #[error("contract error: {0}")]
    Contract(String),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("wallet: {0}")]
    Wallet(#[from] WalletError),
    #[error("not signed in")]
    NotSignedIn,
}

/// Remote ledger seam. View calls are free; change calls go through a signer.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Run a read-only contract method and return its JSON result.
    async fn view_function(
        &self,
        contract_id: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, LedgerError>;

    /// Sign and submit a change call, returning the method's JSON result.
    async fn call_function(&self, call: &FunctionCall) -> Result<Value, LedgerError>;

    /// Raw ledger balance of an account (yocto).
    async fn account_balance(&self, account_id: &str) -> Result<u128, LedgerError>;
}
