use serde::{Deserialize, Serialize};

use super::u128_string;
use crate::format::{format_amount, DISPLAY_FRAC_DIGITS};

/// Record from `get_account_info_or_default`. An unknown account comes back
/// as a fresh record with zero balance and no tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Claimable balance held by the contract (yocto)
    #[serde(with = "u128_string")]
    pub balance: u128,
    pub ticket_ids: Vec<u64>,
    /// Nanosecond epoch
    pub created_time: u64,
}

impl AccountInfo {
    pub fn ticket_count(&self) -> usize {
        self.ticket_ids.len()
    }
}

/// Signed-in account balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub account_id: String,
    /// Claimable balance held by the contract (yocto)
    pub claimable: u128,
    /// Raw ledger balance of the account (yocto)
    pub wallet_balance: u128,
}

impl Account {
    pub fn new(account_id: impl Into<String>, wallet_balance: u128) -> Self {
        Self {
            account_id: account_id.into(),
            claimable: 0,
            wallet_balance,
        }
    }

    pub fn claimable_display(&self) -> String {
        format_amount(self.claimable, DISPLAY_FRAC_DIGITS)
    }

    pub fn wallet_balance_display(&self) -> String {
        format_amount(self.wallet_balance, DISPLAY_FRAC_DIGITS)
    }

    pub fn can_claim(&self) -> bool {
        self.claimable > 0
    }
}
