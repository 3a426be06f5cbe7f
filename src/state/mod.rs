mod account;
mod jackpot;
mod ticket;

pub use account::{Account, AccountInfo};
pub use jackpot::{find_containing, has_open_jackpot, DrawResult, Jackpot, JackpotStatus};
pub use ticket::{join_tickets, outcome, Ticket, TicketOutcome, TicketView};

#[cfg(test)]
pub(crate) use jackpot::jackpot;

/// Everything the dashboard shows. Rebuilt by the synchronizer, never
/// authoritative: the contract is the source of truth.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Claimable balance (yocto); None when signed out or not fetched yet
    pub balance: Option<u128>,
    pub jackpots: Vec<Jackpot>,
    pub account_info: Option<AccountInfo>,
    pub tickets: Vec<TicketView>,
}

impl ViewState {
    pub fn has_open_jackpot(&self) -> bool {
        has_open_jackpot(&self.jackpots)
    }

    /// Claimable balance, zero when unknown.
    pub fn claimable(&self) -> u128 {
        self.balance.unwrap_or(0)
    }
}

/// U128 values travel as decimal strings on the wire.
pub(crate) mod u128_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
