use serde::{Deserialize, Serialize};

use super::u128_string;

/// Jackpot lifecycle as reported by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JackpotStatus {
    Open,
    #[serde(rename = "Close")]
    Closed,
}

/// One draw over a jackpot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    #[serde(rename = "drawedNumbers")]
    pub numbers: [u8; 6],

    /// Nanosecond epoch
    #[serde(rename = "createdTime")]
    pub created_time: u64,
}

/// Jackpot projection returned by `get_jackpots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jackpot {
    pub id: u64,

    /// Older contract builds do not report a price
    #[serde(default, with = "u128_string")]
    pub ticket_price: u128,

    /// Prize locked in the jackpot (yocto)
    #[serde(with = "u128_string")]
    pub locked_amount: u128,

    #[serde(rename = "noOfTickets")]
    pub ticket_count: u64,

    #[serde(default)]
    pub ticket_ids: Vec<u64>,

    pub status: JackpotStatus,

    /// Nanosecond epoch
    pub start_time: u64,

    /// Nanosecond epoch, None until a draw produced a winner
    #[serde(default)]
    pub end_time: Option<u64>,

    #[serde(default)]
    pub created_time: u64,

    #[serde(default, rename = "drawedResults")]
    pub draw_results: Vec<DrawResult>,

    #[serde(default)]
    pub win_ticket_ids: Vec<u64>,
}

impl Jackpot {
    pub fn is_open(&self) -> bool {
        self.status == JackpotStatus::Open
    }

    /// Whether `time` falls in [start_time, end_time). Open-ended when end_time is None.
    pub fn contains(&self, time: u64) -> bool {
        time >= self.start_time && self.end_time.map_or(true, |end| time < end)
    }

    pub fn is_winner(&self, ticket_id: u64) -> bool {
        self.win_ticket_ids.contains(&ticket_id)
    }

    /// Draws in chronological order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawResult> {
        let mut draws: Vec<_> = self.draw_results.iter().collect();
        draws.sort_by_key(|d| d.created_time);
        draws.into_iter()
    }
}

/// True iff the chronologically last jackpot is Open. False for an empty list.
pub fn has_open_jackpot(jackpots: &[Jackpot]) -> bool {
    jackpots.last().map_or(false, Jackpot::is_open)
}

/// First jackpot whose interval contains `time`.
pub fn find_containing(jackpots: &[Jackpot], time: u64) -> Option<&Jackpot> {
    jackpots.iter().find(|j| j.contains(time))
}

#[cfg(test)]
pub(crate) fn jackpot(id: u64, status: JackpotStatus, start: u64, end: Option<u64>) -> Jackpot {
    Jackpot {
        id,
        ticket_price: 1_000_000_000_000_000_000_000_000,
        locked_amount: 0,
        ticket_count: 0,
        ticket_ids: Vec::new(),
        status,
        start_time: start,
        end_time: end,
        created_time: start,
        draw_results: Vec::new(),
        win_ticket_ids: Vec::new(),
    }
}
