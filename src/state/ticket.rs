use serde::{Deserialize, Serialize};

use super::jackpot::{find_containing, Jackpot};

/// Ticket as returned by `get_account_tickets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    #[serde(default)]
    pub account_id: String,
    /// Owner-picked numbers, expected in 1..=55 but never checked client-side
    pub picked_numbers: [u8; 6],
    /// Nanosecond epoch
    pub created_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    Won,
    Waiting,
    Loss,
    /// No jackpot interval contains the ticket
    Unknown,
}

impl TicketOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Won => "Won",
            Self::Waiting => "Waiting",
            Self::Loss => "Loss",
            Self::Unknown => "Unknown",
        }
    }
}

/// Ticket joined with its enclosing jackpot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub ticket: Ticket,
    pub jackpot_id: Option<u64>,
    pub outcome: TicketOutcome,
}

/// Outcome of a ticket against the jackpot it was bought in.
pub fn outcome(ticket: &Ticket, jackpot: Option<&Jackpot>) -> TicketOutcome {
    match jackpot {
        None => TicketOutcome::Unknown,
        Some(j) if j.is_winner(ticket.id) => TicketOutcome::Won,
        Some(j) if j.is_open() => TicketOutcome::Waiting,
        Some(_) => TicketOutcome::Loss,
    }
}

/// Join every ticket to the first jackpot containing its creation time.
/// Linear scan per ticket.
pub fn join_tickets(tickets: Vec<Ticket>, jackpots: &[Jackpot]) -> Vec<TicketView> {
    tickets
        .into_iter()
        .map(|ticket| {
            let jackpot = find_containing(jackpots, ticket.created_time);
            if jackpot.is_none() {
                tracing::warn!(
                    ticket_id = ticket.id,
                    created_time = ticket.created_time,
                    "ticket matches no jackpot interval"
                );
            }
            TicketView {
                jackpot_id: jackpot.map(|j| j.id),
                outcome: outcome(&ticket, jackpot),
                ticket,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::jackpot::{jackpot, JackpotStatus};

    fn ticket(id: u64, created_time: u64) -> Ticket {
        Ticket {
            id,
            account_id: "alice.testnet".to_string(),
            picked_numbers: [1, 2, 3, 4, 5, 6],
            created_time,
        }
    }

    fn history() -> Vec<Jackpot> {
        let mut first = jackpot(1, JackpotStatus::Closed, 0, Some(100));
        first.win_ticket_ids = vec![10];
        let second = jackpot(2, JackpotStatus::Open, 100, None);
        vec![first, second]
    }

    #[test]
    fn test_join_assigns_containing_jackpot() {
        let views = join_tickets(vec![ticket(10, 5), ticket(11, 99), ticket(12, 100)], &history());

        let ids: Vec<_> = views.iter().map(|v| v.jackpot_id).collect();
        assert_eq!(ids, vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn test_outcomes() {
        let views = join_tickets(vec![ticket(10, 5), ticket(11, 50), ticket(12, 150)], &history());

        assert_eq!(views[0].outcome, TicketOutcome::Won);
        assert_eq!(views[1].outcome, TicketOutcome::Loss);
        assert_eq!(views[2].outcome, TicketOutcome::Waiting);
    }

    #[test]
    fn test_winner_in_open_jackpot_is_won() {
        let mut open = jackpot(5, JackpotStatus::Open, 0, None);
        open.win_ticket_ids = vec![7];
        assert_eq!(outcome(&ticket(7, 1), Some(&open)), TicketOutcome::Won);
    }

    #[test]
    fn test_unmatched_ticket_is_unknown() {
        let jackpots = vec![jackpot(1, JackpotStatus::Closed, 100, Some(200))];
        let views = join_tickets(vec![ticket(1, 50)], &jackpots);

        assert_eq!(views[0].jackpot_id, None);
        assert_eq!(views[0].outcome, TicketOutcome::Unknown);
        assert_eq!(views[0].outcome.label(), "Unknown");
    }

    #[test]
    fn test_join_with_no_jackpots() {
        let views = join_tickets(vec![ticket(1, 50), ticket(2, 60)], &[]);
        assert!(views.iter().all(|v| v.outcome == TicketOutcome::Unknown));
    }

    #[test]
    fn test_deserialize_contract_tickets() {
        let raw = r#"[
            {"id": 7, "accountId": "alice.testnet", "pickedNumbers": [1, 7, 12, 30, 44, 55], "createdTime": 1650000000000000001},
            {"id": 8, "accountId": "alice.testnet", "pickedNumbers": [3, 4, 5, 6, 7, 8], "createdTime": 1650000000000000002}
        ]"#;

        let tickets: Vec<Ticket> = serde_json::from_str(raw).unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].account_id, "alice.testnet");
        assert_eq!(tickets[0].picked_numbers, [1, 7, 12, 30, 44, 55]);
        assert_eq!(tickets[1].created_time, 1_650_000_000_000_000_002);
    }
}
