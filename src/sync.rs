use futures_util::future::try_join3;
use tracing::{debug, info};

use crate::api::{Ledger, LedgerError};
use crate::session::Session;
use crate::state::{join_tickets, AccountInfo, Jackpot, TicketView, ViewState};

/// Read-only queries that populate [`ViewState`]. Each fetch is idempotent.
pub struct Synchronizer<'a, L> {
    session: &'a Session<L>,
}

impl<'a, L: Ledger> Synchronizer<'a, L> {
    pub fn new(session: &'a Session<L>) -> Self {
        Self { session }
    }

    /// Claimable balance, None when signed out.
    pub async fn fetch_balance(&self) -> Result<Option<u128>, LedgerError> {
        let Some(account_id) = self.session.account_id() else {
            return Ok(None);
        };
        let balance = self.session.contract().get_account_balance(account_id).await?;
        debug!(balance = %balance, "fetched balance");
        Ok(Some(balance))
    }

    /// Jackpot list, followed by the tickets joined against that same list.
    pub async fn fetch_jackpots(&self) -> Result<(Vec<Jackpot>, Vec<TicketView>), LedgerError> {
        let jackpots = self.session.contract().get_jackpots().await?;
        let tickets = self.fetch_tickets(&jackpots).await?;
        debug!(jackpots = jackpots.len(), tickets = tickets.len(), "fetched jackpots");
        Ok((jackpots, tickets))
    }

    pub async fn fetch_account_info(&self) -> Result<Option<AccountInfo>, LedgerError> {
        let Some(account_id) = self.session.account_id() else {
            return Ok(None);
        };
        let info = self
            .session
            .contract()
            .get_account_info_or_default(account_id)
            .await?;
        Ok(Some(info))
    }

    /// Account tickets joined to `jackpots`. Empty when signed out.
    pub async fn fetch_tickets(&self, jackpots: &[Jackpot]) -> Result<Vec<TicketView>, LedgerError> {
        let Some(account_id) = self.session.account_id() else {
            return Ok(Vec::new());
        };
        let tickets = self.session.contract().get_account_tickets(account_id).await?;
        Ok(join_tickets(tickets, jackpots))
    }

    /// Run all fetches concurrently and apply them to `state`. On error
    /// `state` is left untouched.
    pub async fn refresh_all(&self, state: &mut ViewState) -> Result<(), LedgerError> {
        let (balance, (jackpots, tickets), account_info) = try_join3(
            self.fetch_balance(),
            self.fetch_jackpots(),
            self.fetch_account_info(),
        )
        .await?;

        state.balance = balance;
        state.jackpots = jackpots;
        state.tickets = tickets;
        state.account_info = account_info;

        info!(
            jackpots = state.jackpots.len(),
            tickets = state.tickets.len(),
            open = state.has_open_jackpot(),
            "view state refreshed"
        );
        Ok(())
    }

    /// Re-query only the claimable balance.
    pub async fn refresh_balance(&self, state: &mut ViewState) -> Result<(), LedgerError> {
        state.balance = self.fetch_balance().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockLedger;
    use crate::api::LottoContract;
    use crate::state::{JackpotStatus, TicketOutcome};
    use serde_json::json;

    // Payloads in the shape the lottery contract serializes
    fn ledger() -> MockLedger {
        MockLedger::new()
            .with_view("get_owner_id", json!("owner.testnet"))
            .with_view("get_account_balance", json!("2000000000000000000000000"))
            .with_view(
                "get_account_info_or_default",
                json!({"balance": "2000000000000000000000000", "ticketIds": [1, 3], "createdTime": 5}),
            )
            .with_view(
                "get_jackpots",
                json!([
                    {
                        "id": 1, "ticketPrice": "1000000000000000000000000",
                        "lockedAmount": "0", "startTime": 0, "createdTime": 0,
                        "endTime": 100, "status": "Close", "noOfTickets": 2,
                        "ticketIds": [1, 2], "winTicketIds": [1],
                        "drawedResults": [{"drawedNumbers": [1, 2, 3, 4, 5, 6], "createdTime": 100}]
                    },
                    {
                        "id": 2, "ticketPrice": "1000000000000000000000000",
                        "lockedAmount": "1000000000000000000000000", "startTime": 100,
                        "createdTime": 100, "endTime": null, "status": "Open",
                        "noOfTickets": 1, "ticketIds": [3], "winTicketIds": [],
                        "drawedResults": []
                    }
                ]),
            )
            .with_view(
                "get_account_tickets",
                json!([
                    {"id": 1, "accountId": "alice.testnet", "pickedNumbers": [1, 2, 3, 4, 5, 6], "createdTime": 10},
                    {"id": 3, "accountId": "alice.testnet", "pickedNumbers": [7, 8, 9, 10, 11, 12], "createdTime": 150}
                ]),
            )
    }

    async fn session(account: Option<&str>) -> Session<MockLedger> {
        let contract = LottoContract::new(ledger(), "lotto.testnet");
        Session::bootstrap(contract, account.map(String::from))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_all_signed_in() {
        let session = session(Some("alice.testnet")).await;
        let mut state = ViewState::default();

        Synchronizer::new(&session).refresh_all(&mut state).await.unwrap();

        assert_eq!(state.balance, Some(2_000_000_000_000_000_000_000_000));
        assert_eq!(state.jackpots.len(), 2);
        assert!(state.has_open_jackpot());
        assert_eq!(state.account_info.as_ref().map(|i| i.ticket_count()), Some(2));
        assert_eq!(state.jackpots[0].status, JackpotStatus::Closed);
        assert_eq!(state.jackpots[1].locked_amount, 1_000_000_000_000_000_000_000_000);
        assert_eq!(state.jackpots[0].draws().count(), 1);

        assert_eq!(state.tickets[0].jackpot_id, Some(1));
        assert_eq!(state.tickets[0].outcome, TicketOutcome::Won);
        assert_eq!(state.tickets[1].jackpot_id, Some(2));
        assert_eq!(state.tickets[1].outcome, TicketOutcome::Waiting);
    }

    #[tokio::test]
    async fn test_signed_out_skips_account_queries() {
        let session = session(None).await;
        let mut state = ViewState::default();

        Synchronizer::new(&session).refresh_all(&mut state).await.unwrap();

        assert_eq!(state.balance, None);
        assert!(state.account_info.is_none());
        assert!(state.tickets.is_empty());
        assert_eq!(state.jackpots.len(), 2);

        let views = session.contract().ledger().views();
        let methods: Vec<_> = views.iter().map(|(m, _)| m.as_str()).collect();
        assert!(!methods.contains(&"get_account_balance"));
        assert!(!methods.contains(&"get_account_tickets"));
    }

    #[tokio::test]
    async fn test_tickets_fetched_after_jackpots() {
        let session = session(Some("alice.testnet")).await;
        Synchronizer::new(&session).fetch_jackpots().await.unwrap();

        let views = session.contract().ledger().views();
        let jackpots_at = views.iter().position(|(m, _)| m == "get_jackpots").unwrap();
        let tickets_at = views.iter().position(|(m, _)| m == "get_account_tickets").unwrap();
        assert!(jackpots_at < tickets_at);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_state() {
        let contract = LottoContract::new(
            MockLedger::new().with_view("get_owner_id", json!("owner.testnet")),
            "lotto.testnet",
        );
        let session = Session::bootstrap(contract, Some("alice.testnet".to_string()))
            .await
            .unwrap();

        let mut state = ViewState {
            balance: Some(5),
            ..Default::default()
        };
        assert!(Synchronizer::new(&session).refresh_all(&mut state).await.is_err());
        assert_eq!(state.balance, Some(5));
    }
}
