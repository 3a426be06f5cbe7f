mod actions;

pub use actions::{ticket_label, Action};

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::{Ledger, LedgerError};
use crate::events::{Event, FormKind};
use crate::format::{parse_amount, FormatError};
use crate::session::Session;
use crate::state::ViewState;
use crate::sync::Synchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    /// A contract call is pending; inputs are disabled
    Submitting,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{} is disabled", .0.label())]
    Disabled(FormKind),
    #[error("{} is already submitting", .0.label())]
    Busy(FormKind),
    #[error(transparent)]
    Amount(#[from] FormatError),
    #[error("{} failed: {source}", .form.label())]
    Ledger {
        form: FormKind,
        #[source]
        source: LedgerError,
    },
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// Re-fetched claimable balance; None if the re-fetch did not happen
    pub balance: Option<u128>,
}

impl Submitted {
    pub fn apply(self, state: &mut ViewState) {
        if self.balance.is_some() {
            state.balance = self.balance;
        }
    }
}

/// Whether the button for `action` is enabled, ignoring pending submits.
pub fn button_enabled<L: Ledger>(action: &Action, session: &Session<L>, state: &ViewState) -> bool {
    if !session.is_signed_in() {
        return false;
    }
    if action.is_owner_only() && !session.is_owner() {
        return false;
    }

    match action {
        Action::Deposit { amount } => matches!(parse_amount(amount), Ok(v) if v > 0),
        Action::Claim => session.account(state).map_or(false, |a| a.can_claim()),
        Action::BuyTicket { .. } => state.claimable() > 0 && state.has_open_jackpot(),
        Action::CreateJackpot => !state.has_open_jackpot(),
        Action::DrawJackpot { .. } => state.has_open_jackpot(),
        Action::Initialize { .. } | Action::SetOwner { .. } => true,
    }
}

/// Per-form Idle/Submitting state plus the notification channel.
/// Different forms may submit concurrently; one form never has two calls in flight.
pub struct ActionForms {
    states: Mutex<HashMap<FormKind, FormState>>,
    events: mpsc::Sender<Event>,
    create_jackpot_deposit: u128,
}

/// Puts a form back to Idle when dropped, whatever the call returned.
struct Pending<'a> {
    forms: &'a ActionForms,
    form: FormKind,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.forms.set_state(self.form, FormState::Idle);
    }
}

impl ActionForms {
    pub fn new(events: mpsc::Sender<Event>, create_jackpot_deposit: u128) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            events,
            create_jackpot_deposit,
        }
    }

    pub fn state(&self, form: FormKind) -> FormState {
        let states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.get(&form).copied().unwrap_or_default()
    }

    fn set_state(&self, form: FormKind, state: FormState) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.insert(form, state);
    }

    /// Idle -> Submitting, or None if the form is already busy.
    fn begin(&self, form: FormKind) -> Option<Pending<'_>> {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let current = states.entry(form).or_default();
        if *current == FormState::Submitting {
            return None;
        }
        *current = FormState::Submitting;
        Some(Pending { forms: self, form })
    }

    /// Button rule plus the form's own pending state.
    pub fn is_enabled<L: Ledger>(&self, action: &Action, session: &Session<L>, state: &ViewState) -> bool {
        self.state(action.form()) == FormState::Idle && button_enabled(action, session, state)
    }

    /// Run `action`: disable the form, make the contract call, re-enable,
    /// re-fetch the balance and post a notice. Failures are posted to the
    /// channel and returned.
    pub async fn submit<L: Ledger>(
        &self,
        action: &Action,
        session: &Session<L>,
        state: &ViewState,
    ) -> Result<Submitted, ActionError> {
        let form = action.form();
        if !button_enabled(action, session, state) {
            return Err(ActionError::Disabled(form));
        }

        let pending = self.begin(form).ok_or(ActionError::Busy(form))?;
        let result = self.execute(action, session).await;
        drop(pending);

        if let Err(err) = result {
            warn!(form = form.label(), error = %err, "action failed");
            let _ = self
                .events
                .send(Event::ActionFailed {
                    form,
                    error: err.to_string(),
                })
                .await;
            return Err(err);
        }
        info!(form = form.label(), "action succeeded");

        let balance = match Synchronizer::new(session).fetch_balance().await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, "balance re-fetch failed");
                None
            }
        };

        if let Some(message) = action.success_message() {
            let _ = self.events.send(Event::Notice { form, message }).await;
        }

        Ok(Submitted { balance })
    }

    async fn execute<L: Ledger>(&self, action: &Action, session: &Session<L>) -> Result<(), ActionError> {
        let contract = session.contract();
        let form = action.form();
        let wrap = |source: LedgerError| ActionError::Ledger { form, source };

        match action {
            Action::Deposit { amount } => {
                let yocto = parse_amount(amount)?;
                contract.deposit(yocto).await.map_err(wrap)
            }
            Action::Claim => contract.withdraw().await.map_err(wrap),
            Action::BuyTicket { numbers } => contract.buy_ticket(*numbers).await.map_err(wrap),
            Action::CreateJackpot => contract
                .create_jackpot(self.create_jackpot_deposit)
                .await
                .map_err(wrap),
            Action::DrawJackpot { force_win } => contract.draw_jackpot(*force_win).await.map_err(wrap),
            Action::Initialize { owner_id } => contract.new_contract(owner_id).await.map_err(wrap),
            Action::SetOwner { owner_id } => contract.set_owner_id(owner_id).await.map_err(wrap),
        }
    }
}
