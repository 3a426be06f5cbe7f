use crate::events::FormKind;
use crate::format::format_number;

/// Mutations a user can request from the dashboard.
/// The forms turn these into contract calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Deposit funds into the contract.
    Deposit {
        /// Raw amount as typed, human units ("1.5")
        amount: String,
    },

    /// Withdraw the claimable balance.
    Claim,

    /// Buy one ticket in the open jackpot.
    /// Numbers go to the contract as typed.
    BuyTicket { numbers: [u8; 6] },

    /// Owner only: open a new jackpot.
    CreateJackpot,

    /// Owner only: draw the open jackpot.
    /// `force_win` backs the "Draw to Win" button.
    DrawJackpot { force_win: bool },

    /// Initialize the contract with its owner.
    Initialize { owner_id: String },

    /// Hand ownership to another account.
    SetOwner { owner_id: String },
}

impl Action {
    pub fn deposit(amount: impl Into<String>) -> Self {
        Self::Deposit {
            amount: amount.into(),
        }
    }

    pub fn buy_ticket(numbers: [u8; 6]) -> Self {
        Self::BuyTicket { numbers }
    }

    pub fn draw(force_win: bool) -> Self {
        Self::DrawJackpot { force_win }
    }

    /// Form that owns this action.
    pub fn form(&self) -> FormKind {
        match self {
            Self::Deposit { .. } => FormKind::Deposit,
            Self::Claim => FormKind::Claim,
            Self::BuyTicket { .. } => FormKind::BuyTicket,
            Self::CreateJackpot => FormKind::CreateJackpot,
            Self::DrawJackpot { .. } => FormKind::DrawJackpot,
            Self::Initialize { .. } => FormKind::Initialize,
            Self::SetOwner { .. } => FormKind::SetOwner,
        }
    }

    /// Check if only the contract owner sees this action.
    pub fn is_owner_only(&self) -> bool {
        matches!(self, Self::CreateJackpot | Self::DrawJackpot { .. })
    }

    /// Banner shown after a successful submit, if any.
    pub fn success_message(&self) -> Option<String> {
        match self {
            Self::Deposit { amount } => Some(format!("Deposited {} to your account", amount.trim())),
            Self::Claim => Some("Winnings claimed".to_string()),
            Self::BuyTicket { numbers } => Some(format!("Bought ticket {}", ticket_label(numbers))),
            Self::CreateJackpot => Some("Jackpot created".to_string()),
            Self::DrawJackpot { force_win: true } => Some("Jackpot drawn with a forced win".to_string()),
            Self::DrawJackpot { force_win: false } => Some("Jackpot drawn".to_string()),
            Self::Initialize { .. } | Self::SetOwner { .. } => None,
        }
    }
}

/// "01-07-12-30-44-55"
pub fn ticket_label(numbers: &[u8; 6]) -> String {
    numbers
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join("-")
}
