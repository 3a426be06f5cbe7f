use std::time::{Duration, Instant};

/// How long a success banner stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(11);

/// Which form an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Deposit,
    Claim,
    BuyTicket,
    CreateJackpot,
    DrawJackpot,
    Initialize,
    SetOwner,
}

impl FormKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Claim => "Claim",
            Self::BuyTicket => "Buy Ticket",
            Self::CreateJackpot => "Create Jackpot",
            Self::DrawJackpot => "Draw Jackpot",
            Self::Initialize => "Initialize",
            Self::SetOwner => "Set Owner",
        }
    }
}

/// Sent by the action forms to whoever presents notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A mutation went through
    Notice { form: FormKind, message: String },

    /// A mutation was rejected
    ActionFailed { form: FormKind, error: String },

    Shutdown,
}

/// A transient banner.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    /// None for banners that stay until replaced
    expires_at: Option<Instant>,
}

impl Notification {
    pub fn from_event(event: &Event, now: Instant) -> Option<Self> {
        match event {
            Event::Notice { message, .. } => Some(Self {
                message: message.clone(),
                is_error: false,
                expires_at: Some(now + NOTICE_TTL),
            }),
            Event::ActionFailed { form, error } => Some(Self {
                message: format!("Something went wrong with {}: {}", form.label(), error),
                is_error: true,
                expires_at: None,
            }),
            Event::Shutdown => None,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}
