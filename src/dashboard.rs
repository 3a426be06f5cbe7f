use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::api::Ledger;
use crate::events::Notification;
use crate::forms::{button_enabled, ticket_label, Action};
use crate::format::{format_amount, format_number, DISPLAY_FRAC_DIGITS};
use crate::session::Session;
use crate::state::{Jackpot, JackpotStatus, ViewState};

/// Form inputs as last entered by the user.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub deposit_amount: String,
    pub picked_numbers: [u8; 6],
}

fn format_time(nanos: u64) -> String {
    let secs = (nanos / 1_000_000_000) as i64;
    let sub = (nanos % 1_000_000_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, sub)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| nanos.to_string())
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[ {} ]", label)
    } else {
        format!("[ {} (disabled) ]", label)
    }
}

fn status_label(status: JackpotStatus) -> &'static str {
    match status {
        JackpotStatus::Open => "Open",
        JackpotStatus::Closed => "Closed",
    }
}

fn write_jackpot(out: &mut String, j: &Jackpot) {
    let _ = writeln!(
        out,
        "  #{:<4} {:<6} prize {} | ticket {} | {} tickets | opened {}",
        j.id,
        status_label(j.status),
        format_amount(j.locked_amount, DISPLAY_FRAC_DIGITS),
        format_amount(j.ticket_price, DISPLAY_FRAC_DIGITS),
        j.ticket_count,
        format_time(j.start_time),
    );
    for draw in j.draws() {
        let numbers: Vec<_> = draw.numbers.iter().map(|n| format_number(*n)).collect();
        let _ = writeln!(
            out,
            "         drawn {} at {}",
            numbers.join(" "),
            format_time(draw.created_time)
        );
    }
}

/// Render the whole dashboard as text.
pub fn render<L: Ledger>(
    session: &Session<L>,
    state: &ViewState,
    inputs: &Inputs,
    banner: Option<&Notification>,
) -> String {
    let mut out = String::new();

    if let Some(n) = banner {
        let tag = if n.is_error { "!!" } else { "**" };
        let _ = writeln!(out, "{} {} {}\n", tag, n.message, tag);
    }

    let Some(account) = session.account(state) else {
        let _ = writeln!(out, "Not signed in. Run `sign-in <account-id>` to play.");
        write_jackpots(&mut out, state);
        return out;
    };

    let _ = writeln!(out, "Account: {}", account.account_id);
    let _ = writeln!(out, "Wallet balance: {}", account.wallet_balance_display());
    let _ = writeln!(out, "Claimable: {}", account.claimable_display());
    if let Some(info) = &state.account_info {
        let _ = writeln!(
            out,
            "Tickets bought: {} | Member since {}",
            info.ticket_count(),
            format_time(info.created_time)
        );
    }
    out.push('\n');

    let deposit = Action::deposit(inputs.deposit_amount.clone());
    let buy = Action::buy_ticket(inputs.picked_numbers);
    let _ = writeln!(
        out,
        "{} {} {}",
        button("Deposit", button_enabled(&deposit, session, state)),
        button("Claim", button_enabled(&Action::Claim, session, state)),
        button("Buy Ticket", button_enabled(&buy, session, state)),
    );

    if session.is_owner() {
        let _ = writeln!(out, "\nOwner actions:");
        let _ = writeln!(
            out,
            "{} {} {}",
            button("Create Jackpot", button_enabled(&Action::CreateJackpot, session, state)),
            button("Draw Jackpot", button_enabled(&Action::draw(false), session, state)),
            button("Draw to Win", button_enabled(&Action::draw(true), session, state)),
        );
    }
    out.push('\n');

    write_jackpots(&mut out, state);

    let _ = writeln!(out, "\nYour tickets:");
    if state.tickets.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for view in &state.tickets {
        let jackpot = view
            .jackpot_id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  ticket {:<5} jackpot {:<5} {}  {}",
            view.ticket.id,
            jackpot,
            ticket_label(&view.ticket.picked_numbers),
            view.outcome.label()
        );
    }

    out
}

fn write_jackpots(out: &mut String, state: &ViewState) {
    let _ = writeln!(out, "Jackpots:");
    if state.jackpots.is_empty() {
        let _ = writeln!(out, "  (none yet)");
    }
    // Newest first
    for j in state.jackpots.iter().rev() {
        write_jackpot(out, j);
    }
}
