use anyhow::{anyhow, bail, Result};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use lotto_dashboard::api::{LottoContract, NearLedger, RelayWallet, RpcClient, Wallet};
use lotto_dashboard::config::Config;
use lotto_dashboard::dashboard::{self, Inputs};
use lotto_dashboard::events::{Event, Notification};
use lotto_dashboard::forms::{Action, ActionForms};
use lotto_dashboard::session::Session;
use lotto_dashboard::state::ViewState;
use lotto_dashboard::sync::Synchronizer;

const USAGE: &str = "usage: lotto-dashboard [status | sign-in <account-id> | sign-out | deposit <amount> | \
claim | buy <n1> .. <n6> | create-jackpot | draw [--win] | init <owner-id> | set-owner <account-id>]";

#[derive(Debug, PartialEq)]
enum Command {
    Status,
    SignIn(String),
    SignOut,
    Submit(Action),
}

fn parse_command(args: &[String]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        [] | ["status"] => Command::Status,
        ["sign-in", account_id] => Command::SignIn(account_id.to_string()),
        ["sign-out"] => Command::SignOut,
        ["deposit", amount] => Command::Submit(Action::deposit(*amount)),
        ["claim"] => Command::Submit(Action::Claim),
        ["buy", rest @ ..] if rest.len() == 6 => {
            let mut numbers = [0u8; 6];
            for (slot, raw) in numbers.iter_mut().zip(rest) {
                *slot = raw
                    .parse()
                    .map_err(|_| anyhow!("not a ticket number: {}", raw))?;
            }
            Command::Submit(Action::buy_ticket(numbers))
        }
        ["create-jackpot"] => Command::Submit(Action::CreateJackpot),
        ["draw"] => Command::Submit(Action::draw(false)),
        ["draw", "--win"] => Command::Submit(Action::draw(true)),
        ["init", owner_id] => Command::Submit(Action::Initialize {
            owner_id: owner_id.to_string(),
        }),
        ["set-owner", owner_id] => Command::Submit(Action::SetOwner {
            owner_id: owner_id.to_string(),
        }),
        _ => bail!(USAGE),
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("LOTTO_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    let network = cfg.network(std::env::var("LOTTO_ENV").ok().as_deref())?;
    tracing::info!(network = %network.network_id, contract = %network.contract_name, "connecting");

    let mut wallet = RelayWallet::load(
        &cfg.wallet.session_file,
        &cfg.wallet.relay_url,
        std::env::var("LOTTO_RELAY_TOKEN").ok(),
    )?;
    match &command {
        Command::SignIn(account_id) => wallet.sign_in(account_id)?,
        Command::SignOut => wallet.sign_out()?,
        _ => {}
    }

    // Bootstrap
    let account_id = wallet.account_id().map(String::from);
    let ledger = NearLedger::new(RpcClient::new(&network.node_url), wallet);
    let contract = LottoContract::new(ledger, &network.contract_name).with_gas(cfg.contract.gas);
    let session = Session::bootstrap(contract, account_id).await?;

    let mut state = ViewState::default();
    Synchronizer::new(&session).refresh_all(&mut state).await?;

    // Create the event channel
    let (tx, mut rx) = mpsc::channel::<Event>(16);
    let forms = ActionForms::new(tx.clone(), cfg.create_jackpot_deposit());

    let mut inputs = Inputs::default();
    let mut failure = None;
    if let Command::Submit(action) = &command {
        match action {
            Action::Deposit { amount } => inputs.deposit_amount = amount.clone(),
            Action::BuyTicket { numbers } => inputs.picked_numbers = *numbers,
            _ => {}
        }
        match forms.submit(action, &session, &state).await {
            Ok(submitted) => submitted.apply(&mut state),
            Err(e) => failure = Some(e),
        }
    }
    let _ = tx.send(Event::Shutdown).await;

    // Drain notifications, keep the latest banner
    let mut banner = None;
    while let Some(event) = rx.recv().await {
        match event {
            Event::Shutdown => break,
            other => {
                if let Some(n) = Notification::from_event(&other, Instant::now()) {
                    banner = Some(n);
                }
            }
        }
    }

    println!("{}", dashboard::render(&session, &state, &inputs, banner.as_ref()));

    if let Some(e) = failure {
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(&[]).unwrap(), Command::Status);
        assert_eq!(
            parse_command(&args("sign-in alice.testnet")).unwrap(),
            Command::SignIn("alice.testnet".to_string())
        );
        assert_eq!(
            parse_command(&args("deposit 1.5")).unwrap(),
            Command::Submit(Action::deposit("1.5"))
        );
        assert_eq!(
            parse_command(&args("draw --win")).unwrap(),
            Command::Submit(Action::draw(true))
        );
    }

    #[test]
    fn test_parse_buy() {
        assert_eq!(
            parse_command(&args("buy 1 7 12 30 44 55")).unwrap(),
            Command::Submit(Action::buy_ticket([1, 7, 12, 30, 44, 55]))
        );
        assert!(parse_command(&args("buy 1 2 3")).is_err());
        assert!(parse_command(&args("buy 1 2 3 4 5 x")).is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command(&args("jackpot please")).is_err());
    }
}
