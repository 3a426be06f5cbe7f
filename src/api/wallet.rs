use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

use super::FunctionCall;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("session file {}: {source}", .path.display())]
    Session {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file is corrupt: {0}")]
    CorruptSession(#[from] serde_json::Error),
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay rejected {method}: {message}")]
    Rejected { method: String, message: String },
}

/// Identity provider that owns the signing keys.
#[allow(async_fn_in_trait)]
pub trait Wallet {
    fn account_id(&self) -> Option<&str>;

    fn is_signed_in(&self) -> bool {
        self.account_id().is_some()
    }

    fn sign_in(&mut self, account_id: &str) -> Result<(), WalletError>;

    fn sign_out(&mut self) -> Result<(), WalletError>;

    /// Sign `call` as the current account and submit it.
    async fn sign_and_send(&self, call: &FunctionCall) -> Result<Value, WalletError>;
}

/// Persisted sign-in state
#[derive(Debug, Serialize, Deserialize)]
struct AuthKey {
    account_id: String,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Wallet that keeps the signed-in account in a session file and forwards
/// change calls to a signing relay.
#[derive(Debug)]
pub struct RelayWallet {
    http: reqwest::Client,
    relay_url: String,
    token: Option<String>,
    session_file: PathBuf,
    account_id: Option<String>,
}

impl RelayWallet {
    /// Restore the session from `session_file` if present.
    pub fn load(
        session_file: impl Into<PathBuf>,
        relay_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, WalletError> {
        let session_file = session_file.into();
        let account_id = read_session(&session_file)?;
        Ok(Self {
            http: reqwest::Client::new(),
            relay_url: relay_url.into(),
            token,
            session_file,
            account_id,
        })
    }
}

fn read_session(path: &Path) -> Result<Option<String>, WalletError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let key: AuthKey = serde_json::from_str(&contents)?;
            Ok(Some(key.account_id))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(WalletError::Session {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Wallet for RelayWallet {
    fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    fn sign_in(&mut self, account_id: &str) -> Result<(), WalletError> {
        let key = AuthKey {
            account_id: account_id.to_string(),
        };
        fs::write(&self.session_file, serde_json::to_string(&key)?).map_err(|source| {
            WalletError::Session {
                path: self.session_file.clone(),
                source,
            }
        })?;
        info!(account_id, "signed in");
        self.account_id = Some(key.account_id);
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), WalletError> {
        match fs::remove_file(&self.session_file) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(WalletError::Session {
                    path: self.session_file.clone(),
                    source,
                })
            }
        }
        info!(account_id = ?self.account_id, "signed out");
        self.account_id = None;
        Ok(())
    }

    #[instrument(skip(self, call), fields(method = %call.method, deposit = %call.deposit))]
    async fn sign_and_send(&self, call: &FunctionCall) -> Result<Value, WalletError> {
        let signer_id = self.account_id.as_deref().ok_or(WalletError::NotSignedIn)?;

        let body = json!({
            "signer_id": signer_id,
            "receiver_id": call.contract_id,
            "method_name": call.method,
            "args": call.args,
            "gas": call.gas.to_string(),
            "deposit": call.deposit.to_string(),
        });

        let mut request = self
            .http
            .post(format!("{}/function_call", self.relay_url.trim_end_matches('/')))
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response: RelayResponse = request.send().await?.json().await?;
        if let Some(message) = response.error {
            return Err(WalletError::Rejected {
                method: call.method.clone(),
                message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lotto-dashboard-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_signed_out_without_session_file() {
        let path = session_path("absent");
        let _ = fs::remove_file(&path);

        let wallet = RelayWallet::load(&path, "http://localhost:3030", None).unwrap();
        assert!(!wallet.is_signed_in());
        assert_eq!(wallet.account_id(), None);
    }

    #[test]
    fn test_sign_in_persists_and_sign_out_clears() {
        let path = session_path("roundtrip");

        let mut wallet = RelayWallet::load(&path, "http://localhost:3030", None).unwrap();
        wallet.sign_in("alice.testnet").unwrap();
        assert_eq!(wallet.account_id(), Some("alice.testnet"));

        let restored = RelayWallet::load(&path, "http://localhost:3030", None).unwrap();
        assert_eq!(restored.account_id(), Some("alice.testnet"));

        wallet.sign_out().unwrap();
        assert!(!wallet.is_signed_in());
        assert!(!path.exists());

        // Signing out twice is harmless
        wallet.sign_out().unwrap();
    }

    #[test]
    fn test_corrupt_session_file() {
        let path = session_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let result = RelayWallet::load(&path, "http://localhost:3030", None);
        assert!(matches!(result, Err(WalletError::CorruptSession(_))));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_sign_and_send_requires_sign_in() {
        let path = session_path("unsigned");
        let _ = fs::remove_file(&path);
        let wallet = RelayWallet::load(&path, "http://localhost:3030", None).unwrap();

        let call = FunctionCall {
            contract_id: "lotto.testnet".to_string(),
            method: "withdraw".to_string(),
            args: json!({}),
            gas: crate::api::DEFAULT_GAS,
            deposit: 0,
        };
        assert!(matches!(
            wallet.sign_and_send(&call).await,
            Err(WalletError::NotSignedIn)
        ));
    }
}
