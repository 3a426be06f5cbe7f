use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{FunctionCall, Ledger, LedgerError, Wallet};

/// Error object of a JSON-RPC response
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

/// `call_function` query result. `error` is set when the contract panicked.
#[derive(Debug, Deserialize)]
struct CallResult {
    #[serde(default)]
    result: Vec<u8>,
    #[serde(default)]
    logs: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountView {
    amount: String,
}

/// JSON-RPC client for a ledger node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    node_url: String,
}

impl RpcClient {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            node_url: node_url.into(),
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let response: RpcResponse = response.json().await?;
        decode_response(response)
    }

    /// Run a view method. Arguments are JSON, base64 encoded on the wire.
    #[instrument(skip(self, args), fields(node = %self.node_url))]
    pub async fn call_view(
        &self,
        contract_id: &str,
        method: &str,
        args: &Value,
    ) -> Result<Value, LedgerError> {
        let args_base64 = STANDARD.encode(serde_json::to_vec(args)?);
        let result = self
            .request(
                "query",
                json!({
                    "request_type": "call_function",
                    "finality": "optimistic",
                    "account_id": contract_id,
                    "method_name": method,
                    "args_base64": args_base64,
                }),
            )
            .await?;

        let call: CallResult = serde_json::from_value(result)?;
        decode_call_result(call)
    }

    /// Raw account balance in yocto.
    #[instrument(skip(self), fields(node = %self.node_url))]
    pub async fn view_account_balance(&self, account_id: &str) -> Result<u128, LedgerError> {
        let result = self
            .request(
                "query",
                json!({
                    "request_type": "view_account",
                    "finality": "final",
                    "account_id": account_id,
                }),
            )
            .await?;

        let view: AccountView = serde_json::from_value(result)?;
        view.amount
            .parse()
            .map_err(|_| LedgerError::Contract(format!("bad account amount: {}", view.amount)))
    }
}

fn decode_response(response: RpcResponse) -> Result<Value, LedgerError> {
    if let Some(err) = response.error {
        let message = err
            .data
            .map(|d| d.as_str().map(String::from).unwrap_or_else(|| d.to_string()))
            .or(err.message)
            .unwrap_or_default();
        return Err(LedgerError::Rpc {
            name: err.name.unwrap_or_else(|| "UNKNOWN".to_string()),
            message,
        });
    }

    response
        .result
        .ok_or_else(|| LedgerError::Rpc {
            name: "EMPTY_RESPONSE".to_string(),
            message: "response carried neither result nor error".to_string(),
        })
}

fn decode_call_result(call: CallResult) -> Result<Value, LedgerError> {
    for log in &call.logs {
        debug!(log = %log, "contract log");
    }

    if let Some(err) = call.error {
        return Err(LedgerError::Contract(err));
    }

    // Methods returning nothing produce an empty byte string
    if call.result.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&call.result)?)
}

/// Ledger backed by a node for reads and a wallet for signed writes.
pub struct NearLedger<W> {
    rpc: RpcClient,
    wallet: W,
}

impl<W: Wallet> NearLedger<W> {
    pub fn new(rpc: RpcClient, wallet: W) -> Self {
        Self { rpc, wallet }
    }
}

impl<W: Wallet> Ledger for NearLedger<W> {
    async fn view_function(
        &self,
        contract_id: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, LedgerError> {
        self.rpc.call_view(contract_id, method, &args).await
    }

    async fn call_function(&self, call: &FunctionCall) -> Result<Value, LedgerError> {
        if !self.wallet.is_signed_in() {
            return Err(LedgerError::NotSignedIn);
        }
        Ok(self.wallet.sign_and_send(call).await?)
    }

    async fn account_balance(&self, account_id: &str) -> Result<u128, LedgerError> {
        self.rpc.view_account_balance(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_call_result_json() {
        let call: CallResult = serde_json::from_value(json!({
            "result": b"\"owner.testnet\"".to_vec(),
            "logs": [],
            "block_height": 10,
        }))
        .unwrap();

        let value = decode_call_result(call).unwrap();
        assert_eq!(value, json!("owner.testnet"));
    }

    #[test]
    fn test_decode_call_result_empty_is_null() {
        let call: CallResult = serde_json::from_value(json!({"result": [], "logs": ["hi"]})).unwrap();
        assert_eq!(decode_call_result(call).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_call_result_contract_error() {
        let call: CallResult = serde_json::from_value(json!({
            "error": "wasm execution failed with error: MethodNotFound",
            "logs": [],
        }))
        .unwrap();

        match decode_call_result(call) {
            Err(LedgerError::Contract(msg)) => assert!(msg.contains("MethodNotFound")),
            other => panic!("Expected contract error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_response_rpc_error() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "error": {
                "name": "HANDLER_ERROR",
                "message": "Server error",
                "data": "account lotto.testnet does not exist",
            }
        }))
        .unwrap();

        match decode_response(response) {
            Err(LedgerError::Rpc { name, message }) => {
                assert_eq!(name, "HANDLER_ERROR");
                assert!(message.contains("does not exist"));
            }
            other => panic!("Expected rpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_response_result() {
        let response: RpcResponse =
            serde_json::from_value(json!({"result": {"amount": "10"}})).unwrap();
        assert_eq!(decode_response(response).unwrap(), json!({"amount": "10"}));
    }
}
