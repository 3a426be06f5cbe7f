use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{FunctionCall, Ledger, LedgerError};

/// In-memory ledger for tests. Views return canned values, change calls are recorded.
#[derive(Default)]
pub struct MockLedger {
    views: HashMap<String, Value>,
    balances: HashMap<String, u128>,
    failing_calls: Vec<String>,
    view_log: Mutex<Vec<(String, Value)>>,
    call_log: Mutex<Vec<FunctionCall>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, method: &str, value: Value) -> Self {
        self.views.insert(method.to_string(), value);
        self
    }

    pub fn with_balance(mut self, account_id: &str, amount: u128) -> Self {
        self.balances.insert(account_id.to_string(), amount);
        self
    }

    /// Make every call to `method` fail with a contract error.
    pub fn failing(mut self, method: &str) -> Self {
        self.failing_calls.push(method.to_string());
        self
    }

    pub fn views(&self) -> Vec<(String, Value)> {
        self.view_log.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<FunctionCall> {
        self.call_log.lock().unwrap().clone()
    }
}

impl Ledger for MockLedger {
    async fn view_function(
        &self,
        _contract_id: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, LedgerError> {
        self.view_log
            .lock()
            .unwrap()
            .push((method.to_string(), args));
        self.views
            .get(method)
            .cloned()
            .ok_or_else(|| LedgerError::Contract(format!("MethodNotFound: {}", method)))
    }

    async fn call_function(&self, call: &FunctionCall) -> Result<Value, LedgerError> {
        self.call_log.lock().unwrap().push(call.clone());
        if self.failing_calls.contains(&call.method) {
            return Err(LedgerError::Contract(format!("{} panicked", call.method)));
        }
        Ok(Value::Null)
    }

    async fn account_balance(&self, account_id: &str) -> Result<u128, LedgerError> {
        Ok(self.balances.get(account_id).copied().unwrap_or(0))
    }
}
