//! Snapshot serialization: full bank state to/from JSON.
//!
//! A snapshot captures what is needed to rebuild the bank after a
//! restart: branch names in registration order, every account with its
//! holder, balance and history, and the compliance log.
//! Account-less clients are not captured.

use crate::{
    account::Transaction,
    compliance::ComplianceRecord,
    types::{AccountId, Money},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub bank_name:  String,
    pub branches:   Vec<String>,
    pub accounts:   Vec<AccountSnapshot>,
    #[serde(default)]
    pub compliance: Vec<ComplianceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_id:   AccountId,
    pub client_name:  String,
    pub cpf:          String,
    /// Position of the owning branch in `BankSnapshot::branches`.
    pub branch_index: usize,
    pub balance:      Money,
    pub history:      Vec<Transaction>,
}

impl BankSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
