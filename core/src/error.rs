use crate::types::{AccountId, BranchId, ClientId, Money};
use thiserror::Error;

/// Rejections produced by the ledger itself.
/// None of these ever leave an account partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount {amount}: must be greater than zero")]
    InvalidAmount { amount: Money },

    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account_id: AccountId,
        balance:    Money,
        requested:  Money,
    },

    #[error("Transfer from account {account_id} to itself is not allowed")]
    SameAccount { account_id: AccountId },

    #[error("Balance of account {account_id} would overflow")]
    BalanceOverflow { account_id: AccountId },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum BankError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Account {account_id} not found")]
    AccountNotFound { account_id: AccountId },

    #[error("Branch {branch_id} not found")]
    BranchNotFound { branch_id: BranchId },

    #[error("Client {client_id} not found")]
    ClientNotFound { client_id: ClientId },

    #[error("Client {client_id} already holds an account")]
    ClientAlreadyHasAccount { client_id: ClientId },

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BankError {
    /// The ledger rejection behind this error, if it is one.
    pub fn ledger(&self) -> Option<&LedgerError> {
        match self {
            BankError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

pub type BankResult<T> = Result<T, BankError>;
