//! Account state: balance plus an append-only transaction history.
//!
//! RULES:
//!   - balance == sum of history amounts, always.
//!   - balance is never negative.
//!   - A rejected deposit or withdrawal leaves both balance and history untouched.

use crate::{
    error::{BankError, BankResult, LedgerError, LedgerResult},
    types::{AccountId, BranchId, ClientId, Money},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description vocabulary for history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
}

impl TransactionKind {
    /// Inflows carry positive amounts, outflows negative ones.
    pub fn is_inflow(&self) -> bool {
        matches!(self, Self::Deposit | Self::TransferIn)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Deposit     => "Deposit",
            Self::Withdrawal  => "Withdrawal",
            Self::TransferIn  => "Transfer received",
            Self::TransferOut => "Transfer sent",
        }
    }
}

/// Whether a movement is a plain cash operation or one leg of a transfer.
/// Only affects the description recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Plain,
    TransferLeg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp:   DateTime<Utc>,
    pub description: TransactionKind,
    /// Signed: positive for inflows, negative for outflows.
    pub amount:      Money,
}

/// Read-only view of an account at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub account_id:   AccountId,
    pub balance:      Money,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct Account {
    id:      AccountId,
    owner:   ClientId,
    branch:  BranchId,
    balance: Money,
    history: Vec<Transaction>,
}

impl Account {
    pub(crate) fn new(id: AccountId, owner: ClientId, branch: BranchId) -> Self {
        Self {
            id,
            owner,
            branch,
            balance: Money::ZERO,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> ClientId {
        self.owner
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Credit the account, or reject without touching anything.
    pub fn deposit(
        &mut self,
        amount: Money,
        movement: Movement,
        at: DateTime<Utc>,
    ) -> LedgerResult<&Transaction> {
        ensure_positive(amount)?;
        let description = match movement {
            Movement::Plain       => TransactionKind::Deposit,
            Movement::TransferLeg => TransactionKind::TransferIn,
        };
        self.balance = self.credited(amount)?;
        Ok(self.append(description, amount, at))
    }

    /// Balance after crediting `amount`, without applying it.
    pub(crate) fn credited(&self, amount: Money) -> LedgerResult<Money> {
        self.balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account_id: self.id })
    }

    /// Debit the account, or reject without touching anything.
    pub fn withdraw(
        &mut self,
        amount: Money,
        movement: Movement,
        at: DateTime<Utc>,
    ) -> LedgerResult<&Transaction> {
        ensure_positive(amount)?;
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account_id: self.id,
                balance:    self.balance,
                requested:  amount,
            });
        }
        let description = match movement {
            Movement::Plain       => TransactionKind::Withdrawal,
            Movement::TransferLeg => TransactionKind::TransferOut,
        };
        self.balance -= amount;
        Ok(self.append(description, -amount, at))
    }

    pub fn statement(&self) -> Statement {
        Statement {
            account_id:   self.id,
            balance:      self.balance,
            transactions: self.history.clone(),
        }
    }

    /// Replace balance and history with previously saved state.
    ///
    /// The pair is checked against the account invariants before anything
    /// is overwritten: non-negative balance, balance equal to the history
    /// sum, and each entry signed the way its description says.
    pub fn load_history(&mut self, balance: Money, transactions: Vec<Transaction>) -> BankResult<()> {
        if balance < Money::ZERO {
            return Err(invalid(self.id, format!("negative balance {balance}")));
        }
        for (i, t) in transactions.iter().enumerate() {
            let signed_ok = if t.description.is_inflow() {
                t.amount > Money::ZERO
            } else {
                t.amount < Money::ZERO
            };
            if !signed_ok {
                return Err(invalid(
                    self.id,
                    format!("entry {i} ({:?}) has amount {}", t.description, t.amount),
                ));
            }
        }
        let sum = transactions
            .iter()
            .try_fold(Money::ZERO, |acc, t| acc.checked_add(t.amount))
            .ok_or_else(|| invalid(self.id, "history total overflows".to_string()))?;
        if sum != balance {
            return Err(invalid(
                self.id,
                format!("balance {balance} does not match history total {sum}"),
            ));
        }
        self.balance = balance;
        self.history = transactions;
        Ok(())
    }

    fn append(&mut self, description: TransactionKind, amount: Money, at: DateTime<Utc>) -> &Transaction {
        self.history.push(Transaction {
            timestamp: at,
            description,
            amount,
        });
        &self.history[self.history.len() - 1]
    }
}

pub(crate) fn ensure_positive(amount: Money) -> LedgerResult<()> {
    if amount <= Money::ZERO {
        return Err(LedgerError::InvalidAmount { amount });
    }
    Ok(())
}

fn invalid(account_id: AccountId, detail: String) -> BankError {
    BankError::InvalidSnapshot {
        reason: format!("account {account_id}: {detail}"),
    }
}
