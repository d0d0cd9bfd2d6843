use crate::{
    account::Statement,
    compliance::ComplianceRecord,
    ledger::Receipt,
    types::{AccountId, BranchId, ClientId, Money},
};
use serde::{Deserialize, Serialize};

/// Everything an operator can ask the bank to do.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BankCommand {
    // ── Directory ─────────────────────────────────
    RegisterBranch { name: String },
    RegisterClient { branch_id: BranchId, name: String, cpf: String },
    OpenAccount { client_id: ClientId },

    // ── Ledger ────────────────────────────────────
    Deposit { account_id: AccountId, amount: Money },
    Withdraw { account_id: AccountId, amount: Money },
    Transfer { from: AccountId, to: AccountId, amount: Money },

    // ── Read-only ─────────────────────────────────
    Statement { account_id: AccountId },
    ComplianceLog,
    Structure,
}

impl BankCommand {
    /// True if a successful run of this command changes bank state
    /// and therefore warrants a save.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::Statement { .. } | Self::ComplianceLog | Self::Structure
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    BranchRegistered { branch_id: BranchId },
    ClientRegistered { client_id: ClientId },
    AccountOpened { account_id: AccountId },
    Committed(Receipt),
    Statement(Statement),
    ComplianceLog { records: Vec<ComplianceRecord> },
    Structure { text: String },
}
