//! Structured records of everything the bank does.
//!
//! RULE: The core never prints. Presentation layers drain these
//! events and decide how to show them.

use crate::{
    compliance::OperationKind,
    types::{AccountId, BranchId, ClientId, Money},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BankEvent {
    // ── Directory ──────────────────────────────────
    BranchRegistered {
        branch_id: BranchId,
        name:      String,
    },
    ClientRegistered {
        client_id: ClientId,
        branch_id: BranchId,
        name:      String,
    },
    AccountOpened {
        account_id: AccountId,
        client_id:  ClientId,
        branch_id:  BranchId,
    },

    // ── Ledger ─────────────────────────────────────
    Deposited {
        account_id: AccountId,
        amount:     Money,
        balance:    Money,
    },
    Withdrawn {
        account_id: AccountId,
        amount:     Money,
        balance:    Money,
    },
    Transferred {
        from:   AccountId,
        to:     AccountId,
        amount: Money,
    },
    OperationRejected {
        kind:       OperationKind,
        account_id: AccountId,
        amount:     Money,
        reason:     String,
    },

    // ── Compliance ─────────────────────────────────
    ComplianceFlagged {
        record_id:  Uuid,
        kind:       OperationKind,
        amount:     Money,
        account_id: AccountId,
    },
}

impl BankEvent {
    /// Stable name, used for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BranchRegistered { .. }  => "branch_registered",
            Self::ClientRegistered { .. }  => "client_registered",
            Self::AccountOpened { .. }     => "account_opened",
            Self::Deposited { .. }         => "deposited",
            Self::Withdrawn { .. }         => "withdrawn",
            Self::Transferred { .. }       => "transferred",
            Self::OperationRejected { .. } => "operation_rejected",
            Self::ComplianceFlagged { .. } => "compliance_flagged",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub bank_name:  String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized BankEvent
}
