//! Regulatory log of high-value movements.
//!
//! A record is appended when, and only when, the moved amount is
//! strictly greater than the threshold. Records are never removed.

use crate::types::{AccountId, Money};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_COMPLIANCE_THRESHOLD: Money = dec!(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit    => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer   => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deposit"    => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            "transfer"   => Some(Self::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub record_id:              Uuid,
    pub kind:                   OperationKind,
    pub amount:                 Money,
    pub source_account_id:      AccountId,
    pub destination_account_id: Option<AccountId>,
    pub timestamp:              DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ComplianceLog {
    threshold: Money,
    records:   Vec<ComplianceRecord>,
}

impl Default for ComplianceLog {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLIANCE_THRESHOLD)
    }
}

impl ComplianceLog {
    pub fn new(threshold: Money) -> Self {
        Self { threshold, records: Vec::new() }
    }

    /// Rebuild a log from saved records, kept in their saved order.
    pub fn from_records(threshold: Money, records: Vec<ComplianceRecord>) -> Self {
        Self { threshold, records }
    }

    /// Note a movement. Returns the new record if the amount was reportable.
    pub fn record(
        &mut self,
        kind: OperationKind,
        amount: Money,
        source: AccountId,
        destination: Option<AccountId>,
        at: DateTime<Utc>,
    ) -> Option<&ComplianceRecord> {
        if amount <= self.threshold {
            return None;
        }
        let record = ComplianceRecord {
            record_id: Uuid::new_v4(),
            kind,
            amount,
            source_account_id: source,
            destination_account_id: destination,
            timestamp: at,
        };
        log::warn!(
            "High-value {} of {} from account {}{} recorded ({})",
            kind.as_str(),
            amount,
            source,
            destination.map(|d| format!(" to account {d}")).unwrap_or_default(),
            record.record_id,
        );
        self.records.push(record);
        self.records.last()
    }

    pub fn records(&self) -> &[ComplianceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strictly_greater_than() {
        let mut log = ComplianceLog::default();
        let at = DateTime::<Utc>::UNIX_EPOCH;

        assert!(log.record(OperationKind::Deposit, dec!(1000), 1, None, at).is_none());
        let rec = log
            .record(OperationKind::Deposit, dec!(1000.01), 1, None, at)
            .cloned()
            .expect("above threshold");

        assert_eq!(rec.amount, dec!(1000.01));
        assert_eq!(rec.source_account_id, 1);
        assert_eq!(rec.destination_account_id, None);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn custom_threshold_applies() {
        let mut log = ComplianceLog::new(dec!(10));
        let at = DateTime::<Utc>::UNIX_EPOCH;
        log.record(OperationKind::Transfer, dec!(11), 1, Some(2), at);
        assert_eq!(log.records()[0].destination_account_id, Some(2));
    }
}
