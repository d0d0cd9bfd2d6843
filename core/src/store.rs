//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The bank never executes SQL; the runner hands it snapshots,
//! events and compliance records to keep.

use crate::{
    compliance::{ComplianceRecord, OperationKind},
    error::{BankError, BankResult},
    event::{BankEvent, EventLogEntry},
    snapshot::BankSnapshot,
    types::{AccountId, Money},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use uuid::Uuid;

pub struct BankStore {
    conn: Connection,
}

impl BankStore {
    /// Open (or create) the bank database at `path`.
    pub fn open(path: &str) -> BankResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> BankResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> BankResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_bank.sql"))?;
        Ok(())
    }

    // ── Snapshot ───────────────────────────────────────────────

    /// Save a snapshot and drop the bank's older ones. Only the newest is ever read.
    pub fn save_snapshot(&self, snapshot: &BankSnapshot, saved_at: DateTime<Utc>) -> BankResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (bank_name, saved_at, state_json) VALUES (?1, ?2, ?3)",
            params![snapshot.bank_name, saved_at.to_rfc3339(), snapshot.to_json()?],
        )?;
        let newest = self.conn.last_insert_rowid();
        let pruned = self.conn.execute(
            "DELETE FROM snapshot WHERE bank_name = ?1 AND id < ?2",
            params![snapshot.bank_name, newest],
        )?;
        log::debug!("Snapshot of {} saved ({pruned} older pruned)", snapshot.bank_name);
        Ok(())
    }

    pub fn snapshot_count(&self, bank_name: &str) -> BankResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM snapshot WHERE bank_name = ?1",
            params![bank_name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn latest_snapshot(&self, bank_name: &str) -> BankResult<Option<BankSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM snapshot WHERE bank_name = ?1 ORDER BY id DESC LIMIT 1",
                params![bank_name],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| BankSnapshot::from_json(&j).map_err(BankError::from))
            .transpose()
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, bank_name: &str, event: &BankEvent) -> BankResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (bank_name, event_type, payload) VALUES (?1, ?2, ?3)",
            params![bank_name, event.type_name(), serde_json::to_string(event)?],
        )?;
        Ok(())
    }

    pub fn events(&self, bank_name: &str) -> BankResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bank_name, event_type, payload
             FROM event_log WHERE bank_name = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![bank_name], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    bank_name:  row.get(1)?,
                    event_type: row.get(2)?,
                    payload:    row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Compliance log ─────────────────────────────────────────

    /// Insert records not yet stored. Returns how many were new.
    pub fn sync_compliance(&self, bank_name: &str, records: &[ComplianceRecord]) -> BankResult<usize> {
        let mut inserted = 0;
        for r in records {
            inserted += self.conn.execute(
                "INSERT OR IGNORE INTO compliance_log (
                    record_id, bank_name, kind, amount,
                    source_account_id, destination_account_id, recorded_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    r.record_id.to_string(),
                    bank_name,
                    r.kind.as_str(),
                    r.amount.to_string(),
                    r.source_account_id as i64,
                    r.destination_account_id.map(|d| d as i64),
                    r.timestamp.to_rfc3339(),
                ],
            )?;
        }
        Ok(inserted)
    }

    pub fn compliance_records(&self, bank_name: &str) -> BankResult<Vec<ComplianceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_id, kind, amount, source_account_id,
                    destination_account_id, recorded_at
             FROM compliance_log WHERE bank_name = ?1
             ORDER BY recorded_at ASC, rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![bank_name], |row| {
                Ok(RawComplianceRow {
                    record_id:   row.get(0)?,
                    kind:        row.get(1)?,
                    amount:      row.get(2)?,
                    source:      row.get(3)?,
                    destination: row.get(4)?,
                    recorded_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawComplianceRow::decode).collect()
    }
}

/// Column values as SQLite hands them back, before parsing.
struct RawComplianceRow {
    record_id:   String,
    kind:        String,
    amount:      String,
    source:      i64,
    destination: Option<i64>,
    recorded_at: String,
}

impl RawComplianceRow {
    fn decode(self) -> BankResult<ComplianceRecord> {
        let corrupt = |what: &str, value: &str| BankError::InvalidSnapshot {
            reason: format!("compliance_log {what} '{value}' is unreadable"),
        };
        Ok(ComplianceRecord {
            record_id: Uuid::parse_str(&self.record_id)
                .map_err(|_| corrupt("record_id", &self.record_id))?,
            kind: OperationKind::parse(&self.kind).ok_or_else(|| corrupt("kind", &self.kind))?,
            amount: Money::from_str(&self.amount).map_err(|_| corrupt("amount", &self.amount))?,
            source_account_id: self.source as AccountId,
            destination_account_id: self.destination.map(|d| d as AccountId),
            timestamp: DateTime::parse_from_rfc3339(&self.recorded_at)
                .map_err(|_| corrupt("recorded_at", &self.recorded_at))?
                .with_timezone(&Utc),
        })
    }
}
