//! Plain-text views: account statement, regulatory log, bank structure.
//! Read-only; rendering never mutates the bank.

use crate::{
    bank::Bank,
    compliance::{ComplianceRecord, OperationKind},
    error::BankResult,
    format,
    types::AccountId,
};
use std::fmt::Write;

const RULE: &str = "---------------------------------------";

pub fn render_statement(bank: &Bank, account_id: AccountId) -> BankResult<String> {
    let statement = bank.statement(account_id)?;
    let holder = bank.directory().holder_of(account_id)?;
    let branch = bank.directory().branch(holder.branch())?;
    let symbol = &bank.config().currency_symbol;

    let mut out = String::new();
    let _ = writeln!(out, "--- STATEMENT: {} ---", holder.name());
    let _ = writeln!(out, "Branch: {} | Account: {}", branch.display_name(), account_id);
    let _ = writeln!(out, "{RULE}");
    if statement.transactions.is_empty() {
        let _ = writeln!(out, "No transactions recorded.");
    }
    for t in &statement.transactions {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            format::timestamp(t.timestamp),
            t.description.label(),
            format::currency(t.amount, symbol)
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "CURRENT BALANCE: {}", format::currency(statement.balance, symbol));
    let _ = writeln!(out, "{RULE}");
    Ok(out)
}

pub fn render_compliance_log(records: &[ComplianceRecord], symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- REGULATOR LOG (high-value movements) ---");
    if records.is_empty() {
        let _ = writeln!(out, "No high-value movements recorded.");
    }
    for r in records {
        let kind = match r.kind {
            OperationKind::Deposit    => "Deposit",
            OperationKind::Withdrawal => "Withdrawal",
            OperationKind::Transfer   => "Transfer",
        };
        let _ = write!(
            out,
            "[{}] {kind} of {} from account {}",
            format::timestamp(r.timestamp),
            format::currency(r.amount, symbol),
            r.source_account_id
        );
        if let Some(to) = r.destination_account_id {
            let _ = write!(out, " to account {to}");
        }
        let _ = writeln!(out, " (ref {})", r.record_id);
    }
    let _ = writeln!(out, "{RULE}");
    out
}

pub fn render_structure(bank: &Bank) -> String {
    let dir = bank.directory();
    let mut out = String::new();
    let _ = writeln!(out, "--- STRUCTURE OF BANK {} ---", bank.name());
    for branch in dir.branches() {
        let _ = writeln!(out, "Branch: {}", branch.display_name());

        let names: Vec<&str> = branch
            .clients()
            .iter()
            .filter_map(|id| dir.client(*id).ok())
            .map(|c| c.name())
            .collect();
        let _ = writeln!(out, "  Clients: {}", join_or_none(&names));

        let numbers: Vec<String> = branch.accounts().iter().map(|n| n.to_string()).collect();
        let numbers: Vec<&str> = numbers.iter().map(String::as_str).collect();
        let _ = writeln!(out, "  Accounts: {}", join_or_none(&numbers));
    }
    let _ = writeln!(out, "{RULE}");
    out
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
