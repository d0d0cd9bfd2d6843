//! Seeded synthetic traffic: a reproducible stream of ledger commands
//! against the accounts a bank already has.

use crate::{
    bank::Bank,
    command::BankCommand,
    rng::{WorkloadRng, WorkloadStream},
    types::{AccountId, Money},
};
use serde::{Deserialize, Serialize};

pub struct Workload {
    ops:      WorkloadRng,
    accounts: WorkloadRng,
    amounts:  WorkloadRng,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub committed: u64,
    pub rejected:  u64,
}

impl Workload {
    pub fn new(seed: u64) -> Self {
        Self {
            ops:      WorkloadRng::new(seed, WorkloadStream::Operation),
            accounts: WorkloadRng::new(seed, WorkloadStream::Account),
            amounts:  WorkloadRng::new(seed, WorkloadStream::Amount),
        }
    }

    /// Next command, or None if the bank has no accounts to act on.
    /// Mix: 45% deposit, 30% withdrawal, 25% transfer.
    pub fn next_command(&mut self, bank: &Bank) -> Option<BankCommand> {
        let count = bank.directory().accounts().len() as u64;
        if count == 0 {
            return None;
        }
        let account_id = self.pick_account(count);
        let amount = self.draw_amount();

        let roll = self.ops.next_f64();
        let command = if roll < 0.45 {
            BankCommand::Deposit { account_id, amount }
        } else if roll < 0.75 {
            BankCommand::Withdraw { account_id, amount }
        } else {
            BankCommand::Transfer {
                from: account_id,
                to: self.pick_account(count),
                amount,
            }
        };
        Some(command)
    }

    /// Run `ops` commands. Rejections are counted, not propagated;
    /// anything other than a ledger rejection aborts the run.
    pub fn run(&mut self, bank: &mut Bank, ops: u64) -> crate::error::BankResult<WorkloadSummary> {
        let mut summary = WorkloadSummary::default();
        for _ in 0..ops {
            let Some(command) = self.next_command(bank) else {
                break;
            };
            match bank.execute(command) {
                Ok(_) => summary.committed += 1,
                Err(e) if e.ledger().is_some() => summary.rejected += 1,
                Err(e) => return Err(e),
            }
        }
        log::debug!(
            "workload: {} committed, {} rejected",
            summary.committed,
            summary.rejected
        );
        Ok(summary)
    }

    fn pick_account(&mut self, count: u64) -> AccountId {
        self.accounts.next_u64_below(count) + 1
    }

    /// Cents-precision amount, Pareto-shaped, capped at 5000.
    fn draw_amount(&mut self) -> Money {
        let raw = self.amounts.pareto(20.0, 1.2).min(5000.0);
        let cents = (raw * 100.0).round() as i64;
        Money::new(cents.max(1), 2)
    }
}
