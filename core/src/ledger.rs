//! Ledger operations: deposit, withdraw, transfer.
//!
//! Each operation validates the amount, mutates one or two resolved
//! accounts, and reports the movement to the compliance log.
//!
//! TRANSFER ORDER (fixed):
//!   1. validate amount
//!   2. check the destination can take the credit
//!   3. withdraw from source   (may fail: nothing has changed yet)
//!   4. deposit to destination (cannot fail: checked in step 2)
//!   5. one Transfer compliance check carrying both account ids
//!
//! Both legs of a transfer share one timestamp.

use crate::{
    account::{ensure_positive, Account, Movement},
    clock::Clock,
    compliance::{ComplianceLog, ComplianceRecord, OperationKind},
    error::{LedgerError, LedgerResult},
    types::{AccountId, Money},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a committed ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub kind:                OperationKind,
    pub amount:              Money,
    pub source:              AccountId,
    pub destination:         Option<AccountId>,
    pub source_balance:      Money,
    pub destination_balance: Option<Money>,
    pub timestamp:           DateTime<Utc>,
    /// Compliance record id, when the movement was reportable.
    pub flagged:             Option<Uuid>,
}

pub struct Ledger {
    compliance: ComplianceLog,
    clock:      Box<dyn Clock>,
}

impl Ledger {
    pub fn new(compliance: ComplianceLog, clock: Box<dyn Clock>) -> Self {
        Self { compliance, clock }
    }

    pub fn compliance(&self) -> &ComplianceLog {
        &self.compliance
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn deposit(&mut self, account: &mut Account, amount: Money) -> LedgerResult<Receipt> {
        ensure_positive(amount).inspect_err(|e| log::warn!("Deposit rejected: {e}"))?;
        let at = self.clock.now();
        account
            .deposit(amount, Movement::Plain, at)
            .inspect_err(|e| log::warn!("Deposit rejected: {e}"))?;
        log::debug!(
            "Deposit of {amount} into account {}; balance {}",
            account.id(),
            account.balance()
        );

        let flagged = self.report(OperationKind::Deposit, amount, account.id(), None, at);
        Ok(Receipt {
            kind: OperationKind::Deposit,
            amount,
            source: account.id(),
            destination: None,
            source_balance: account.balance(),
            destination_balance: None,
            timestamp: at,
            flagged,
        })
    }

    pub fn withdraw(&mut self, account: &mut Account, amount: Money) -> LedgerResult<Receipt> {
        ensure_positive(amount).inspect_err(|e| log::warn!("Withdrawal rejected: {e}"))?;
        let at = self.clock.now();
        account
            .withdraw(amount, Movement::Plain, at)
            .inspect_err(|e| log::warn!("Withdrawal rejected: {e}"))?;
        log::debug!(
            "Withdrawal of {amount} from account {}; balance {}",
            account.id(),
            account.balance()
        );

        let flagged = self.report(OperationKind::Withdrawal, amount, account.id(), None, at);
        Ok(Receipt {
            kind: OperationKind::Withdrawal,
            amount,
            source: account.id(),
            destination: None,
            source_balance: account.balance(),
            destination_balance: None,
            timestamp: at,
            flagged,
        })
    }

    /// Move funds between two distinct accounts.
    /// The borrow checker guarantees `source` and `destination` differ;
    /// see [`Ledger::transfer_to_self`] for the single-account case.
    pub fn transfer(
        &mut self,
        source: &mut Account,
        destination: &mut Account,
        amount: Money,
    ) -> LedgerResult<Receipt> {
        ensure_positive(amount).inspect_err(|e| log::warn!("Transfer rejected: {e}"))?;
        destination
            .credited(amount)
            .inspect_err(|e| log::warn!("Transfer rejected: {e}"))?;
        let at = self.clock.now();

        source
            .withdraw(amount, Movement::TransferLeg, at)
            .inspect_err(|e| log::warn!("Transfer rejected: {e}"))?;
        destination.deposit(amount, Movement::TransferLeg, at)?;
        log::debug!(
            "Transfer of {amount} from account {} to account {}",
            source.id(),
            destination.id()
        );

        let flagged = self.report(
            OperationKind::Transfer,
            amount,
            source.id(),
            Some(destination.id()),
            at,
        );
        Ok(Receipt {
            kind: OperationKind::Transfer,
            amount,
            source: source.id(),
            destination: Some(destination.id()),
            source_balance: source.balance(),
            destination_balance: Some(destination.balance()),
            timestamp: at,
            flagged,
        })
    }

    /// Transfer where source and destination are the same account.
    /// Runs both legs against it: net balance change is zero, but the
    /// withdrawal leg still needs sufficient funds.
    pub fn transfer_to_self(&mut self, account: &mut Account, amount: Money) -> LedgerResult<Receipt> {
        ensure_positive(amount).inspect_err(|e| log::warn!("Transfer rejected: {e}"))?;
        let at = self.clock.now();

        account
            .withdraw(amount, Movement::TransferLeg, at)
            .inspect_err(|e| log::warn!("Transfer rejected: {e}"))?;
        account.deposit(amount, Movement::TransferLeg, at)?;
        log::debug!("Transfer of {amount} within account {}", account.id());

        let flagged = self.report(
            OperationKind::Transfer,
            amount,
            account.id(),
            Some(account.id()),
            at,
        );
        Ok(Receipt {
            kind: OperationKind::Transfer,
            amount,
            source: account.id(),
            destination: Some(account.id()),
            source_balance: account.balance(),
            destination_balance: Some(account.balance()),
            timestamp: at,
            flagged,
        })
    }

    /// Reject a self-transfer without touching the account.
    pub(crate) fn reject_self_transfer(&self, account_id: AccountId) -> LedgerError {
        let err = LedgerError::SameAccount { account_id };
        log::warn!("Transfer rejected: {err}");
        err
    }

    fn report(
        &mut self,
        kind: OperationKind,
        amount: Money,
        source: AccountId,
        destination: Option<AccountId>,
        at: DateTime<Utc>,
    ) -> Option<Uuid> {
        self.compliance
            .record(kind, amount, source, destination, at)
            .map(|r: &ComplianceRecord| r.record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        Ledger::new(ComplianceLog::default(), Box::new(ManualClock::at_epoch()))
    }

    fn account(id: AccountId, opening: Money, ledger: &mut Ledger) -> Account {
        let mut a = Account::new(id, 0, 1);
        if opening > Money::ZERO {
            ledger.deposit(&mut a, opening).unwrap();
        }
        a
    }

    #[test]
    fn transfer_moves_funds_and_emits_one_record() {
        let mut ledger = ledger();
        let mut a = account(1, dec!(2000), &mut ledger);
        let mut b = account(2, Money::ZERO, &mut ledger);
        let before = ledger.compliance().len();

        let receipt = ledger.transfer(&mut a, &mut b, dec!(1500)).unwrap();

        assert_eq!(a.balance(), dec!(500));
        assert_eq!(b.balance(), dec!(1500));
        assert_eq!(receipt.source_balance, dec!(500));
        assert_eq!(receipt.destination_balance, Some(dec!(1500)));
        assert_eq!(ledger.compliance().len(), before + 1);

        let rec = ledger.compliance().records().last().unwrap();
        assert_eq!(rec.kind, OperationKind::Transfer);
        assert_eq!(rec.source_account_id, 1);
        assert_eq!(rec.destination_account_id, Some(2));
        assert_eq!(receipt.flagged, Some(rec.record_id));
    }

    #[test]
    fn failed_source_leg_leaves_destination_untouched() {
        let mut ledger = ledger();
        let mut a = account(1, dec!(100), &mut ledger);
        let mut b = account(2, Money::ZERO, &mut ledger);

        let err = ledger.transfer(&mut a, &mut b, dec!(1500)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { account_id: 1, .. }));
        assert_eq!(a.balance(), dec!(100));
        assert_eq!(a.history().len(), 1);
        assert_eq!(b.balance(), Money::ZERO);
        assert!(b.history().is_empty());
        assert!(ledger.compliance().is_empty());
    }

    #[test]
    fn overflowing_destination_leaves_source_untouched() {
        let mut ledger = ledger();
        let mut a = account(1, dec!(100), &mut ledger);
        let mut b = account(2, Money::MAX, &mut ledger);
        let records = ledger.compliance().len();

        let err = ledger.transfer(&mut a, &mut b, dec!(1)).unwrap_err();
        assert_eq!(err, LedgerError::BalanceOverflow { account_id: 2 });
        assert_eq!(a.balance(), dec!(100));
        assert_eq!(a.history().len(), 1);
        assert_eq!(b.balance(), Money::MAX);
        assert_eq!(b.history().len(), 1);
        assert_eq!(ledger.compliance().len(), records);
    }

    #[test]
    fn self_transfer_nets_to_zero() {
        let mut ledger = ledger();
        let mut a = account(1, dec!(50), &mut ledger);

        let receipt = ledger.transfer_to_self(&mut a, dec!(20)).unwrap();
        assert_eq!(receipt.source_balance, dec!(50));
        assert_eq!(a.balance(), dec!(50));
        assert_eq!(a.history().len(), 3);

        assert!(ledger.transfer_to_self(&mut a, dec!(51)).is_err());
        assert_eq!(a.history().len(), 3);
    }
}
