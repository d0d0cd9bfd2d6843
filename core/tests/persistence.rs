//! Snapshot save/restore and the SQLite store.

use bank_core::{
    bank::Bank,
    clock::ManualClock,
    config::BankConfig,
    directory::{Branch, Client},
    error::BankError,
    snapshot::BankSnapshot,
    store::BankStore,
};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

fn clock() -> Box<ManualClock> {
    Box::new(ManualClock::at_epoch())
}

/// The demo session: two branches, two accounts, a few movements.
fn demo_bank() -> Bank {
    let mut bank = Bank::new(BankConfig::default(), clock());
    let centro = bank.register_branch(Branch::new("Centro"));
    let bairro = bank.register_branch(Branch::new("Bairro"));
    let alice = bank.enroll(centro, Client::new("Alice Silva", "111.111.111-11")).unwrap();
    let beto = bank.enroll(bairro, Client::new("Beto Souza", "222.222.222-22")).unwrap();

    bank.deposit(alice, dec!(500)).unwrap();
    bank.deposit(beto, dec!(2500)).unwrap();
    bank.withdraw(alice, dec!(100)).unwrap();
    bank.transfer(beto, alice, dec!(1500)).unwrap();
    let _ = bank.withdraw(alice, dec!(5000));
    bank
}

fn store() -> BankStore {
    let store = BankStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn restore_reproduces_identical_statements() {
    let bank = demo_bank();
    let json = bank.snapshot().unwrap().to_json().unwrap();

    let restored = Bank::restore(
        BankConfig::default(),
        BankSnapshot::from_json(&json).unwrap(),
        clock(),
    )
    .unwrap();

    for account in bank.directory().accounts() {
        assert_eq!(
            restored.statement(account.id()).unwrap(),
            bank.statement(account.id()).unwrap(),
            "statement of account {} diverged after restore",
            account.id()
        );
    }
    assert_eq!(restored.compliance_records(), bank.compliance_records());
    assert_eq!(restored.directory().branch(2).unwrap().display_name(), "002 - Bairro");
    assert_eq!(restored.directory().holder_of(1).unwrap().cpf(), "111.111.111-11");
}

#[test]
fn restored_bank_keeps_numbering_and_operating() {
    let bank = demo_bank();
    let mut restored = Bank::restore(BankConfig::default(), bank.snapshot().unwrap(), clock()).unwrap();

    let centro = restored.directory().branches()[0].number();
    let carla = restored.enroll(centro, Client::new("Carla Dias", "333")).unwrap();
    assert_eq!(carla, 3);

    restored.transfer(1, carla, dec!(400)).unwrap();
    assert_eq!(restored.statement(1).unwrap().balance, dec!(1500));
    assert_eq!(restored.statement(carla).unwrap().balance, dec!(400));
}

#[test]
fn restore_rejects_tampered_balance() {
    let mut snapshot = demo_bank().snapshot().unwrap();
    snapshot.accounts[0].balance += dec!(1);

    let err = Bank::restore(BankConfig::default(), snapshot, clock())
        .err()
        .expect("tampered snapshot must not restore");
    assert!(matches!(err, BankError::InvalidSnapshot { .. }));
}

#[test]
fn restore_rejects_missing_branch() {
    for index in [9, usize::MAX] {
        let mut snapshot = demo_bank().snapshot().unwrap();
        snapshot.accounts[1].branch_index = index;
        assert!(
            matches!(
                Bank::restore(BankConfig::default(), snapshot, clock()),
                Err(BankError::InvalidSnapshot { .. })
            ),
            "branch index {index} should be rejected"
        );
    }
}

#[test]
fn store_returns_latest_snapshot() {
    let store = store();
    let mut bank = demo_bank();
    assert!(store.latest_snapshot(bank.name()).unwrap().is_none());

    store.save_snapshot(&bank.snapshot().unwrap(), DateTime::<Utc>::UNIX_EPOCH).unwrap();
    bank.deposit(1, dec!(1)).unwrap();
    let newest = bank.snapshot().unwrap();
    store.save_snapshot(&newest, DateTime::<Utc>::UNIX_EPOCH).unwrap();

    assert_eq!(store.latest_snapshot(bank.name()).unwrap(), Some(newest));
    assert_eq!(store.snapshot_count(bank.name()).unwrap(), 1, "older snapshots are pruned");
    assert!(store.latest_snapshot("Other Bank").unwrap().is_none());
}

#[test]
fn compliance_sync_is_idempotent() {
    let store = store();
    let bank = demo_bank();
    let records = bank.compliance_records();
    assert_eq!(records.len(), 2, "2500 deposit and 1500 transfer");

    assert_eq!(store.sync_compliance(bank.name(), records).unwrap(), 2);
    assert_eq!(store.sync_compliance(bank.name(), records).unwrap(), 0);
    assert_eq!(store.compliance_records(bank.name()).unwrap(), records.to_vec());
}

#[test]
fn event_log_keeps_order_and_types() {
    let store = store();
    let mut bank = demo_bank();
    for event in bank.drain_events() {
        store.append_event(bank.name(), &event).unwrap();
    }

    let types: Vec<String> = store
        .events(bank.name())
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            "branch_registered",
            "branch_registered",
            "client_registered",
            "account_opened",
            "client_registered",
            "account_opened",
            "deposited",
            "deposited",
            "compliance_flagged",
            "withdrawn",
            "transferred",
            "compliance_flagged",
            "operation_rejected",
        ]
    );
    assert!(bank.drain_events().is_empty());
}
