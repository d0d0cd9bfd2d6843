//! Text rendering of statements, the regulator log and bank structure.

use bank_core::{
    bank::Bank,
    clock::ManualClock,
    command::{BankCommand, CommandOutcome},
    config::BankConfig,
    directory::{Branch, Client},
    report,
};
use rust_decimal_macros::dec;

fn build() -> Bank {
    let mut bank = Bank::new(BankConfig::default(), Box::new(ManualClock::at_epoch()));
    let centro = bank.register_branch(Branch::new("Centro"));
    bank.register_branch(Branch::new("Bairro"));
    bank.enroll(centro, Client::new("Alice Silva", "111")).unwrap();
    bank
}

#[test]
fn statement_lists_entries_and_balance() {
    let mut bank = build();
    bank.deposit(1, dec!(1500)).unwrap();
    bank.withdraw(1, dec!(100)).unwrap();

    let text = report::render_statement(&bank, 1).unwrap();
    assert!(text.contains("STATEMENT: Alice Silva"));
    assert!(text.contains("Branch: 001 - Centro | Account: 1"));
    assert!(text.contains("[01/01/1970, 00:00:00] Deposit: R$ 1.500,00"));
    assert!(text.contains("Withdrawal: -R$ 100,00"));
    assert!(text.contains("CURRENT BALANCE: R$ 1.400,00"));
}

#[test]
fn empty_statement_says_so() {
    let bank = build();
    let text = report::render_statement(&bank, 1).unwrap();
    assert!(text.contains("No transactions recorded."));
    assert!(text.contains("CURRENT BALANCE: R$ 0,00"));
}

#[test]
fn compliance_log_mentions_both_accounts_for_transfers() {
    let mut bank = build();
    let bairro = bank.directory().branches()[1].number();
    let beto = bank.enroll(bairro, Client::new("Beto Souza", "222")).unwrap();
    bank.deposit(1, dec!(3000)).unwrap();
    bank.transfer(1, beto, dec!(1500)).unwrap();

    let text = report::render_compliance_log(bank.compliance_records(), "R$");
    assert!(text.contains("Deposit of R$ 3.000,00 from account 1"));
    assert!(text.contains("Transfer of R$ 1.500,00 from account 1 to account 2"));

    let empty = report::render_compliance_log(&[], "R$");
    assert!(empty.contains("No high-value movements recorded."));
}

#[test]
fn structure_lists_branches_clients_and_accounts() {
    let mut bank = build();
    let outcome = bank.execute(BankCommand::Structure).unwrap();
    let CommandOutcome::Structure { text } = outcome else {
        panic!("expected a structure outcome");
    };
    assert!(text.contains("Branch: 001 - Centro"));
    assert!(text.contains("  Clients: Alice Silva"));
    assert!(text.contains("  Accounts: 1"));
    assert!(text.contains("Branch: 002 - Bairro\n  Clients: None\n  Accounts: None"));
}

#[test]
fn commands_round_through_json() {
    let mut bank = build();
    let cmd: BankCommand =
        serde_json::from_str(r#"{"cmd":"deposit","account_id":1,"amount":"12.50"}"#).unwrap();
    assert!(cmd.mutates());

    let outcome = bank.execute(cmd).unwrap();
    let CommandOutcome::Committed(receipt) = outcome else {
        panic!("expected a committed receipt");
    };
    assert_eq!(receipt.source_balance, dec!(12.50));
    assert!(!BankCommand::Statement { account_id: 1 }.mutates());
}
