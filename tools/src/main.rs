//! bank-runner: headless driver for the bank core.
//!
//! Usage:
//!   bank-runner                               demo scenario, in-memory
//!   bank-runner --db bank.db                  demo, restoring/saving state
//!   bank-runner --seed 7 --ops 500 --db b.db  seeded synthetic workload
//!   bank-runner --ipc-mode --db bank.db       JSON-lines commands on stdin
//!   bank-runner --config bank.json ...        override bank settings

use anyhow::Result;
use bank_core::{
    bank::Bank,
    clock::SystemClock,
    command::BankCommand,
    config::BankConfig,
    directory::{Branch, Client},
    report,
    store::BankStore,
    workload::Workload,
};
use rust_decimal::Decimal;
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ops = parse_arg(&args, "--ops", 0u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");

    let config = match str_arg(&args, "--config") {
        Some(path) => BankConfig::load(path)?,
        None => BankConfig::default(),
    };

    if !ipc_mode {
        println!("{} bank-runner", config.bank_name);
        println!("  db:        {db}");
        println!("  threshold: {}", config.compliance_threshold);
        if ops > 0 {
            println!("  seed:      {seed}");
            println!("  ops:       {ops}");
        }
        println!();
    }

    let store = BankStore::open(db)?;
    store.migrate()?;

    let mut bank = match store.latest_snapshot(&config.bank_name)? {
        Some(snapshot) => {
            log::info!("Restoring {} from {db}", config.bank_name);
            Bank::restore(config, snapshot, Box::new(SystemClock))?
        }
        None => {
            log::info!("No saved state for {}; seeding demo directory", config.bank_name);
            let mut bank = Bank::new(config, Box::new(SystemClock));
            seed_directory(&mut bank)?;
            persist(&store, &mut bank)?;
            bank
        }
    };

    if ipc_mode {
        run_ipc_loop(&store, &mut bank)?;
    } else if ops > 0 {
        let summary = Workload::new(seed).run(&mut bank, ops)?;
        persist(&store, &mut bank)?;
        println!("=== WORKLOAD SUMMARY ===");
        println!("  committed: {}", summary.committed);
        println!("  rejected:  {}", summary.rejected);
        println!();
        print_reports(&bank)?;
    } else {
        run_demo(&mut bank);
        persist(&store, &mut bank)?;
        print_reports(&bank)?;
    }

    Ok(())
}

/// Two branches, one client and account in each.
fn seed_directory(bank: &mut Bank) -> Result<()> {
    let centro = bank.register_branch(Branch::new("Centro"));
    let bairro = bank.register_branch(Branch::new("Bairro"));
    bank.enroll(centro, Client::new("Alice Silva", "111.111.111-11"))?;
    bank.enroll(bairro, Client::new("Beto Souza", "222.222.222-22"))?;
    Ok(())
}

/// The scripted session: a normal and a high-value deposit, a
/// withdrawal, a high-value transfer and an overdrawn withdrawal.
fn run_demo(bank: &mut Bank) {
    let script = [
        BankCommand::Deposit { account_id: 1, amount: Decimal::from(500) },
        BankCommand::Deposit { account_id: 2, amount: Decimal::from(2500) },
        BankCommand::Withdraw { account_id: 1, amount: Decimal::from(100) },
        BankCommand::Transfer { from: 2, to: 1, amount: Decimal::from(1500) },
        BankCommand::Withdraw { account_id: 1, amount: Decimal::from(5000) },
    ];
    for command in script {
        if let Err(e) = bank.execute(command) {
            println!("  rejected: {e}");
        }
    }
}

fn run_ipc_loop(store: &BankStore, bank: &mut Bank) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(&buffer) {
            Ok(v) => v,
            Err(e) => {
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if value["cmd"] == "quit" {
            break;
        }
        let command: BankCommand = match serde_json::from_value(value) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let mutates = command.mutates();
        match bank.execute(command) {
            Ok(outcome) => {
                if mutates {
                    persist(store, bank)?;
                }
                writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?;
            }
            Err(e) => {
                // Rejections are still recorded in the event log.
                store_events(store, bank)?;
                reply_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

/// Save a snapshot plus everything that happened since the last save.
fn persist(store: &BankStore, bank: &mut Bank) -> Result<()> {
    store_events(store, bank)?;
    let fresh = store.sync_compliance(bank.name(), bank.compliance_records())?;
    store.save_snapshot(&bank.snapshot()?, bank.now())?;
    log::info!("[SYSTEM] state saved ({fresh} new compliance records)");
    Ok(())
}

fn store_events(store: &BankStore, bank: &mut Bank) -> Result<()> {
    for event in bank.drain_events() {
        store.append_event(bank.name(), &event)?;
    }
    Ok(())
}

fn print_reports(bank: &Bank) -> Result<()> {
    for account in bank.directory().accounts() {
        println!("{}", report::render_statement(bank, account.id())?);
    }
    println!(
        "{}",
        report::render_compliance_log(bank.compliance_records(), &bank.config().currency_symbol)
    );
    println!("{}", report::render_structure(bank));
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
