//! The bank: directory and ledger behind one façade.
//!
//! Callers name accounts by number; the bank resolves them through the
//! directory, runs the ledger operation, and queues a structured event
//! for every committed or rejected movement.

use crate::{
    account::Statement,
    clock::Clock,
    command::{BankCommand, CommandOutcome},
    compliance::{ComplianceLog, ComplianceRecord, OperationKind},
    config::{BankConfig, SelfTransferPolicy},
    directory::{Branch, Client, Directory},
    error::{BankError, BankResult, LedgerResult},
    event::BankEvent,
    ledger::{Ledger, Receipt},
    report,
    snapshot::{AccountSnapshot, BankSnapshot},
    types::{AccountId, BranchId, ClientId, Money},
};

pub struct Bank {
    config:    BankConfig,
    directory: Directory,
    ledger:    Ledger,
    events:    Vec<BankEvent>,
}

impl Bank {
    pub fn new(config: BankConfig, clock: Box<dyn Clock>) -> Self {
        let compliance = ComplianceLog::new(config.compliance_threshold);
        log::info!("Bank {} created", config.bank_name);
        Self {
            ledger: Ledger::new(compliance, clock),
            directory: Directory::new(),
            events: Vec::new(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.bank_name
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Current time on the bank's clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.ledger.now()
    }

    pub fn compliance_records(&self) -> &[ComplianceRecord] {
        self.ledger.compliance().records()
    }

    /// Take all events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<BankEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Directory ──────────────────────────────────────────────

    pub fn register_branch(&mut self, branch: Branch) -> BranchId {
        let name = branch.name().to_string();
        let branch_id = self.directory.register_branch(branch);
        log::info!("[{}] branch {branch_id:03} - {name} registered", self.config.bank_name);
        self.events.push(BankEvent::BranchRegistered { branch_id, name });
        branch_id
    }

    pub fn register_client(&mut self, branch_id: BranchId, client: Client) -> BankResult<ClientId> {
        let name = client.name().to_string();
        let client_id = self.directory.register_client(branch_id, client)?;
        log::info!("[{}] client {name} registered at branch {branch_id:03}", self.config.bank_name);
        self.events.push(BankEvent::ClientRegistered { client_id, branch_id, name });
        Ok(client_id)
    }

    pub fn open_account(&mut self, client_id: ClientId) -> BankResult<AccountId> {
        let account_id = self.directory.open_account(client_id)?;
        let branch_id = self.directory.find_account(account_id)?.branch();
        log::info!(
            "[{}] account {account_id} opened for {}",
            self.config.bank_name,
            self.directory.client(client_id)?.name()
        );
        self.events.push(BankEvent::AccountOpened { account_id, client_id, branch_id });
        Ok(account_id)
    }

    /// Convenience: register a client and open their account in one go.
    pub fn enroll(&mut self, branch_id: BranchId, client: Client) -> BankResult<AccountId> {
        let client_id = self.register_client(branch_id, client)?;
        self.open_account(client_id)
    }

    // ── Ledger ─────────────────────────────────────────────────

    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> BankResult<Receipt> {
        let account = self.directory.find_account_mut(account_id)?;
        let result = self.ledger.deposit(account, amount);
        self.settle(OperationKind::Deposit, account_id, amount, result)
    }

    pub fn withdraw(&mut self, account_id: AccountId, amount: Money) -> BankResult<Receipt> {
        let account = self.directory.find_account_mut(account_id)?;
        let result = self.ledger.withdraw(account, amount);
        self.settle(OperationKind::Withdrawal, account_id, amount, result)
    }

    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Money) -> BankResult<Receipt> {
        let result = if from == to {
            let account = self.directory.find_account_mut(from)?;
            match self.config.self_transfer {
                SelfTransferPolicy::Allow  => self.ledger.transfer_to_self(account, amount),
                SelfTransferPolicy::Reject => Err(self.ledger.reject_self_transfer(from)),
            }
        } else {
            let (source, destination) = self.directory.find_pair_mut(from, to)?;
            self.ledger.transfer(source, destination, amount)
        };
        self.settle(OperationKind::Transfer, from, amount, result)
    }

    pub fn statement(&self, account_id: AccountId) -> BankResult<Statement> {
        Ok(self.directory.find_account(account_id)?.statement())
    }

    /// Run one command. Used by the runner's IPC loop and workloads.
    pub fn execute(&mut self, command: BankCommand) -> BankResult<CommandOutcome> {
        let outcome = match command {
            BankCommand::RegisterBranch { name } => CommandOutcome::BranchRegistered {
                branch_id: self.register_branch(Branch::new(name)),
            },
            BankCommand::RegisterClient { branch_id, name, cpf } => CommandOutcome::ClientRegistered {
                client_id: self.register_client(branch_id, Client::new(name, cpf))?,
            },
            BankCommand::OpenAccount { client_id } => CommandOutcome::AccountOpened {
                account_id: self.open_account(client_id)?,
            },
            BankCommand::Deposit { account_id, amount } => {
                CommandOutcome::Committed(self.deposit(account_id, amount)?)
            }
            BankCommand::Withdraw { account_id, amount } => {
                CommandOutcome::Committed(self.withdraw(account_id, amount)?)
            }
            BankCommand::Transfer { from, to, amount } => {
                CommandOutcome::Committed(self.transfer(from, to, amount)?)
            }
            BankCommand::Statement { account_id } => CommandOutcome::Statement(self.statement(account_id)?),
            BankCommand::ComplianceLog => CommandOutcome::ComplianceLog {
                records: self.compliance_records().to_vec(),
            },
            BankCommand::Structure => CommandOutcome::Structure {
                text: report::render_structure(self),
            },
        };
        Ok(outcome)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn snapshot(&self) -> BankResult<BankSnapshot> {
        let mut accounts = Vec::with_capacity(self.directory.accounts().len());
        for account in self.directory.accounts() {
            let client = self.directory.client(account.owner())?;
            accounts.push(AccountSnapshot {
                account_id:   account.id(),
                client_name:  client.name().to_string(),
                cpf:          client.cpf().to_string(),
                branch_index: (account.branch() - 1) as usize,
                balance:      account.balance(),
                history:      account.history().to_vec(),
            });
        }
        Ok(BankSnapshot {
            bank_name:  self.config.bank_name.clone(),
            branches:   self.directory.branches().iter().map(|b| b.name().to_string()).collect(),
            accounts,
            compliance: self.compliance_records().to_vec(),
        })
    }

    /// Rebuild a bank from a snapshot. Replays two-phase construction,
    /// then loads each account's saved balance and history.
    /// No events are queued for the rebuilt entities.
    pub fn restore(config: BankConfig, snapshot: BankSnapshot, clock: Box<dyn Clock>) -> BankResult<Self> {
        let mut directory = Directory::new();
        for name in &snapshot.branches {
            directory.register_branch(Branch::new(name.clone()));
        }

        let mut accounts = snapshot.accounts;
        accounts.sort_by_key(|a| a.account_id);
        for saved in accounts {
            let missing_branch = || BankError::InvalidSnapshot {
                reason: format!(
                    "account {} refers to missing branch index {}",
                    saved.account_id, saved.branch_index
                ),
            };
            let branch_id = BranchId::try_from(saved.branch_index)
                .ok()
                .and_then(|i| i.checked_add(1))
                .ok_or_else(missing_branch)?;
            let client_id = directory
                .register_client(branch_id, Client::new(saved.client_name, saved.cpf))
                .map_err(|_| missing_branch())?;
            let account_id = directory.open_account(client_id)?;
            if account_id != saved.account_id {
                return Err(BankError::InvalidSnapshot {
                    reason: format!(
                        "account numbers are not contiguous: expected {account_id}, found {}",
                        saved.account_id
                    ),
                });
            }
            directory
                .find_account_mut(account_id)?
                .load_history(saved.balance, saved.history)?;
        }

        let compliance = ComplianceLog::from_records(config.compliance_threshold, snapshot.compliance);
        log::info!(
            "Bank {} restored: {} branches, {} accounts, {} compliance records",
            config.bank_name,
            directory.branches().len(),
            directory.accounts().len(),
            compliance.len()
        );
        Ok(Self {
            ledger: Ledger::new(compliance, clock),
            directory,
            events: Vec::new(),
            config,
        })
    }

    fn settle(
        &mut self,
        kind: OperationKind,
        account_id: AccountId,
        amount: Money,
        result: LedgerResult<Receipt>,
    ) -> BankResult<Receipt> {
        match result {
            Ok(receipt) => {
                self.events.push(match (kind, receipt.destination) {
                    (OperationKind::Transfer, Some(to)) => BankEvent::Transferred {
                        from: receipt.source,
                        to,
                        amount,
                    },
                    (OperationKind::Withdrawal, _) => BankEvent::Withdrawn {
                        account_id,
                        amount,
                        balance: receipt.source_balance,
                    },
                    _ => BankEvent::Deposited {
                        account_id,
                        amount,
                        balance: receipt.source_balance,
                    },
                });
                if let Some(record_id) = receipt.flagged {
                    self.events.push(BankEvent::ComplianceFlagged {
                        record_id,
                        kind,
                        amount,
                        account_id,
                    });
                }
                Ok(receipt)
            }
            Err(e) => {
                self.events.push(BankEvent::OperationRejected {
                    kind,
                    account_id,
                    amount,
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}
