//! Branch, client and account registries.
//!
//! Arena storage: the directory owns every entity; children refer to
//! their parents by id. Construction is two-phase: build the value,
//! then hand it to `register_*`, which assigns its number.

use crate::{
    account::Account,
    error::{BankError, BankResult},
    types::{AccountId, BranchId, ClientId},
};

#[derive(Debug, Clone)]
pub struct Branch {
    name:     String,
    number:   BranchId,
    clients:  Vec<ClientId>,
    accounts: Vec<AccountId>,
}

impl Branch {
    /// Unregistered branch. Its number is assigned on registration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:     name.into(),
            number:   0,
            clients:  Vec::new(),
            accounts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> BranchId {
        self.number
    }

    /// e.g. "001 - Centro"
    pub fn display_name(&self) -> String {
        format!("{:03} - {}", self.number, self.name)
    }

    pub fn clients(&self) -> &[ClientId] {
        &self.clients
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    name:    String,
    cpf:     String,
    branch:  BranchId,
    account: Option<AccountId>,
}

impl Client {
    pub fn new(name: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            cpf:     cpf.into(),
            branch:  0,
            account: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }
}

#[derive(Debug, Default, Clone)]
pub struct Directory {
    branches: Vec<Branch>,
    clients:  Vec<Client>,
    /// Index = account id - 1.
    accounts: Vec<Account>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_branch(&mut self, mut branch: Branch) -> BranchId {
        let number = self.branches.len() as BranchId + 1;
        branch.number = number;
        self.branches.push(branch);
        number
    }

    pub fn register_client(&mut self, branch_id: BranchId, mut client: Client) -> BankResult<ClientId> {
        let client_id = self.clients.len();
        let branch = self.branch_mut(branch_id)?;
        branch.clients.push(client_id);
        client.branch = branch_id;
        self.clients.push(client);
        Ok(client_id)
    }

    /// Open the client's account at the client's branch.
    /// Account numbers come from a single bank-wide sequence.
    pub fn open_account(&mut self, client_id: ClientId) -> BankResult<AccountId> {
        let account_id = self.accounts.len() as AccountId + 1;
        let client = self
            .clients
            .get_mut(client_id)
            .ok_or(BankError::ClientNotFound { client_id })?;
        if client.account.is_some() {
            return Err(BankError::ClientAlreadyHasAccount { client_id });
        }
        client.account = Some(account_id);
        let branch_id = client.branch;

        self.branch_mut(branch_id)?.accounts.push(account_id);
        self.accounts.push(Account::new(account_id, client_id, branch_id));
        Ok(account_id)
    }

    pub fn branch(&self, branch_id: BranchId) -> BankResult<&Branch> {
        branch_index(branch_id)
            .and_then(|i| self.branches.get(i))
            .ok_or(BankError::BranchNotFound { branch_id })
    }

    pub fn client(&self, client_id: ClientId) -> BankResult<&Client> {
        self.clients
            .get(client_id)
            .ok_or(BankError::ClientNotFound { client_id })
    }

    pub fn find_account(&self, account_id: AccountId) -> BankResult<&Account> {
        account_index(account_id)
            .and_then(|i| self.accounts.get(i))
            .ok_or(BankError::AccountNotFound { account_id })
    }

    pub fn find_account_mut(&mut self, account_id: AccountId) -> BankResult<&mut Account> {
        account_index(account_id)
            .and_then(|i| self.accounts.get_mut(i))
            .ok_or(BankError::AccountNotFound { account_id })
    }

    /// Two distinct accounts, mutably. Callers handle `a == b` themselves.
    pub fn find_pair_mut(
        &mut self,
        a: AccountId,
        b: AccountId,
    ) -> BankResult<(&mut Account, &mut Account)> {
        assert_ne!(a, b, "find_pair_mut needs two distinct accounts");
        let ia = account_index(a)
            .filter(|i| *i < self.accounts.len())
            .ok_or(BankError::AccountNotFound { account_id: a })?;
        let ib = account_index(b)
            .filter(|i| *i < self.accounts.len())
            .ok_or(BankError::AccountNotFound { account_id: b })?;

        if ia < ib {
            let (lo, hi) = self.accounts.split_at_mut(ib);
            Ok((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.accounts.split_at_mut(ia);
            Ok((&mut hi[0], &mut lo[ib]))
        }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Holder of an account, for statement headers.
    pub fn holder_of(&self, account_id: AccountId) -> BankResult<&Client> {
        let owner = self.find_account(account_id)?.owner();
        self.client(owner)
    }

    fn branch_mut(&mut self, branch_id: BranchId) -> BankResult<&mut Branch> {
        branch_index(branch_id)
            .and_then(|i| self.branches.get_mut(i))
            .ok_or(BankError::BranchNotFound { branch_id })
    }
}

fn account_index(account_id: AccountId) -> Option<usize> {
    (account_id as usize).checked_sub(1)
}

fn branch_index(branch_id: BranchId) -> Option<usize> {
    (branch_id as usize).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_assigned_on_registration() {
        let mut dir = Directory::new();
        let centro = dir.register_branch(Branch::new("Centro"));
        let bairro = dir.register_branch(Branch::new("Bairro"));
        assert_eq!((centro, bairro), (1, 2));
        assert_eq!(dir.branch(bairro).unwrap().display_name(), "002 - Bairro");

        let alice = dir.register_client(centro, Client::new("Alice Silva", "111")).unwrap();
        let beto = dir.register_client(bairro, Client::new("Beto Souza", "222")).unwrap();
        assert_eq!(dir.open_account(beto).unwrap(), 1);
        assert_eq!(dir.open_account(alice).unwrap(), 2);

        assert_eq!(dir.branch(bairro).unwrap().accounts(), &[1]);
        assert_eq!(dir.find_account(2).unwrap().branch(), centro);
        assert_eq!(dir.holder_of(1).unwrap().name(), "Beto Souza");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut dir = Directory::new();
        assert!(matches!(dir.find_account(0), Err(BankError::AccountNotFound { account_id: 0 })));
        assert!(matches!(dir.find_account(1), Err(BankError::AccountNotFound { .. })));
        assert!(matches!(
            dir.register_client(3, Client::new("X", "0")),
            Err(BankError::BranchNotFound { branch_id: 3 })
        ));
        assert!(dir.clients().is_empty());
    }

    #[test]
    fn one_account_per_client() {
        let mut dir = Directory::new();
        let b = dir.register_branch(Branch::new("Centro"));
        let c = dir.register_client(b, Client::new("Alice", "1")).unwrap();
        dir.open_account(c).unwrap();
        assert!(matches!(
            dir.open_account(c),
            Err(BankError::ClientAlreadyHasAccount { client_id }) if client_id == c
        ));
        assert_eq!(dir.accounts().len(), 1);
    }

    #[test]
    fn pair_lookup_preserves_argument_order() {
        let mut dir = Directory::new();
        let b = dir.register_branch(Branch::new("Centro"));
        for name in ["a", "b", "c"] {
            let c = dir.register_client(b, Client::new(name, "0")).unwrap();
            dir.open_account(c).unwrap();
        }
        let (x, y) = dir.find_pair_mut(3, 1).unwrap();
        assert_eq!((x.id(), y.id()), (3, 1));
        assert!(dir.find_pair_mut(1, 4).is_err());
    }
}
