//! Shared primitive types used across the entire bank.

/// Monetary amount. Decimal so that threshold comparisons are exact.
pub type Money = rust_decimal::Decimal;

/// Account number. Assigned monotonically by the bank, starting at 1.
pub type AccountId = u64;

/// Branch number. Assigned monotonically by the bank, starting at 1.
pub type BranchId = u64;

/// Index of a client in the bank's client arena.
pub type ClientId = usize;
