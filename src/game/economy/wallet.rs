//! Wallet
//!
//! Player money: the reference economy oracle.

use super::oracles::EconomyOracle;

/// Starting money for a new game
pub const STARTING_MONEY: i64 = 1000;

#[derive(Debug, Clone)]
pub struct Wallet {
    balance: i64,
    /// Lifetime spending, for stats
    total_spent: i64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(STARTING_MONEY)
    }
}

impl Wallet {
    pub fn new(balance: i64) -> Self {
        Self {
            balance: balance.max(0),
            total_spent: 0,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn total_spent(&self) -> i64 {
        self.total_spent
    }

    /// Add income (negative amounts are ignored)
    pub fn earn(&mut self, amount: i64) {
        self.balance += amount.max(0);
    }
}

impl EconomyOracle for Wallet {
    fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    fn spend(&mut self, amount: i64) -> bool {
        if amount < 0 || !self.can_afford(amount) {
            return false;
        }
        self.balance -= amount;
        self.total_spent += amount;
        true
    }
}
