//! Economy and Power Oracles
//!
//! The wall tools only ask yes/no questions of the economy and report load
//! changes to the power grid. Hosts inject their own implementations;
//! `Wallet` and `PowerGrid` are the in-crate ones.
//!
//! Shared handles (`Rc<RefCell<T>>`) implement both traits, so several
//! tools can talk to the same wallet or grid within one frame.

use std::cell::RefCell;
use std::rc::Rc;

/// Money checks and spending.
pub trait EconomyOracle {
    fn can_afford(&self, amount: i64) -> bool;

    /// Deduct `amount`; returns false (and spends nothing) if unaffordable.
    fn spend(&mut self, amount: i64) -> bool;
}

/// Power consumption bookkeeping.
pub trait PowerOracle {
    fn register_consumer(&mut self, amount: i64);
    fn unregister_consumer(&mut self, amount: i64);
}

impl<T: EconomyOracle + ?Sized> EconomyOracle for Rc<RefCell<T>> {
    fn can_afford(&self, amount: i64) -> bool {
        self.borrow().can_afford(amount)
    }

    fn spend(&mut self, amount: i64) -> bool {
        self.borrow_mut().spend(amount)
    }
}

impl<T: PowerOracle + ?Sized> PowerOracle for Rc<RefCell<T>> {
    fn register_consumer(&mut self, amount: i64) {
        self.borrow_mut().register_consumer(amount);
    }

    fn unregister_consumer(&mut self, amount: i64) {
        self.borrow_mut().unregister_consumer(amount);
    }
}

/// Power oracle that ignores all load changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPower;

impl PowerOracle for NoPower {
    fn register_consumer(&mut self, _amount: i64) {}
    fn unregister_consumer(&mut self, _amount: i64) {}
}
