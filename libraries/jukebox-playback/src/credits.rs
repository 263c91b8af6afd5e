//! Credit ledger
//!
//! One credit authorizes one idle → playing transition.

/// Non-negative credit counter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditLedger {
    balance: u32,
}

impl CreditLedger {
    /// Create ledger with an opening balance
    pub fn new(balance: u32) -> Self {
        Self { balance }
    }

    /// Add credits, returning the new balance
    ///
    /// Adding zero is a no-op. The balance saturates instead of wrapping.
    pub fn add_credit(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    /// Consume one credit
    ///
    /// Returns false without touching the balance when it is already zero.
    pub fn use_credit(&mut self) -> bool {
        if self.balance == 0 {
            return false;
        }
        self.balance -= 1;
        true
    }

    /// Current balance
    pub fn balance(&self) -> u32 {
        self.balance
    }
}
