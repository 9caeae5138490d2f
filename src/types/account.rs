//! Account record: the banks an account owns and which one is active.

use serde::{Deserialize, Serialize};

use super::bank::BankState;
use super::ids::{AccountId, BankId};

/// Maximum number of banks a single account may own.
pub const MAX_BANKS: usize = 4;

/// Maximum length of a bank name, in characters.
pub const MAX_BANK_NAME_LEN: usize = 30;

/// Everything stored for one account: its banks (at most [`MAX_BANKS`]) and
/// a pointer to the currently active one.
///
/// The record is the unit of persistence and of serialization; all
/// transitions for one account read-modify-write it as a whole, serialized
/// by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// The owning account.
    pub account_id: AccountId,

    /// The bank actions without an explicit bank id apply to.
    pub active_bank: Option<BankId>,

    /// Next bank id to allocate. Monotonic, never reused, so a deleted
    /// bank's id cannot be confused with a later one.
    pub next_bank_id: u64,

    /// The account's banks, in creation order.
    pub banks: Vec<BankState>,
}

impl AccountRecord {
    /// Creates an empty record for an account with no banks yet.
    pub fn new(account_id: AccountId) -> Self {
        AccountRecord {
            account_id,
            active_bank: None,
            next_bank_id: 1,
            banks: Vec::new(),
        }
    }

    /// Allocates the next bank id.
    pub fn allocate_bank_id(&mut self) -> BankId {
        let id = BankId(self.next_bank_id);
        self.next_bank_id += 1;
        id
    }

    pub fn bank(&self, id: BankId) -> Option<&BankState> {
        self.banks.iter().find(|b| b.id == id)
    }

    pub fn bank_mut(&mut self, id: BankId) -> Option<&mut BankState> {
        self.banks.iter_mut().find(|b| b.id == id)
    }

    /// The active bank, if one is set and still exists.
    pub fn active(&self) -> Option<&BankState> {
        self.active_bank.and_then(|id| self.bank(id))
    }

    /// Mutable access to the active bank, if one is set and still exists.
    pub fn active_mut(&mut self) -> Option<&mut BankState> {
        let id = self.active_bank?;
        self.bank_mut(id)
    }

    /// Removes a bank by id, clearing the active pointer if it pointed at
    /// the removed bank. Returns the removed state, or None if no such bank.
    pub fn remove_bank(&mut self, id: BankId) -> Option<BankState> {
        let index = self.banks.iter().position(|b| b.id == id)?;
        let removed = self.banks.remove(index);
        if self.active_bank == Some(id) {
            self.active_bank = None;
        }
        Some(removed)
    }
}
