//! Authorization allow-list.
//!
//! A process-wide set of account ids permitted to use the bot, owned by a
//! single administrator. Mutations go through explicit, authority-checked
//! operations and are persisted via the same atomic JSON writer the account
//! store uses; there is no bare mutable global.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::store::{read_json, write_json_atomic, StoreError};
use crate::types::AccountId;

/// Errors from allow-list mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    /// Only the administrator may change the list.
    #[error("account {actor} is not the administrator")]
    NotAdmin { actor: AccountId },

    /// The administrator cannot lock themselves out.
    #[error("the administrator account cannot be revoked")]
    CannotRevokeAdmin,
}

/// The allow-list: one admin plus the accounts they have granted access.
///
/// The admin is always authorized and always present in the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessList {
    admin: AccountId,
    allowed: BTreeSet<AccountId>,
}

impl AccessList {
    /// Creates a list containing just the administrator.
    pub fn new(admin: AccountId) -> Self {
        let mut allowed = BTreeSet::new();
        allowed.insert(admin);
        AccessList { admin, allowed }
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }

    /// Whether an account may use the bot.
    pub fn is_authorized(&self, account: AccountId) -> bool {
        self.allowed.contains(&account)
    }

    /// Grants access. Admin-only; returns whether the account was newly
    /// added.
    pub fn grant(&mut self, actor: AccountId, account: AccountId) -> Result<bool, AccessError> {
        self.require_admin(actor)?;
        Ok(self.allowed.insert(account))
    }

    /// Revokes access. Admin-only; the admin entry itself cannot be revoked.
    /// Revoking an account that was never granted is a no-op.
    pub fn revoke(&mut self, actor: AccountId, account: AccountId) -> Result<(), AccessError> {
        self.require_admin(actor)?;
        if account == self.admin {
            return Err(AccessError::CannotRevokeAdmin);
        }
        self.allowed.remove(&account);
        Ok(())
    }

    /// All authorized accounts, in id order.
    pub fn accounts(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.allowed.iter().copied()
    }

    fn require_admin(&self, actor: AccountId) -> Result<(), AccessError> {
        if actor != self.admin {
            return Err(AccessError::NotAdmin { actor });
        }
        Ok(())
    }

    /// Loads the list from disk, or creates a fresh one for the configured
    /// admin if none is stored yet.
    ///
    /// A stored list whose admin differs from the configured one is
    /// replaced; the configuration is the authority on who administers the
    /// bot.
    pub fn load_or_create(path: &Path, admin: AccountId) -> Result<Self, StoreError> {
        match read_json::<AccessList>(path)? {
            Some(list) if list.admin == admin => Ok(list),
            Some(_) | None => {
                let list = AccessList::new(admin);
                list.save(path)?;
                Ok(list)
            }
        }
    }

    /// Persists the list atomically.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ADMIN: AccountId = AccountId(100);
    const USER: AccountId = AccountId(200);

    #[test]
    fn admin_is_authorized_from_the_start() {
        let list = AccessList::new(ADMIN);
        assert!(list.is_authorized(ADMIN));
        assert!(!list.is_authorized(USER));
    }

    #[test]
    fn admin_can_grant_and_revoke() {
        let mut list = AccessList::new(ADMIN);

        assert!(list.grant(ADMIN, USER).unwrap());
        assert!(list.is_authorized(USER));
        // Granting again reports nothing new.
        assert!(!list.grant(ADMIN, USER).unwrap());

        list.revoke(ADMIN, USER).unwrap();
        assert!(!list.is_authorized(USER));
    }

    #[test]
    fn non_admin_mutations_are_rejected() {
        let mut list = AccessList::new(ADMIN);
        list.grant(ADMIN, USER).unwrap();

        assert_eq!(
            list.grant(USER, AccountId(300)),
            Err(AccessError::NotAdmin { actor: USER })
        );
        assert_eq!(
            list.revoke(USER, ADMIN),
            Err(AccessError::NotAdmin { actor: USER })
        );
        assert!(!list.is_authorized(AccountId(300)));
    }

    #[test]
    fn admin_cannot_be_revoked() {
        let mut list = AccessList::new(ADMIN);
        assert_eq!(
            list.revoke(ADMIN, ADMIN),
            Err(AccessError::CannotRevokeAdmin)
        );
        assert!(list.is_authorized(ADMIN));
    }

    #[test]
    fn revoking_an_unknown_account_is_a_noop() {
        let mut list = AccessList::new(ADMIN);
        assert!(list.revoke(ADMIN, USER).is_ok());
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("access.json");

        let mut list = AccessList::load_or_create(&path, ADMIN).unwrap();
        list.grant(ADMIN, USER).unwrap();
        list.save(&path).unwrap();

        let reloaded = AccessList::load_or_create(&path, ADMIN).unwrap();
        assert_eq!(reloaded, list);
        assert!(reloaded.is_authorized(USER));
    }

    #[test]
    fn changed_admin_resets_the_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("access.json");

        let mut list = AccessList::load_or_create(&path, ADMIN).unwrap();
        list.grant(ADMIN, USER).unwrap();
        list.save(&path).unwrap();

        let new_admin = AccountId(999);
        let reloaded = AccessList::load_or_create(&path, new_admin).unwrap();
        assert_eq!(reloaded.admin(), new_admin);
        assert!(!reloaded.is_authorized(USER));
    }
}
