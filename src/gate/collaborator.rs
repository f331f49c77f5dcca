//! Read/write contract with the surrounding application.
//!
//! The engine reads equipment at session start and writes durability and
//! reward grants at the end. Both are short request/response calls.

use crate::core::constants::MAX_DURABILITY;
use crate::core::error::CollaboratorError;
use crate::core::ids::{EntrantId, ItemId};
use crate::items::types::{EquippedItem, ItemDrop};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait GateCollaborator: Send + Sync {
    fn get_equipped_items(&self, entrant: EntrantId) -> Result<Vec<EquippedItem>, CollaboratorError>;

    fn persist_durability_update(
        &self,
        entrant: EntrantId,
        item: ItemId,
        new_durability: f64,
    ) -> Result<(), CollaboratorError>;

    fn persist_reward_grant(
        &self,
        entrant: EntrantId,
        currency: u64,
        experience: u64,
        items: &[ItemDrop],
    ) -> Result<(), CollaboratorError>;
}

/// Balances credited to one entrant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerAccount {
    pub currency: u64,
    pub experience: u64,
    pub items: Vec<ItemDrop>,
}

#[derive(Debug, Default)]
struct LedgerState {
    equipment: HashMap<EntrantId, Vec<EquippedItem>>,
    accounts: HashMap<EntrantId, LedgerAccount>,
}

/// In-process collaborator used by the simulator and tests.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn equip(&self, entrant: EntrantId, item: EquippedItem) {
        self.lock().equipment.entry(entrant).or_default().push(item);
    }

    pub fn equipment(&self, entrant: EntrantId) -> Vec<EquippedItem> {
        self.lock()
            .equipment
            .get(&entrant)
            .cloned()
            .unwrap_or_default()
    }

    pub fn account(&self, entrant: EntrantId) -> LedgerAccount {
        self.lock()
            .accounts
            .get(&entrant)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every subsequent read fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn writes_failing(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }
}

impl GateCollaborator for InMemoryLedger {
    fn get_equipped_items(&self, entrant: EntrantId) -> Result<Vec<EquippedItem>, CollaboratorError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CollaboratorError::ReadFailed {
                entrant,
                reason: "ledger unavailable".to_string(),
            });
        }
        Ok(self.equipment(entrant))
    }

    fn persist_durability_update(
        &self,
        entrant: EntrantId,
        item: ItemId,
        new_durability: f64,
    ) -> Result<(), CollaboratorError> {
        let failure = |reason: &str| CollaboratorError::DurabilityWriteFailed {
            entrant,
            item,
            reason: reason.to_string(),
        };
        if self.writes_failing() {
            return Err(failure("ledger unavailable"));
        }

        let mut state = self.lock();
        let stored = state
            .equipment
            .get_mut(&entrant)
            .and_then(|items| items.iter_mut().find(|i| i.id == item))
            .ok_or_else(|| failure("unknown item"))?;
        stored.durability = new_durability.clamp(0.0, MAX_DURABILITY);
        if stored.durability <= 0.0 {
            stored.broken = true;
        } else if stored.durability >= MAX_DURABILITY {
            stored.broken = false;
        }
        Ok(())
    }

    fn persist_reward_grant(
        &self,
        entrant: EntrantId,
        currency: u64,
        experience: u64,
        items: &[ItemDrop],
    ) -> Result<(), CollaboratorError> {
        if self.writes_failing() {
            return Err(CollaboratorError::RewardWriteFailed {
                entrant,
                reason: "ledger unavailable".to_string(),
            });
        }

        let mut state = self.lock();
        let account = state.accounts.entry(entrant).or_default();
        account.currency += currency;
        account.experience += experience;
        account.items.extend_from_slice(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::MonsterType;
    use crate::items::types::{EquipmentSlot, ItemGrade};

    #[test]
    fn test_durability_write_updates_stored_item() {
        let ledger = InMemoryLedger::new();
        let entrant = EntrantId::new();
        let item = EquippedItem::new(EquipmentSlot::Armor, 10.0);
        let item_id = item.id;
        ledger.equip(entrant, item);

        ledger.persist_durability_update(entrant, item_id, 0.0).unwrap();

        let stored = &ledger.equipment(entrant)[0];
        assert_eq!(stored.durability, 0.0);
        assert!(stored.broken);
    }

    #[test]
    fn test_unknown_item_write_fails() {
        let ledger = InMemoryLedger::new();
        let result = ledger.persist_durability_update(EntrantId::new(), ItemId::new(), 50.0);
        assert!(matches!(
            result,
            Err(CollaboratorError::DurabilityWriteFailed { .. })
        ));
    }

    #[test]
    fn test_reward_grants_accumulate() {
        let ledger = InMemoryLedger::new();
        let entrant = EntrantId::new();
        let drop = ItemDrop {
            grade: ItemGrade::Epic,
            source: MonsterType::Boss,
        };

        ledger.persist_reward_grant(entrant, 100, 50, &[drop]).unwrap();
        ledger.persist_reward_grant(entrant, 20, 5, &[]).unwrap();

        let account = ledger.account(entrant);
        assert_eq!(account.currency, 120);
        assert_eq!(account.experience, 55);
        assert_eq!(account.items, vec![drop]);
    }

    #[test]
    fn test_failure_toggles() {
        let ledger = InMemoryLedger::new();
        let entrant = EntrantId::new();

        ledger.set_fail_writes(true);
        assert!(ledger.persist_reward_grant(entrant, 1, 1, &[]).is_err());
        assert_eq!(ledger.account(entrant), LedgerAccount::default());

        ledger.set_fail_reads(true);
        assert!(matches!(
            ledger.get_equipped_items(entrant),
            Err(CollaboratorError::ReadFailed { .. })
        ));
    }
}
