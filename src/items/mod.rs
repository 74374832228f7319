//! # Items Module
//!
//! Inventory items, rarity, equipment-bonus aggregation, and the shop
//! economy. Items are immutable once minted: equipping only references an
//! item's id from the player's equipment, and "use" and "discard" share
//! the same removal contract.

pub mod store;

pub use store::InventoryStore;

use crate::player::{EquipSlot, Player, StatKey};
use crate::{AriseError, AriseResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for inventory items.
pub type ItemId = Uuid;

/// Creates a new unique item ID.
pub fn new_item_id() -> ItemId {
    Uuid::new_v4()
}

/// Item categories carried in the item box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Potion,
    Box,
    Key,
    Gear,
    Material,
    Rune,
}

/// Item rarity tiers, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Per-stat bonus deltas granted by an item, or aggregated across a
/// loadout. Every field defaults to zero so items may specify any subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonuses {
    #[serde(default)]
    pub strength: i64,
    #[serde(default)]
    pub agility: i64,
    #[serde(default)]
    pub sense: i64,
    #[serde(default)]
    pub vitality: i64,
    #[serde(default)]
    pub intelligence: i64,
}

impl StatBonuses {
    /// Reads the bonus for one stat.
    pub fn get(&self, key: StatKey) -> i64 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Agility => self.agility,
            StatKey::Sense => self.sense,
            StatKey::Vitality => self.vitality,
            StatKey::Intelligence => self.intelligence,
        }
    }

    /// Accumulates another set of bonuses into this one.
    pub fn add(&mut self, other: &StatBonuses) {
        self.strength += other.strength;
        self.agility += other.agility;
        self.sense += other.sense;
        self.vitality += other.vitality;
        self.intelligence += other.intelligence;
    }
}

/// An item held in a player's item box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub desc: String,
    pub rarity: Rarity,
    /// Only meaningful for gear and rune items
    #[serde(default)]
    pub slot: Option<EquipSlot>,
    #[serde(default)]
    pub bonuses: StatBonuses,
}

/// Blueprint for minting a new inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub kind: ItemKind,
    pub desc: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub slot: Option<EquipSlot>,
    #[serde(default)]
    pub bonuses: StatBonuses,
}

impl ItemSpec {
    /// Mints an inventory item with a freshly generated unique id.
    pub fn mint(self) -> InventoryItem {
        InventoryItem {
            id: new_item_id(),
            name: self.name,
            kind: self.kind,
            desc: self.desc,
            rarity: self.rarity,
            slot: self.slot,
            bonuses: self.bonuses,
        }
    }
}

/// Aggregates the stat bonuses of everything currently equipped.
///
/// A pure, read-only projection over the player's equipment and the
/// current inventory: recomputed on every render, never persisted. An
/// empty slot, a stale id no longer present in the inventory, or an item
/// without bonuses contributes zero.
pub fn equipped_bonuses(player: &Player, inventory: &[InventoryItem]) -> StatBonuses {
    let mut totals = StatBonuses::default();
    for slot in EquipSlot::ALL {
        let Some(id) = player.equipment.get(slot) else {
            continue;
        };
        if let Some(item) = inventory.iter().find(|item| item.id == id) {
            totals.add(&item.bonuses);
        }
    }
    totals
}

/// Buys an item: debits gold and appends a freshly minted item to the
/// player's inventory, returning the new full list.
///
/// Fails with "Insufficient Funds." when the player cannot cover the
/// cost, leaving gold and inventory untouched. Purely additive; identical
/// items never stack.
pub fn purchase(
    player: &mut Player,
    store: &InventoryStore,
    cost: u64,
    spec: ItemSpec,
) -> AriseResult<Vec<InventoryItem>> {
    if player.gold < cost {
        return Err(AriseError::InvalidAction("Insufficient Funds.".to_string()));
    }
    let inventory = store.add(&player.email, spec)?;
    player.gold -= cost;
    Ok(inventory)
}
