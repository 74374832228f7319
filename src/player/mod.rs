//! # Player Module
//!
//! The persistent character model: identity, advancement counters, stats,
//! equipment, and the per-date quest history.
//!
//! A `Player` is loaded at session resume or created at first login, and
//! every progression, equip, or purchase operation mutates it before it is
//! handed back to the session store. Equipment is always present with all
//! slots empty by construction, so consumers never have to probe for a
//! missing map.

use crate::daily::DailyProgress;
use crate::items::{InventoryItem, ItemId};
use crate::progression::{self, Rank};
use crate::{AriseError, AriseResult};
use serde::{Deserialize, Serialize};

/// A tracked player and everything the System knows about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identity (email address)
    pub email: String,
    /// Display name
    pub username: String,
    /// Current level, starting at 1
    pub level: u32,
    /// Experience accumulated toward the next level
    pub current_xp: f64,
    /// Experience required to clear the current level
    pub required_xp: u64,
    /// Gold balance
    pub gold: u64,
    /// Consecutive completed days
    pub streak: u32,
    /// Hunter rank, derived from level
    pub rank: Rank,
    /// Allocatable stats plus unallocated points
    pub stats: Stats,
    /// Equipped item ids per slot
    pub equipment: Equipment,
    /// One quest record per calendar date, ordered by date
    pub history: Vec<DailyProgress>,
}

impl Player {
    /// Creates a fresh level-1 player.
    ///
    /// # Examples
    ///
    /// ```
    /// use arise::Player;
    ///
    /// let player = Player::new("jin@example.com".to_string(), "Jinwoo".to_string());
    /// assert_eq!(player.level, 1);
    /// assert_eq!(player.required_xp, 100);
    /// assert!(player.history.is_empty());
    /// ```
    pub fn new(email: String, username: String) -> Self {
        Self {
            email,
            username,
            level: 1,
            current_xp: 0.0,
            required_xp: progression::required_xp(1),
            gold: 0,
            streak: 0,
            rank: Rank::E,
            stats: Stats::new(),
            equipment: Equipment::default(),
            history: Vec::new(),
        }
    }

    /// Equips an item, overwriting whatever previously occupied its slot.
    ///
    /// The displaced item id simply becomes unreferenced; the item itself
    /// stays in the inventory and can be re-equipped or discarded.
    ///
    /// Fails with a user-facing message when the item carries no slot.
    pub fn equip(&mut self, item: &InventoryItem) -> AriseResult<()> {
        let slot = item.slot.ok_or_else(|| {
            AriseError::InvalidAction("This item cannot be equipped.".to_string())
        })?;
        self.equipment.set(slot, Some(item.id));
        Ok(())
    }

    /// Clears an equipment slot. No-op when the slot is already empty.
    pub fn unequip(&mut self, slot: EquipSlot) {
        self.equipment.set(slot, None);
    }

    /// Spends one unallocated point on the chosen stat.
    ///
    /// Atomic: either the stat gains one and a point is consumed, or
    /// nothing changes.
    pub fn upgrade_stat(&mut self, key: StatKey) -> AriseResult<()> {
        if self.stats.available_points == 0 {
            return Err(AriseError::InvalidAction(
                "No stat points available.".to_string(),
            ));
        }
        self.stats.available_points -= 1;
        *self.stats.get_mut(key) += 1;
        Ok(())
    }
}

/// The five allocatable stats plus unallocated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub agility: u32,
    pub sense: u32,
    pub vitality: u32,
    pub intelligence: u32,
    /// Points earned on level-up, not yet allocated
    pub available_points: u32,
}

impl Stats {
    /// Baseline stats for a fresh player.
    pub fn new() -> Self {
        Self {
            strength: 10,
            agility: 10,
            sense: 10,
            vitality: 10,
            intelligence: 10,
            available_points: 0,
        }
    }

    /// Reads one allocatable stat.
    pub fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Agility => self.agility,
            StatKey::Sense => self.sense,
            StatKey::Vitality => self.vitality,
            StatKey::Intelligence => self.intelligence,
        }
    }

    fn get_mut(&mut self, key: StatKey) -> &mut u32 {
        match key {
            StatKey::Strength => &mut self.strength,
            StatKey::Agility => &mut self.agility,
            StatKey::Sense => &mut self.sense,
            StatKey::Vitality => &mut self.vitality,
            StatKey::Intelligence => &mut self.intelligence,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys naming the five allocatable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Strength,
    Agility,
    Sense,
    Vitality,
    Intelligence,
}

impl StatKey {
    /// All stat keys, in display order.
    pub const ALL: [StatKey; 5] = [
        StatKey::Strength,
        StatKey::Agility,
        StatKey::Sense,
        StatKey::Vitality,
        StatKey::Intelligence,
    ];

    /// Lowercase name of the stat.
    pub fn name(self) -> &'static str {
        match self {
            StatKey::Strength => "strength",
            StatKey::Agility => "agility",
            StatKey::Sense => "sense",
            StatKey::Vitality => "vitality",
            StatKey::Intelligence => "intelligence",
        }
    }

    /// Parses a stat name as typed by the player.
    pub fn from_name(name: &str) -> Option<StatKey> {
        StatKey::ALL
            .into_iter()
            .find(|key| key.name() == name.to_lowercase())
    }
}

/// The nine equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Cloak,
    Gloves,
    Boots,
    Necklace,
    Ring1,
    Ring2,
    Rune,
}

impl EquipSlot {
    /// All slots, in display order.
    pub const ALL: [EquipSlot; 9] = [
        EquipSlot::Weapon,
        EquipSlot::Armor,
        EquipSlot::Cloak,
        EquipSlot::Gloves,
        EquipSlot::Boots,
        EquipSlot::Necklace,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
        EquipSlot::Rune,
    ];

    /// Lowercase name of the slot.
    pub fn name(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Cloak => "cloak",
            EquipSlot::Gloves => "gloves",
            EquipSlot::Boots => "boots",
            EquipSlot::Necklace => "necklace",
            EquipSlot::Ring1 => "ring1",
            EquipSlot::Ring2 => "ring2",
            EquipSlot::Rune => "rune",
        }
    }

    /// Parses a slot name as typed by the player.
    pub fn from_name(name: &str) -> Option<EquipSlot> {
        EquipSlot::ALL
            .into_iter()
            .find(|slot| slot.name() == name.to_lowercase())
    }
}

/// Equipped item ids, one optional id per slot.
///
/// Always present on a player; a fresh loadout has every slot empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<ItemId>,
    pub armor: Option<ItemId>,
    pub cloak: Option<ItemId>,
    pub gloves: Option<ItemId>,
    pub boots: Option<ItemId>,
    pub necklace: Option<ItemId>,
    pub ring1: Option<ItemId>,
    pub ring2: Option<ItemId>,
    pub rune: Option<ItemId>,
}

impl Equipment {
    /// Returns the item id equipped in a slot, if any.
    pub fn get(&self, slot: EquipSlot) -> Option<ItemId> {
        match slot {
            EquipSlot::Weapon => self.weapon,
            EquipSlot::Armor => self.armor,
            EquipSlot::Cloak => self.cloak,
            EquipSlot::Gloves => self.gloves,
            EquipSlot::Boots => self.boots,
            EquipSlot::Necklace => self.necklace,
            EquipSlot::Ring1 => self.ring1,
            EquipSlot::Ring2 => self.ring2,
            EquipSlot::Rune => self.rune,
        }
    }

    /// Sets or clears a slot.
    pub fn set(&mut self, slot: EquipSlot, id: Option<ItemId>) {
        let target = match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Cloak => &mut self.cloak,
            EquipSlot::Gloves => &mut self.gloves,
            EquipSlot::Boots => &mut self.boots,
            EquipSlot::Necklace => &mut self.necklace,
            EquipSlot::Ring1 => &mut self.ring1,
            EquipSlot::Ring2 => &mut self.ring2,
            EquipSlot::Rune => &mut self.rune,
        };
        *target = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{new_item_id, ItemKind, Rarity, StatBonuses};

    fn gear(slot: Option<EquipSlot>) -> InventoryItem {
        InventoryItem {
            id: new_item_id(),
            name: "Hunter's Blade".to_string(),
            kind: ItemKind::Gear,
            desc: "A sharpened standard-issue blade.".to_string(),
            rarity: Rarity::Rare,
            slot,
            bonuses: StatBonuses::default(),
        }
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        assert_eq!(player.level, 1);
        assert_eq!(player.current_xp, 0.0);
        assert_eq!(player.required_xp, 100);
        assert_eq!(player.gold, 0);
        assert_eq!(player.rank, Rank::E);
        assert_eq!(player.equipment, Equipment::default());
    }

    #[test]
    fn test_equip_sets_slot_and_overwrites() {
        let mut player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        let first = gear(Some(EquipSlot::Weapon));
        let second = gear(Some(EquipSlot::Weapon));

        player.equip(&first).unwrap();
        assert_eq!(player.equipment.weapon, Some(first.id));

        // A second weapon displaces the first without touching inventory.
        player.equip(&second).unwrap();
        assert_eq!(player.equipment.weapon, Some(second.id));
    }

    #[test]
    fn test_equip_rejects_slotless_item() {
        let mut player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        let potion = gear(None);

        let err = player.equip(&potion).unwrap_err();
        assert_eq!(err.to_string(), "This item cannot be equipped.");
        assert_eq!(player.equipment, Equipment::default());
    }

    #[test]
    fn test_unequip_clears_and_is_idempotent() {
        let mut player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        let blade = gear(Some(EquipSlot::Weapon));
        player.equip(&blade).unwrap();

        player.unequip(EquipSlot::Weapon);
        assert_eq!(player.equipment.weapon, None);

        // Already empty: still a no-op.
        player.unequip(EquipSlot::Weapon);
        assert_eq!(player.equipment.weapon, None);
    }

    #[test]
    fn test_upgrade_stat_spends_a_point() {
        let mut player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        player.stats.available_points = 2;

        player.upgrade_stat(StatKey::Strength).unwrap();
        assert_eq!(player.stats.strength, 11);
        assert_eq!(player.stats.available_points, 1);
    }

    #[test]
    fn test_upgrade_stat_without_points_is_rejected() {
        let mut player = Player::new("a@b.c".to_string(), "Hunter".to_string());
        assert_eq!(player.stats.available_points, 0);

        let err = player.upgrade_stat(StatKey::Agility).unwrap_err();
        assert_eq!(err.to_string(), "No stat points available.");
        assert_eq!(player.stats.agility, 10);
    }

    #[test]
    fn test_slot_and_stat_name_round_trip() {
        for slot in EquipSlot::ALL {
            assert_eq!(EquipSlot::from_name(slot.name()), Some(slot));
        }
        for key in StatKey::ALL {
            assert_eq!(StatKey::from_name(key.name()), Some(key));
        }
        assert_eq!(EquipSlot::from_name("hat"), None);
    }
}
