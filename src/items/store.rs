//! File-backed inventory persistence, one JSON document per player.

use super::{InventoryItem, ItemId, ItemSpec};
use crate::session::file_slug;
use crate::AriseResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-player inventory store backed by JSON files under a data
/// directory. Every mutation returns the new full list, which is the
/// authoritative view for the caller.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    root: PathBuf,
}

impl InventoryStore {
    /// Opens (and creates, if needed) the store's data directory.
    pub fn new(root: impl AsRef<Path>) -> AriseResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    fn path_for(&self, email: &str) -> PathBuf {
        self.root.join(format!("inventory-{}.json", file_slug(email)))
    }

    /// Loads a player's inventory; an absent file is an empty inventory.
    pub fn load(&self, email: &str) -> AriseResult<Vec<InventoryItem>> {
        let path = self.path_for(email);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Mints an item from the spec and appends it, returning the new
    /// full list.
    pub fn add(&self, email: &str, spec: ItemSpec) -> AriseResult<Vec<InventoryItem>> {
        let mut items = self.load(email)?;
        items.push(spec.mint());
        self.persist(email, &items)?;
        Ok(items)
    }

    /// Removes the item with the given id, returning the new full list.
    /// No-op when the id is absent. "Use" and "Discard" share this
    /// contract.
    pub fn remove(&self, email: &str, id: ItemId) -> AriseResult<Vec<InventoryItem>> {
        let mut items = self.load(email)?;
        items.retain(|item| item.id != id);
        self.persist(email, &items)?;
        Ok(items)
    }

    fn persist(&self, email: &str, items: &[InventoryItem]) -> AriseResult<()> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(self.path_for(email), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemKind, Rarity, StatBonuses};

    fn spec(name: &str) -> ItemSpec {
        ItemSpec {
            name: name.to_string(),
            kind: ItemKind::Potion,
            desc: "Recovers fatigue.".to_string(),
            rarity: Rarity::Common,
            slot: None,
            bonuses: StatBonuses::default(),
        }
    }

    #[test]
    fn test_add_and_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::new(dir.path()).unwrap();

        assert!(store.load("a@b.c").unwrap().is_empty());

        let items = store.add("a@b.c", spec("Fatigue Potion")).unwrap();
        assert_eq!(items.len(), 1);

        let items = store.add("a@b.c", spec("Dungeon Key")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(store.load("a@b.c").unwrap(), items);

        let remaining = store.remove("a@b.c", items[0].id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Dungeon Key");
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::new(dir.path()).unwrap();
        store.add("a@b.c", spec("Fatigue Potion")).unwrap();

        let items = store.remove("a@b.c", crate::items::new_item_id()).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_inventories_are_keyed_per_player() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::new(dir.path()).unwrap();

        store.add("a@b.c", spec("Fatigue Potion")).unwrap();
        assert!(store.load("other@b.c").unwrap().is_empty());
    }
}
