//! File-backed storage for in-game state.
//!
//! One JSON record per hero identity in a flat directory. Records carry a
//! version so a client upgrade can walk away from stale files instead of
//! misreading them.

use crate::derived::DerivedAttributes;
use crate::hero::Hero;
use crate::ingame::InGameState;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Current version of the state record format.
const STATE_VERSION: u32 = 1;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Versioned envelope around a persisted state record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedState {
    version: u32,
    state: InGameState,
}

/// A directory of per-hero state records.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory records live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for a hero identity.
    pub fn state_path(&self, id: &str) -> PathBuf {
        let sanitized: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", sanitized))
    }

    /// Write the record for a state, creating the directory on first use.
    pub async fn save(&self, state: &InGameState) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        let record = SavedState {
            version: STATE_VERSION,
            state: state.clone(),
        };
        let content = serde_json::to_string_pretty(&record)?;
        fs::write(self.state_path(&state.id), content).await?;
        Ok(())
    }

    /// Read the record for a hero identity. A missing file or a record
    /// from a foreign format version reads as `None`.
    pub async fn load(&self, id: &str) -> Result<Option<InGameState>, PersistError> {
        let path = self.state_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record: SavedState = serde_json::from_str(&content)?;
        if record.version != STATE_VERSION {
            warn!(
                id,
                version = record.version,
                "ignoring state record from a foreign format version"
            );
            return Ok(None);
        }
        Ok(Some(record.state))
    }

    /// Remove the record for a hero identity, if one exists.
    pub async fn delete(&self, id: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.state_path(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// List the hero identities with a readable record, sorted.
    pub async fn list(&self) -> Result<Vec<String>, PersistError> {
        fs::create_dir_all(&self.dir).await?;

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                if let Ok(Some(id)) = peek_identity(&path).await {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Fetch the tracked state for a hero, seeding a fresh one when nothing
    /// usable is stored.
    ///
    /// `reset` throws a stored record away outright. A record whose
    /// captured sheet stamp no longer matches the hero is kept but rescaled
    /// against the fresh derivation. Unreadable or unwritable files are
    /// logged and played through; the in-memory state comes back either
    /// way.
    pub async fn load_or_seed(
        &self,
        hero: &Hero,
        derived: &DerivedAttributes,
        reset: bool,
    ) -> InGameState {
        if !reset {
            match self.load(&hero.id).await {
                Ok(Some(mut state)) => {
                    if state.sheet_modified_at.as_deref() == hero.modified_at() {
                        debug!(id = %hero.id, "restored in-game state");
                        return state;
                    }
                    debug!(id = %hero.id, "sheet was edited, rescaling in-game state");
                    state.refresh_maxima(hero, derived);
                    self.save_tolerant(&state).await;
                    return state;
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(id = %hero.id, %error, "could not read in-game state, reseeding");
                }
            }
        }

        debug!(id = %hero.id, "seeding in-game state");
        let state = InGameState::seed(hero, derived);
        self.save_tolerant(&state).await;
        state
    }

    /// Persist a state, downgrading failure to a warning. Play continues
    /// with the in-memory copy even when the disk copy cannot be written.
    pub async fn save_tolerant(&self, state: &InGameState) {
        if let Err(error) = self.save(state).await {
            warn!(id = %state.id, %error, "could not persist in-game state");
        }
    }
}

/// Read just the identity out of a record file, checking the version.
async fn peek_identity(path: &Path) -> Result<Option<String>, PersistError> {
    #[derive(Deserialize)]
    struct PartialState {
        id: String,
    }

    #[derive(Deserialize)]
    struct Partial {
        version: u32,
        state: PartialState,
    }

    let content = fs::read_to_string(path).await?;
    let partial: Partial = serde_json::from_str(&content)?;
    if partial.version != STATE_VERSION {
        return Ok(None);
    }
    Ok(Some(partial.state.id))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::derive;
    use crate::ingame::{Direction, TrackedPool};
    use crate::testing::{sample_compendium, sample_hero, sample_mage};
    use tempfile::TempDir;

    fn mage_state() -> (crate::hero::Hero, DerivedAttributes, InGameState) {
        let hero = sample_mage();
        let derived = derive(&hero, &sample_compendium()).expect("mage should derive");
        let state = InGameState::seed(&hero, &derived);
        (hero, derived, state)
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let (_, _, mut state) = mage_state();
        state.adjust_pool(TrackedPool::LifePoints, Direction::Decrease);
        state.set_belonging_location("ITEM_1", "belt");

        store.save(&state).await.expect("save should succeed");
        let loaded = store
            .load(&state.id)
            .await
            .expect("load should succeed")
            .expect("record should exist");
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let loaded = store.load("H_404").await.expect("load should succeed");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_foreign_version_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let (_, _, state) = mage_state();

        store.save(&state).await.expect("save should succeed");
        let path = store.state_path(&state.id);
        let content = std::fs::read_to_string(&path).expect("record should read");
        let bumped = content.replacen("\"version\": 1", "\"version\": 99", 1);
        std::fs::write(&path, bumped).expect("record should write");

        let loaded = store.load(&state.id).await.expect("load should succeed");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_or_seed_persists_the_seed() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let (hero, derived, _) = mage_state();

        let state = store.load_or_seed(&hero, &derived, false).await;
        assert_eq!(state.life.current, 29);
        assert!(store.state_path(&hero.id).exists());

        // a second call restores the stored record rather than reseeding
        let mut spent = state;
        spent.adjust_pool(TrackedPool::FatePoints, Direction::Decrease);
        store.save(&spent).await.expect("save should succeed");

        let restored = store.load_or_seed(&hero, &derived, false).await;
        assert_eq!(restored.fate.current, 3);
    }

    #[tokio::test]
    async fn test_load_or_seed_reset_discards_the_record() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let (hero, derived, _) = mage_state();

        let mut state = store.load_or_seed(&hero, &derived, false).await;
        state.adjust_pool(TrackedPool::LifePoints, Direction::Decrease);
        store.save(&state).await.expect("save should succeed");

        let fresh = store.load_or_seed(&hero, &derived, true).await;
        assert_eq!(fresh.life.current, 29);
    }

    #[tokio::test]
    async fn test_load_or_seed_rescales_after_sheet_edit() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let compendium = sample_compendium();
        let (hero, derived, _) = mage_state();

        let mut state = store.load_or_seed(&hero, &derived, false).await;
        for _ in 0..4 {
            state.adjust_pool(TrackedPool::LifePoints, Direction::Decrease);
        }
        state.adjust_pain(Direction::Increase);
        store.save(&state).await.expect("save should succeed");

        let mut edited = hero.clone();
        edited.attributes.values.constitution += 2;
        edited.date_modified = Some("2023-08-01T10:00:00.000Z".to_string());
        let fresh = derive(&edited, &compendium).expect("edited mage should derive");

        let rescaled = store.load_or_seed(&edited, &fresh, false).await;
        assert_eq!(rescaled.life.max, 33);
        assert_eq!(rescaled.life.current, 25);
        assert_eq!(rescaled.pain_level, 1);

        // the rescaled record was written back with the new stamp
        let reloaded = store
            .load(&hero.id)
            .await
            .expect("load should succeed")
            .expect("record should exist");
        assert_eq!(
            reloaded.sheet_modified_at.as_deref(),
            Some("2023-08-01T10:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn test_corrupt_record_reseeds() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());
        let (hero, derived, _) = mage_state();

        std::fs::create_dir_all(dir.path()).expect("dir should exist");
        std::fs::write(store.state_path(&hero.id), "{ not json").expect("write should succeed");

        let state = store.load_or_seed(&hero, &derived, false).await;
        assert_eq!(state.life.current, 29);
        assert_eq!(state.pain_level, 0);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let dir = TempDir::new().expect("temp dir");
        let store = StateStore::new(dir.path());

        let (mage, mage_derived, _) = mage_state();
        store.load_or_seed(&mage, &mage_derived, false).await;

        let hero = sample_hero();
        let derived = derive(&hero, &sample_compendium()).expect("hero should derive");
        store.load_or_seed(&hero, &derived, false).await;

        let ids = store.list().await.expect("list should succeed");
        assert_eq!(ids, vec![hero.id.clone(), mage.id.clone()]);

        store.delete(&mage.id).await.expect("delete should succeed");
        let ids = store.list().await.expect("list should succeed");
        assert_eq!(ids, vec![hero.id.clone()]);

        // deleting twice is quiet
        store.delete(&mage.id).await.expect("delete should succeed");
    }

    #[tokio::test]
    async fn test_state_paths_are_sanitized() {
        let store = StateStore::new("ingame");
        assert_eq!(store.dir(), Path::new("ingame"));

        let path = store.state_path("H_1687704882028");
        assert_eq!(path, PathBuf::from("ingame/H_1687704882028.json"));

        let path = store.state_path("../../etc/passwd");
        assert_eq!(path, PathBuf::from("ingame/______etc_passwd.json"));
    }
}
