//! HeroSession - the primary public API for running a play session.
//!
//! A session ties one imported sheet to the compendium, the derived
//! maximums, and the persisted in-game state. Every mutation writes the
//! state back out, so closing the app mid-session loses nothing.

use crate::check::{AbilityCheck, AbilityKind, CheckRef};
use crate::compendium::{Compendium, LookupError, TraitEntry};
use crate::derived::{derive, DerivedAttributes};
use crate::hero::{Attribute, Coin, Hero, ImportError};
use crate::ingame::{Direction, InGameState, Pool, TrackedPool};
use crate::persist::{PersistError, StateStore};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Unknown skill id: {0}")]
    UnknownSkill(String),

    #[error("Unknown spell id: {0}")]
    UnknownSpell(String),

    #[error("Spell {0} is not on the sheet")]
    UnlearnedSpell(String),
}

/// Configuration for opening a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory the per-hero state records live in.
    pub state_dir: PathBuf,
    /// Throw stored state away and reseed from the sheet.
    pub reset: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            state_dir: PathBuf::from("ingame"),
            reset: false,
        }
    }

    /// Set the state directory.
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Discard stored state on open.
    pub fn with_reset(mut self) -> Self {
        self.reset = true;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A running play session for one hero.
pub struct HeroSession {
    hero: Hero,
    compendium: Arc<Compendium>,
    derived: DerivedAttributes,
    store: StateStore,
    state: InGameState,
}

impl HeroSession {
    /// Import an Optolith export and open its session.
    pub async fn open(
        json: &str,
        compendium: Arc<Compendium>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let hero = Hero::from_json(json)?;
        Self::with_hero(hero, compendium, config).await
    }

    /// Open a session for an already-imported hero.
    pub async fn with_hero(
        hero: Hero,
        compendium: Arc<Compendium>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let derived = derive(&hero, &compendium)?;
        let store = StateStore::new(config.state_dir);
        let state = store.load_or_seed(&hero, &derived, config.reset).await;
        debug!(id = %hero.id, name = %hero.name, "opened hero session");
        Ok(Self {
            hero,
            compendium,
            derived,
            store,
            state,
        })
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn compendium(&self) -> &Compendium {
        &self.compendium
    }

    pub fn derived(&self) -> &DerivedAttributes {
        &self.derived
    }

    pub fn state(&self) -> &InGameState {
        &self.state
    }

    /// The possessed traits of the hero, named for display.
    pub fn trait_entries(&self) -> Result<Vec<TraitEntry>, SessionError> {
        Ok(self.compendium.trait_entries(&self.hero)?)
    }

    /// Roll a skill check. A skill the hero never bought up checks at
    /// rating 0.
    pub fn check_skill<R: Rng>(
        &self,
        skill_id: &str,
        rng: &mut R,
    ) -> Result<AbilityCheck, SessionError> {
        let skill = self
            .compendium
            .skill(skill_id)
            .ok_or_else(|| SessionError::UnknownSkill(skill_id.to_string()))?;
        Ok(AbilityCheck::roll(
            skill_id,
            skill.name.clone(),
            AbilityKind::Skill,
            self.hero.skill_rating(skill_id),
            self.check_refs(skill.check),
            rng,
        ))
    }

    /// Roll a spell check. Unlike skills, a spell the hero never learned
    /// is rejected rather than checked at rating 0.
    pub fn check_spell<R: Rng>(
        &self,
        spell_id: &str,
        rng: &mut R,
    ) -> Result<AbilityCheck, SessionError> {
        let spell = self
            .compendium
            .spell(spell_id)
            .ok_or_else(|| SessionError::UnknownSpell(spell_id.to_string()))?;
        let rating = self
            .hero
            .spell_rating(spell_id)
            .ok_or_else(|| SessionError::UnlearnedSpell(spell_id.to_string()))?;
        Ok(AbilityCheck::roll(
            spell_id,
            spell.name.clone(),
            AbilityKind::Spell,
            rating,
            self.check_refs(spell.check),
            rng,
        ))
    }

    fn check_refs(&self, check: [Attribute; 3]) -> [CheckRef; 3] {
        check.map(|attribute| {
            CheckRef::new(
                attribute,
                self.compendium.attribute_name(attribute),
                self.hero.attribute(attribute),
            )
        })
    }

    /// Step a pool and persist the result.
    pub async fn adjust_pool(&mut self, pool: TrackedPool, direction: Direction) -> Pool {
        self.state.adjust_pool(pool, direction);
        self.store.save_tolerant(&self.state).await;
        self.state.pool(pool)
    }

    /// Step a coin denomination and persist the result.
    pub async fn adjust_purse(&mut self, coin: Coin, direction: Direction) -> u32 {
        self.state.adjust_purse(coin, direction);
        self.store.save_tolerant(&self.state).await;
        self.state.purse.get(coin)
    }

    /// Step the pain level and persist the result.
    pub async fn adjust_pain(&mut self, direction: Direction) -> u8 {
        self.state.adjust_pain(direction);
        self.store.save_tolerant(&self.state).await;
        self.state.pain_level
    }

    /// Record where a piece of gear sits and persist the result.
    pub async fn set_belonging_location(
        &mut self,
        id: impl Into<String>,
        location: impl Into<String>,
    ) {
        self.state.set_belonging_location(id, location);
        self.store.save_tolerant(&self.state).await;
    }

    /// Throw the tracked state away and reseed it from the sheet.
    pub async fn reset_state(&mut self) {
        self.state = InGameState::seed(&self.hero, &self.derived);
        self.store.save_tolerant(&self.state).await;
    }

    /// Flush the current state to disk, surfacing any failure.
    pub async fn persist(&self) -> Result<(), SessionError> {
        self.store.save(&self.state).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
