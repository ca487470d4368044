//! The state a table actually tracks during play: pool levels, money,
//! pain, and where the gear currently sits.
//!
//! Everything here is per-hero and mutable; the maximums come from
//! [`crate::derived`] and only change when the sheet does.

use crate::derived::DerivedAttributes;
use crate::hero::{Coin, Hero, Purse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pain runs from 0 (unhurt) to level 4.
pub const MAX_PAIN_LEVEL: u8 = 4;

/// Step direction for bounded adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "inc")]
    Increase,
    #[serde(rename = "dec")]
    Decrease,
}

/// A current/maximum pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub current: i32,
    pub max: i32,
}

impl Pool {
    /// A pool filled to its maximum.
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    fn step(&mut self, direction: Direction) {
        self.current = match direction {
            Direction::Increase => (self.current + 1).min(self.max),
            Direction::Decrease => (self.current - 1).max(0),
        };
    }

    /// Replace the maximum, keeping the current level where it still fits.
    fn rescale(&mut self, max: i32) {
        self.max = max;
        self.current = self.current.min(max).max(0);
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// The pools a player spends and recovers during play. The other derived
/// pools are display values and never stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedPool {
    LifePoints,
    ArcaneEnergy,
    KarmaPoints,
    FatePoints,
}

impl TrackedPool {
    pub fn name(&self) -> &'static str {
        match self {
            TrackedPool::LifePoints => "Life Points",
            TrackedPool::ArcaneEnergy => "Arcane Energy",
            TrackedPool::KarmaPoints => "Karma Points",
            TrackedPool::FatePoints => "Fate Points",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            TrackedPool::LifePoints => "LP",
            TrackedPool::ArcaneEnergy => "AE",
            TrackedPool::KarmaPoints => "KP",
            TrackedPool::FatePoints => "FP",
        }
    }

    pub fn all() -> [TrackedPool; 4] {
        [
            TrackedPool::LifePoints,
            TrackedPool::ArcaneEnergy,
            TrackedPool::KarmaPoints,
            TrackedPool::FatePoints,
        ]
    }
}

impl fmt::Display for TrackedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where one piece of gear currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedBelonging {
    pub id: String,
    #[serde(rename = "where")]
    pub location: String,
}

/// Everything a player tracks for one hero during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InGameState {
    /// Identity of the hero this record belongs to.
    pub id: String,
    /// Sheet stamp captured at seed time, compared on load to notice
    /// edited sheets.
    pub sheet_modified_at: Option<String>,
    pub life: Pool,
    pub arcane: Pool,
    pub karma: Pool,
    pub fate: Pool,
    pub spirit: Pool,
    pub toughness: Pool,
    pub dodge: Pool,
    pub initiative: Pool,
    pub movement: Pool,
    pub wound_threshold: Pool,
    pub belongings: Vec<TrackedBelonging>,
    pub purse: Purse,
    pub pain_level: u8,
}

impl InGameState {
    /// A fresh state for a hero: every pool at its maximum, the purse as
    /// the sheet has it, no pain, no gear placed anywhere yet.
    pub fn seed(hero: &Hero, derived: &DerivedAttributes) -> Self {
        Self {
            id: hero.id.clone(),
            sheet_modified_at: hero.modified_at().map(str::to_string),
            life: Pool::full(derived.life_points),
            arcane: Pool::full(derived.arcane_energy),
            karma: Pool::full(derived.karma_points),
            fate: Pool::full(derived.fate_points),
            spirit: Pool::full(derived.spirit),
            toughness: Pool::full(derived.toughness),
            dodge: Pool::full(derived.dodge),
            initiative: Pool::full(derived.initiative),
            movement: Pool::full(derived.movement),
            wound_threshold: Pool::full(derived.wound_threshold),
            belongings: Vec::new(),
            purse: hero.belongings.purse,
            pain_level: 0,
        }
    }

    /// Read a tracked pool.
    pub fn pool(&self, pool: TrackedPool) -> Pool {
        match pool {
            TrackedPool::LifePoints => self.life,
            TrackedPool::ArcaneEnergy => self.arcane,
            TrackedPool::KarmaPoints => self.karma,
            TrackedPool::FatePoints => self.fate,
        }
    }

    /// Step a tracked pool by one, clamped to `0..=max`.
    pub fn adjust_pool(&mut self, pool: TrackedPool, direction: Direction) {
        match pool {
            TrackedPool::LifePoints => self.life.step(direction),
            TrackedPool::ArcaneEnergy => self.arcane.step(direction),
            TrackedPool::KarmaPoints => self.karma.step(direction),
            TrackedPool::FatePoints => self.fate.step(direction),
        }
    }

    /// Step one coin denomination by one. Gaining has no cap; spending
    /// stops at an empty purse.
    pub fn adjust_purse(&mut self, coin: Coin, direction: Direction) {
        let amount = self.purse.get(coin);
        let amount = match direction {
            Direction::Increase => amount.saturating_add(1),
            Direction::Decrease => amount.saturating_sub(1),
        };
        self.purse.set(coin, amount);
    }

    /// Step the pain level by one, clamped to `0..=4`.
    pub fn adjust_pain(&mut self, direction: Direction) {
        self.pain_level = match direction {
            Direction::Increase => (self.pain_level + 1).min(MAX_PAIN_LEVEL),
            Direction::Decrease => self.pain_level.saturating_sub(1),
        };
    }

    /// Record where a piece of gear sits, adding the entry on first touch.
    pub fn set_belonging_location(
        &mut self,
        id: impl Into<String>,
        location: impl Into<String>,
    ) {
        let id = id.into();
        let location = location.into();
        match self.belongings.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.location = location,
            None => self.belongings.push(TrackedBelonging { id, location }),
        }
    }

    /// Location of a piece of gear, if one was ever recorded.
    pub fn belonging_location(&self, id: &str) -> Option<&str> {
        self.belongings
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.location.as_str())
    }

    /// Take fresh derived maximums after a sheet edit. Spent pools keep
    /// their current level where it still fits; the display pools follow
    /// the sheet outright. Purse, pain, and gear placements stay.
    pub fn refresh_maxima(&mut self, hero: &Hero, derived: &DerivedAttributes) {
        self.sheet_modified_at = hero.modified_at().map(str::to_string);
        self.life.rescale(derived.life_points);
        self.arcane.rescale(derived.arcane_energy);
        self.karma.rescale(derived.karma_points);
        self.fate.rescale(derived.fate_points);
        self.spirit = Pool::full(derived.spirit);
        self.toughness = Pool::full(derived.toughness);
        self.dodge = Pool::full(derived.dodge);
        self.initiative = Pool::full(derived.initiative);
        self.movement = Pool::full(derived.movement);
        self.wound_threshold = Pool::full(derived.wound_threshold);
    }
}

// ============================================================================
// Tests
// ============================================================================
