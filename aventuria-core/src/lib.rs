//! # Aventuria Core
//!
//! A play-session engine for The Dark Eye 5e, built around the character
//! exports of the Optolith desktop app. It covers what a table needs once
//! the building is done and the playing starts:
//!
//! - Typed import of Optolith hero exports, loose corners normalized
//! - Derived secondary attributes: life, arcane energy, karma, spirit,
//!   toughness, dodge, initiative, movement, wound threshold, fate
//! - Three-attribute d20 checks for skills and spells, graded into
//!   quality levels, with criticals on doubled 1s and 20s
//! - Persisted per-hero in-game tracking: pool levels, purse, pain,
//!   and where the gear sits
//!
//! # Quick Start
//!
//! ```ignore
//! use aventuria_core::{Direction, HeroSession, SessionConfig, TrackedPool};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let compendium = Arc::new(load_compendium()?);
//!     let json = std::fs::read_to_string("robak.json")?;
//!
//!     let mut session = HeroSession::open(&json, compendium, SessionConfig::new()).await?;
//!     println!("LP {}", session.state().life);
//!
//!     let check = session.check_skill("TAL_36", &mut rand::thread_rng())?;
//!     println!("{check}");
//!
//!     session.adjust_pool(TrackedPool::LifePoints, Direction::Decrease).await;
//!     Ok(())
//! }
//! ```

pub mod check;
pub mod compendium;
pub mod derived;
pub mod hero;
pub mod ingame;
pub mod persist;
pub mod session;
pub mod testing;

// Primary public API
pub use check::{AbilityCheck, AbilityKind, CheckOutcome, CheckRef};
pub use compendium::{Compendium, EnergyRule, LookupError, ProfessionGroup, TraitEntry};
pub use derived::{derive, DerivedAttributes};
pub use hero::{Attribute, Coin, Hero, ImportError, Purse};
pub use ingame::{Direction, InGameState, Pool, TrackedPool};
pub use persist::{PersistError, StateStore};
pub use session::{HeroSession, SessionConfig, SessionError};
