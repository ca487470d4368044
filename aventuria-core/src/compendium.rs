//! The rules compendium: static game data the sheet only references by id.
//!
//! An Optolith export stores references like `R_1` or `TAL_36`; the names,
//! check attributes, and base values behind them live in a data set keyed
//! per locale. A [`Compendium`] holds one locale's tables.

use crate::hero::{Attribute, Hero, TraitInstance};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A reference id on a sheet with no row in the loaded tables.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Unknown race id: {0}")]
    UnknownRace(String),

    #[error("Unknown profession id: {0}")]
    UnknownProfession(String),

    #[error("Unknown trait id: {0}")]
    UnknownTrait(String),
}

// ============================================================================
// Table Rows
// ============================================================================

/// Per-race base values feeding the derived attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceBaseValues {
    pub life_points: i32,
    pub spirit: i32,
    pub toughness: i32,
    pub movement: i32,
}

/// Broad profession classification deciding which energies a hero has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfessionGroup {
    Mundane,
    Arcane,
    Blessed,
}

impl ProfessionGroup {
    /// Numeric group id in the Optolith data set.
    pub fn group_id(&self) -> i32 {
        match self {
            ProfessionGroup::Mundane => 1,
            ProfessionGroup::Arcane => 2,
            ProfessionGroup::Blessed => 3,
        }
    }

    /// Look a classification up by its Optolith group id.
    pub fn from_group_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(ProfessionGroup::Mundane),
            2 => Some(ProfessionGroup::Arcane),
            3 => Some(ProfessionGroup::Blessed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProfessionGroup::Mundane => "Mundane",
            ProfessionGroup::Arcane => "Arcane",
            ProfessionGroup::Blessed => "Blessed",
        }
    }
}

/// A profession row: its classification and subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub group: ProfessionGroup,
    #[serde(default)]
    pub subgroup: i32,
}

/// A skill row: display name, the three-attribute check, and its talent
/// group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    pub check: [Attribute; 3],
    #[serde(default)]
    pub group: i64,
    #[serde(default)]
    pub group_name: String,
}

/// A spell row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDef {
    pub name: String,
    pub check: [Attribute; 3],
    #[serde(default)]
    pub casting_time: String,
    #[serde(default)]
    pub ae_cost: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub effect: String,
}

/// A cantrip row. Cantrips always work and are never rolled, so there is
/// no check here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CantripDef {
    pub name: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub effect: String,
}

/// What a trait does to the derived attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// Adds its tier to the fate point base.
    Luck,
    /// Subtracts its tier from the fate point base.
    BadLuck,
    #[default]
    Other,
}

/// An advantage, disadvantage, or special ability row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDef {
    pub name: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub kind: TraitKind,
    #[serde(default)]
    pub group: Option<i64>,
}

/// How an energy maximum builds up for one profession classification: a
/// base amount plus, for some subgroups, a leading attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRule {
    pub base: i32,
    /// Subgroup id to the attribute that subgroup adds.
    #[serde(default)]
    pub leading: HashMap<i32, Attribute>,
}

impl EnergyRule {
    /// The arcane rule of the core book: base 20, and the mage subgroup
    /// adds Sagacity.
    pub fn arcane_default() -> Self {
        Self {
            base: 20,
            leading: HashMap::from([(1, Attribute::Sagacity)]),
        }
    }
}

// ============================================================================
// The Compendium
// ============================================================================

lazy_static::lazy_static! {
    /// Trait ids whose display name carries the selection in parentheses,
    /// the way character sheets print literacy and language entries.
    static ref SELECTION_SUFFIXED: HashSet<&'static str> = {
        let mut ids = HashSet::new();
        ids.insert("SA_27");
        ids.insert("SA_29");
        ids
    };
}

fn default_locale() -> String {
    "de_de".to_string()
}

/// One locale's worth of rules tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compendium {
    /// Locale the display names are in.
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub races: HashMap<String, RaceBaseValues>,
    #[serde(default)]
    pub professions: HashMap<String, Profession>,
    #[serde(default)]
    pub skills: HashMap<String, SkillDef>,
    #[serde(default)]
    pub spells: HashMap<String, SpellDef>,
    #[serde(default)]
    pub cantrips: HashMap<String, CantripDef>,
    #[serde(default)]
    pub traits: HashMap<String, TraitDef>,
    /// Short attribute names for check displays, MU through KK in the
    /// German set.
    #[serde(default)]
    pub attribute_names: HashMap<Attribute, String>,
    #[serde(default)]
    pub equipment_groups: HashMap<i64, String>,
    #[serde(default = "EnergyRule::arcane_default")]
    pub arcane_rule: EnergyRule,
    /// No karma rule ships out of the box; supply one when the data set
    /// covers the blessed circles.
    #[serde(default)]
    pub karma_rule: Option<EnergyRule>,
}

impl Compendium {
    /// An empty compendium for the given locale.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Parse a compendium from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn race(&self, id: &str) -> Option<&RaceBaseValues> {
        self.races.get(id)
    }

    pub fn profession(&self, id: &str) -> Option<&Profession> {
        self.professions.get(id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDef> {
        self.spells.get(id)
    }

    pub fn cantrip(&self, id: &str) -> Option<&CantripDef> {
        self.cantrips.get(id)
    }

    pub fn trait_def(&self, id: &str) -> Option<&TraitDef> {
        self.traits.get(id)
    }

    pub fn equipment_group(&self, id: i64) -> Option<&str> {
        self.equipment_groups.get(&id).map(String::as_str)
    }

    /// Short display name of an attribute, falling back to the English
    /// abbreviation when the table has no row.
    pub fn attribute_name(&self, attribute: Attribute) -> &str {
        self.attribute_names
            .get(&attribute)
            .map(String::as_str)
            .unwrap_or_else(|| attribute.abbreviation())
    }

    /// The possessed traits of a hero, one entry per taken instance, named
    /// for display.
    ///
    /// Literacy and language entries print their selection in parentheses,
    /// and custom `_0` entries are named by their free-text selection.
    pub fn trait_entries(&self, hero: &Hero) -> Result<Vec<TraitEntry>, LookupError> {
        let mut entries = Vec::new();
        for (id, instances) in hero.possessed_traits() {
            let def = self
                .trait_def(id)
                .ok_or_else(|| LookupError::UnknownTrait(id.to_string()))?;
            for instance in instances {
                entries.push(TraitEntry {
                    id: id.to_string(),
                    name: display_name(id, def, instance),
                    rules: if id.ends_with("_0") {
                        String::new()
                    } else {
                        def.rules.clone()
                    },
                    tier: instance.tier,
                    group: def.group,
                });
            }
        }
        Ok(entries)
    }
}

impl Default for Compendium {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            races: HashMap::new(),
            professions: HashMap::new(),
            skills: HashMap::new(),
            spells: HashMap::new(),
            cantrips: HashMap::new(),
            traits: HashMap::new(),
            attribute_names: HashMap::new(),
            equipment_groups: HashMap::new(),
            arcane_rule: EnergyRule::arcane_default(),
            karma_rule: None,
        }
    }
}

/// One possessed trait instance, ready for a character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitEntry {
    pub id: String,
    pub name: String,
    pub rules: String,
    pub tier: Option<i32>,
    pub group: Option<i64>,
}

fn display_name(id: &str, def: &TraitDef, instance: &TraitInstance) -> String {
    if SELECTION_SUFFIXED.contains(id) {
        return match &instance.selection {
            Some(selection) => format!("{} ({})", def.name, selection),
            None => def.name.clone(),
        };
    }
    if id.ends_with("_0") {
        if let Some(selection) = &instance.selection {
            return selection.to_string();
        }
    }
    def.name.clone()
}

// ============================================================================
// Tests
// ============================================================================
