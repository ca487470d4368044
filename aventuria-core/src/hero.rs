//! Hero sheets imported from Optolith character exports.
//!
//! Optolith saves a hero as one JSON document. The shape is mostly stable
//! but a few corners are loose: attribute entries appear either as
//! `{"id": "ATTR_1", "value": 13}` objects or as `["ATTR_1", 13]` pairs,
//! and purse amounts come as strings that may be empty. Import normalizes
//! all of that into one typed form.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors from hero import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Core Attributes
// ============================================================================

/// The eight core attributes of The Dark Eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "ATTR_1")]
    Courage,
    #[serde(rename = "ATTR_2")]
    Sagacity,
    #[serde(rename = "ATTR_3")]
    Intuition,
    #[serde(rename = "ATTR_4")]
    Charisma,
    #[serde(rename = "ATTR_5")]
    Dexterity,
    #[serde(rename = "ATTR_6")]
    Agility,
    #[serde(rename = "ATTR_7")]
    Constitution,
    #[serde(rename = "ATTR_8")]
    Strength,
}

impl Attribute {
    /// The identifier Optolith uses for this attribute.
    pub fn id(&self) -> &'static str {
        match self {
            Attribute::Courage => "ATTR_1",
            Attribute::Sagacity => "ATTR_2",
            Attribute::Intuition => "ATTR_3",
            Attribute::Charisma => "ATTR_4",
            Attribute::Dexterity => "ATTR_5",
            Attribute::Agility => "ATTR_6",
            Attribute::Constitution => "ATTR_7",
            Attribute::Strength => "ATTR_8",
        }
    }

    /// Look an attribute up by its Optolith identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "ATTR_1" => Some(Attribute::Courage),
            "ATTR_2" => Some(Attribute::Sagacity),
            "ATTR_3" => Some(Attribute::Intuition),
            "ATTR_4" => Some(Attribute::Charisma),
            "ATTR_5" => Some(Attribute::Dexterity),
            "ATTR_6" => Some(Attribute::Agility),
            "ATTR_7" => Some(Attribute::Constitution),
            "ATTR_8" => Some(Attribute::Strength),
            _ => None,
        }
    }

    /// Short form of the English rulebook.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Attribute::Courage => "COU",
            Attribute::Sagacity => "SGC",
            Attribute::Intuition => "INT",
            Attribute::Charisma => "CHA",
            Attribute::Dexterity => "DEX",
            Attribute::Agility => "AGI",
            Attribute::Constitution => "CON",
            Attribute::Strength => "STR",
        }
    }

    /// Full English name.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Courage => "Courage",
            Attribute::Sagacity => "Sagacity",
            Attribute::Intuition => "Intuition",
            Attribute::Charisma => "Charisma",
            Attribute::Dexterity => "Dexterity",
            Attribute::Agility => "Agility",
            Attribute::Constitution => "Constitution",
            Attribute::Strength => "Strength",
        }
    }

    /// All eight attributes in sheet order.
    pub fn all() -> [Attribute; 8] {
        [
            Attribute::Courage,
            Attribute::Sagacity,
            Attribute::Intuition,
            Attribute::Charisma,
            Attribute::Dexterity,
            Attribute::Agility,
            Attribute::Constitution,
            Attribute::Strength,
        ]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The bought-up values of the eight core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeValues {
    pub courage: i32,
    pub sagacity: i32,
    pub intuition: i32,
    pub charisma: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub constitution: i32,
    pub strength: i32,
}

impl AttributeValues {
    pub fn new(
        courage: i32,
        sagacity: i32,
        intuition: i32,
        charisma: i32,
        dexterity: i32,
        agility: i32,
        constitution: i32,
        strength: i32,
    ) -> Self {
        Self {
            courage,
            sagacity,
            intuition,
            charisma,
            dexterity,
            agility,
            constitution,
            strength,
        }
    }

    /// Get an attribute value.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Courage => self.courage,
            Attribute::Sagacity => self.sagacity,
            Attribute::Intuition => self.intuition,
            Attribute::Charisma => self.charisma,
            Attribute::Dexterity => self.dexterity,
            Attribute::Agility => self.agility,
            Attribute::Constitution => self.constitution,
            Attribute::Strength => self.strength,
        }
    }

    /// Set an attribute value.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Courage => self.courage = value,
            Attribute::Sagacity => self.sagacity = value,
            Attribute::Intuition => self.intuition = value,
            Attribute::Charisma => self.charisma = value,
            Attribute::Dexterity => self.dexterity = value,
            Attribute::Agility => self.agility = value,
            Attribute::Constitution => self.constitution = value,
            Attribute::Strength => self.strength = value,
        }
    }
}

impl Default for AttributeValues {
    /// The unbought base of 8 in everything.
    fn default() -> Self {
        Self::new(8, 8, 8, 8, 8, 8, 8, 8)
    }
}

impl<'de> Deserialize<'de> for AttributeValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            Keyed { id: String, value: i32 },
            Pair(String, i32),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Wire(Vec<Entry>),
            Canonical {
                courage: i32,
                sagacity: i32,
                intuition: i32,
                charisma: i32,
                dexterity: i32,
                agility: i32,
                constitution: i32,
                strength: i32,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Wire(entries) => {
                let mut values = AttributeValues::default();
                let mut seen: HashSet<Attribute> = HashSet::new();
                for entry in entries {
                    let (id, value) = match entry {
                        Entry::Keyed { id, value } => (id, value),
                        Entry::Pair(id, value) => (id, value),
                    };
                    // ids outside the eight are ignored
                    if let Some(attribute) = Attribute::from_id(&id) {
                        values.set(attribute, value);
                        seen.insert(attribute);
                    }
                }
                for attribute in Attribute::all() {
                    if !seen.contains(&attribute) {
                        return Err(D::Error::custom(format!(
                            "attribute {} missing from the sheet",
                            attribute.id()
                        )));
                    }
                }
                Ok(values)
            }
            Repr::Canonical {
                courage,
                sagacity,
                intuition,
                charisma,
                dexterity,
                agility,
                constitution,
                strength,
            } => Ok(AttributeValues {
                courage,
                sagacity,
                intuition,
                charisma,
                dexterity,
                agility,
                constitution,
                strength,
            }),
        }
    }
}

/// Permanently lost points of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PermanentLoss {
    #[serde(default)]
    pub lost: i32,
}

/// Permanently lost and bought-back points of an energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PermanentEnergy {
    #[serde(default)]
    pub lost: i32,
    #[serde(default)]
    pub redeemed: i32,
}

/// The attribute block of a sheet: core values, bought energy points, and
/// the permanent loss counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBlock {
    pub values: AttributeValues,
    #[serde(default)]
    pub ae: i32,
    #[serde(default)]
    pub kp: i32,
    #[serde(default)]
    pub lp: i32,
    #[serde(default, rename = "permanentLP")]
    pub permanent_lp: PermanentLoss,
    #[serde(default, rename = "permanentAE")]
    pub permanent_ae: PermanentEnergy,
    #[serde(default, rename = "permanentKP")]
    pub permanent_kp: PermanentEnergy,
    #[serde(default, rename = "attributeAdjustmentSelected")]
    pub adjustment_selected: Option<String>,
}

impl Default for AttributeBlock {
    fn default() -> Self {
        Self {
            values: AttributeValues::default(),
            ae: 0,
            kp: 0,
            lp: 0,
            permanent_lp: PermanentLoss::default(),
            permanent_ae: PermanentEnergy::default(),
            permanent_kp: PermanentEnergy::default(),
            adjustment_selected: None,
        }
    }
}

// ============================================================================
// Activatable Traits
// ============================================================================

/// A selection attached to a trait instance. Optolith stores either an
/// option index or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionId {
    Index(i64),
    Text(String),
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionId::Index(index) => write!(f, "{index}"),
            SelectionId::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One taken instance of an activatable trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TraitInstance {
    #[serde(default, rename = "sid")]
    pub selection: Option<SelectionId>,
    #[serde(default)]
    pub tier: Option<i32>,
}

// ============================================================================
// Money and Belongings
// ============================================================================

/// The four coin denominations of Aventuria. Ten of one make the next:
/// 10 kreutzers to a haler, 10 halers to a silverthaler, 10 silverthalers
/// to a ducat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    #[serde(rename = "d")]
    Ducat,
    #[serde(rename = "s")]
    Silverthaler,
    #[serde(rename = "h")]
    Haler,
    #[serde(rename = "k")]
    Kreutzer,
}

impl Coin {
    /// The single-letter key Optolith files the denomination under.
    pub fn key(&self) -> &'static str {
        match self {
            Coin::Ducat => "d",
            Coin::Silverthaler => "s",
            Coin::Haler => "h",
            Coin::Kreutzer => "k",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Coin::Ducat => "Ducat",
            Coin::Silverthaler => "Silverthaler",
            Coin::Haler => "Haler",
            Coin::Kreutzer => "Kreutzer",
        }
    }

    /// All four denominations, largest first.
    pub fn all() -> [Coin; 4] {
        [Coin::Ducat, Coin::Silverthaler, Coin::Haler, Coin::Kreutzer]
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Money by denomination. Exports write amounts as strings, empty when a
/// denomination was never touched; both forms read as plain numbers here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Purse {
    #[serde(rename = "d", default, deserialize_with = "deserialize_amount")]
    pub ducats: u32,
    #[serde(rename = "s", default, deserialize_with = "deserialize_amount")]
    pub silverthalers: u32,
    #[serde(rename = "h", default, deserialize_with = "deserialize_amount")]
    pub halers: u32,
    #[serde(rename = "k", default, deserialize_with = "deserialize_amount")]
    pub kreutzers: u32,
}

impl Purse {
    /// Amount of one denomination.
    pub fn get(&self, coin: Coin) -> u32 {
        match coin {
            Coin::Ducat => self.ducats,
            Coin::Silverthaler => self.silverthalers,
            Coin::Haler => self.halers,
            Coin::Kreutzer => self.kreutzers,
        }
    }

    /// Set the amount of one denomination.
    pub fn set(&mut self, coin: Coin, amount: u32) {
        match coin {
            Coin::Ducat => self.ducats = amount,
            Coin::Silverthaler => self.silverthalers = amount,
            Coin::Haler => self.halers = amount,
            Coin::Kreutzer => self.kreutzers = amount,
        }
    }
}

/// Accept a purse amount as a number, a numeric string, an empty string,
/// or null. Anything unreadable counts as zero.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    let amount = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n.clamp(0, u32::MAX as i64) as u32,
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(|n| n.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(0),
        None => 0,
    };
    Ok(amount)
}

fn default_amount() -> i64 {
    1
}

/// One item off the sheet's equipment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BelongingItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "gr")]
    pub group: i64,
    #[serde(default = "default_amount")]
    pub amount: i64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "where")]
    pub location: Option<String>,
    #[serde(default, rename = "combatTechnique")]
    pub combat_technique: Option<String>,
    #[serde(default)]
    pub reach: Option<i64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub at: Option<i64>,
    #[serde(default)]
    pub pa: Option<i64>,
    #[serde(default)]
    pub template: Option<String>,
}

/// The belongings block: equipment by item id, plus the purse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Belongings {
    #[serde(default)]
    pub items: HashMap<String, BelongingItem>,
    #[serde(default)]
    pub purse: Purse,
}

// ============================================================================
// The Hero Sheet
// ============================================================================

/// Adventure point bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApInfo {
    #[serde(default)]
    pub total: i64,
}

/// The biographical block of the sheet. Pure display data; nothing in
/// here feeds a formula. Hair color, eye color, and social status are
/// numeric ids into per-locale tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Personal {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default, rename = "placeofbirth")]
    pub place_of_birth: Option<String>,
    #[serde(default, rename = "dateofbirth")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default, rename = "haircolor")]
    pub hair_color: Option<i64>,
    #[serde(default, rename = "eyecolor")]
    pub eye_color: Option<i64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "socialstatus")]
    pub social_status: Option<i64>,
    #[serde(default)]
    pub characteristics: Option<String>,
    #[serde(default, rename = "otherinfo")]
    pub other_info: Option<String>,
}

/// A hero sheet imported from an Optolith export.
///
/// Field names follow the crate; the serde renames follow the export, so a
/// sheet round-trips under the keys Optolith wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "dateCreated")]
    pub date_created: Option<String>,
    #[serde(default, rename = "dateModified")]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub ap: ApInfo,
    #[serde(default, rename = "el")]
    pub experience_level: Option<String>,
    #[serde(rename = "r")]
    pub race_id: String,
    #[serde(default, rename = "rv")]
    pub race_variant_id: Option<String>,
    #[serde(default, rename = "c")]
    pub culture_id: Option<String>,
    #[serde(rename = "p")]
    pub profession_id: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default, rename = "pers")]
    pub personal: Personal,
    #[serde(rename = "attr")]
    pub attributes: AttributeBlock,
    #[serde(default)]
    pub activatable: BTreeMap<String, Vec<TraitInstance>>,
    #[serde(default, rename = "talents")]
    pub skills: HashMap<String, i32>,
    #[serde(default, rename = "ct")]
    pub combat_techniques: HashMap<String, i32>,
    #[serde(default)]
    pub spells: HashMap<String, i32>,
    #[serde(default)]
    pub cantrips: Vec<String>,
    #[serde(default)]
    pub liturgies: HashMap<String, i32>,
    #[serde(default)]
    pub blessings: Vec<String>,
    #[serde(default)]
    pub belongings: Belongings,
}

impl Hero {
    /// Parse a hero out of an Optolith export.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Current value of a core attribute.
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.values.get(attribute)
    }

    /// Rating of a skill, 0 when it was never bought up.
    pub fn skill_rating(&self, id: &str) -> i32 {
        self.skills.get(id).copied().unwrap_or(0)
    }

    /// Rating of a learned spell.
    pub fn spell_rating(&self, id: &str) -> Option<i32> {
        self.spells.get(id).copied()
    }

    /// Activatable entries that are actually possessed. Optolith keeps
    /// emptied entries around; an empty instance list is not a possession.
    pub fn possessed_traits(&self) -> impl Iterator<Item = (&str, &[TraitInstance])> {
        self.activatable
            .iter()
            .filter(|(_, instances)| !instances.is_empty())
            .map(|(id, instances)| (id.as_str(), instances.as_slice()))
    }

    /// The sheet's locale, lowercased with underscore separators. Exports
    /// without one read as German, the game's home locale.
    pub fn locale_tag(&self) -> String {
        match &self.locale {
            Some(tag) => tag.replace('-', "_").to_lowercase(),
            None => "de_de".to_string(),
        }
    }

    /// The stamp that marks a sheet edit: the modification date, falling
    /// back to the creation date for never-edited sheets.
    pub fn modified_at(&self) -> Option<&str> {
        self.date_modified
            .as_deref()
            .or(self.date_created.as_deref())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SAMPLE_EXPORT;

    #[test]
    fn test_import_wire_export() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");

        assert_eq!(hero.id, "H_1687704882028");
        assert_eq!(hero.name, "Robak");
        assert_eq!(hero.race_id, "R_1");
        assert_eq!(hero.profession_id, "P_127");
        assert_eq!(hero.attribute(Attribute::Courage), 13);
        assert_eq!(hero.attribute(Attribute::Sagacity), 15);
        assert_eq!(hero.attribute(Attribute::Strength), 10);
        assert_eq!(hero.attributes.ae, 1);
        assert_eq!(hero.attributes.permanent_ae.lost, 2);
        assert_eq!(hero.attributes.permanent_ae.redeemed, 1);
        assert_eq!(hero.skill_rating("TAL_20"), 8);
        assert_eq!(hero.spell_rating("SPELL_29"), Some(12));
        assert_eq!(hero.cantrips, vec!["CANTRIP_30"]);
        assert_eq!(hero.belongings.items["ITEM_1"].name, "Sword");
        assert_eq!(
            hero.belongings.items["ITEM_1"].location.as_deref(),
            Some("belt")
        );
    }

    #[test]
    fn test_import_pair_attributes() {
        let json = r#"{
            "id": "H_1",
            "name": "Pairwise",
            "r": "R_1",
            "p": "P_25",
            "attr": {
                "values": [
                    ["ATTR_1", 11], ["ATTR_2", 12], ["ATTR_3", 13], ["ATTR_4", 14],
                    ["ATTR_5", 15], ["ATTR_6", 14], ["ATTR_7", 13], ["ATTR_8", 12]
                ]
            }
        }"#;
        let hero = Hero::from_json(json).expect("pair form should parse");
        assert_eq!(hero.attribute(Attribute::Courage), 11);
        assert_eq!(hero.attribute(Attribute::Dexterity), 15);
        assert_eq!(hero.attribute(Attribute::Strength), 12);
        // a sheet without a biographical block reads as an empty one
        assert_eq!(hero.personal, Personal::default());
    }

    #[test]
    fn test_personal_block_is_carried() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        let personal = &hero.personal;
        assert_eq!(personal.family.as_deref(), Some("of Walsach"));
        assert_eq!(personal.place_of_birth.as_deref(), Some("Festum"));
        assert_eq!(personal.age.as_deref(), Some("27"));
        assert_eq!(personal.size.as_deref(), Some("172"));
        assert_eq!(personal.hair_color, Some(3));
        assert_eq!(personal.social_status, Some(2));
        assert_eq!(personal.title, None);
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let json = r#"{
            "id": "H_2",
            "name": "Sevenfold",
            "r": "R_1",
            "p": "P_25",
            "attr": {
                "values": [
                    { "id": "ATTR_1", "value": 11 }, { "id": "ATTR_2", "value": 12 },
                    { "id": "ATTR_3", "value": 13 }, { "id": "ATTR_4", "value": 14 },
                    { "id": "ATTR_5", "value": 15 }, { "id": "ATTR_6", "value": 14 },
                    { "id": "ATTR_7", "value": 13 }
                ]
            }
        }"#;
        assert!(Hero::from_json(json).is_err());
    }

    #[test]
    fn test_purse_accepts_strings_numbers_and_blanks() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        let purse = hero.belongings.purse;
        assert_eq!(purse.ducats, 18);
        assert_eq!(purse.silverthalers, 41);
        assert_eq!(purse.halers, 0);
        assert_eq!(purse.kreutzers, 0);

        for (coin, amount) in Coin::all().into_iter().zip([18, 41, 0, 0]) {
            assert_eq!(purse.get(coin), amount, "{coin}");
        }
        // the wire keys and the enum stay in lock-step
        let value = serde_json::to_value(purse).expect("purse should serialize");
        for coin in Coin::all() {
            assert!(value.get(coin.key()).is_some(), "{coin}");
        }

        let json = r#"{"d": 3, "s": "07", "k": null}"#;
        let purse: Purse = serde_json::from_str(json).expect("purse should parse");
        assert_eq!(purse.get(Coin::Ducat), 3);
        assert_eq!(purse.get(Coin::Silverthaler), 7);
        assert_eq!(purse.get(Coin::Haler), 0);
        assert_eq!(purse.get(Coin::Kreutzer), 0);
    }

    #[test]
    fn test_possessed_traits_skips_emptied_entries() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        let possessed: Vec<&str> = hero.possessed_traits().map(|(id, _)| id).collect();
        assert!(possessed.contains(&"ADV_14"));
        assert!(possessed.contains(&"SA_27"));
        assert!(!possessed.contains(&"DISADV_31"));
    }

    #[test]
    fn test_trait_instances_carry_selection_and_tier() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        let literacy = &hero.activatable["SA_27"];
        assert_eq!(literacy.len(), 2);
        assert_eq!(literacy[0].selection, Some(SelectionId::Index(9)));

        let custom = &hero.activatable["ADV_0"][0];
        assert_eq!(
            custom.selection,
            Some(SelectionId::Text("Knight of Walsach".to_string()))
        );
        assert_eq!(custom.selection.as_ref().map(|s| s.to_string()).as_deref(), Some("Knight of Walsach"));
    }

    #[test]
    fn test_locale_tag_normalizes() {
        let mut hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        assert_eq!(hero.locale_tag(), "de_de");

        hero.locale = Some("en-US".to_string());
        assert_eq!(hero.locale_tag(), "en_us");

        hero.locale = None;
        assert_eq!(hero.locale_tag(), "de_de");
    }

    #[test]
    fn test_modified_at_falls_back_to_creation() {
        let mut hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        assert_eq!(hero.modified_at(), Some("2023-07-02T09:12:03.551Z"));

        hero.date_modified = None;
        assert_eq!(hero.modified_at(), Some("2023-06-25T14:54:42.028Z"));

        hero.date_created = None;
        assert_eq!(hero.modified_at(), None);
    }

    #[test]
    fn test_canonical_form_round_trips() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        let json = serde_json::to_string_pretty(&hero).expect("hero should serialize");
        let again = Hero::from_json(&json).expect("canonical form should parse");
        assert_eq!(hero, again);
    }

    #[test]
    fn test_unlearned_lookups() {
        let hero = Hero::from_json(SAMPLE_EXPORT).expect("export should parse");
        assert_eq!(hero.skill_rating("TAL_59"), 0);
        assert_eq!(hero.spell_rating("SPELL_1"), None);
    }
}
