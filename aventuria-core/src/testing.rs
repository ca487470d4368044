//! Ready-made fixtures: a small compendium and two sample heroes.
//!
//! The data set here is a thin slice of the real tables, just enough to
//! exercise every rule in the crate. Tests lean on it throughout, and it
//! doubles as a starting point for wiring the crate up without a full
//! data import.

use crate::compendium::{
    CantripDef, Compendium, Profession, ProfessionGroup, RaceBaseValues, SkillDef, SpellDef,
    TraitDef, TraitKind,
};
use crate::hero::{
    ApInfo, Attribute, AttributeBlock, AttributeValues, BelongingItem, Belongings, Hero,
    PermanentEnergy, Personal, Purse, SelectionId, TraitInstance,
};
use std::collections::{BTreeMap, HashMap};

/// A raw Optolith export, as the app writes it: attribute entries keyed
/// by id, purse amounts as strings with blanks for untouched coins.
pub const SAMPLE_EXPORT: &str = r#"{
    "id": "H_1687704882028",
    "name": "Robak",
    "dateCreated": "2023-06-25T14:54:42.028Z",
    "dateModified": "2023-07-02T09:12:03.551Z",
    "locale": "de-DE",
    "ap": { "total": 1100 },
    "el": "EL_3",
    "r": "R_1",
    "c": "C_17",
    "p": "P_127",
    "sex": "m",
    "pers": {
        "family": "of Walsach",
        "placeofbirth": "Festum",
        "dateofbirth": "3. Boron 992 BF",
        "age": "27",
        "haircolor": 3,
        "eyecolor": 2,
        "size": "172",
        "weight": "68",
        "socialstatus": 2
    },
    "attr": {
        "values": [
            { "id": "ATTR_1", "value": 13 },
            { "id": "ATTR_2", "value": 15 },
            { "id": "ATTR_3", "value": 14 },
            { "id": "ATTR_4", "value": 14 },
            { "id": "ATTR_5", "value": 12 },
            { "id": "ATTR_6", "value": 12 },
            { "id": "ATTR_7", "value": 12 },
            { "id": "ATTR_8", "value": 10 }
        ],
        "ae": 1,
        "kp": 0,
        "lp": 0,
        "permanentAE": { "lost": 2, "redeemed": 1 },
        "permanentKP": { "lost": 0, "redeemed": 0 },
        "permanentLP": { "lost": 0 },
        "attributeAdjustmentSelected": "ATTR_2"
    },
    "activatable": {
        "ADV_14": [ { "tier": 1 } ],
        "ADV_0": [ { "sid": "Knight of Walsach" } ],
        "DISADV_31": [],
        "SA_27": [ { "sid": 9 }, { "sid": 14 } ],
        "SA_29": [ { "sid": 9, "tier": 3 } ]
    },
    "talents": { "TAL_10": 7, "TAL_20": 8, "TAL_36": 8 },
    "ct": { "CT_3": 8 },
    "spells": { "SPELL_29": 12, "SPELL_36": 3 },
    "cantrips": [ "CANTRIP_30" ],
    "liturgies": {},
    "blessings": [],
    "belongings": {
        "items": {
            "ITEM_1": {
                "id": "ITEM_1",
                "name": "Sword",
                "gr": 1,
                "amount": 1,
                "weight": 2,
                "price": 160,
                "where": "belt",
                "combatTechnique": "CT_12",
                "reach": 2,
                "length": 95,
                "at": 0,
                "pa": 0
            }
        },
        "purse": { "d": "18", "s": "41", "h": "", "k": "" }
    }
}"#;

/// A compendium slice with German short names, covering everything the
/// sample heroes reference.
pub fn sample_compendium() -> Compendium {
    let mut compendium = Compendium::new("de_de");

    compendium.races = HashMap::from([
        (
            "R_1".to_string(),
            RaceBaseValues {
                life_points: 5,
                spirit: -5,
                toughness: -5,
                movement: 8,
            },
        ),
        (
            "R_2".to_string(),
            RaceBaseValues {
                life_points: 2,
                spirit: -4,
                toughness: -6,
                movement: 8,
            },
        ),
        (
            "R_4".to_string(),
            RaceBaseValues {
                life_points: 8,
                spirit: -4,
                toughness: -4,
                movement: 6,
            },
        ),
    ]);

    compendium.professions = HashMap::from([
        (
            "P_25".to_string(),
            Profession {
                group: ProfessionGroup::Mundane,
                subgroup: 3,
            },
        ),
        (
            "P_79".to_string(),
            Profession {
                group: ProfessionGroup::Arcane,
                subgroup: 2,
            },
        ),
        (
            "P_127".to_string(),
            Profession {
                group: ProfessionGroup::Arcane,
                subgroup: 1,
            },
        ),
        (
            "P_228".to_string(),
            Profession {
                group: ProfessionGroup::Blessed,
                subgroup: 1,
            },
        ),
    ]);

    compendium.skills = HashMap::from([
        (
            "TAL_10".to_string(),
            SkillDef {
                name: "Orienteering".to_string(),
                check: [Attribute::Sagacity, Attribute::Intuition, Attribute::Intuition],
                group: 3,
                group_name: "Nature".to_string(),
            },
        ),
        (
            "TAL_20".to_string(),
            SkillDef {
                name: "Perception".to_string(),
                check: [Attribute::Sagacity, Attribute::Intuition, Attribute::Intuition],
                group: 1,
                group_name: "Physical".to_string(),
            },
        ),
        (
            "TAL_36".to_string(),
            SkillDef {
                name: "Astronomy".to_string(),
                check: [Attribute::Sagacity, Attribute::Sagacity, Attribute::Intuition],
                group: 4,
                group_name: "Lore".to_string(),
            },
        ),
        (
            "TAL_56".to_string(),
            SkillDef {
                name: "Treat Wounds".to_string(),
                check: [Attribute::Sagacity, Attribute::Dexterity, Attribute::Dexterity],
                group: 5,
                group_name: "Craft".to_string(),
            },
        ),
    ]);

    compendium.spells = HashMap::from([
        (
            "SPELL_1".to_string(),
            SpellDef {
                name: "Armatrutz".to_string(),
                check: [Attribute::Sagacity, Attribute::Intuition, Attribute::Dexterity],
                casting_time: "1 action".to_string(),
                ae_cost: "4 AE".to_string(),
                range: "self".to_string(),
                duration: "5 minutes".to_string(),
                effect: "Armor out of thin air.".to_string(),
            },
        ),
        (
            "SPELL_29".to_string(),
            SpellDef {
                name: "Ignifaxius".to_string(),
                check: [
                    Attribute::Sagacity,
                    Attribute::Intuition,
                    Attribute::Constitution,
                ],
                casting_time: "2 actions".to_string(),
                ae_cost: "8 AE".to_string(),
                range: "8 yards".to_string(),
                duration: "immediate".to_string(),
                effect: "A searing ray of fire.".to_string(),
            },
        ),
        (
            "SPELL_36".to_string(),
            SpellDef {
                name: "Odem Arcanum".to_string(),
                check: [Attribute::Sagacity, Attribute::Intuition, Attribute::Intuition],
                casting_time: "2 actions".to_string(),
                ae_cost: "4 AE".to_string(),
                range: "16 yards".to_string(),
                duration: "immediate".to_string(),
                effect: "Reveals nearby magic.".to_string(),
            },
        ),
    ]);

    compendium.cantrips = HashMap::from([(
        "CANTRIP_30".to_string(),
        CantripDef {
            name: "Firefinger".to_string(),
            range: "touch".to_string(),
            duration: "brief".to_string(),
            effect: "Lights a candle or a campfire.".to_string(),
        },
    )]);

    compendium.traits = HashMap::from([
        (
            "ADV_0".to_string(),
            TraitDef {
                name: "Custom Advantage".to_string(),
                rules: String::new(),
                kind: TraitKind::Other,
                group: Some(1),
            },
        ),
        (
            "ADV_14".to_string(),
            TraitDef {
                name: "Luck".to_string(),
                rules: "Additional fate points, one per level.".to_string(),
                kind: TraitKind::Luck,
                group: Some(1),
            },
        ),
        (
            "DISADV_0".to_string(),
            TraitDef {
                name: "Custom Disadvantage".to_string(),
                rules: String::new(),
                kind: TraitKind::Other,
                group: Some(1),
            },
        ),
        (
            "DISADV_31".to_string(),
            TraitDef {
                name: "Bad Luck".to_string(),
                rules: "Fewer fate points, one per level.".to_string(),
                kind: TraitKind::BadLuck,
                group: Some(1),
            },
        ),
        (
            "DISADV_50".to_string(),
            TraitDef {
                name: "Principles".to_string(),
                rules: "The hero follows a strict code.".to_string(),
                kind: TraitKind::Other,
                group: Some(1),
            },
        ),
        (
            "SA_27".to_string(),
            TraitDef {
                name: "Literacy".to_string(),
                rules: "The hero reads and writes one script.".to_string(),
                kind: TraitKind::Other,
                group: Some(2),
            },
        ),
        (
            "SA_29".to_string(),
            TraitDef {
                name: "Language".to_string(),
                rules: "The hero speaks one language.".to_string(),
                kind: TraitKind::Other,
                group: Some(2),
            },
        ),
    ]);

    compendium.attribute_names = HashMap::from([
        (Attribute::Courage, "MU".to_string()),
        (Attribute::Sagacity, "KL".to_string()),
        (Attribute::Intuition, "IN".to_string()),
        (Attribute::Charisma, "CH".to_string()),
        (Attribute::Dexterity, "FF".to_string()),
        (Attribute::Agility, "GE".to_string()),
        (Attribute::Constitution, "KO".to_string()),
        (Attribute::Strength, "KK".to_string()),
    ]);

    compendium.equipment_groups = HashMap::from([
        (1, "Melee Weapons".to_string()),
        (2, "Ranged Weapons".to_string()),
        (3, "Ammunition".to_string()),
        (4, "Armor".to_string()),
        (5, "Weapon Accessories".to_string()),
        (6, "Clothes".to_string()),
        (7, "Travel Gear and Tools".to_string()),
        (8, "Lighting".to_string()),
    ]);

    compendium
}

/// The arcane sample hero: a human mage with a luck advantage, two
/// spells, and a handful of skills. Mirrors [`SAMPLE_EXPORT`].
pub fn sample_mage() -> Hero {
    let mut activatable = BTreeMap::new();
    activatable.insert(
        "ADV_14".to_string(),
        vec![TraitInstance {
            selection: None,
            tier: Some(1),
        }],
    );
    activatable.insert(
        "ADV_0".to_string(),
        vec![TraitInstance {
            selection: Some(SelectionId::Text("Knight of Walsach".to_string())),
            tier: None,
        }],
    );
    activatable.insert("DISADV_31".to_string(), Vec::new());
    activatable.insert(
        "SA_27".to_string(),
        vec![
            TraitInstance {
                selection: Some(SelectionId::Index(9)),
                tier: None,
            },
            TraitInstance {
                selection: Some(SelectionId::Index(14)),
                tier: None,
            },
        ],
    );
    activatable.insert(
        "SA_29".to_string(),
        vec![TraitInstance {
            selection: Some(SelectionId::Index(9)),
            tier: Some(3),
        }],
    );

    Hero {
        id: "H_1687704882028".to_string(),
        name: "Robak".to_string(),
        avatar: None,
        date_created: Some("2023-06-25T14:54:42.028Z".to_string()),
        date_modified: Some("2023-07-02T09:12:03.551Z".to_string()),
        locale: Some("de-DE".to_string()),
        ap: ApInfo { total: 1100 },
        experience_level: Some("EL_3".to_string()),
        race_id: "R_1".to_string(),
        race_variant_id: None,
        culture_id: Some("C_17".to_string()),
        profession_id: "P_127".to_string(),
        sex: Some("m".to_string()),
        personal: Personal {
            family: Some("of Walsach".to_string()),
            place_of_birth: Some("Festum".to_string()),
            date_of_birth: Some("3. Boron 992 BF".to_string()),
            age: Some("27".to_string()),
            hair_color: Some(3),
            eye_color: Some(2),
            size: Some("172".to_string()),
            weight: Some("68".to_string()),
            title: None,
            social_status: Some(2),
            characteristics: None,
            other_info: None,
        },
        attributes: AttributeBlock {
            values: AttributeValues::new(13, 15, 14, 14, 12, 12, 12, 10),
            ae: 1,
            kp: 0,
            lp: 0,
            permanent_lp: Default::default(),
            permanent_ae: PermanentEnergy {
                lost: 2,
                redeemed: 1,
            },
            permanent_kp: Default::default(),
            adjustment_selected: Some("ATTR_2".to_string()),
        },
        activatable,
        skills: HashMap::from([
            ("TAL_10".to_string(), 7),
            ("TAL_20".to_string(), 8),
            ("TAL_36".to_string(), 8),
        ]),
        combat_techniques: HashMap::from([("CT_3".to_string(), 8)]),
        spells: HashMap::from([("SPELL_29".to_string(), 12), ("SPELL_36".to_string(), 3)]),
        cantrips: vec!["CANTRIP_30".to_string()],
        liturgies: HashMap::new(),
        blessings: Vec::new(),
        belongings: Belongings {
            items: HashMap::from([(
                "ITEM_1".to_string(),
                BelongingItem {
                    id: "ITEM_1".to_string(),
                    name: "Sword".to_string(),
                    group: 1,
                    amount: 1,
                    weight: Some(2.0),
                    price: Some(160.0),
                    location: Some("belt".to_string()),
                    combat_technique: Some("CT_12".to_string()),
                    reach: Some(2),
                    length: Some(95.0),
                    at: Some(0),
                    pa: Some(0),
                    template: None,
                },
            )]),
            purse: Purse {
                ducats: 18,
                silverthalers: 41,
                halers: 0,
                kreutzers: 0,
            },
        },
    }
}

/// The mundane sample hero: a human soldier with no arcane or karmic
/// side at all.
pub fn sample_hero() -> Hero {
    Hero {
        id: "H_1651234567890".to_string(),
        name: "Alrik".to_string(),
        avatar: None,
        date_created: Some("2022-04-29T12:00:00.000Z".to_string()),
        date_modified: None,
        locale: Some("de-DE".to_string()),
        ap: ApInfo { total: 1050 },
        experience_level: Some("EL_3".to_string()),
        race_id: "R_1".to_string(),
        race_variant_id: None,
        culture_id: Some("C_8".to_string()),
        profession_id: "P_25".to_string(),
        sex: Some("m".to_string()),
        personal: Personal::default(),
        attributes: AttributeBlock {
            values: AttributeValues::new(12, 11, 13, 10, 11, 13, 14, 15),
            ..Default::default()
        },
        activatable: BTreeMap::new(),
        skills: HashMap::from([("TAL_10".to_string(), 4), ("TAL_20".to_string(), 5)]),
        combat_techniques: HashMap::from([("CT_12".to_string(), 12)]),
        spells: HashMap::new(),
        cantrips: Vec::new(),
        liturgies: HashMap::new(),
        blessings: Vec::new(),
        belongings: Belongings::default(),
    }
}
