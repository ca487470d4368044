//! Secondary attribute derivation.
//!
//! The sheet stores only the eight core attributes; everything a play
//! session displays as a maximum is derived here from race base values,
//! the profession classification, permanent loss counters, and the luck
//! traits.

use crate::compendium::{Compendium, EnergyRule, LookupError, Profession, ProfessionGroup, TraitKind};
use crate::hero::{AttributeValues, Hero, PermanentEnergy};
use serde::{Deserialize, Serialize};

/// Base fate points before luck and bad luck shift them.
const BASE_FATE_POINTS: i32 = 3;

/// The derived maximums of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAttributes {
    pub life_points: i32,
    pub arcane_energy: i32,
    pub karma_points: i32,
    pub spirit: i32,
    pub toughness: i32,
    pub dodge: i32,
    pub initiative: i32,
    pub movement: i32,
    pub wound_threshold: i32,
    pub fate_points: i32,
}

/// Derive the secondary attributes of a hero against a compendium.
///
/// Fails when the sheet references a race, profession, or trait the
/// compendium has no row for.
pub fn derive(hero: &Hero, compendium: &Compendium) -> Result<DerivedAttributes, LookupError> {
    let race = compendium
        .race(&hero.race_id)
        .ok_or_else(|| LookupError::UnknownRace(hero.race_id.clone()))?;
    let profession = compendium
        .profession(&hero.profession_id)
        .ok_or_else(|| LookupError::UnknownProfession(hero.profession_id.clone()))?;

    let block = &hero.attributes;
    let values = &block.values;

    let life_points =
        (race.life_points + 2 * values.constitution - block.permanent_lp.lost).max(0);

    let arcane_energy = energy_maximum(
        Some(&compendium.arcane_rule),
        ProfessionGroup::Arcane,
        profession,
        values,
        block.ae,
        &block.permanent_ae,
    );
    let karma_points = energy_maximum(
        compendium.karma_rule.as_ref(),
        ProfessionGroup::Blessed,
        profession,
        values,
        block.kp,
        &block.permanent_kp,
    );

    let (luck, bad_luck) = luck_tiers(hero, compendium)?;

    Ok(DerivedAttributes {
        life_points,
        arcane_energy,
        karma_points,
        spirit: race.spirit + (values.courage + values.sagacity + values.intuition) / 6,
        toughness: race.toughness + (2 * values.constitution + values.strength) / 6,
        dodge: values.agility / 2,
        initiative: (values.courage + values.agility) / 2,
        movement: race.movement,
        wound_threshold: values.constitution / 2,
        fate_points: (BASE_FATE_POINTS + luck - bad_luck).max(0),
    })
}

/// Maximum of one energy. Zero for heroes outside the classification the
/// rule applies to, and zero when no rule is loaded at all.
fn energy_maximum(
    rule: Option<&EnergyRule>,
    applies_to: ProfessionGroup,
    profession: &Profession,
    values: &AttributeValues,
    bought: i32,
    permanent: &PermanentEnergy,
) -> i32 {
    let rule = match rule {
        Some(rule) => rule,
        None => return 0,
    };
    if profession.group != applies_to {
        return 0;
    }

    let mut maximum = rule.base;
    if let Some(&leading) = rule.leading.get(&profession.subgroup) {
        maximum += values.get(leading);
    }
    (maximum + bought - permanent.lost + permanent.redeemed).max(0)
}

/// Highest possessed tier of the luck and bad luck traits. An instance
/// without an explicit tier counts as tier 1.
fn luck_tiers(hero: &Hero, compendium: &Compendium) -> Result<(i32, i32), LookupError> {
    let mut luck = 0;
    let mut bad_luck = 0;

    for (id, instances) in hero.possessed_traits() {
        let def = compendium
            .trait_def(id)
            .ok_or_else(|| LookupError::UnknownTrait(id.to_string()))?;
        let tier = instances
            .iter()
            .map(|instance| instance.tier.unwrap_or(1))
            .max()
            .unwrap_or(1);
        match def.kind {
            TraitKind::Luck => luck = luck.max(tier),
            TraitKind::BadLuck => bad_luck = bad_luck.max(tier),
            TraitKind::Other => {}
        }
    }

    Ok((luck, bad_luck))
}

// ============================================================================
// Tests
// ============================================================================
