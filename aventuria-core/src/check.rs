//! Three-attribute checks with the d20 pool.
//!
//! A check rolls one d20 against each of three attribute values. Every die
//! that lands over its attribute eats the shortfall out of the ability
//! rating; whatever survives grades into a quality level from 1 to 6.
//! Rolling two or more 1s or 20s is a critical either way.

use crate::hero::Attribute;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of ability a check rolls against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    #[serde(rename = "TALENT")]
    Skill,
    #[serde(rename = "SPELL")]
    Spell,
    #[serde(rename = "CANTRIP")]
    Cantrip,
}

impl AbilityKind {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::Skill => "Skill",
            AbilityKind::Spell => "Spell",
            AbilityKind::Cantrip => "Cantrip",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An attribute a check rolls against: the resolved id, the short display
/// name, and the hero's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRef {
    pub attribute: Attribute,
    pub name: String,
    pub value: i32,
}

impl CheckRef {
    pub fn new(attribute: Attribute, name: impl Into<String>, value: i32) -> Self {
        Self {
            attribute,
            name: name.into(),
            value,
        }
    }
}

/// One attribute slot of a rolled check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAttribute {
    pub attribute: Attribute,
    pub name: String,
    pub value: i32,
    pub die: i32,
    /// Points the die ate out of the rating, never negative.
    pub shortfall: i32,
}

/// How a rolled check came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    CriticalSuccess,
    CriticalFumble,
    Failure,
    Quality(i32),
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::CriticalSuccess => write!(f, "Critical success!"),
            CheckOutcome::CriticalFumble => write!(f, "Critical fumble!"),
            CheckOutcome::Failure => write!(f, "Failed"),
            CheckOutcome::Quality(level) => write!(f, "QL {level}"),
        }
    }
}

/// A rolled three-attribute check.
///
/// The dice are fixed once rolled; [`AbilityCheck::modify_difficulty`]
/// regrades the same dice under a new difficulty, the way a table argues
/// a modifier after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCheck {
    pub ability_id: String,
    pub ability_name: String,
    pub kind: AbilityKind,
    /// Skill or spell rating the shortfalls spend from.
    pub rating: i32,
    pub attributes: [CheckAttribute; 3],
    /// Positive makes the check harder, negative easier.
    pub difficulty: i32,
    /// Rating left after all shortfalls.
    pub total: i32,
    /// Quality level 1 to 6, or -1 for a failed check.
    pub quality: i32,
}

impl AbilityCheck {
    /// Roll a fresh check with three d20.
    pub fn roll<R: Rng>(
        ability_id: impl Into<String>,
        ability_name: impl Into<String>,
        kind: AbilityKind,
        rating: i32,
        refs: [CheckRef; 3],
        rng: &mut R,
    ) -> Self {
        let dice = [
            rng.gen_range(1..=20),
            rng.gen_range(1..=20),
            rng.gen_range(1..=20),
        ];
        Self::with_dice(ability_id, ability_name, kind, rating, refs, dice)
    }

    /// Build a check over already-thrown dice.
    pub fn with_dice(
        ability_id: impl Into<String>,
        ability_name: impl Into<String>,
        kind: AbilityKind,
        rating: i32,
        refs: [CheckRef; 3],
        dice: [i32; 3],
    ) -> Self {
        let [first, second, third] = refs;
        let slot = |r: CheckRef, die: i32| CheckAttribute {
            attribute: r.attribute,
            name: r.name,
            value: r.value,
            die,
            shortfall: 0,
        };

        let mut check = Self {
            ability_id: ability_id.into(),
            ability_name: ability_name.into(),
            kind,
            rating,
            attributes: [slot(first, dice[0]), slot(second, dice[1]), slot(third, dice[2])],
            difficulty: 0,
            total: 0,
            quality: 0,
        };
        check.recompute();
        check
    }

    /// Regrade the fixed dice under the current difficulty.
    pub fn recompute(&mut self) {
        for slot in &mut self.attributes {
            slot.shortfall = (slot.die - slot.value + self.difficulty).max(0);
        }
        let spent: i32 = self.attributes.iter().map(|slot| slot.shortfall).sum();
        self.total = self.rating - spent;
        self.quality = if self.total < 0 {
            -1
        } else {
            // ceiling thirds; scraping by with zero left still grades QL 1
            ((self.total + 2) / 3).max(1).min(6)
        };
    }

    /// Shift the difficulty and regrade the same dice.
    pub fn modify_difficulty(&mut self, delta: i32) {
        self.difficulty += delta;
        self.recompute();
    }

    /// Two or more natural 1s.
    pub fn is_critical_success(&self) -> bool {
        self.attributes.iter().filter(|slot| slot.die == 1).count() >= 2
    }

    /// Two or more natural 20s.
    pub fn is_critical_fumble(&self) -> bool {
        self.attributes.iter().filter(|slot| slot.die == 20).count() >= 2
    }

    /// Whether the check made it at all.
    pub fn succeeded(&self) -> bool {
        self.quality > 0
    }

    /// The graded outcome. Criticals ride on the natural dice and ignore
    /// the quality number.
    pub fn outcome(&self) -> CheckOutcome {
        if self.is_critical_fumble() {
            CheckOutcome::CriticalFumble
        } else if self.is_critical_success() {
            CheckOutcome::CriticalSuccess
        } else if self.quality < 0 {
            CheckOutcome::Failure
        } else {
            CheckOutcome::Quality(self.quality)
        }
    }

    /// The three dice as `[a, b, c]`.
    pub fn dice_display(&self) -> String {
        format!(
            "[{}, {}, {}]",
            self.attributes[0].die, self.attributes[1].die, self.attributes[2].die
        )
    }
}

impl fmt::Display for AbilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ability_name, self.dice_display())?;
        if self.difficulty != 0 {
            write!(f, " at {:+}", self.difficulty)?;
        }
        write!(f, " = {}", self.outcome())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn astronomy_refs() -> [CheckRef; 3] {
        [
            CheckRef::new(Attribute::Courage, "MU", 13),
            CheckRef::new(Attribute::Intuition, "IN", 14),
            CheckRef::new(Attribute::Constitution, "KO", 13),
        ]
    }

    fn astronomy(dice: [i32; 3]) -> AbilityCheck {
        AbilityCheck::with_dice(
            "TAL_36",
            "Astronomy",
            AbilityKind::Skill,
            8,
            astronomy_refs(),
            dice,
        )
    }

    #[test]
    fn test_shortfalls_spend_the_rating() {
        let check = astronomy([14, 9, 6]);
        assert_eq!(
            check.attributes.iter().map(|s| s.shortfall).collect::<Vec<_>>(),
            vec![1, 0, 0]
        );
        assert_eq!(check.total, 7);
        assert_eq!(check.quality, 3);
        assert_eq!(check.outcome(), CheckOutcome::Quality(3));
        assert!(check.succeeded());
    }

    #[test]
    fn test_difficulty_regrades_the_same_dice() {
        let mut check = astronomy([14, 9, 6]);
        check.modify_difficulty(3);
        assert_eq!(
            check.attributes.iter().map(|s| s.shortfall).collect::<Vec<_>>(),
            vec![4, 0, 0]
        );
        assert_eq!(check.total, 4);
        assert_eq!(check.quality, 2);

        // stepping back down restores the original grade
        check.modify_difficulty(-3);
        assert_eq!(check.total, 7);
        assert_eq!(check.quality, 3);
    }

    #[test]
    fn test_negative_difficulty_never_refunds_points() {
        let mut check = astronomy([5, 5, 5]);
        check.modify_difficulty(-10);
        // every die already under its attribute; easing cannot push a
        // shortfall below zero
        assert_eq!(check.total, 8);
        assert_eq!(check.quality, 3);
    }

    #[test]
    fn test_zero_left_still_grades_one() {
        let check = astronomy([20, 10, 10]);
        // die 20 against 13 spends 7, leaving 1
        assert_eq!(check.total, 1);
        assert_eq!(check.quality, 1);

        let check = astronomy([20, 15, 10]);
        // shortfalls 7 and 1 spend the whole rating
        assert_eq!(check.total, 0);
        assert_eq!(check.quality, 1);
        assert!(check.succeeded());
    }

    #[test]
    fn test_overspending_fails() {
        let check = astronomy([20, 16, 10]);
        assert_eq!(check.total, -1);
        assert_eq!(check.quality, -1);
        assert_eq!(check.outcome(), CheckOutcome::Failure);
        assert!(!check.succeeded());
    }

    #[test]
    fn test_quality_caps_at_six() {
        let check = AbilityCheck::with_dice(
            "TAL_36",
            "Astronomy",
            AbilityKind::Skill,
            20,
            astronomy_refs(),
            [2, 3, 4],
        );
        assert_eq!(check.total, 20);
        assert_eq!(check.quality, 6);
    }

    #[test]
    fn test_quality_thirds() {
        for (rating, expected) in [(1, 1), (3, 1), (4, 2), (6, 2), (7, 3), (18, 6)] {
            let check = AbilityCheck::with_dice(
                "TAL_36",
                "Astronomy",
                AbilityKind::Skill,
                rating,
                astronomy_refs(),
                [2, 3, 4],
            );
            assert_eq!(check.quality, expected, "rating {rating}");
        }
    }

    #[test]
    fn test_double_ones_are_a_critical_success() {
        let check = astronomy([1, 1, 19]);
        assert!(check.is_critical_success());
        assert!(!check.is_critical_fumble());
        assert_eq!(check.outcome(), CheckOutcome::CriticalSuccess);
    }

    #[test]
    fn test_double_twenties_are_a_critical_fumble() {
        let check = astronomy([20, 20, 3]);
        assert!(check.is_critical_fumble());
        assert_eq!(check.outcome(), CheckOutcome::CriticalFumble);

        // the quality number itself is untouched by the critical
        assert_eq!(check.total, 8 - 7 - 6);
        assert_eq!(check.quality, -1);
    }

    #[test]
    fn test_single_extremes_are_not_critical() {
        let check = astronomy([1, 20, 10]);
        assert!(!check.is_critical_success());
        assert!(!check.is_critical_fumble());
    }

    #[test]
    fn test_rolled_dice_stay_on_the_d20() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..200 {
            let check = AbilityCheck::roll(
                "TAL_36",
                "Astronomy",
                AbilityKind::Skill,
                8,
                astronomy_refs(),
                &mut rng,
            );
            for slot in &check.attributes {
                assert!((1..=20).contains(&slot.die));
            }
            assert!(check.quality >= -1 && check.quality <= 6);
            assert_ne!(check.quality, 0);
        }
    }

    #[test]
    fn test_display() {
        let mut check = astronomy([14, 9, 6]);
        assert_eq!(check.to_string(), "Astronomy [14, 9, 6] = QL 3");

        check.modify_difficulty(3);
        assert_eq!(check.to_string(), "Astronomy [14, 9, 6] at +3 = QL 2");
    }
}
