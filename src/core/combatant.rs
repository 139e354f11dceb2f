//! Combatant snapshots.
//!
//! A `Combatant` is a value: every update returns a new combatant and leaves
//! the original untouched. Clamping happens inside the update functions, so
//! `hp ∈ [0, max_hp]` and `block ≥ 0` hold for every value that can be
//! observed.
//!
//! Cloning is cheap: the token ledger and the sub-unit list are `im`
//! persistent structures.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::tokens::TokenLedger;

/// One independently damageable part of a multi-unit enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
}

impl EnemyUnit {
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i64) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// A player or enemy at one moment of the battle.
///
/// ## Example
///
/// ```
/// use ether_battle::core::Combatant;
///
/// let hero = Combatant::new(50).with_block(5);
/// let (hit, lost) = hero.lose_hp(80);
///
/// assert_eq!(lost, 50);
/// assert_eq!(hit.hp, 0);
/// assert_eq!(hero.hp, 50); // original untouched
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub hp: i64,
    pub max_hp: i64,

    /// Absorbs incoming damage before hp.
    pub block: i64,

    /// Added to every attack's damage.
    pub strength: i64,

    /// Damage-taken multiplier, never below 1.0.
    pub vuln_mult: f64,

    /// Retaliation damage dealt to an attacker that lands damage.
    pub counter: i64,

    /// Ether accumulated during the current turn.
    pub ether_pts: i64,

    pub tokens: TokenLedger,

    /// Sub-units of a multi-unit enemy. Empty for single-body combatants.
    pub units: Vector<EnemyUnit>,

    /// Index of the sub-unit that receives damage.
    pub target_unit: usize,
}

impl Combatant {
    /// Create a combatant at full health.
    #[must_use]
    pub fn new(max_hp: i64) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            strength: 0,
            vuln_mult: 1.0,
            counter: 0,
            ether_pts: 0,
            tokens: TokenLedger::new(),
            units: Vector::new(),
            target_unit: 0,
        }
    }

    /// Create a multi-unit enemy; hp and max hp are the sums of the units.
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = EnemyUnit>) -> Self {
        let units: Vector<EnemyUnit> = units.into_iter().collect();
        let max_hp = units.iter().map(|u| u.max_hp).sum();
        let mut combatant = Self::new(max_hp);
        combatant.hp = units.iter().map(|u| u.hp).sum();
        combatant.units = units;
        combatant
    }

    // === Record updates ===

    #[must_use]
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = hp.clamp(0, self.max_hp);
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i64) -> Self {
        self.block = block.max(0);
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: i64) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn with_vuln_mult(mut self, mult: f64) -> Self {
        self.vuln_mult = mult.max(1.0);
        self
    }

    #[must_use]
    pub fn with_counter(mut self, counter: i64) -> Self {
        self.counter = counter.max(0);
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: TokenLedger) -> Self {
        self.tokens = tokens;
        self
    }

    // === Numeric transitions ===

    /// Remove hp directly (block is not consulted).
    ///
    /// Returns the new combatant and the hp actually lost.
    #[must_use]
    pub fn lose_hp(&self, amount: i64) -> (Self, i64) {
        let amount = amount.max(0);
        let lost = amount.min(self.hp);
        let mut next = self.clone();
        next.hp -= lost;
        (next, lost)
    }

    /// Restore hp up to `max_hp`. Returns the new combatant and hp restored.
    #[must_use]
    pub fn heal(&self, amount: i64) -> (Self, i64) {
        let amount = amount.max(0);
        let healed = amount.min(self.max_hp - self.hp).max(0);
        let mut next = self.clone();
        next.hp += healed;
        (next, healed)
    }

    #[must_use]
    pub fn gain_block(&self, amount: i64) -> Self {
        let mut next = self.clone();
        next.block = (next.block + amount).max(0);
        next
    }

    #[must_use]
    pub fn gain_strength(&self, amount: i64) -> Self {
        let mut next = self.clone();
        next.strength += amount;
        next
    }

    /// Add ether; negative amounts are ignored so turn ether never drops.
    #[must_use]
    pub fn gain_ether(&self, amount: i64) -> Self {
        let mut next = self.clone();
        next.ether_pts += amount.max(0);
        next
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    // === Multi-unit enemies ===

    #[must_use]
    pub fn has_units(&self) -> bool {
        !self.units.is_empty()
    }

    /// Index of the unit that receives damage: the selected unit if alive,
    /// otherwise the first live unit.
    #[must_use]
    pub fn targeted_unit(&self) -> Option<usize> {
        match self.units.get(self.target_unit) {
            Some(unit) if unit.is_alive() => Some(self.target_unit),
            _ => self.units.iter().position(EnemyUnit::is_alive),
        }
    }

    /// Select the unit that receives damage. Out-of-range indices are ignored.
    #[must_use]
    pub fn with_target_unit(mut self, index: usize) -> Self {
        if index < self.units.len() {
            self.target_unit = index;
        }
        self
    }

    /// Apply `damage` to the targeted unit and recompute aggregate hp.
    ///
    /// Returns the new combatant and the index of a unit that died, if any.
    /// Overflow beyond the targeted unit's hp is lost.
    #[must_use]
    pub fn damage_unit(&self, damage: i64) -> (Self, Option<usize>) {
        let Some(index) = self.targeted_unit() else {
            return (self.clone(), None);
        };
        let mut next = self.clone();
        let mut died = None;
        if let Some(unit) = next.units.get_mut(index) {
            unit.hp = (unit.hp - damage.max(0)).max(0);
            if !unit.is_alive() {
                died = Some(index);
            }
        }
        next.hp = next.units.iter().map(|u| u.hp).sum::<i64>().clamp(0, next.max_hp);
        (next, died)
    }
}
