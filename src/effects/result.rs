//! Additive effect results.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Numeric deltas produced by ability handlers.
///
/// Every field is additive, so results from independent handlers combine by
/// field-wise summation and the order they ran in does not matter.
///
/// ```
/// use ether_battle::effects::EffectResult;
///
/// let a = EffectResult { ether_gain: 3, ..EffectResult::default() };
/// let b = EffectResult { ether_gain: 3, heal: 2, ..EffectResult::default() };
///
/// let total = a + b;
/// assert_eq!(total.ether_gain, 6);
/// assert_eq!(total.heal, 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectResult {
    pub block_bonus: i64,
    pub heal: i64,
    pub strength: i64,
    pub ether_gain: i64,
    pub damage_bonus: i64,
    pub damage_reduction: i64,
    pub discount: i64,
    pub gold_gain: i64,
}

impl EffectResult {
    #[must_use]
    pub fn ether(amount: i64) -> Self {
        Self { ether_gain: amount, ..Self::default() }
    }

    #[must_use]
    pub fn block(amount: i64) -> Self {
        Self { block_bonus: amount, ..Self::default() }
    }

    #[must_use]
    pub fn heal(amount: i64) -> Self {
        Self { heal: amount, ..Self::default() }
    }

    #[must_use]
    pub fn damage_bonus(amount: i64) -> Self {
        Self { damage_bonus: amount, ..Self::default() }
    }

    #[must_use]
    pub fn damage_reduction(amount: i64) -> Self {
        Self { damage_reduction: amount, ..Self::default() }
    }

    #[must_use]
    pub fn gold(amount: i64) -> Self {
        Self { gold_gain: amount, ..Self::default() }
    }

    /// Every field multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: i64) -> Self {
        Self {
            block_bonus: self.block_bonus * factor,
            heal: self.heal * factor,
            strength: self.strength * factor,
            ether_gain: self.ether_gain * factor,
            damage_bonus: self.damage_bonus * factor,
            damage_reduction: self.damage_reduction * factor,
            discount: self.discount * factor,
            gold_gain: self.gold_gain * factor,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for EffectResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            block_bonus: self.block_bonus + rhs.block_bonus,
            heal: self.heal + rhs.heal,
            strength: self.strength + rhs.strength,
            ether_gain: self.ether_gain + rhs.ether_gain,
            damage_bonus: self.damage_bonus + rhs.damage_bonus,
            damage_reduction: self.damage_reduction + rhs.damage_reduction,
            discount: self.discount + rhs.discount,
            gold_gain: self.gold_gain + rhs.gold_gain,
        }
    }
}

impl AddAssign for EffectResult {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for EffectResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
