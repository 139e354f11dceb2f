//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the player and the enemy.
//!
//! ## Sides
//!
//! Per-side data storage indexed by `Side`, so code that treats both
//! combatants symmetrically never branches on which one it is holding.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two participants of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled combatant.
    Player,
    /// The scripted opponent.
    Enemy,
}

impl Side {
    /// The other side.
    ///
    /// ```
    /// use ether_battle::core::Side;
    ///
    /// assert_eq!(Side::Player.opponent(), Side::Enemy);
    /// assert_eq!(Side::Enemy.opponent(), Side::Player);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Both sides, player first.
    pub fn both() -> impl Iterator<Item = Side> {
        [Side::Player, Side::Enemy].into_iter()
    }

    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Side::Player)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use ether_battle::core::{Side, Sides};
///
/// let mut ether: Sides<i64> = Sides::with_value(0);
/// ether[Side::Enemy] += 4;
///
/// assert_eq!(ether[Side::Player], 0);
/// assert_eq!(ether[Side::Enemy], 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sides<T> {
    pub player: T,
    pub enemy: T,
}

impl<T> Sides<T> {
    /// Create from explicit values.
    pub fn new(player: T, enemy: T) -> Self {
        Self { player, enemy }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player: value.clone(),
            enemy: value,
        }
    }

    /// Get a reference to one side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Get a mutable reference to one side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Iterate over (Side, &T) pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Enemy, &self.enemy)].into_iter()
    }

    /// Apply a function to both entries.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> Sides<U> {
        Sides {
            player: f(Side::Player, self.player),
            enemy: f(Side::Enemy, self.enemy),
        }
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
