//! Token kinds and their static properties.
//!
//! Every token kind is a `TokenId` variant. Its lifecycle category,
//! polarity and effect descriptor are fixed properties of the kind, so the
//! compiler checks that every consumer handles every kind.

use serde::{Deserialize, Serialize};

/// Lifecycle category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Consumed by the interaction that references it.
    Usage,
    /// Loses one stack per turn boundary; removed at 0.
    Turn,
    /// Persists until explicitly removed.
    Permanent,
}

/// Whether a token helps or hurts its holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Buff,
    Debuff,
}

/// Combatant stat owned by a token; reset to baseline when the token expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundStat {
    Strength,
    VulnMult,
}

/// What a token does. Consumers match on this, not on the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenEffect {
    /// Owns a combatant stat for its duration.
    Stat(BoundStat),
    /// Outgoing damage scaled down.
    Weaken,
    /// Flat outgoing damage bonus per stack.
    Sharpen,
    /// Next attack deals double damage.
    Overdrive,
    /// Next attack is critical.
    Focus,
    /// Chance to evade the next incoming attack.
    Dodge,
    /// Damage back to the attacker after a successful dodge.
    EvadeCounter,
    /// Fraction of hp damage taken sent back to the attacker.
    Reflect,
    /// Fixed damage back to the attacker after taking damage.
    CounterShot,
    /// Block and timeline push when attacked.
    Guard,
    /// Damage to the holder after every action.
    Burn,
}

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenId {
    Strength,
    Vulnerable,
    Weak,
    Sharpen,
    Overdrive,
    Focus,
    Dodge,
    EvadeCounter,
    Reflect,
    CounterShot,
    Guard,
    Burn,
}

impl TokenId {
    /// Every token kind, in display order.
    pub const ALL: [TokenId; 12] = [
        TokenId::Strength,
        TokenId::Vulnerable,
        TokenId::Weak,
        TokenId::Sharpen,
        TokenId::Overdrive,
        TokenId::Focus,
        TokenId::Dodge,
        TokenId::EvadeCounter,
        TokenId::Reflect,
        TokenId::CounterShot,
        TokenId::Guard,
        TokenId::Burn,
    ];

    #[must_use]
    pub const fn category(self) -> TokenCategory {
        match self {
            TokenId::Strength
            | TokenId::Vulnerable
            | TokenId::Weak
            | TokenId::Reflect
            | TokenId::Guard
            | TokenId::Burn => TokenCategory::Turn,
            TokenId::Sharpen
            | TokenId::Overdrive
            | TokenId::Focus
            | TokenId::Dodge
            | TokenId::CounterShot => TokenCategory::Usage,
            TokenId::EvadeCounter => TokenCategory::Permanent,
        }
    }

    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            TokenId::Vulnerable | TokenId::Weak | TokenId::Burn => Polarity::Debuff,
            _ => Polarity::Buff,
        }
    }

    #[must_use]
    pub const fn effect(self) -> TokenEffect {
        match self {
            TokenId::Strength => TokenEffect::Stat(BoundStat::Strength),
            TokenId::Vulnerable => TokenEffect::Stat(BoundStat::VulnMult),
            TokenId::Weak => TokenEffect::Weaken,
            TokenId::Sharpen => TokenEffect::Sharpen,
            TokenId::Overdrive => TokenEffect::Overdrive,
            TokenId::Focus => TokenEffect::Focus,
            TokenId::Dodge => TokenEffect::Dodge,
            TokenId::EvadeCounter => TokenEffect::EvadeCounter,
            TokenId::Reflect => TokenEffect::Reflect,
            TokenId::CounterShot => TokenEffect::CounterShot,
            TokenId::Guard => TokenEffect::Guard,
            TokenId::Burn => TokenEffect::Burn,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TokenId::Strength => "Strength",
            TokenId::Vulnerable => "Vulnerable",
            TokenId::Weak => "Weak",
            TokenId::Sharpen => "Sharpen",
            TokenId::Overdrive => "Overdrive",
            TokenId::Focus => "Focus",
            TokenId::Dodge => "Dodge",
            TokenId::EvadeCounter => "Evade Counter",
            TokenId::Reflect => "Reflect",
            TokenId::CounterShot => "Counter Shot",
            TokenId::Guard => "Guard",
            TokenId::Burn => "Burn",
        }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A token held by a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub category: TokenCategory,
    pub stacks: u32,
    pub effect: TokenEffect,
}

impl Token {
    #[must_use]
    pub fn new(id: TokenId, stacks: u32) -> Self {
        Self {
            id,
            category: id.category(),
            stacks,
            effect: id.effect(),
        }
    }
}
