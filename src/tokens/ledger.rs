//! Token ledger and the entity-level token operations.
//!
//! `TokenLedger` is the raw stack storage. The free functions in this module
//! work on whole combatants because some tokens own a combatant stat
//! (strength, vulnerability) that must change together with the stacks.
//!
//! All operations return new values. Operations that name a token the
//! combatant does not hold are no-ops.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::token::{BoundStat, Polarity, Token, TokenCategory, TokenEffect, TokenId};
use crate::core::{Combatant, EngineConfig};

/// Stack storage for one combatant.
///
/// Ordered by `TokenId` so iteration (and therefore event order) is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    tokens: OrdMap<TokenId, Token>,
}

impl TokenLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    #[must_use]
    pub fn stacks(&self, id: TokenId) -> u32 {
        self.tokens.get(&id).map_or(0, |t| t.stacks)
    }

    #[must_use]
    pub fn contains(&self, id: TokenId) -> bool {
        self.stacks(id) > 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Add stacks, merging with an existing token of the same id.
    #[must_use]
    pub fn added(&self, id: TokenId, stacks: u32) -> Self {
        if stacks == 0 {
            return self.clone();
        }
        let mut tokens = self.tokens.clone();
        let merged = match tokens.get(&id) {
            Some(existing) => Token {
                stacks: existing.stacks.saturating_add(stacks),
                ..existing.clone()
            },
            None => Token::new(id, stacks),
        };
        tokens.insert(id, merged);
        Self { tokens }
    }

    /// Remove up to `count` stacks; the token is dropped when it reaches 0.
    #[must_use]
    pub fn removed(&self, id: TokenId, count: u32) -> Self {
        let Some(existing) = self.tokens.get(&id) else {
            return self.clone();
        };
        let remaining = existing.stacks.saturating_sub(count);
        let mut tokens = self.tokens.clone();
        if remaining == 0 {
            tokens.remove(&id);
        } else {
            tokens.insert(id, Token { stacks: remaining, ..existing.clone() });
        }
        Self { tokens }
    }
}

/// Add stacks of a token to a combatant.
#[must_use]
pub fn add_token(entity: &Combatant, id: TokenId, stacks: u32) -> Combatant {
    let mut next = entity.clone();
    next.tokens = entity.tokens.added(id, stacks);
    next
}

/// Add a token and apply the stat it owns.
///
/// `magnitude` is the strength gained for `Strength`; `Vulnerable` sets
/// `vuln_mult` to the configured multiplier (never lowering it). Other
/// tokens ignore `magnitude`.
#[must_use]
pub fn grant_token(
    entity: &Combatant,
    id: TokenId,
    stacks: u32,
    magnitude: i64,
    config: &EngineConfig,
) -> Combatant {
    if stacks == 0 {
        return entity.clone();
    }
    let mut next = add_token(entity, id, stacks);
    match id.effect() {
        TokenEffect::Stat(BoundStat::Strength) => next.strength += magnitude,
        TokenEffect::Stat(BoundStat::VulnMult) => {
            next.vuln_mult = next.vuln_mult.max(config.vulnerable_multiplier);
        }
        _ => {}
    }
    next
}

/// Remove stacks of a token of the given category.
///
/// No-op when the combatant does not hold the token or the category does
/// not match.
#[must_use]
pub fn remove_token(entity: &Combatant, id: TokenId, category: TokenCategory, count: u32) -> Combatant {
    match entity.tokens.get(id) {
        Some(token) if token.category == category => {
            let mut next = entity.clone();
            next.tokens = entity.tokens.removed(id, count);
            next
        }
        _ => entity.clone(),
    }
}

#[must_use]
pub fn has_token(entity: &Combatant, id: TokenId) -> bool {
    entity.tokens.contains(id)
}

#[must_use]
pub fn get_token_stacks(entity: &Combatant, id: TokenId) -> u32 {
    entity.tokens.stacks(id)
}

/// Apply one turn boundary.
///
/// Every `Turn` token loses one stack. Tokens reaching 0 are removed and
/// the stat they own returns to baseline. Returns the new combatant and
/// the ids that expired.
#[must_use]
pub fn decrease_durations(entity: &Combatant) -> (Combatant, SmallVec<[TokenId; 4]>) {
    let mut next = entity.clone();
    let mut expired = SmallVec::new();

    for token in entity.tokens.iter().filter(|t| t.category == TokenCategory::Turn) {
        next.tokens = next.tokens.removed(token.id, 1);
        if next.tokens.contains(token.id) {
            continue;
        }
        expired.push(token.id);
        match token.effect {
            TokenEffect::Stat(BoundStat::Strength) => next.strength = 0,
            TokenEffect::Stat(BoundStat::VulnMult) => next.vuln_mult = 1.0,
            _ => {}
        }
    }

    (next, expired)
}

/// Display row for an active token.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveEffect {
    pub name: &'static str,
    /// Stat value for stat tokens, stack count otherwise.
    pub value: i64,
    /// Remaining turns for `Turn` tokens.
    pub duration: Option<u32>,
    pub polarity: Polarity,
}

/// Lazily list a combatant's active tokens for display.
///
/// The iterator is `Clone`, so it can be restarted; calling the function
/// again also starts over.
pub fn active_effects(entity: &Combatant) -> impl Iterator<Item = ActiveEffect> + Clone + '_ {
    let order: &'static [TokenId] = &TokenId::ALL;
    order.iter().filter_map(move |&id| {
        let token = entity.tokens.get(id)?;
        let value = match token.effect {
            TokenEffect::Stat(BoundStat::Strength) => entity.strength,
            TokenEffect::Stat(BoundStat::VulnMult) => (entity.vuln_mult * 100.0).round() as i64,
            _ => i64::from(token.stacks),
        };
        Some(ActiveEffect {
            name: id.name(),
            value,
            duration: (token.category == TokenCategory::Turn).then_some(token.stacks),
            polarity: id.polarity(),
        })
    })
}
