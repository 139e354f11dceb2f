//! Ability (relic) definitions and their translation into registrations.
//!
//! The progression layer owns which abilities a run has; at battle start
//! the driver looks the ids up in an `AbilityCatalog` and installs their
//! handlers into the `EffectRegistry`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::handler::Handler;
use super::registry::{AbilityId, EffectRegistry};
use super::timing::TimingEvent;

/// One trigger of an ability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityEffect {
    pub timing: TimingEvent,
    pub handler: Handler,
    #[serde(default)]
    pub priority: i32,
}

/// A passive ability and everything it reacts to.
///
/// ```
/// use ether_battle::effects::{AbilityDefinition, AbilityId, EffectResult, Handler, TimingEvent};
///
/// let lantern = AbilityDefinition::new(AbilityId::new(7), "Lantern")
///     .on(TimingEvent::TurnStart, Handler::Flat(EffectResult::block(2)));
///
/// assert_eq!(lantern.effects.len(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub effects: Vec<AbilityEffect>,
}

impl AbilityDefinition {
    #[must_use]
    pub fn new(id: AbilityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            effects: Vec::new(),
        }
    }

    /// React to `timing` at default priority.
    #[must_use]
    pub fn on(self, timing: TimingEvent, handler: Handler) -> Self {
        self.on_with_priority(timing, handler, 0)
    }

    #[must_use]
    pub fn on_with_priority(mut self, timing: TimingEvent, handler: Handler, priority: i32) -> Self {
        self.effects.push(AbilityEffect { timing, handler, priority });
        self
    }

    /// Register every effect of this ability.
    pub fn install(&self, registry: &mut EffectRegistry) {
        for effect in &self.effects {
            registry.register(self.id, effect.timing, effect.handler.clone(), effect.priority);
        }
    }
}

/// Ability definition table.
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    abilities: FxHashMap<AbilityId, AbilityDefinition>,
}

impl AbilityCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = AbilityDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    pub fn insert(&mut self, definition: AbilityDefinition) -> Option<AbilityDefinition> {
        self.abilities.insert(definition.id, definition)
    }

    #[must_use]
    pub fn get(&self, id: AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(&id)
    }

    /// Install the listed abilities into `registry`.
    ///
    /// Unknown ids are skipped. Returns the ids that were installed, which
    /// is the active-owner list to pass to `execute`.
    pub fn install(&self, ids: &[AbilityId], registry: &mut EffectRegistry) -> Vec<AbilityId> {
        let mut installed = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.abilities.get(&id) {
                Some(definition) => {
                    definition.install(registry);
                    installed.push(id);
                }
                None => warn!(ability = %id, "unknown ability id, skipping"),
            }
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectResult;

    #[test]
    fn test_install_registers_every_effect() {
        let definition = AbilityDefinition::new(AbilityId::new(1), "Twin Bell")
            .on(TimingEvent::TurnStart, Handler::Flat(EffectResult::block(1)))
            .on(TimingEvent::TurnEnd, Handler::Flat(EffectResult::ether(1)));

        let mut registry = EffectRegistry::new();
        definition.install(&mut registry);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.effects_for(AbilityId::new(1)).count(), 2);
    }

    #[test]
    fn test_catalog_skips_unknown_ids() {
        let catalog = AbilityCatalog::from_definitions([AbilityDefinition::new(AbilityId::new(1), "Coin")
            .on(TimingEvent::BattleEnd, Handler::Flat(EffectResult::gold(10)))]);

        let mut registry = EffectRegistry::new();
        let active = catalog.install(&[AbilityId::new(1), AbilityId::new(99)], &mut registry);

        assert_eq!(active, vec![AbilityId::new(1)]);
        assert_eq!(registry.len(), 1);
    }
}
