//! Effect registry.
//!
//! The registry maps timing events to the handlers abilities registered
//! for them. The engine core only ever calls [`EffectRegistry::execute`];
//! it never knows which concrete abilities exist.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::handler::{EffectContext, Handler};
use super::result::EffectResult;
use super::timing::TimingEvent;

/// Identifier of an ability (relic) that owns registered handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// A handler registered for one timing event.
#[derive(Clone, Debug)]
pub struct RegisteredEffect {
    pub owner: AbilityId,
    pub timing: TimingEvent,
    pub handler: Handler,
    /// Higher runs first. Only matters for order-sensitive handlers.
    pub priority: i32,
    /// Registration order, for stable ordering at equal priority.
    sequence: u64,
}

/// Timing-keyed dispatch table.
///
/// ## Example
///
/// ```
/// use ether_battle::core::Combatant;
/// use ether_battle::effects::{
///     AbilityId, EffectContext, EffectRegistry, EffectResult, Handler, TimingEvent,
/// };
///
/// let mut registry = EffectRegistry::new();
/// let charm = AbilityId::new(1);
/// registry.register(charm, TimingEvent::CardPlayed, Handler::Flat(EffectResult::ether(3)), 0);
///
/// let (player, enemy) = (Combatant::new(30), Combatant::new(30));
/// let ctx = EffectContext::new(TimingEvent::CardPlayed, &player, &enemy);
///
/// assert_eq!(registry.execute(TimingEvent::CardPlayed, &[charm], &ctx).ether_gain, 3);
/// assert!(registry.execute(TimingEvent::CardPlayed, &[], &ctx).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    by_event: FxHashMap<TimingEvent, Vec<RegisteredEffect>>,
    next_sequence: u64,
}

impl EffectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `owner` on `timing`.
    pub fn register(&mut self, owner: AbilityId, timing: TimingEvent, handler: Handler, priority: i32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.by_event.entry(timing).or_default().push(RegisteredEffect {
            owner,
            timing,
            handler,
            priority,
            sequence,
        });
    }

    /// Remove every handler `owner` registered, on every event.
    ///
    /// Returns the number of handlers removed.
    pub fn unregister(&mut self, owner: AbilityId) -> usize {
        let mut removed = 0;
        for list in self.by_event.values_mut() {
            let before = list.len();
            list.retain(|e| e.owner != owner);
            removed += before - list.len();
        }
        self.by_event.retain(|_, list| !list.is_empty());
        removed
    }

    /// Run every handler registered for `timing` whose owner is active.
    ///
    /// Handlers run in descending priority (registration order breaks
    /// ties); each result is added to the running total.
    #[must_use]
    pub fn execute(&self, timing: TimingEvent, active: &[AbilityId], ctx: &EffectContext) -> EffectResult {
        let Some(list) = self.by_event.get(&timing) else {
            return EffectResult::default();
        };

        let mut matching: Vec<&RegisteredEffect> =
            list.iter().filter(|e| active.contains(&e.owner)).collect();
        matching.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.sequence.cmp(&b.sequence)));

        let total = matching.iter().fold(EffectResult::default(), |acc, effect| {
            acc + effect.handler.apply(ctx, &acc)
        });

        if !total.is_empty() {
            trace!(event = %timing, handlers = matching.len(), ?total, "abilities fired");
        }
        total
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.by_event.clear();
        self.next_sequence = 0;
    }

    /// Total registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_event.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }

    /// Handlers registered by `owner`.
    pub fn effects_for(&self, owner: AbilityId) -> impl Iterator<Item = &RegisteredEffect> {
        self.by_event.values().flatten().filter(move |e| e.owner == owner)
    }
}
