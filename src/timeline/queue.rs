//! The turn's ordered action queue.
//!
//! Entries are ordered by `sp` ascending. At equal `sp` ghost entries come
//! before regular ones, and otherwise insertion order decides. Every edit
//! returns a new `Timeline`.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cards::{CardId, CardRegistry, CardTrait};
use crate::core::{BattleError, EngineConfig, Result, Side};

/// Unique id of a queue entry within a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryUid(pub u64);

impl std::fmt::Display for EntryUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One scheduled action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub uid: EntryUid,
    pub actor: Side,
    pub card_id: CardId,
    /// Ordering key.
    pub sp: i64,
    /// `sp` the entry was scheduled at, before any adjustment.
    pub base_sp: i64,
    /// Inserted mid-resolution; consumes no card and no energy.
    pub is_ghost: bool,
    /// Entry this one was copied from, if any.
    pub origin: Option<EntryUid>,
}

impl QueueEntry {
    fn sort_key(&self) -> (i64, bool) {
        (self.sp, !self.is_ghost)
    }
}

/// Ordered action queue.
///
/// ## Example
///
/// ```
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
/// use ether_battle::timeline::Timeline;
///
/// let cards = CardRegistry::from_cards([
///     CardDefinition::new(CardId::new(1), "Quick", CardCategory::Attack).with_speed(2),
///     CardDefinition::new(CardId::new(2), "Slow", CardCategory::Attack).with_speed(5),
/// ]);
///
/// let timeline = Timeline::from_plans(&[CardId::new(2)], &[CardId::new(1), CardId::new(1)], &cards);
/// let order: Vec<i64> = timeline.iter().map(|e| e.sp).collect();
///
/// assert_eq!(order, vec![2, 4, 5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vector<QueueEntry>,
    next_uid: u64,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty timeline whose uids continue after `previous`.
    #[must_use]
    pub fn continuing(previous: &Timeline) -> Self {
        Self {
            entries: Vector::new(),
            next_uid: previous.next_uid,
        }
    }

    /// Schedule both plans. Each actor's `sp` is the running sum of its
    /// cards' speeds; unknown cards are dropped.
    #[must_use]
    pub fn from_plans(player: &[CardId], enemy: &[CardId], cards: &CardRegistry) -> Self {
        Self::new().scheduled(player, enemy, cards)
    }

    /// Replace the entries with a fresh schedule, keeping uid continuity.
    #[must_use]
    pub fn scheduled(&self, player: &[CardId], enemy: &[CardId], cards: &CardRegistry) -> Self {
        let mut next = Self::continuing(self);
        for (actor, plan) in [(Side::Player, player), (Side::Enemy, enemy)] {
            let mut sp = 0;
            for &card_id in plan {
                let Some(card) = cards.get(card_id) else {
                    warn!(card = %card_id, %actor, "unknown card in plan, dropping");
                    continue;
                };
                sp += card.speed;
                let uid = next.fresh_uid();
                next.entries.push_back(QueueEntry {
                    uid,
                    actor,
                    card_id,
                    sp,
                    base_sp: sp,
                    is_ghost: false,
                    origin: None,
                });
            }
        }
        next.sorted_from(0)
    }

    fn fresh_uid(&mut self) -> EntryUid {
        let uid = EntryUid(self.next_uid);
        self.next_uid += 1;
        uid
    }

    /// Stable re-sort of every entry at or after `start`.
    fn sorted_from(mut self, start: usize) -> Self {
        let start = start.min(self.entries.len());
        let mut tail: Vec<QueueEntry> = self.entries.split_off(start).into_iter().collect();
        tail.sort_by_key(QueueEntry::sort_key);
        self.entries.extend(tail);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &Vector<QueueEntry> {
        &self.entries
    }

    /// Position and entry for `uid`.
    #[must_use]
    pub fn find(&self, uid: EntryUid) -> Option<(usize, &QueueEntry)> {
        self.entries.iter().enumerate().find(|(_, e)| e.uid == uid)
    }

    /// Entries of `actor` after `index`.
    pub fn remaining_for(&self, actor: Side, index: usize) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter().skip(index + 1).filter(move |e| e.actor == actor)
    }

    /// Whether the entries satisfy the ordering rule.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.is_ordered_from(0)
    }

    /// Whether the entries from `start` on satisfy the ordering rule.
    ///
    /// Edits made while resolving only re-sort the unresolved tail, so a
    /// ghost may share `sp` with the regular entry that spawned it.
    #[must_use]
    pub fn is_ordered_from(&self, start: usize) -> bool {
        self.entries
            .iter()
            .skip(start)
            .zip(self.entries.iter().skip(start + 1))
            .all(|(a, b)| a.sort_key() <= b.sort_key())
    }

    /// Insert ghost entries after `index`, sorted into the unresolved tail.
    ///
    /// Each ghost is `(actor, card, sp)`; `sp` is raised to the current
    /// entry's `sp` so a ghost never lands in the past.
    #[must_use]
    pub fn insert_ghosts_after(
        &self,
        index: usize,
        ghosts: impl IntoIterator<Item = (Side, CardId, i64)>,
    ) -> (Self, Vec<QueueEntry>) {
        let floor = self.entries.get(index).map_or(0, |e| e.sp);
        let mut next = self.clone();
        let mut inserted = Vec::new();
        for (actor, card_id, sp) in ghosts {
            let sp = sp.max(floor);
            let entry = QueueEntry {
                uid: next.fresh_uid(),
                actor,
                card_id,
                sp,
                base_sp: sp,
                is_ghost: true,
                origin: None,
            };
            inserted.push(entry.clone());
            next.entries.push_back(entry);
        }
        (next.sorted_from(index + 1), inserted)
    }

    /// Duplicate the unresolved planned entries of `actor` after `index` at
    /// the tail, as ghosts with fresh uids. Ghosts are never copied. Copies
    /// keep their relative spacing and start after the last scheduled entry.
    #[must_use]
    pub fn repeat_remaining(&self, actor: Side, index: usize) -> (Self, Vec<QueueEntry>) {
        let current_sp = self.entries.get(index).map_or(0, |e| e.sp);
        let tail_sp = self.entries.iter().map(|e| e.sp).max().unwrap_or(0);
        let originals: Vec<QueueEntry> = self
            .remaining_for(actor, index)
            .filter(|e| !e.is_ghost)
            .cloned()
            .collect();

        let mut next = self.clone();
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let sp = tail_sp + (original.sp - current_sp).max(0);
            let entry = QueueEntry {
                uid: next.fresh_uid(),
                actor,
                card_id: original.card_id,
                sp,
                base_sp: sp,
                is_ghost: true,
                origin: Some(original.uid),
            };
            copies.push(entry.clone());
            next.entries.push_back(entry);
        }
        (next.sorted_from(index + 1), copies)
    }

    /// Push every entry of `actor` after `index` back by `amount`.
    #[must_use]
    pub fn push_actor(&self, actor: Side, index: usize, amount: i64) -> Self {
        if amount == 0 {
            return self.clone();
        }
        let mut next = self.clone();
        for entry in next.entries.iter_mut().skip(index + 1) {
            if entry.actor == actor {
                entry.sp += amount;
            }
        }
        next.sorted_from(index + 1)
    }

    /// Legal `sp` range for moving `uid` by hand.
    ///
    /// Only regular player entries whose card has `Leisure` (later) or
    /// `Strain` (earlier) can move.
    #[must_use]
    pub fn reorder_range(&self, uid: EntryUid, cards: &CardRegistry, config: &EngineConfig) -> Option<(i64, i64)> {
        let (_, entry) = self.find(uid)?;
        if entry.actor != Side::Player || entry.is_ghost {
            return None;
        }
        let card = cards.get(entry.card_id)?;
        let base = entry.base_sp;
        let min = if card.has_trait(CardTrait::Strain) {
            (base - config.strain_range).max(0)
        } else {
            base
        };
        let max = if card.has_trait(CardTrait::Leisure) {
            base + config.leisure_range
        } else {
            base
        };
        (min < max).then_some((min, max))
    }

    /// Move `uid` to `new_sp` if the move is legal, re-sorting the queue.
    pub fn reorder(&self, uid: EntryUid, new_sp: i64, cards: &CardRegistry, config: &EngineConfig) -> Result<Self> {
        let (index, entry) = self.find(uid).ok_or(BattleError::UnknownEntry(uid))?;
        let (min, max) = self
            .reorder_range(uid, cards, config)
            .unwrap_or((entry.base_sp, entry.base_sp));
        if new_sp < min || new_sp > max || min == max {
            return Err(BattleError::IllegalReorder {
                uid,
                requested: new_sp,
                min,
                max,
            });
        }

        let mut next = self.clone();
        if let Some(moved) = next.entries.get_mut(index) {
            moved.sp = new_sp;
        }
        Ok(next.sorted_from(0))
    }
}
