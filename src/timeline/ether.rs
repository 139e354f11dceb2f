//! Ether scoring.
//!
//! After a resolution pass each side's accumulated ether is scored through
//! `idle → sum → multiply → deflation → result`. The player's multiplier
//! comes from the combo their played cards form; repeating a combo within
//! a battle deflates its bonus.

use im::OrdMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardCategory, CardDefinition};
use crate::core::{ComboMultipliers, EngineConfig, EtherPhase};

/// Hand shape formed by the cards a side played in one turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComboKind {
    #[default]
    None,
    Pair,
    TwoPair,
    Triple,
    FullHouse,
    Flush,
    Quad,
}

impl ComboKind {
    #[must_use]
    pub fn multiplier(self, combos: &ComboMultipliers) -> f64 {
        match self {
            ComboKind::None => 1.0,
            ComboKind::Pair => combos.pair,
            ComboKind::TwoPair => combos.two_pair,
            ComboKind::Triple => combos.triple,
            ComboKind::FullHouse => combos.full_house,
            ComboKind::Flush => combos.flush,
            ComboKind::Quad => combos.quad,
        }
    }
}

/// Detect the combo formed by `cards`.
///
/// Four or more cards of one category make a flush. Otherwise cards are
/// grouped by action cost like poker ranks.
#[must_use]
pub fn detect_combo<'a>(cards: impl IntoIterator<Item = &'a CardDefinition>) -> ComboKind {
    let mut by_category: FxHashMap<CardCategory, u32> = FxHashMap::default();
    let mut by_cost: FxHashMap<i64, u32> = FxHashMap::default();
    for card in cards {
        *by_category.entry(card.category).or_insert(0) += 1;
        *by_cost.entry(card.action_cost).or_insert(0) += 1;
    }

    if by_category.values().any(|&n| n >= 4) {
        return ComboKind::Flush;
    }

    let mut groups: Vec<u32> = by_cost.values().copied().filter(|&n| n >= 2).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    match groups.as_slice() {
        [n, ..] if *n >= 4 => ComboKind::Quad,
        [3, m, ..] if *m >= 2 => ComboKind::FullHouse,
        [3, ..] => ComboKind::Triple,
        [2, 2, ..] => ComboKind::TwoPair,
        [2] => ComboKind::Pair,
        _ => ComboKind::None,
    }
}

/// How often each combo has been scored this battle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboHistory {
    uses: OrdMap<ComboKind, u32>,
}

impl ComboHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn uses(&self, combo: ComboKind) -> u32 {
        self.uses.get(&combo).copied().unwrap_or(0)
    }

    /// Record one more use. `ComboKind::None` is not tracked.
    #[must_use]
    pub fn recorded(&self, combo: ComboKind) -> Self {
        if combo == ComboKind::None {
            return self.clone();
        }
        Self {
            uses: self.uses.update(combo, self.uses(combo) + 1),
        }
    }
}

/// One side's ether scoring, advanced a sub-phase at a time.
///
/// ```
/// use ether_battle::core::{EngineConfig, EtherPhase};
/// use ether_battle::timeline::{ComboHistory, ComboKind, EtherCalculation};
///
/// let config = EngineConfig::default();
/// let done = EtherCalculation::new(10, ComboKind::Pair).finish(&ComboHistory::new(), &config);
///
/// assert_eq!(done.phase, EtherPhase::Result);
/// assert_eq!(done.total, 15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EtherCalculation {
    pub phase: EtherPhase,
    pub sum: i64,
    pub combo: ComboKind,
    pub multiplier: f64,
    pub total: i64,
}

impl EtherCalculation {
    #[must_use]
    pub fn new(sum: i64, combo: ComboKind) -> Self {
        Self {
            phase: EtherPhase::Idle,
            sum: sum.max(0),
            combo,
            multiplier: 1.0,
            total: 0,
        }
    }

    /// Advance one sub-phase.
    #[must_use]
    pub fn advance(mut self, history: &ComboHistory, config: &EngineConfig) -> Self {
        match self.phase {
            EtherPhase::Idle => self.total = self.sum,
            EtherPhase::Sum => self.multiplier = self.combo.multiplier(&config.combos),
            EtherPhase::Multiply => {
                let uses = history.uses(self.combo);
                let decay = config.deflation_rate.powi(i32::try_from(uses).unwrap_or(i32::MAX));
                self.multiplier = 1.0 + (self.multiplier - 1.0) * decay;
            }
            EtherPhase::Deflation => {
                let scored = ((self.sum as f64) * self.multiplier).floor() as i64;
                self.total = scored.max(self.sum);
            }
            EtherPhase::Result => {}
        }
        self.phase = self.phase.next();
        self
    }

    /// Run every remaining sub-phase.
    #[must_use]
    pub fn finish(mut self, history: &ComboHistory, config: &EngineConfig) -> Self {
        while self.phase != EtherPhase::Result {
            self = self.advance(history, config);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn card(id: u32, category: CardCategory, cost: i64) -> CardDefinition {
        CardDefinition::new(CardId::new(id), "c", category).with_cost(cost)
    }

    #[test]
    fn test_detect_by_cost() {
        let pair = [card(1, CardCategory::Attack, 1), card(2, CardCategory::Gun, 1), card(3, CardCategory::Skill, 2)];
        assert_eq!(detect_combo(&pair), ComboKind::Pair);

        let two_pair = [
            card(1, CardCategory::Attack, 1),
            card(2, CardCategory::Gun, 1),
            card(3, CardCategory::Skill, 2),
            card(4, CardCategory::Defense, 2),
        ];
        assert_eq!(detect_combo(&two_pair), ComboKind::TwoPair);

        let full_house = [
            card(1, CardCategory::Attack, 1),
            card(2, CardCategory::Gun, 1),
            card(3, CardCategory::Skill, 1),
            card(4, CardCategory::Defense, 2),
            card(5, CardCategory::Fencing, 2),
        ];
        assert_eq!(detect_combo(&full_house), ComboKind::FullHouse);

        let triple = [card(1, CardCategory::Attack, 3), card(2, CardCategory::Gun, 3), card(3, CardCategory::Skill, 3)];
        assert_eq!(detect_combo(&triple), ComboKind::Triple);
    }

    #[test]
    fn test_flush_beats_cost_groups() {
        let flush: Vec<_> = (1..=4).map(|i| card(i, CardCategory::Attack, 1)).collect();
        assert_eq!(detect_combo(&flush), ComboKind::Flush);

        let quad = [
            card(1, CardCategory::Attack, 2),
            card(2, CardCategory::Gun, 2),
            card(3, CardCategory::Skill, 2),
            card(4, CardCategory::Defense, 2),
        ];
        assert_eq!(detect_combo(&quad), ComboKind::Quad);
    }

    #[test]
    fn test_no_combo() {
        assert_eq!(detect_combo(Vec::<&CardDefinition>::new()), ComboKind::None);
        let distinct = [card(1, CardCategory::Attack, 1), card(2, CardCategory::Gun, 2)];
        assert_eq!(detect_combo(&distinct), ComboKind::None);
    }

    #[test]
    fn test_pipeline_steps() {
        let config = EngineConfig::default();
        let history = ComboHistory::new();
        let calc = EtherCalculation::new(8, ComboKind::TwoPair);
        assert_eq!(calc.phase, EtherPhase::Idle);

        let calc = calc.advance(&history, &config);
        assert_eq!((calc.phase, calc.total), (EtherPhase::Sum, 8));

        let calc = calc.advance(&history, &config);
        assert_eq!((calc.phase, calc.multiplier), (EtherPhase::Multiply, 2.0));

        let calc = calc.advance(&history, &config).advance(&history, &config);
        assert_eq!((calc.phase, calc.total), (EtherPhase::Result, 16));
    }

    #[test]
    fn test_deflation() {
        let config = EngineConfig::default();
        let history = ComboHistory::new().recorded(ComboKind::Pair).recorded(ComboKind::Pair);
        assert_eq!(history.uses(ComboKind::Pair), 2);

        // 1 + 0.5 * 0.8^2 = 1.32
        let done = EtherCalculation::new(100, ComboKind::Pair).finish(&history, &config);
        assert_eq!(done.total, 132);
    }

    #[test]
    fn test_result_never_below_sum() {
        let config = EngineConfig::default();
        let done = EtherCalculation::new(7, ComboKind::None).finish(&ComboHistory::new(), &config);
        assert_eq!(done.total, 7);

        let done = EtherCalculation::new(-3, ComboKind::Quad).finish(&ComboHistory::new(), &config);
        assert_eq!(done.total, 0);
    }

    #[test]
    fn test_none_not_recorded() {
        assert_eq!(ComboHistory::new().recorded(ComboKind::None), ComboHistory::new());
    }
}
