//! Engine configuration.
//!
//! Every tunable number the rules engine uses lives in `EngineConfig`.
//! The surrounding application builds one at startup (or loads it with
//! serde) and hands it to the battle driver; the engine never reads
//! configuration from anywhere else.

use serde::{Deserialize, Serialize};

/// Multipliers applied by the ether pipeline for each combo kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboMultipliers {
    pub pair: f64,
    pub two_pair: f64,
    pub triple: f64,
    pub full_house: f64,
    pub flush: f64,
    pub quad: f64,
}

impl Default for ComboMultipliers {
    fn default() -> Self {
        Self {
            pair: 1.5,
            two_pair: 2.0,
            triple: 2.5,
            full_house: 3.0,
            flush: 3.5,
            quad: 4.0,
        }
    }
}

/// Tunable rules constants.
///
/// ## Example
///
/// ```
/// use ether_battle::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_max_energy(8)
///     .with_dodge_chance(100);
///
/// assert_eq!(config.max_energy, 8);
/// assert_eq!(config.dodge_chance, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier for critical hits (result floored).
    pub crit_multiplier: f64,

    /// Effective damage multiplier used against block by crush cards.
    pub crush_multiplier: i64,

    /// `vuln_mult` value set by the Vulnerable token.
    pub vulnerable_multiplier: f64,

    /// Outgoing damage multiplier while Weak (result floored).
    pub weak_multiplier: f64,

    /// Extra damage per Sharpen stack.
    pub sharpen_bonus: i64,

    /// Percent chance that a Dodge stack evades an attack.
    pub dodge_chance: u32,

    /// Percent of hp damage sent back by Reflect.
    pub reflect_percent: i64,

    /// Damage per Burn stack at the end of every action.
    pub burn_damage: i64,

    /// Block gained per Guard stack when attacked.
    pub guard_block: i64,

    /// Timeline push applied to the attacker per Guard stack.
    pub guard_push: i64,

    /// Damage of a single counter-shot.
    pub counter_shot_damage: i64,

    /// Energy available to each side per turn.
    pub max_energy: i64,

    /// Cards drawn at the start of every turn.
    pub hand_size: usize,

    /// How far later a leisure card may be dragged.
    pub leisure_range: i64,

    /// How far earlier a strain card may be dragged.
    pub strain_range: i64,

    /// Combo multipliers for the ether pipeline.
    pub combos: ComboMultipliers,

    /// Per-reuse decay of a combo's bonus multiplier.
    pub deflation_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            crit_multiplier: 1.5,
            crush_multiplier: 2,
            vulnerable_multiplier: 1.5,
            weak_multiplier: 0.75,
            sharpen_bonus: 3,
            dodge_chance: 50,
            reflect_percent: 50,
            burn_damage: 3,
            guard_block: 3,
            guard_push: 2,
            counter_shot_damage: 4,
            max_energy: 6,
            hand_size: 5,
            leisure_range: 4,
            strain_range: 3,
            combos: ComboMultipliers::default(),
            deflation_rate: 0.8,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_max_energy(mut self, energy: i64) -> Self {
        self.max_energy = energy;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the dodge chance in percent (clamped to 100).
    #[must_use]
    pub fn with_dodge_chance(mut self, percent: u32) -> Self {
        self.dodge_chance = percent.min(100);
        self
    }

    #[must_use]
    pub fn with_burn_damage(mut self, damage: i64) -> Self {
        self.burn_damage = damage;
        self
    }

    #[must_use]
    pub fn with_crit_multiplier(mut self, multiplier: f64) -> Self {
        self.crit_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_deflation_rate(mut self, rate: f64) -> Self {
        self.deflation_rate = rate;
        self
    }

    /// Set the legal drag ranges for leisure and strain cards.
    #[must_use]
    pub fn with_reorder_ranges(mut self, leisure: i64, strain: i64) -> Self {
        self.leisure_range = leisure;
        self.strain_range = strain;
        self
    }
}
