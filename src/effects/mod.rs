//! Effect registry for passive and triggered abilities.
//!
//! Abilities react to timing events with additive numeric deltas:
//! - `TimingEvent`: Closed set of lifecycle points
//! - `Handler`: Closed set of ability behaviours
//! - `EffectResult`: Additive deltas (block, heal, ether, damage, gold...)
//! - `EffectRegistry`: (owner, event) → handler dispatch table
//! - `AbilityCatalog`: Ability definitions installed at battle start
//!
//! ## Design Philosophy
//!
//! The registry is the only extension point for abilities. The hit
//! resolver and the timeline executor call `execute` with the list of
//! active owners and read the summed result; they never know which
//! abilities exist.

mod ability;
mod handler;
mod registry;
mod result;
mod timing;

pub use ability::{AbilityCatalog, AbilityDefinition, AbilityEffect};
pub use handler::{EffectContext, Handler};
pub use registry::{AbilityId, EffectRegistry, RegisteredEffect};
pub use result::EffectResult;
pub use timing::TimingEvent;
