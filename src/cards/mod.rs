//! Card system: definitions and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Immutable card template (stats, traits, specials)
//! - `CardSpecial`: Closed set of one-off card effects
//! - `CardRegistry`: Card definition lookup

pub mod definition;
pub mod registry;

pub use definition::{
    CardCategory, CardDefinition, CardId, CardSpecial, CardTrait, EffectTarget,
};
pub use registry::CardRegistry;
