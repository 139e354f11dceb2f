//! Turn timeline: queue, resolution pass and ether scoring.
//!
//! - `Timeline`: the ordered action queue (`sp` ascending, ghosts first on ties)
//! - `run_pass`: resolves the queue into a new `PassState`
//! - `EtherCalculation`: the `idle → sum → multiply → deflation → result`
//!   scoring of the ether a pass produced
//!
//! ## Snapshots
//!
//! Queue edits (ghost inserts, guard pushes, repeats, reorders) all return
//! a new `Timeline`. Entries are stored in an `im::Vector`, so the copies
//! share structure.

mod ether;
mod executor;
mod queue;

pub use ether::{detect_combo, ComboHistory, ComboKind, EtherCalculation};
pub use executor::{run_pass, PassModifiers, PassReport, PassResult, PassState};
pub use queue::{EntryUid, QueueEntry, Timeline};
