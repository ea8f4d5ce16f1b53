//! The editing stage: a canvas of live HTML nodes and everything that
//! selects, moves, edits and removes them.

pub mod controller;
pub mod dom;
pub mod interaction;
pub mod projection;
pub mod registry;

#[cfg(test)]
mod testing;

pub use controller::{Publish, StageController, StageHandle};
pub use interaction::{DeleteTrigger, EditOutcome, Interaction, StageState};
