//! Combat module: the attack pipeline (C5), its on-hit rider effects, the
//! turn-based combat log, and the result-stream sum type every operation in
//! this module returns.

pub mod events;
pub mod log;
pub mod pipeline;
pub mod riders;

pub use events::{ActionResult, ResultStreamExt, TargetingMode};
pub use pipeline::{attack, AttackContext, AttackOptions};
