//! Domain layer - the dialog orchestration engine.
//!
//! Contains the dialog stack machine, the waterfall step executor, the
//! prompt recognize/validate/retry protocol, and the turn boundary types.
//! Everything here is transport- and storage-agnostic.

pub mod dialog;
pub mod prompts;
pub mod turn;
