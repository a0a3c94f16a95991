//! Concierge - Dialog Orchestration Runtime
//!
//! This crate implements a stack-based dialog engine for turn-based
//! conversational agents: reusable dialogs, waterfall question sequences,
//! and validated prompts, with conversation state persisted between turns.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
