//! Persistent bot state: scheduler settings, per-song usage history, and the
//! favorite task queue handed over from streaming mode.
//!
//! All stores load on open and write on an explicit flush. The design assumes
//! a single process instance at a time (cron-style usage); concurrent writers
//! are last-write-wins and must be excluded externally.

pub use self::history::UsageHistory;
pub use self::queue::FavoriteQueue;
pub use self::state::{BotState, Cadence, StateStore};

mod history;
mod queue;
mod state;
