//! Posting cadence: when to post, and how long a post gets to be.
//!
//! The decision function is pure over the persisted state and one random
//! draw, so it can be tested without touching the clock or the stores. The
//! caller updates `last_post_ts` after a successful post.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::store::Cadence;

/// Candidate post length budgets, drawn uniformly. Mostly one typical
/// length with occasional shorter outliers, so not every post is a
/// paragraph.
pub const LENGTH_BUDGETS: &[usize] = &[210, 120, 120, 120, 120, 100, 100, 100, 80, 80, 40];

/// Current time in whole seconds since the Unix epoch.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Decide whether a post should be generated right now.
///
/// In order, first match wins:
/// 1. `force` posts unconditionally.
/// 2. Silence longer than `maximum_spacing_secs` forces a post regardless
///    of the probability draw.
/// 3. One uniform draw under `post_probability` posts, but only if at
///    least `minimum_spacing_secs` have passed; probability alone never
///    overrides the minimum gap.
/// 4. Otherwise stay quiet.
pub fn should_post_now<R: Rng>(now: i64, cadence: &Cadence, force: bool, rng: &mut R) -> bool {
    if force {
        return true;
    }

    let elapsed = now - cadence.last_post_ts;
    if elapsed > cadence.maximum_spacing_secs {
        return true;
    }

    rng.random::<f64>() < cadence.post_probability && elapsed > cadence.minimum_spacing_secs
}

/// Draw one length budget for the next post.
pub fn pick_length_budget<R: Rng>(rng: &mut R) -> usize {
    LENGTH_BUDGETS[rng.random_range(0..LENGTH_BUDGETS.len())]
}
