//! Finalization passes.
//!
//! Each pass is a self-contained transformation run once per generation call.
//! Pass 0 works on the arena while placeholders are still addressable by
//! node; pass 1 works on the materialized `serde_json::Value` document.

pub mod p0_definitions;
pub mod p1_allof_cleanup;
