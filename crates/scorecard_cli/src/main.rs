//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `scorecard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("scorecard_core version={}", scorecard_core::core_version());
}
