//! Metrics collection.
//!
//! # Metrics
//! - `route_transitions_total` (counter): navigations by outcome
//!   (`ok`, `cleanup_failed`, `exec_failed`)
//! - `route_hook_invocations_total` (counter): hook calls by phase
//! - `route_hook_failures_total` (counter): failed hook calls by phase

use crate::routing::hooks::HookPhase;

pub fn record_transition(outcome: &'static str) {
    ::metrics::counter!("route_transitions_total", "outcome" => outcome).increment(1);
}

pub fn record_hook(phase: HookPhase) {
    ::metrics::counter!("route_hook_invocations_total", "phase" => phase.as_str()).increment(1);
}

pub fn record_hook_failure(phase: HookPhase) {
    ::metrics::counter!("route_hook_failures_total", "phase" => phase.as_str()).increment(1);
}
