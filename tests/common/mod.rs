//! Shared utilities for transition tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use route_transit::routing::{
    CleanContext, ExecuteContext, HookPhase, HookResult, RouteHooks, RouteRegistry,
    ROOT_TYPE_NAME,
};

/// Ordered log of hook invocations, e.g. `execute:page`.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, phase: HookPhase, level: &str) {
        self.events.lock().unwrap().push(format!("{phase}:{level}"));
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

/// Hooks that record every call and optionally fail one phase.
pub struct RecordingHooks {
    journal: Journal,
    fail: Option<HookPhase>,
}

impl RecordingHooks {
    pub fn new(journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            journal: journal.clone(),
            fail: None,
        })
    }

    #[allow(dead_code)]
    pub fn failing(journal: &Journal, phase: HookPhase) -> Arc<Self> {
        Arc::new(Self {
            journal: journal.clone(),
            fail: Some(phase),
        })
    }

    fn outcome(&self, phase: HookPhase, level: &str) -> HookResult {
        self.journal.record(phase, level);
        if self.fail == Some(phase) {
            return Err(format!("{level} refused to {phase}").into());
        }
        Ok(())
    }
}

#[async_trait]
impl RouteHooks for RecordingHooks {
    async fn execute(&self, ctx: ExecuteContext<'_>) -> HookResult {
        self.outcome(HookPhase::Execute, ctx.route_type.name())
    }

    async fn clean(&self, ctx: CleanContext<'_>) -> HookResult {
        self.outcome(HookPhase::Clean, ctx.route_type.name())
    }

    async fn save(&self, ctx: CleanContext<'_>) -> HookResult {
        self.outcome(HookPhase::Save, ctx.route_type.name())
    }
}

#[allow(dead_code)]
/// app → section → page, app → section2, and an unrelated login, all
/// recording into `journal`.
pub fn site(journal: &Journal) -> Arc<RouteRegistry> {
    site_failing(journal, None)
}

/// Like [`site`], with one level failing the given phase.
#[allow(dead_code)]
pub fn site_failing(journal: &Journal, failure: Option<(&str, HookPhase)>) -> Arc<RouteRegistry> {
    let hooks = |name: &str| -> Arc<dyn RouteHooks> {
        match failure {
            Some((failing, phase)) if failing == name => RecordingHooks::failing(journal, phase),
            _ => RecordingHooks::new(journal),
        }
    };

    Arc::new(
        RouteRegistry::builder()
            .route_type_with_hooks("app", ROOT_TYPE_NAME, hooks("app"))
            .route_type_with_hooks("section", "app", hooks("section"))
            .route_type_with_hooks("page", "section", hooks("page"))
            .route_type_with_hooks("section2", "app", hooks("section2"))
            .route_type_with_hooks("login", ROOT_TYPE_NAME, hooks("login"))
            .build()
            .unwrap(),
    )
}
