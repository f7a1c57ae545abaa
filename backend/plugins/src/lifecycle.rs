//! Host display-context lifecycle: attach, config-change detach, reattach,
//! and final detach.
//!
//! The context is only ever borrowed for a moment. Callers take a fresh
//! handle with [`ContextSlot::current`] and must not keep it across a wait.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vidpick_core::DisplayContext;

/// Current state of the host attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    #[default]
    Detached,
    Attached,
    /// Torn down for a configuration change (e.g. rotation); expected back.
    Recreating,
}

#[derive(Default)]
pub struct ContextSlot {
    inner: RwLock<(ContextState, Option<Arc<dyn DisplayContext>>)>,
}

impl ContextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, context: Arc<dyn DisplayContext>) {
        info!(package = context.package_name(), "Display context attached");
        self.set(ContextState::Attached, Some(context));
    }

    pub fn detach_for_config_change(&self) {
        debug!("Display context detached for configuration change");
        self.set(ContextState::Recreating, None);
    }

    pub fn reattach(&self, context: Arc<dyn DisplayContext>) {
        debug!(package = context.package_name(), "Display context reattached");
        self.set(ContextState::Attached, Some(context));
    }

    /// Returns true if a context was attached or being recreated.
    pub fn detach(&self) -> bool {
        let previous = self.state();
        self.set(ContextState::Detached, None);
        info!(?previous, "Display context detached");
        previous != ContextState::Detached
    }

    pub fn current(&self) -> Option<Arc<dyn DisplayContext>> {
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.1.clone()
    }

    pub fn state(&self) -> ContextState {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner()).0
    }

    fn set(&self, state: ContextState, context: Option<Arc<dyn DisplayContext>>) {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = (state, context);
    }
}
