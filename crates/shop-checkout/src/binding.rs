//! # Action Button Binding
//!
//! Ownership record for the callbacks registered on the host's two
//! controls. The host keeps its buttons alive across state updates, so
//! every registration goes through a [`ButtonBinding`] that unregisters
//! the previous handler first. Duplicate registration cannot happen.

use shop_core::{ActionHandler, AppMode, HostControl, HostControls};
use tracing::debug;

/// The single active handler of one host control
pub struct ButtonBinding {
    control: HostControl,
    active: Option<ActionHandler>,
}

impl ButtonBinding {
    pub fn new(control: HostControl) -> Self {
        Self {
            control,
            active: None,
        }
    }

    pub fn control(&self) -> HostControl {
        self.control
    }

    pub fn is_bound(&self) -> bool {
        self.active.is_some()
    }

    /// Replace the active handler
    pub fn bind(&mut self, host: &dyn HostControls, handler: ActionHandler) {
        self.unbind(host);
        host.on_click(self.control, handler.clone());
        self.active = Some(handler);
    }

    /// Unregister the active handler, if any
    pub fn unbind(&mut self, host: &dyn HostControls) {
        if let Some(previous) = self.active.take() {
            host.off_click(self.control, &previous);
        }
    }
}

/// Bindings for the primary and back controls
pub struct ControlBindings {
    primary: ButtonBinding,
    back: ButtonBinding,
    bound_mode: Option<AppMode>,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlBindings {
    pub fn new() -> Self {
        Self {
            primary: ButtonBinding::new(HostControl::Primary),
            back: ButtonBinding::new(HostControl::Back),
            bound_mode: None,
        }
    }

    /// Mode the primary handler was last derived for
    pub fn bound_mode(&self) -> Option<AppMode> {
        self.bound_mode
    }

    /// Swap in a new primary handler for `mode`.
    ///
    /// The back handler keeps its identity: it is registered once and
    /// only re-registered after a teardown.
    pub fn rebind(
        &mut self,
        host: &dyn HostControls,
        mode: AppMode,
        on_primary: ActionHandler,
        on_back: impl FnOnce() -> ActionHandler,
    ) {
        debug!(%mode, "rebinding host controls");
        self.primary.bind(host, on_primary);
        if !self.back.is_bound() {
            self.back.bind(host, on_back());
        }
        self.bound_mode = Some(mode);
    }

    /// Unregister both handlers
    pub fn teardown(&mut self, host: &dyn HostControls) {
        self.primary.unbind(host);
        self.back.unbind(host);
        self.bound_mode = None;
    }
}
