//! # Control View
//!
//! Pure derivation of what the host controls should show, from one
//! immutable snapshot of checkout state. Nothing here touches the host
//! until [`ControlsView::apply`].

use shop_core::{AppMode, HostControl, HostControls, HostShell};

/// Default label of the primary control in order mode
pub const CHECKOUT_LABEL: &str = "checkout";

/// Everything the control view depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsSnapshot {
    pub mode: AppMode,
    pub cart_empty: bool,
    pub submission_in_flight: bool,
}

/// Primary control state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryView {
    pub visible: bool,
    /// `None` while hidden
    pub label: Option<String>,
    pub busy: bool,
    pub enabled: bool,
}

/// Full control state for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub primary: PrimaryView,
    pub back_visible: bool,
    pub closing_confirmation: bool,
}

impl ControlsView {
    /// Derive the view with a custom checkout label.
    ///
    /// | mode       | cart empty | primary visible | label    |
    /// |------------|------------|-----------------|----------|
    /// | storefront | any        | no              | none     |
    /// | order      | yes        | no              | none     |
    /// | order      | no         | yes             | checkout |
    pub fn derive(snapshot: ControlsSnapshot, checkout_label: &str) -> Self {
        let visible = snapshot.mode == AppMode::Order && !snapshot.cart_empty;
        Self {
            primary: PrimaryView {
                visible,
                label: visible.then(|| checkout_label.to_string()),
                busy: snapshot.submission_in_flight,
                enabled: !snapshot.submission_in_flight,
            },
            back_visible: snapshot.mode == AppMode::Order,
            closing_confirmation: !snapshot.cart_empty,
        }
    }

    /// Push this view to the host
    pub fn apply(&self, controls: &dyn HostControls, shell: &dyn HostShell) {
        if let Some(label) = &self.primary.label {
            controls.set_label(HostControl::Primary, label);
        }
        controls.set_busy(HostControl::Primary, self.primary.busy);
        controls.set_enabled(HostControl::Primary, self.primary.enabled);
        controls.set_visible(HostControl::Primary, self.primary.visible);
        controls.set_visible(HostControl::Back, self.back_visible);
        shell.set_closing_confirmation(self.closing_confirmation);
    }
}

/// Derive the view with the default label
pub fn derive_controls(snapshot: ControlsSnapshot) -> ControlsView {
    ControlsView::derive(snapshot, CHECKOUT_LABEL)
}
