//! Per-step rendering, one `impl WizardScreen` block per step

mod acquisition;
mod audio;
mod outline;
mod script;

use crate::wizard::{Action, Wizard};

/// Title suffix for an editor whose action is running
pub(super) fn loading_status(wizard: &Wizard, action: Action) -> Option<&'static str> {
    wizard
        .is_loading(action)
        .then(|| action.loading_label())
}
