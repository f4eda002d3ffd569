pub mod editor;
pub mod keybindings;
pub mod terminal_guard;
pub mod toast;
pub mod wizard;

pub use terminal_guard::{install_panic_hook, TerminalGuard};
pub use wizard::{ScreenEvent, WizardScreen};
