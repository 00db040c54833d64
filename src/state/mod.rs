// State management module.
// Selector, report binder, and console state for the tabs.

pub mod binder;
pub mod console;
pub mod selector;

pub use binder::{LoadingState, RenderRequest, ReportBinder};
pub use console::{ConsoleLevel, ConsoleState};
pub use selector::Selector;
