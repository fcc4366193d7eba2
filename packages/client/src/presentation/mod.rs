//! Rendering of session activity.

mod formatter;
mod sink;
pub mod terminal;

pub use formatter::MessageFormatter;
pub use sink::{LifecycleEvent, PresentationSink};
pub use terminal::TerminalSink;
