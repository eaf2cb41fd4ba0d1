mod clipboard;
mod handler;
mod theme;
mod ui;

pub use clipboard::{ClipboardSink, SystemClipboard};
pub use handler::{handle_key_event, AppAction};
pub use theme::Theme;
pub use ui::draw;
