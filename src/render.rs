//! The rendering capability shared by every configuration entity.

use crate::RenderOptions;

/// Line terminator required by the consuming platform's parser.
pub const NEWLINE: &str = "\r\n";

/// Something that renders itself as configuration text.
///
/// `indent` is the column (in spaces) the entity starts at. The options are the immutable
/// formatting knobs of the current run; nothing is read from process-wide state.
pub trait Render {
    /// Renders the entity. An empty string means the entity is omitted.
    fn render(&self, options: &RenderOptions, indent: usize) -> String;
}

/// Returns `count` spaces.
pub(crate) fn pad(count: usize) -> String {
    " ".repeat(count)
}
