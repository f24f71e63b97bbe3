//! Row labels for the script view: indentation, bullet, formatted text.

use super::formatter::format;
use super::indent::indent_of;
use crate::model::{Command, MAX_LEVEL};

pub const BULLET: &str = "@>";
const INDENT_UNIT: &str = "  ";
/// A nested row sits at most one level under the deepest stored level.
const MAX_DEPTH: u32 = MAX_LEVEL + 1;

/// Label of row `index`; an out-of-range index yields a bare bullet.
pub fn row_label(list: &[Command], index: usize) -> String {
    let depth = indent_of(list, index).min(MAX_DEPTH) as usize;
    let text = list.get(index).map(format).unwrap_or_default();
    format!("{}{BULLET}{text}", INDENT_UNIT.repeat(depth))
}

/// Labels for every row of a page.
pub fn render_list(list: &[Command]) -> Vec<String> {
    (0..list.len()).map(|i| row_label(list, i)).collect()
}
