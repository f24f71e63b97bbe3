//! Visual nesting depth of one row in a flattened command list.
//!
//! The stored `indent` is only a starting point: continuation rows,
//! choice-branch bodies and move-route steps are placed relative to the
//! command they belong to, found by scanning the list around the row.
//! Nothing is cached; the list may change between two renders.

use crate::model::Command;
use crate::model::codes::{
    CHOICES_END, MOVE_STEP, SET_MOVE_ROUTE, SHOW_CHOICES, continuation_parent, is_branch_marker,
    is_branch_start,
};

/// Indent level of `list[index]`; 0 when `index` is out of range.
pub fn indent_of(list: &[Command], index: usize) -> u32 {
    let Some(cmd) = list.get(index) else {
        return 0;
    };
    let base = cmd.base_indent();

    if let Some(parent) = continuation_parent(cmd.code) {
        return continuation_indent(list, index, cmd.code, parent, base);
    }

    if !is_branch_marker(cmd.code) {
        if let Some(start) = open_branch_start(list, index) {
            return list[start].base_indent().saturating_add(1);
        }
    }

    if cmd.code == MOVE_STEP {
        return move_step_indent(list, index, base);
    }

    base
}

/// Walk back to the parent (or an earlier link of the same chain).
fn continuation_indent(list: &[Command], index: usize, code: i64, parent: i64, base: u32) -> u32 {
    for prev in list[..index].iter().rev() {
        if prev.code == parent {
            return prev.base_indent().saturating_add(1);
        }
        if prev.code == code {
            return prev.base_indent().max(base.saturating_add(1));
        }
    }
    base
}

/// Position of the branch start (`When` / `When Cancel`) whose body contains
/// `index`, if any.
///
/// Backward: the nearest branch start, unless a `Branch End` or a new
/// `Show Choices` comes first. Forward: a `Branch End` must follow before
/// any new `Show Choices`.
fn open_branch_start(list: &[Command], index: usize) -> Option<usize> {
    let start = list[..index]
        .iter()
        .enumerate()
        .rev()
        .find(|(_, c)| is_branch_start(c.code) || c.code == CHOICES_END || c.code == SHOW_CHOICES)
        .filter(|(_, c)| is_branch_start(c.code))
        .map(|(i, _)| i)?;

    let closed = list[index + 1..]
        .iter()
        .find(|c| c.code == CHOICES_END || c.code == SHOW_CHOICES)
        .is_some_and(|c| c.code == CHOICES_END);

    closed.then_some(start)
}

/// Steps sit one level under their `Set Move Route`. A non-step row at or
/// above the step's own level ends the search.
fn move_step_indent(list: &[Command], index: usize, base: u32) -> u32 {
    for prev in list[..index].iter().rev() {
        match prev.code {
            SET_MOVE_ROUTE => return prev.base_indent().saturating_add(1),
            MOVE_STEP => continue,
            _ if prev.base_indent() <= base => return base,
            _ => {}
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn c(code: i64, indent: &str) -> Command {
        serde_json::from_value(json!({"code": code, "indent": indent, "parameters": []})).unwrap()
    }

    #[test]
    fn comment_chain_indents_under_parent() {
        let list = vec![c(108, "0"), c(408, "0"), c(408, "0")];
        assert_eq!(indent_of(&list, 0), 0);
        assert_eq!(indent_of(&list, 1), 1);
        assert_eq!(indent_of(&list, 2), 1);
    }

    #[test]
    fn continuation_follows_parent_level() {
        let list = vec![c(101, "2"), c(401, "0")];
        assert_eq!(indent_of(&list, 1), 3);
    }

    #[test]
    fn orphan_continuation_keeps_base() {
        let list = vec![c(106, "0"), c(655, "2")];
        assert_eq!(indent_of(&list, 1), 2);
        assert_eq!(indent_of(&[c(401, "1")], 0), 1);
    }

    #[test]
    fn command_inside_choice_branch() {
        let list = vec![c(102, "0"), c(402, "0"), c(101, "0"), c(404, "0")];
        assert_eq!(indent_of(&list, 2), list[1].base_indent() + 1);
        assert_eq!(indent_of(&list, 3), 0);
    }

    #[test]
    fn unterminated_branch_is_not_open() {
        let list = vec![c(102, "0"), c(402, "0"), c(101, "0")];
        assert_eq!(indent_of(&list, 2), 0);
    }

    #[test]
    fn new_choice_list_closes_previous_scope() {
        let list = vec![
            c(102, "0"),
            c(402, "0"),
            c(101, "0"),
            c(102, "0"),
            c(402, "0"),
            c(404, "0"),
        ];
        // The forward scan meets a new Show Choices before any Branch End.
        assert_eq!(indent_of(&list, 2), 0);
    }

    #[test]
    fn after_branch_end_is_outside() {
        let list = vec![c(102, "0"), c(402, "0"), c(404, "0"), c(101, "0"), c(404, "0")];
        assert_eq!(indent_of(&list, 3), 0);
    }

    #[test]
    fn move_step_under_route() {
        let list = vec![c(209, "0"), c(509, "1")];
        assert_eq!(indent_of(&list, 1), 1);

        let list = vec![c(209, "2"), c(509, "0"), c(509, "0")];
        assert_eq!(indent_of(&list, 2), 3);
    }

    #[test]
    fn move_step_search_stops_at_shallower_command() {
        let list = vec![c(209, "1"), c(106, "0"), c(509, "0")];
        assert_eq!(indent_of(&list, 2), 0);

        // Deeper rows in between do not end the search.
        let list = vec![c(209, "1"), c(106, "3"), c(509, "0")];
        assert_eq!(indent_of(&list, 2), 2);
    }

    #[test]
    fn placeholder_indent_counts_as_zero() {
        let list = vec![c(106, "0"), c(509, "Jump")];
        assert_eq!(indent_of(&list, 1), 0);
    }

    #[test]
    fn out_of_range_index() {
        assert_eq!(indent_of(&[], 0), 0);
        assert_eq!(indent_of(&[c(101, "4")], 3), 0);
    }

    #[test]
    fn repeated_calls_agree() {
        let list = vec![c(108, "0"), c(408, "0")];
        assert_eq!(indent_of(&list, 1), indent_of(&list, 1));
    }
}
