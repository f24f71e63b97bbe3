//! Command codes the indent resolver and quick-insert path care about.
//! The formatter's full table lives in `processor::formatter`.

pub const SHOW_TEXT: i64 = 101;
pub const SHOW_CHOICES: i64 = 102;
pub const COMMENT: i64 = 108;
pub const SET_MOVE_ROUTE: i64 = 209;
pub const SCRIPT: i64 = 355;

pub const TEXT_CONT: i64 = 401;
pub const WHEN_CHOICE: i64 = 402;
pub const WHEN_CANCEL: i64 = 403;
pub const CHOICES_END: i64 = 404;
pub const COMMENT_CONT: i64 = 408;
pub const MOVE_STEP: i64 = 509;
pub const SCRIPT_CONT: i64 = 655;

/// Parent code of a continuation code, if `code` is one.
pub fn continuation_parent(code: i64) -> Option<i64> {
    match code {
        TEXT_CONT => Some(SHOW_TEXT),
        COMMENT_CONT => Some(COMMENT),
        SCRIPT_CONT => Some(SCRIPT),
        WHEN_CHOICE => Some(SHOW_CHOICES),
        _ => None,
    }
}

#[inline]
pub fn is_branch_start(code: i64) -> bool {
    code == WHEN_CHOICE || code == WHEN_CANCEL
}

#[inline]
pub fn is_branch_marker(code: i64) -> bool {
    is_branch_start(code) || code == CHOICES_END
}
