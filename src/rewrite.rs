//! Textual pre-rewrite of two malformed GDB outputs, tied to GDB bug
//! #14733. Applied to a complete line before the record parser runs.

use std::borrow::Cow;

use tracing::debug;

/// Apply both workarounds to `line`. Both rewrites are line-local,
/// terminator-preserving, and idempotent: a second pass is a no-op because
/// the trigger substring no longer matches.
pub fn rewrite_line<'a>(line: &'a str, terminator: &str) -> Cow<'a, str> {
    let line = strip_bkpt_names(line);
    single_breakpoint_to_list(line, terminator)
}

/// The interior of `BreakpointTable` is a sequence of named tuples all
/// bound to the name `bkpt`, which violates the list-homogeneity rule.
/// Stripping the names turns them into a list of bare tuples.
fn strip_bkpt_names(line: Cow<str>) -> Cow<str> {
    if !line.contains("BreakpointTable={") {
        return line;
    }
    debug!("rewriting BreakpointTable bkpt= names");
    Cow::Owned(line.replace("bkpt=", ""))
}

/// Express a single-element breakpoint result or notification as a
/// one-element list, for uniform downstream handling alongside the
/// multi-element `BreakpointTable` case above.
fn single_breakpoint_to_list<'a>(line: Cow<'a, str>, terminator: &str) -> Cow<'a, str> {
    const DONE_PREFIX: &str = "^done,bkpt={";
    const DONE_REPLACEMENT: &str = "^done,bkpts=[{";
    const MODIFIED_MARKER: &str = "=breakpoint-modified,bkpt={";
    const MODIFIED_REPLACEMENT: &str = "=breakpoints-modified,bkpts=[{";

    let (marker, replacement) = if line.starts_with(DONE_PREFIX) {
        (DONE_PREFIX, DONE_REPLACEMENT)
    } else if line.contains(MODIFIED_MARKER) {
        (MODIFIED_MARKER, MODIFIED_REPLACEMENT)
    } else {
        return line;
    };

    debug!(marker, "rewriting single breakpoint into a one-element list");
    let rewritten = line.replacen(marker, replacement, 1);
    let body = rewritten
        .strip_suffix(terminator)
        .unwrap_or(rewritten.as_str());
    Cow::Owned(format!("{body}]{terminator}"))
}
