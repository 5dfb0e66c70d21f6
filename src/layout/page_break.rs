//! # Page Break Decisions
//!
//! Pure arithmetic for deciding how much of a block goes on the current
//! page. Kept free of any cursor or renderer state so the rules can be
//! tested in isolation.

/// Slack for float comparisons on accumulated line heights.
const EPSILON: f64 = 1e-6;

/// What to do with a unit of lines that should stay together.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Everything fits on the current page.
    Place,
    /// Nothing goes here: break first, the whole unit fits on a fresh page.
    MoveToNextPage,
    /// The unit is taller than a fresh page: put what fits here and
    /// continue line by line.
    Split {
        /// How many lines fit on the current page.
        lines_on_current_page: usize,
    },
}

/// How many whole lines of `line_height` fit in `remaining`, capped at `total`.
pub fn lines_that_fit(remaining: f64, line_height: f64, total: usize) -> usize {
    if line_height <= 0.0 || remaining <= 0.0 {
        return 0;
    }
    let fit = ((remaining + EPSILON) / line_height).floor();
    if fit >= total as f64 {
        total
    } else {
        fit as usize
    }
}

/// Decide where a keep-together unit of `line_count` lines goes.
///
/// `fresh_capacity` is the usable height of an empty page. When the cursor
/// is already at the top of a page (`at_page_top`) moving on cannot help,
/// so an oversized unit splits in place.
pub fn decide_break(
    remaining: f64,
    line_height: f64,
    line_count: usize,
    fresh_capacity: f64,
    at_page_top: bool,
) -> BreakDecision {
    let fit_count = lines_that_fit(remaining, line_height, line_count);
    if fit_count >= line_count {
        return BreakDecision::Place;
    }

    let fresh_fit = lines_that_fit(fresh_capacity, line_height, line_count);
    if fresh_fit >= line_count && !at_page_top {
        return BreakDecision::MoveToNextPage;
    }

    BreakDecision::Split {
        lines_on_current_page: fit_count,
    }
}
