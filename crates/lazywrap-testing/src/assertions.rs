//! Assertion utilities for layout tests
//!
//! Positions and extents are accumulated in `f32`, so comparisons allow a
//! small tolerance.

use lazywrap_geometry::Rect;

/// Assert that a value is within an expected range.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that a rectangle is approximately equal to another.
pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// Assert that indices form one contiguous ascending run.
pub fn assert_contiguous(indices: &[usize], msg: &str) {
    for pair in indices.windows(2) {
        assert_eq!(
            pair[1],
            pair[0] + 1,
            "{}: indices are not contiguous: {:?}",
            msg,
            indices
        );
    }
}
