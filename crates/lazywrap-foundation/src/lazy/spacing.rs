//! Distribution of unused row width.

use super::config::SpacingMode;

/// Gaps applied while placing one row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowSpacing {
    /// Gap between neighbouring items.
    pub inner: f32,
    /// Gap before the first item (and after the last).
    pub outer: f32,
}

/// Computes row gaps for `n` items whose widths sum to `summed`.
///
/// Rows that already fill `row_width` get no spacing.
pub fn row_spacing(mode: SpacingMode, row_width: f32, summed: f32, n: usize) -> RowSpacing {
    if summed.is_nan() || summed >= row_width || !row_width.is_finite() {
        return RowSpacing::default();
    }
    let unused = (row_width - summed).max(0.0);
    let n = n as f32;
    match mode {
        SpacingMode::None => RowSpacing::default(),
        SpacingMode::Uniform => {
            let gap = unused / (n + 1.0);
            RowSpacing {
                inner: gap,
                outer: gap,
            }
        }
        SpacingMode::BetweenItemsOnly => RowSpacing {
            inner: unused / (n - 1.0).max(1.0),
            outer: 0.0,
        },
        SpacingMode::StartAndEndOnly => RowSpacing {
            inner: 0.0,
            outer: unused / 2.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_table() {
        // 3 items of 100 in a 500 row leave 200 unused.
        let cases = [
            (SpacingMode::None, RowSpacing { inner: 0.0, outer: 0.0 }),
            (SpacingMode::Uniform, RowSpacing { inner: 50.0, outer: 50.0 }),
            (SpacingMode::BetweenItemsOnly, RowSpacing { inner: 100.0, outer: 0.0 }),
            (SpacingMode::StartAndEndOnly, RowSpacing { inner: 0.0, outer: 100.0 }),
        ];
        for (mode, expected) in cases {
            assert_eq!(row_spacing(mode, 500.0, 300.0, 3), expected, "{mode:?}");
        }
    }

    #[test]
    fn test_single_item_between_only_uses_whole_gap() {
        let spacing = row_spacing(SpacingMode::BetweenItemsOnly, 500.0, 100.0, 1);
        assert_eq!(spacing.inner, 400.0);
    }

    #[test]
    fn test_full_row_has_no_spacing() {
        assert_eq!(
            row_spacing(SpacingMode::Uniform, 500.0, 500.0, 5),
            RowSpacing::default()
        );
        assert_eq!(
            row_spacing(SpacingMode::Uniform, 500.0, 600.0, 1),
            RowSpacing::default()
        );
    }
}
