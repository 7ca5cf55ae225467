use serde::{Deserialize, Serialize};

/// Horizontal placement of a column, header or time frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub left: f64,
    pub width: f64,
}

impl Extent {
    #[must_use]
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn contains(self, position: f64) -> bool {
        position >= self.left && position <= self.right()
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            left: self.left * factor,
            width: self.width * factor,
        }
    }
}

/// Anything whose live geometry derives from an original extent and a factor.
pub trait Rescalable {
    fn original_size(&self) -> Extent;
    fn apply_width_factor(&mut self, factor: f64);
}

/// Rescales `columns` so that `original_width` maps onto `width`.
///
/// Returns the factor applied, or `None` when either width is not a positive
/// finite number and nothing was changed.
pub fn set_columns_width<T: Rescalable>(
    width: f64,
    original_width: f64,
    columns: &mut [T],
) -> Option<f64> {
    if !width.is_finite() || !original_width.is_finite() || width <= 0.0 || original_width <= 0.0
    {
        return None;
    }

    let factor = (width / original_width).abs();
    for column in columns.iter_mut() {
        column.apply_width_factor(factor);
    }
    Some(factor)
}
