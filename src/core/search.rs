use std::ops::Range;

use ordered_float::OrderedFloat;

/// Neighbours of a searched value in an ascending sequence.
///
/// `floor` is the last index whose key is `<= value`. `ceil` is the first
/// index whose key is `> value`, or `floor` itself on an exact match; it may
/// equal the sequence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub floor: Option<usize>,
    pub ceil: usize,
}

impl Bracket {
    /// `ceil` when it points inside a sequence of `len` items.
    #[must_use]
    pub fn ceil_within(self, len: usize) -> Option<usize> {
        (self.ceil < len).then_some(self.ceil)
    }

    /// Floor index, falling back to ceil when the value precedes everything.
    #[must_use]
    pub fn floor_or_ceil(self, len: usize) -> Option<usize> {
        self.floor.or_else(|| self.ceil_within(len))
    }
}

/// Binary search over `len` ascending keys produced by `key_at`.
pub fn bracket_by<K, F>(len: usize, value: &K, key_at: F) -> Bracket
where
    K: Ord,
    F: Fn(usize) -> K,
{
    let (mut lo, mut hi) = (0usize, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if key_at(mid) <= *value {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    let floor = lo.checked_sub(1);
    let ceil = match floor {
        Some(index) if key_at(index) == *value => index,
        _ => lo,
    };
    Bracket { floor, ceil }
}

pub fn bracket<T, K, F>(items: &[T], value: &K, key: F) -> Bracket
where
    K: Ord,
    F: Fn(&T) -> K,
{
    bracket_by(items.len(), value, |index| key(&items[index]))
}

/// Index range of items intersecting the viewport `[scroll_left, scroll_left + scroll_width)`.
///
/// `left` must be ascending across `items`.
pub fn visible_window<T, F>(items: &[T], scroll_left: f64, scroll_width: f64, left: F) -> Range<usize>
where
    F: Fn(&T) -> f64,
{
    let key = |item: &T| OrderedFloat(left(item));
    let start = bracket(items, &OrderedFloat(scroll_left), key)
        .floor
        .unwrap_or(0);
    let end = bracket(items, &OrderedFloat(scroll_left + scroll_width), key).ceil;
    start..end.max(start)
}
