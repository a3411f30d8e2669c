//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Piecewise linear interpolation of `value` over the lookup table `(xs, ys)`.
///
/// `xs` must be sorted in increasing order. Values outside of the table's
/// domain are clamped to the first or last entry of `ys`. If the table is
/// empty, or the two slices differ in length, `None` is returned.
pub fn interp<T>(value: T, xs: &[T], ys: &[T]) -> Option<T>
where
    T: Float
{
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }

    let last = xs.len() - 1;

    if value <= xs[0] {
        return Some(ys[0]);
    }
    if value >= xs[last] {
        return Some(ys[last]);
    }

    // Find the segment containing the value
    for i in 0..last {
        if value <= xs[i + 1] {
            // Repeated breakpoints have zero width, take the right hand value
            if xs[i + 1] == xs[i] {
                return Some(ys[i + 1]);
            }
            return Some(lin_map((xs[i], xs[i + 1]), (ys[i], ys[i + 1]), value));
        }
    }

    Some(ys[last])
}

/// Limit the change of `new` relative to `last` to the band 
/// `[last + down, last + up]`.
///
/// `down` is expected to be negative or zero and `up` positive or zero.
pub fn rate_limit<T>(new: T, last: T, down: T, up: T) -> T
where
    T: Float
{
    clamp(&new, &(last + down), &(last + up))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 5f64), 0.5);
        assert_eq!(lin_map((-1f64, 1f64), (0f64, 100f64), 0f64), 50.0);
    }

    #[test]
    fn test_interp() {
        let xs = [0f64, 10f64, 20f64];
        let ys = [0.1f64, 0.5f64, 1.0f64];

        // Inside the table
        assert!((interp(5.0, &xs, &ys).unwrap() - 0.3).abs() < 1e-12);
        assert!((interp(15.0, &xs, &ys).unwrap() - 0.75).abs() < 1e-12);

        // On breakpoints
        assert_eq!(interp(10.0, &xs, &ys), Some(0.5));

        // Outside the domain values are clamped to the ends of the table
        assert_eq!(interp(-3.0, &xs, &ys), Some(0.1));
        assert_eq!(interp(35.0, &xs, &ys), Some(1.0));

        // Malformed tables
        assert_eq!(interp(1.0, &[], &[]), None::<f64>);
        assert_eq!(interp(1.0, &xs, &ys[..2]), None);
    }

    #[test]
    fn test_rate_limit() {
        assert_eq!(rate_limit(10f64, 0f64, -1f64, 1f64), 1.0);
        assert_eq!(rate_limit(-10f64, 0f64, -1f64, 1f64), -1.0);
        assert_eq!(rate_limit(0.5f64, 0f64, -1f64, 1f64), 0.5);
        assert_eq!(rate_limit(3f64, 5f64, -1f64, 2f64), 4.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5f64, &-1f64, &1f64), 1.0);
        assert_eq!(clamp(&-5f64, &-1f64, &1f64), -1.0);
        assert_eq!(clamp(&0.25f64, &-1f64, &1f64), 0.25);
    }
}
