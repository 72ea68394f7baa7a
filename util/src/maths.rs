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

/// Limit a value to the closed range `[min, max]`.
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

/// Return the largest absolute value in the slice, or zero for an empty
/// slice.
pub fn abs_max<T>(values: &[T]) -> T
where
    T: Float
{
    values.iter()
        .fold(T::zero(), |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 2f64), (10f64, 20f64), 1f64), 15f64);
        assert_eq!(lin_map((0f64, 4f64), (-90f64, 90f64), 4f64), 90f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&1.5f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-1.5f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.25f64, &-1f64, &1f64), 0.25f64);
    }

    #[test]
    fn test_abs_max() {
        assert_eq!(abs_max(&[1f64, -7f64, 3f64]), 7f64);
        assert_eq!(abs_max::<f64>(&[]), 0f64);
    }
}
