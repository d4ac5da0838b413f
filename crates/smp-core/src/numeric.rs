use crate::SmpError;

/// Floating point type used throughout the engine
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SmpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SmpError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, SmpError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(SmpError::NonPositive { what, value: v })
    }
}

/// Checks `index < len`, reporting `what` on failure.
pub fn ensure_index(index: usize, len: usize, what: &'static str) -> Result<usize, SmpError> {
    if index < len {
        Ok(index)
    } else {
        Err(SmpError::IndexOob { what, index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_infinity() {
        assert!(matches!(
            ensure_positive(0.0, "rate"),
            Err(SmpError::NonPositive { what: "rate", .. })
        ));
        assert!(matches!(
            ensure_positive(Real::INFINITY, "rate"),
            Err(SmpError::NonFinite { .. })
        ));
        assert_eq!(ensure_positive(0.5, "rate"), Ok(0.5));
    }

    #[test]
    fn ensure_index_reports_len() {
        assert_eq!(ensure_index(2, 3, "state"), Ok(2));
        let err = ensure_index(3, 3, "state").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Index out of bounds: state (index=3, len=3)"
        );
    }

    proptest::proptest! {
        #[test]
        fn ensure_index_accepts_exactly_in_range(index in 0usize..64, len in 0usize..64) {
            proptest::prop_assert_eq!(ensure_index(index, len, "i").is_ok(), index < len);
        }
    }
}
