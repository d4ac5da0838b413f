//! Gauss-Kronrod G7/K15 rule pair.

use smp_core::Real;

/// Positive Kronrod abscissae on [-1, 1], descending; the last entry is the center.
/// Odd indices (1, 3, 5) and the center are the 7-point Gauss nodes.
const KRONROD_NODES: [Real; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const KRONROD_WEIGHTS: [Real; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_18,
    0.140_653_259_715_525_92,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_83,
];

/// Gauss weights for `KRONROD_NODES[1]`, `[3]`, `[5]` and the center.
const GAUSS_WEIGHTS: [Real; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Both estimates of one interval, scaled to its width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleEstimate {
    /// 15-point Kronrod estimate (the accepted value).
    pub kronrod: Real,
    /// Embedded 7-point Gauss estimate.
    pub gauss: Real,
}

impl RuleEstimate {
    /// Local error indicator `|K15 - G7|`.
    pub fn error(&self) -> Real {
        (self.kronrod - self.gauss).abs()
    }
}

/// Evaluate the G7/K15 pair over `[a, b]` with exactly 15 calls to `f`.
pub fn gauss_kronrod_15<F>(f: &F, a: Real, b: Real) -> RuleEstimate
where
    F: Fn(Real) -> Real + ?Sized,
{
    let center = 0.5 * (a + b);
    let half_width = 0.5 * (b - a);

    let f_center = f(center);
    let mut kronrod = KRONROD_WEIGHTS[7] * f_center;
    let mut gauss = GAUSS_WEIGHTS[3] * f_center;

    for (idx, node) in KRONROD_NODES[..7].iter().enumerate() {
        let dx = half_width * node;
        let pair = f(center - dx) + f(center + dx);
        kronrod += KRONROD_WEIGHTS[idx] * pair;
        if idx % 2 == 1 {
            gauss += GAUSS_WEIGHTS[idx / 2] * pair;
        }
    }

    RuleEstimate {
        kronrod: kronrod * half_width,
        gauss: gauss * half_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn weights_sum_to_interval_length() {
        let k: Real = 2.0 * KRONROD_WEIGHTS[..7].iter().sum::<Real>() + KRONROD_WEIGHTS[7];
        let g: Real = 2.0 * GAUSS_WEIGHTS[..3].iter().sum::<Real>() + GAUSS_WEIGHTS[3];
        assert!((k - 2.0).abs() < 1e-14);
        assert!((g - 2.0).abs() < 1e-14);
    }

    #[test]
    fn exact_for_low_degree_polynomials() {
        // G7 is exact through degree 13, K15 through degree 22.
        let est = gauss_kronrod_15(&|x: Real| x.powi(12), 0.0, 1.0);
        assert!((est.kronrod - 1.0 / 13.0).abs() < 1e-14);
        assert!((est.gauss - 1.0 / 13.0).abs() < 1e-14);
        assert!(est.error() < 1e-14);

        let est = gauss_kronrod_15(&|x: Real| x.powi(20), -1.0, 1.0);
        assert!((est.kronrod - 2.0 / 21.0).abs() < 1e-13);
        assert!(est.error() > 1e-6);
    }

    #[test]
    fn uses_fifteen_evaluations() {
        let calls = Cell::new(0usize);
        let f = |x: Real| {
            calls.set(calls.get() + 1);
            x
        };
        let _ = gauss_kronrod_15(&f, 0.0, 3.0);
        assert_eq!(calls.get(), 15);
    }
}
