use crate::activation::activation::EPSILON;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy for a softmax output:
///   L = -sum(y[i] * log(max(p[i], EPSILON)))
///
/// Summed over every entry; the clamp keeps `log(0)` out of the result.
/// `p` and `y` must share a shape.
pub fn cross_entropy(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    if predicted.shape() != expected.shape() {
        return Err(Error::ShapeMismatch {
            op: "cross_entropy",
            left: predicted.shape(),
            right: expected.shape(),
        });
    }
    Ok(predicted
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .map(|(p, y)| -y * p.max(EPSILON).ln())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_non_negative_for_one_hot_targets() {
        let p = Matrix::column(vec![0.2, 0.5, 0.3]);
        for hot in 0..3 {
            let mut y = vec![0.0; 3];
            y[hot] = 1.0;
            let loss = cross_entropy(&p, &Matrix::column(y)).unwrap();
            assert!(loss >= 0.0);
        }
    }

    #[test]
    fn loss_approaches_zero_as_hot_probability_approaches_one() {
        let y = Matrix::column(vec![0.0, 1.0]);
        let far = cross_entropy(&Matrix::column(vec![0.5, 0.5]), &y).unwrap();
        let near = cross_entropy(&Matrix::column(vec![0.001, 0.999]), &y).unwrap();
        let exact = cross_entropy(&Matrix::column(vec![0.0, 1.0]), &y).unwrap();
        assert!((far - 2f64.ln()).abs() < 1e-12);
        assert!(near < far && near < 1e-2);
        assert_eq!(exact, 0.0);
    }

    #[test]
    fn zero_probability_is_clamped() {
        let loss = cross_entropy(&Matrix::column(vec![1.0, 0.0]), &Matrix::column(vec![0.0, 1.0]))
            .unwrap();
        assert!((loss - (-EPSILON.ln())).abs() < 1e-9);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = cross_entropy(&Matrix::zeros(3, 1), &Matrix::zeros(1, 3)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { op: "cross_entropy", .. }));
    }
}
