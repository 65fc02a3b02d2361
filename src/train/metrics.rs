use crate::error::Result;
use crate::loss::cross_entropy::cross_entropy;
use crate::math::matrix::Matrix;

/// Index of the first maximum element. Ties go to the lowest index because the
/// scan only moves on a strictly greater value. Empty input yields 0.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Summary of a forward-only pass over a labelled dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
    /// Mean cross-entropy per sample.
    pub loss: f64,
    /// `correct / total`
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

/// Running loss and accuracy counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    pub total_loss: f64,
    pub correct: usize,
    pub seen: usize,
}

impl Tally {
    /// Adds one sample's cross-entropy and whether its argmax class matches the
    /// hot index of the one-hot `expected`.
    pub fn record(&mut self, predicted: &Matrix, expected: &Matrix) -> Result<()> {
        self.total_loss += cross_entropy(predicted, expected)?;
        if argmax(predicted.as_slice()) == argmax(expected.as_slice()) {
            self.correct += 1;
        }
        self.seen += 1;
        Ok(())
    }

    pub fn mean_loss(&self) -> f64 {
        self.total_loss / self.seen as f64
    }

    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.seen as f64
    }

    pub fn report(&self) -> EvalReport {
        EvalReport {
            loss: self.mean_loss(),
            accuracy: self.accuracy(),
            correct: self.correct,
            total: self.seen,
        }
    }
}
