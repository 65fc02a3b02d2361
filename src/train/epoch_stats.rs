/// Per-epoch training statistics produced by `train_loop`.
///
/// Loss and accuracy come from the forward passes made during the epoch, so
/// they reflect the parameters as they were before each mini-batch update.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean cross-entropy over all samples in this epoch.
    pub loss: f64,
    /// `correct / total`
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
