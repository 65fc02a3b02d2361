use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::Result;
use crate::math::matrix::{get_sample, Matrix};
use crate::network::network::Network;
use crate::optim::momentum::Momentum;
use crate::train::epoch_stats::EpochStats;
use crate::train::metrics::Tally;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of mini-batch momentum SGD and
/// returns the statistics of every epoch.
///
/// # Arguments
/// - `network`  : mutable reference to the network; modified in place
/// - `images`   : `samples x input_size` feature matrix
/// - `labels`   : `samples x output_size` one-hot label matrix
/// - `config`   : hyperparameters
/// - `rng`      : source for the per-epoch shuffle
/// - `on_epoch` : called with each epoch's stats as soon as it completes
///
/// Every epoch reshuffles the sample order, walks it in chunks of
/// `batch_size` and applies one momentum update per chunk using the gradients
/// averaged over the chunk's actual length. There is no early exit.
///
/// # Errors
/// Fails before touching the network if the dataset is empty, its shapes do
/// not match the network, or the config is invalid.
pub fn train_loop<R, F>(
    network: &mut Network,
    images: &Matrix,
    labels: &Matrix,
    config: &TrainConfig,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<Vec<EpochStats>>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    config.validate()?;
    network.check_dataset(images, labels)?;

    let optimizer = Momentum::with_gamma(config.learning_rate, config.momentum);
    let n = images.rows();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // Shuffle sample order each epoch.
        indices.shuffle(rng);

        let tally = run_one_epoch(network, images, labels, &indices, &optimizer, config.batch_size)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss: tally.mean_loss(),
            accuracy: tally.accuracy(),
            correct: tally.correct,
            total: tally.seen,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            epoch,
            total_epochs = config.epochs,
            loss = stats.loss,
            accuracy = stats.accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );

        on_epoch(&stats);
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over `order`, one parameter update per mini-batch.
fn run_one_epoch(
    network: &mut Network,
    images: &Matrix,
    labels: &Matrix,
    order: &[usize],
    optimizer: &Momentum,
    batch_size: usize,
) -> Result<Tally> {
    let mut tally = Tally::default();

    for (batch, chunk) in order.chunks(batch_size).enumerate() {
        let mut acc_grads = network.zero_gradients();

        for &idx in chunk {
            let x = get_sample(images, idx)?;
            let y = get_sample(labels, idx)?;

            let output = network.forward_propagate(&x)?;
            let grads = network.back_propagate(&y, &output)?;
            for (acc, grad) in acc_grads.iter_mut().zip(&grads) {
                acc.accumulate(grad)?;
            }

            tally.record(&output, &y)?;
        }

        // Average over the chunk's real length; the last one may be short.
        let inv_batch = 1.0 / chunk.len() as f64;
        let avg_grads: Vec<_> = acc_grads.iter().map(|g| g.scaled(inv_batch)).collect();
        network.apply_gradients(&avg_grads, optimizer)?;

        debug!(batch, size = chunk.len(), "mini-batch applied");
    }

    Ok(tally)
}
