//! Trains the two-layer MNIST classifier, evaluates it on the test set and
//! classifies a handful of standalone digit images.
//!
//! Paths and hyperparameters come from `RunConfig`; point `FERRITE_MLP_CONFIG`
//! at a JSON file to override them. Logs go to stderr, the report to stdout.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_mlp::data::idx::{load_dataset, load_images};
use ferrite_mlp::{Network, Prediction, RunConfig};

fn print_prediction(prediction: &Prediction) {
    println!("Probability predictions: ");
    for (class, p) in prediction.probabilities.iter().enumerate() {
        println!("{}: {:.4} ", class, p);
    }
    println!("Prediction class: {}", prediction.class);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from_env().context("failed to load run configuration")?;

    let train = load_dataset(&config.train_images, &config.train_labels, config.output_size)
        .with_context(|| format!("failed to load training set {}", config.train_images.display()))?;
    let test = load_dataset(&config.test_images, &config.test_labels, config.output_size)
        .with_context(|| format!("failed to load test set {}", config.test_images.display()))?;
    info!(train = train.len(), test = test.len(), "datasets loaded");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = Network::new(
        config.input_size,
        config.hidden_size,
        config.output_size,
        &mut rng,
    )?;

    println!("Starting Training...");
    network.train(
        &train.images,
        &train.labels,
        &config.train_config(),
        &mut rng,
        |stats| {
            println!(
                "Epoch {}/{} - Loss: {:.4}, Accuracy: {:.4} ({}/{})",
                stats.epoch, stats.total_epochs, stats.loss, stats.accuracy, stats.correct, stats.total
            );
        },
    )?;

    let report = network.evaluate(&test.images, &test.labels)?;
    println!("\nTest Result:\n");
    println!(
        "Test Loss: {:.4}, Test Accuracy: {:.4} ({}/{})",
        report.loss, report.accuracy, report.correct, report.total
    );

    for path in &config.predict_images {
        let image = load_images(path)
            .with_context(|| format!("failed to load prediction image {}", path.display()))?;
        let prediction = network.predict(&image)?;
        print_prediction(&prediction);
    }

    Ok(())
}
