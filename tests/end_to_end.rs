use ferrite_mlp::{EpochStats, Matrix, Network, TrainConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn two_sample_dataset() -> (Matrix, Matrix) {
    let images = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    let labels = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    (images, labels)
}

fn train(net: &mut Network, rng: &mut StdRng, epochs: usize, lr: f64) -> Vec<EpochStats> {
    let (images, labels) = two_sample_dataset();
    net.train(&images, &labels, &TrainConfig::new(epochs, 2, lr), rng, |_| {})
        .unwrap()
}

fn mean_loss(stats: &[EpochStats]) -> f64 {
    stats.iter().map(|s| s.loss).sum::<f64>() / stats.len() as f64
}

#[test]
fn two_sample_problem_converges_for_most_random_inits() {
    let (images, labels) = two_sample_dataset();
    let mut converged = 0;

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut net = Network::new(2, 2, 2, &mut rng).unwrap();
        let history = train(&mut net, &mut rng, 50, 0.1);

        let report = net.evaluate(&images, &labels).unwrap();
        if history.last().unwrap().accuracy == 1.0 && report.accuracy == 1.0 {
            converged += 1;
            assert!(mean_loss(&history[40..]) < mean_loss(&history[..10]));
        }
    }

    // A 2-unit ReLU layer can start with every unit dead for a sample, which
    // costs roughly one seed in five.
    assert!(converged >= 70, "only {converged}/100 seeds converged");
}

#[test]
fn evaluate_matches_training_pass_when_parameters_are_frozen() {
    let (images, labels) = two_sample_dataset();
    let mut rng = StdRng::seed_from_u64(21);
    let mut net = Network::new(2, 2, 2, &mut rng).unwrap();

    // lr = 0 with zero momentum buffers: the training pass never moves the
    // parameters, so its forward passes see the same network as evaluate.
    let history = train(&mut net, &mut rng, 1, 0.0);
    let report = net.evaluate(&images, &labels).unwrap();

    assert_eq!(report.correct, history[0].correct);
    assert_eq!(report.total, history[0].total);
    assert!((report.loss - history[0].loss).abs() < 1e-12);
    assert_eq!(report.accuracy, history[0].accuracy);

    assert_eq!(net.evaluate(&images, &labels).unwrap(), report);
}

#[test]
fn predict_is_deterministic_for_fixed_parameters() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut net = Network::new(2, 4, 2, &mut rng).unwrap();
    train(&mut net, &mut rng, 10, 0.1);

    let image = Matrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
    let first = net.predict(&image).unwrap();
    for _ in 0..3 {
        assert_eq!(net.predict(&image).unwrap(), first);
    }
    assert_eq!(first.probabilities.len(), 2);
    assert!((first.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn same_seed_reproduces_the_whole_run() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut net = Network::new(2, 3, 2, &mut rng).unwrap();
        let history = train(&mut net, &mut rng, 5, 0.1);
        (history.iter().map(|s| s.loss).collect::<Vec<_>>(), net.layers()[0].weights().clone())
    };
    assert_eq!(run(9), run(9));
}
