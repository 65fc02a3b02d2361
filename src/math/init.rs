//! Weight-initialization samplers.
//!
//! Both draw a single value per call from a zero-mean normal distribution; the
//! caller owns the generator so runs can be seeded.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

fn sample_normal<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> Result<f64> {
    let normal = Normal::new(0.0, std_dev).map_err(|e| {
        Error::InvalidTopology(format!("cannot sample N(0, {}): {}", std_dev, e))
    })?;
    Ok(normal.sample(rng))
}

/// Kaiming (He) initialization: N(0, sqrt(2 / in_features)).
///
/// Used for every weight of a ReLU layer. The variance 2/fan_in accounts for
/// ReLU zeroing half of its inputs on average. A zero `in_features` is an
/// `InvalidTopology` error.
pub fn kaiming_normal_init<R: Rng + ?Sized>(rng: &mut R, in_features: usize) -> Result<f64> {
    if in_features == 0 {
        return Err(Error::InvalidTopology("kaiming init needs a non-zero fan-in".to_owned()));
    }
    let std_dev = (2.0 / in_features as f64).sqrt();
    sample_normal(rng, std_dev)
}

/// Xavier (Glorot) initialization: N(0, sqrt(2 / (in_features + out_features))).
///
/// Used for every weight of the softmax output layer.
pub fn xavier_normal_init<R: Rng + ?Sized>(
    rng: &mut R,
    in_features: usize,
    out_features: usize,
) -> Result<f64> {
    if in_features == 0 || out_features == 0 {
        return Err(Error::InvalidTopology(format!(
            "xavier init needs non-zero fan-in and fan-out, got {} and {}",
            in_features, out_features
        )));
    }
    let std_dev = (2.0 / (in_features + out_features) as f64).sqrt();
    sample_normal(rng, std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DRAWS: usize = 50_000;

    fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        (mean, var)
    }

    #[test]
    fn kaiming_matches_target_variance() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<f64> = (0..DRAWS).map(|_| kaiming_normal_init(&mut rng, 8).unwrap()).collect();
        let (mean, var) = mean_and_variance(&samples);
        let target = 2.0 / 8.0;
        assert!(mean.abs() < 0.02, "mean {mean}");
        assert!((var - target).abs() / target < 0.05, "variance {var} vs {target}");
    }

    #[test]
    fn xavier_matches_target_variance() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f64> =
            (0..DRAWS).map(|_| xavier_normal_init(&mut rng, 6, 10).unwrap()).collect();
        let (mean, var) = mean_and_variance(&samples);
        let target = 2.0 / 16.0;
        assert!(mean.abs() < 0.01, "mean {mean}");
        assert!((var - target).abs() / target < 0.05, "variance {var} vs {target}");
    }

    #[test]
    fn same_seed_gives_same_draws() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(
                kaiming_normal_init(&mut a, 4).unwrap(),
                kaiming_normal_init(&mut b, 4).unwrap()
            );
        }
    }

    #[test]
    fn zero_fan_in_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = kaiming_normal_init(&mut rng, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidTopology(_)));
        assert!(err.is_precondition_violation());

        assert!(matches!(xavier_normal_init(&mut rng, 0, 0), Err(Error::InvalidTopology(_))));
        assert!(xavier_normal_init(&mut rng, 0, 3).is_err());
        assert!(xavier_normal_init(&mut rng, 3, 0).is_err());
    }
}
