//! Sample generation: five fixed distributions plus IID bootstrap resamples.
//!
//! Each distribution is resampled with the *same* index vector so that the
//! bootstrap series stay comparable across distributions.

use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Gumbel, LogNormal, Normal, Triangular};
use serde::Serialize;

pub const MAX_DISTS: usize = 5;

pub const DIST_LABELS: [&str; MAX_DISTS] = [
    "Normal(1,1)",
    "Lognormal(1,1)",
    "Exp(1)",
    "Gumbel(6,4)",
    "Triangular(2,9,11)",
];

/// Generated samples: for each of the first `num_dists` distributions, the
/// original series followed by its bootstrap resample.
#[derive(Clone, Debug, Serialize)]
pub struct Dataset {
    /// Samples per series.
    pub n: usize,
    /// Interleaved series: `[d0, d0_boot, d1, d1_boot, ...]`.
    pub data: Vec<Vec<f64>>,
    pub num_dists: usize,
    pub labels: Vec<String>,
    /// The shared index vector used to build every bootstrap series.
    pub bootstrap_indices: Vec<usize>,
}

/// Draw `samples` values from each of the five fixed distributions, bootstrap
/// them with a shared index vector, and keep the first `num_dists`
/// distributions.
///
/// With `seed` set the output is fully deterministic.
pub fn generate(samples: usize, num_dists: usize, seed: Option<u64>) -> Result<Dataset> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(&mut rng, samples, num_dists)
}

pub fn generate_with_rng(rng: &mut impl Rng, samples: usize, num_dists: usize) -> Result<Dataset> {
    if num_dists == 0 || num_dists > MAX_DISTS {
        bail!("num_dists must be between 1 and {}", MAX_DISTS);
    }
    if samples < 2 {
        bail!("need at least 2 samples per series");
    }

    let series: [Vec<f64>; MAX_DISTS] = [
        draw(rng, samples, Normal::new(1.0, 1.0)?),
        draw(rng, samples, LogNormal::new(1.0, 1.0)?),
        draw(rng, samples, Exp::new(1.0)?),
        draw(rng, samples, Gumbel::new(6.0, 4.0)?),
        draw(rng, samples, Triangular::new(2.0, 11.0, 9.0)?),
    ];

    // One index vector for every series. The upper bound deliberately stops
    // one short of the last sample index, matching the reference data
    // generator.
    let indices: Vec<usize> = (0..samples).map(|_| rng.gen_range(0..samples - 1)).collect();

    let mut data = Vec::with_capacity(num_dists * 2);
    let mut labels = Vec::with_capacity(num_dists * 2);
    for (s, label) in series.iter().zip(DIST_LABELS).take(num_dists) {
        data.push(s.clone());
        data.push(resample(s, &indices));
        labels.push(label.to_string());
        labels.push(label.to_string());
    }

    Ok(Dataset {
        n: samples,
        data,
        num_dists,
        labels,
        bootstrap_indices: indices,
    })
}

fn draw<D: Distribution<f64>>(rng: &mut impl Rng, samples: usize, dist: D) -> Vec<f64> {
    (0..samples).map(|_| dist.sample(rng)).collect()
}

fn resample(series: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| series[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_original_and_bootstrap() {
        let ds = generate(100, 5, Some(1)).unwrap();
        assert_eq!(ds.n, 100);
        assert_eq!(ds.data.len(), 10);
        assert_eq!(ds.labels.len(), 10);
        assert_eq!(ds.labels[0], ds.labels[1]);
        assert_eq!(ds.labels[8], "Triangular(2,9,11)");
        for series in &ds.data {
            assert_eq!(series.len(), 100);
        }
    }

    #[test]
    fn bootstrap_uses_shared_indices() {
        let ds = generate(200, 5, Some(42)).unwrap();
        assert_eq!(ds.bootstrap_indices.len(), 200);
        for k in 0..ds.num_dists {
            let orig = &ds.data[2 * k];
            let boot = &ds.data[2 * k + 1];
            for (i, &idx) in ds.bootstrap_indices.iter().enumerate() {
                assert_eq!(boot[i], orig[idx]);
            }
        }
    }

    #[test]
    fn bootstrap_indices_exclude_last_sample() {
        let ds = generate(50, 1, Some(7)).unwrap();
        assert!(ds.bootstrap_indices.iter().all(|&i| i < 49));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate(64, 3, Some(9)).unwrap();
        let b = generate(64, 3, Some(9)).unwrap();
        assert_eq!(a.data, b.data);
        assert_eq!(a.bootstrap_indices, b.bootstrap_indices);
    }

    #[test]
    fn truncates_to_requested_distributions() {
        let ds = generate(32, 2, Some(3)).unwrap();
        assert_eq!(ds.num_dists, 2);
        assert_eq!(ds.data.len(), 4);
        assert_eq!(
            ds.labels,
            vec!["Normal(1,1)", "Normal(1,1)", "Lognormal(1,1)", "Lognormal(1,1)"]
        );
    }

    #[test]
    fn rejects_too_many_distributions() {
        assert!(generate(32, 6, Some(0)).is_err());
        assert!(generate(32, 0, Some(0)).is_err());
        assert!(generate(1, 2, Some(0)).is_err());
    }
}
