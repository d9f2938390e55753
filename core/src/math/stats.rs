use ndarray::ArrayView2;

pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Index and value of the largest element; the first one wins on ties.
    pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
        values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, value)| match best {
                Some((_, top)) if top >= value => best,
                _ => Some((idx, value)),
            })
    }

    /// Row/column and value of the largest cell of a 2D map.
    pub fn argmax_2d(values: ArrayView2<f64>) -> Option<((usize, usize), f64)> {
        values
            .indexed_iter()
            .fold(None, |best, (cell, &value)| match best {
                Some((_, top)) if top >= value => best,
                _ => Some((cell, value)),
            })
    }
}
