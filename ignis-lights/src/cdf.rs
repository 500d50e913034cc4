//! The "simple" light selector: a 1-D cumulative distribution function over
//! finite-light flux estimates (§4.4 Light selector, "simple").

/// A normalized 1-D CDF over a fixed set of weights, used for
/// importance-sampling which light to query on a given shadow ray.
#[derive(Debug, Clone, PartialEq)]
pub struct Cdf {
    /// Cumulative weights, `values[i]` is the sum of `weights[0..=i]`
    /// divided by the total. `values.last() == Some(&1.0)` unless empty.
    values: Vec<f32>,
}

impl Cdf {
    /// Builds a CDF from per-light flux estimates. A non-finite or
    /// non-positive weight is treated as zero, so a light with zero
    /// estimated flux is never selected but does not poison the
    /// normalization of its neighbors.
    pub fn build(weights: &[f32]) -> Self {
        let mut running = 0.0f32;
        let mut values = Vec::with_capacity(weights.len());
        for &w in weights {
            let w = if w.is_finite() && w > 0.0 { w } else { 0.0 };
            running += w;
            values.push(running);
        }
        let total = running;
        if total > 0.0 {
            for v in &mut values {
                *v /= total;
            }
        }
        Cdf { values }
    }

    /// Number of entries.
    pub fn len(&self) -> usize { self.values.len() }

    /// Whether the CDF has no entries.
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// The raw cumulative value array, ready for the fixed-table blob
    /// write the device-side `make_cdf_light_selector` reads.
    pub fn as_slice(&self) -> &[f32] { &self.values }

    /// Finds the index selected by a uniform sample `u` in `[0, 1)`, via
    /// binary search over the cumulative values.
    pub fn sample(&self, u: f32) -> Option<usize> {
        if self.values.is_empty() {
            return None;
        }
        match self.values.binary_search_by(|v| v.partial_cmp(&u).unwrap()) {
            Ok(i) => Some(i),
            Err(i) => Some(i.min(self.values.len() - 1)),
        }
    }

    /// The discrete probability of index `i` having been selected.
    pub fn pdf(&self, i: usize) -> f32 {
        if i >= self.values.len() {
            return 0.0;
        }
        let prev = if i == 0 { 0.0 } else { self.values[i - 1] };
        self.values[i] - prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_of_uniform_weights_is_evenly_spaced() {
        let cdf = Cdf::build(&[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(cdf.as_slice(), &[0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn zero_weight_light_is_never_sampled() {
        let cdf = Cdf::build(&[1.0, 0.0, 1.0]);
        assert_eq!(cdf.pdf(1), 0.0);
    }

    #[test]
    fn empty_cdf_samples_to_none() {
        let cdf = Cdf::build(&[]);
        assert_eq!(cdf.sample(0.5), None);
    }

    #[test]
    fn sample_respects_cumulative_ranges() {
        let cdf = Cdf::build(&[1.0, 3.0]);
        assert_eq!(cdf.sample(0.1), Some(0));
        assert_eq!(cdf.sample(0.5), Some(1));
    }
}
