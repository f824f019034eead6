//! Reference interpolation schemes for the interpolating transfer method.

use tandem_core::evaluate::check_evaluate_inputs;
use tandem_core::{Coord, EvaluateError, EvaluationMethod, Evaluator, Real};

/// Squared Euclidean distance; missing trailing components read as zero,
/// so coordinates of mixed dimensionality compare sensibly.
fn dist2(a: &Coord, b: &Coord) -> f64 {
    let dims = a.len().max(b.len());
    (0..dims)
        .map(|i| {
            let d = a.get(i).copied().unwrap_or(0.0) - b.get(i).copied().unwrap_or(0.0);
            d * d
        })
        .sum()
}

/// The `degree + 1` source points nearest to `target`, ascending by
/// distance with index as the tie-breaker. `total_cmp` keeps the order
/// deterministic for any finite inputs.
fn nearest_support(source_coords: &[Coord], target: &Coord, count: usize) -> Vec<(f64, usize)> {
    let mut ranked: Vec<(f64, usize)> = source_coords
        .iter()
        .enumerate()
        .map(|(idx, coord)| (dist2(coord, target), idx))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.truncate(count.max(1));
    ranked
}

/// Lagrange-style reconstruction from the nearest `degree + 1` source
/// points, weighted by inverse distance.
///
/// A target that coincides with a source point takes that source value
/// exactly. The scheme is a pure function of its inputs; identical
/// inputs produce bit-identical output.
#[derive(Clone, Copy, Debug)]
pub struct LagrangeEvaluator {
    /// Polynomial degree; `degree + 1` support points per target.
    pub degree: u32,
}

impl LagrangeEvaluator {
    /// Scheme of the given degree.
    pub fn new(degree: u32) -> Self {
        Self { degree }
    }
}

impl Evaluator for LagrangeEvaluator {
    fn name(&self) -> &str {
        "lagrange"
    }

    fn evaluate(
        &self,
        source_values: &[Real],
        source_coords: &[Coord],
        target_coords: &[Coord],
    ) -> Result<Vec<Real>, EvaluateError> {
        check_evaluate_inputs(source_values, source_coords, target_coords)?;
        let support = (self.degree as usize + 1).min(source_coords.len().max(1));
        let mut out = Vec::with_capacity(target_coords.len());
        for target in target_coords {
            let ranked = nearest_support(source_coords, target, support);
            // Exact hit: reproduce the source value bit-for-bit.
            if ranked[0].0 == 0.0 {
                out.push(source_values[ranked[0].1]);
                continue;
            }
            let mut weighted = 0.0;
            let mut total = 0.0;
            for &(d2, idx) in &ranked {
                let w = 1.0 / d2;
                weighted += w * source_values[idx];
                total += w;
            }
            out.push(weighted / total);
        }
        Ok(out)
    }
}

/// Each target takes the value of its nearest source point.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestEvaluator;

impl Evaluator for NearestEvaluator {
    fn name(&self) -> &str {
        "nearest"
    }

    fn evaluate(
        &self,
        source_values: &[Real],
        source_coords: &[Coord],
        target_coords: &[Coord],
    ) -> Result<Vec<Real>, EvaluateError> {
        check_evaluate_inputs(source_values, source_coords, target_coords)?;
        Ok(target_coords
            .iter()
            .map(|target| source_values[nearest_support(source_coords, target, 1)[0].1])
            .collect())
    }
}

/// Map an [`EvaluationMethod`] to its scheme.
///
/// Returns `None` for [`EvaluationMethod::None`]; the caller only asks
/// for a scheme when the transfer options require evaluation.
pub fn evaluator_for(method: EvaluationMethod) -> Option<Box<dyn Evaluator>> {
    match method {
        EvaluationMethod::None => None,
        EvaluationMethod::Lagrange { degree } => Some(Box::new(LagrangeEvaluator::new(degree))),
        EvaluationMethod::NearestNeighbor => Some(Box::new(NearestEvaluator)),
    }
}
