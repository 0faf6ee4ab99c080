//! Derivative-free minimisation for parameter estimation.

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on both objective spread and simplex size.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrinkage coefficient.
    pub sigma: f64,
    /// Initial simplex step, relative to the starting coordinate.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Simplex vertices kept sorted from best to worst after each `order` call.
struct Simplex {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    fn order(&mut self) {
        let mut idx: Vec<usize> = (0..self.values.len()).collect();
        idx.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        self.vertices = idx.iter().map(|&i| self.vertices[i].clone()).collect();
        self.values = idx.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.values.len() - 1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let dims = self.vertices[0].len();
        let count = self.worst() as f64;
        let mut centroid = vec![0.0; dims];
        for vertex in &self.vertices[..self.worst()] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    fn spread(&self) -> f64 {
        self.values[self.worst()] - self.values[0]
    }

    fn diameter(&self, centroid: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|v| distance(v, centroid))
            .fold(0.0, f64::max)
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let worst = self.worst();
        self.vertices[worst] = point;
        self.values[worst] = value;
    }
}

/// Minimise `objective` starting from `initial`, optionally clamping every
/// candidate point into per-coordinate `bounds`.
///
/// NaN objective values are treated as `+inf`, so a penalised region simply
/// repels the simplex.
///
/// # Example
/// ```
/// use sarima_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let start = clamp(initial.to_vec(), bounds);
    let mut vertices = vec![start.clone()];
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        vertices.push(clamp(vertex, bounds));
    }
    let values = vertices.iter().map(|v| eval(v)).collect();
    let mut simplex = Simplex { vertices, values };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.order();

        let centroid = simplex.centroid();
        if simplex.spread() < config.tolerance || simplex.diameter(&centroid) < config.tolerance {
            converged = true;
            break;
        }

        let best = simplex.values[0];
        let second_worst = simplex.values[n - 1];
        let worst = simplex.values[n];
        let worst_point = simplex.vertices[n].clone();

        let reflected = clamp(towards(&centroid, &worst_point, -config.alpha), bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let expanded = clamp(towards(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex.replace_worst(expanded, expanded_value);
            } else {
                simplex.replace_worst(reflected, reflected_value);
            }
            continue;
        }

        if reflected_value < second_worst {
            simplex.replace_worst(reflected, reflected_value);
            continue;
        }

        let (contracted, accept_at) = if reflected_value < worst {
            (towards(&centroid, &reflected, config.rho), reflected_value)
        } else {
            (towards(&centroid, &worst_point, config.rho), worst)
        };
        let contracted = clamp(contracted, bounds);
        let contracted_value = eval(&contracted);
        if contracted_value < accept_at {
            simplex.replace_worst(contracted, contracted_value);
            continue;
        }

        let anchor = simplex.vertices[0].clone();
        for i in 1..=n {
            let shrunk = clamp(towards(&anchor, &simplex.vertices[i], config.sigma), bounds);
            simplex.values[i] = eval(&shrunk);
            simplex.vertices[i] = shrunk;
        }
    }

    simplex.order();
    NelderMeadResult {
        optimal_point: simplex.vertices.swap_remove(0),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}

/// `origin + t * (target - origin)`.
fn towards(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nelder_mead_quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], 3.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn nelder_mead_rosenbrock() {
        let config = NelderMeadConfig::default()
            .with_max_iter(5000)
            .with_tolerance(1e-12);

        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[0.0, 0.0],
            None,
            &config,
        );

        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.optimal_point[1], 1.0, epsilon = 2e-2);
    }

    #[test]
    fn nelder_mead_respects_bounds() {
        // Unconstrained optimum at 5 lies outside [0, 3].
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            &NelderMeadConfig::default(),
        );

        assert_relative_eq!(result.optimal_point[0], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_treats_nan_as_penalty() {
        // Objective undefined for x < 0.5; minimum of the defined part at 1.
        let result = nelder_mead(
            |x| {
                if x[0] < 0.5 {
                    f64::NAN
                } else {
                    (x[0] - 1.0).powi(2)
                }
            },
            &[2.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.optimal_value.is_finite());
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_ar1_coefficient() {
        // Conditional sum of squares for y_t = phi * y_{t-1} with phi = 0.6.
        let mut data = vec![1.0];
        for t in 1..60 {
            let shock = ((t * 7919) % 13) as f64 / 13.0 - 0.5;
            data.push(0.6 * data[t - 1] + shock);
        }
        let css = |params: &[f64]| {
            data.windows(2)
                .map(|w| (w[1] - params[0] * w[0]).powi(2))
                .sum::<f64>()
        };

        let result = nelder_mead(css, &[0.1], Some(&[(-0.99, 0.99)]), &NelderMeadConfig::default());

        assert!(result.converged);
        assert!(result.optimal_point[0] > 0.3 && result.optimal_point[0] < 0.9);
    }

    #[test]
    fn nelder_mead_empty_initial() {
        let result = nelder_mead(|_| 0.0, &[], None, &NelderMeadConfig::default());

        assert!(!result.converged);
        assert_eq!(result.iterations, 0);
        assert!(result.optimal_value.is_nan());
    }

    #[test]
    fn nelder_mead_3d() {
        let result = nelder_mead(
            |x| x[0].powi(2) + x[1].powi(2) + x[2].powi(2),
            &[1.0, 2.0, 3.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        for coord in &result.optimal_point {
            assert_relative_eq!(*coord, 0.0, epsilon = 1e-3);
        }
    }
}
