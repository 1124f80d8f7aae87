//! One-Class SVM
//!
//! RBFカーネルによる ν-One-Class SVM の学習（SMO）と決定関数。
//!
//! Dual problem solved here:
//!
//! ```text
//! minimize   ½ αᵀKα
//! subject to 0 ≤ αᵢ ≤ 1,  Σ αᵢ = ν·l
//! ```
//!
//! Decision function: `f(x) = Σ αᵢ·exp(-γ‖x - xᵢ‖²) - ρ`, positive inside.

use crate::error::{Error, Result};
use crate::gesture::FeatureVector;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lower bound on the second-order coefficient of a pair update.
const TAU: f64 = 1e-12;

/// Rounding allowance on the upper box bound when checking stored coefficients.
const BOUND_SLACK: f64 = 1e-9;

/// RBFカーネル: `k(x, y) = exp(-γ‖x - y‖²)`
#[inline]
pub fn rbf_kernel(x: &FeatureVector, y: &FeatureVector, gamma: f64) -> f64 {
    (-gamma * x.squared_distance(y)).exp()
}

/// Solver settings
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub nu: f64,
    pub gamma: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// 学習済み One-Class SVM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneClassSvm {
    /// サポートベクター（正規化済み）
    pub support_vectors: Vec<FeatureVector>,
    /// 双対係数 αᵢ（サポートベクターと同順、すべて正）
    pub dual_coef: Vec<f64>,
    /// カーネルバンド幅
    pub gamma: f64,
    /// オフセット ρ
    pub rho: f64,
}

impl OneClassSvm {
    /// SMO で双対問題を解く
    pub fn fit(samples: &[FeatureVector], params: SolverParams) -> Result<Self> {
        let l = samples.len();
        if l == 0 {
            return Err(Error::insufficient(1, 0));
        }
        if !(params.gamma.is_finite() && params.gamma > 0.0) {
            return Err(Error::DegenerateModel(format!(
                "kernel bandwidth must be positive, got {}",
                params.gamma
            )));
        }

        let gram = Array2::from_shape_fn((l, l), |(i, j)| {
            rbf_kernel(&samples[i], &samples[j], params.gamma)
        });

        let mut alpha = initial_alpha(l, params.nu);
        let mut grad: Vec<f64> = (0..l)
            .map(|i| (0..l).map(|j| gram[[i, j]] * alpha[j]).sum())
            .collect();

        let mut iterations = 0;
        loop {
            let Some((i, j)) = select_working_set(&alpha, &grad, params.tolerance) else {
                break;
            };
            if iterations >= params.max_iterations {
                return Err(Error::DegenerateModel(format!(
                    "SMO did not converge within {} iterations",
                    params.max_iterations
                )));
            }
            iterations += 1;

            let quad = (gram[[i, i]] + gram[[j, j]] - 2.0 * gram[[i, j]]).max(TAU);
            let step = (grad[j] - grad[i]) / quad;
            let delta = clip_pair(&mut alpha, i, j, step);

            if delta != 0.0 {
                for (t, g) in grad.iter_mut().enumerate() {
                    *g += (gram[[t, i]] - gram[[t, j]]) * delta;
                }
            }
        }

        let rho = compute_rho(&alpha, &grad);
        if !rho.is_finite() {
            return Err(Error::DegenerateModel(format!("offset is not finite: {}", rho)));
        }

        let (support_vectors, dual_coef): (Vec<_>, Vec<_>) = samples
            .iter()
            .zip(alpha.iter())
            .filter(|&(_, &a)| a > 0.0)
            .map(|(x, &a)| (*x, a))
            .unzip();

        if support_vectors.is_empty() {
            return Err(Error::DegenerateModel("no support vectors".to_string()));
        }

        debug!(
            "SMO converged after {} iterations: {} support vectors, rho={:.6}",
            iterations,
            support_vectors.len(),
            rho
        );

        Ok(Self {
            support_vectors,
            dual_coef,
            gamma: params.gamma,
            rho,
        })
    }

    /// Check a boundary that did not come from `fit` (e.g. a loaded artifact).
    pub fn validate(&self) -> Result<()> {
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(Error::DegenerateModel(format!(
                "kernel bandwidth must be positive, got {}",
                self.gamma
            )));
        }
        if !self.rho.is_finite() {
            return Err(Error::DegenerateModel(format!(
                "offset is not finite: {}",
                self.rho
            )));
        }
        if self.support_vectors.is_empty() {
            return Err(Error::DegenerateModel("no support vectors".to_string()));
        }
        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(Error::DegenerateModel(format!(
                "{} support vectors but {} dual coefficients",
                self.support_vectors.len(),
                self.dual_coef.len()
            )));
        }
        if let Some(a) = self
            .dual_coef
            .iter()
            .find(|&&a| !(a > 0.0 && a <= 1.0 + BOUND_SLACK))
        {
            return Err(Error::DegenerateModel(format!(
                "dual coefficient outside (0, 1]: {}",
                a
            )));
        }
        if self
            .support_vectors
            .iter()
            .any(|sv| sv.0.iter().any(|x| !x.is_finite()))
        {
            return Err(Error::DegenerateModel(
                "support vector is not finite".to_string(),
            ));
        }
        Ok(())
    }

    /// 決定関数（境界からの符号付き距離）
    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(self.dual_coef.iter())
            .map(|(sv, a)| a * rbf_kernel(x, sv, self.gamma))
            .sum();
        sum - self.rho
    }
}

/// First `⌊ν·l⌋` coefficients at the upper bound, the next one takes the rest.
fn initial_alpha(l: usize, nu: f64) -> Vec<f64> {
    let total = nu * l as f64;
    let full = (total.floor() as usize).min(l);
    let mut alpha = vec![0.0; l];
    for a in alpha.iter_mut().take(full) {
        *a = 1.0;
    }
    if full < l {
        alpha[full] = total - full as f64;
    }
    alpha
}

/// Maximal violating pair, `None` once the violation drops below `tolerance`.
fn select_working_set(alpha: &[f64], grad: &[f64], tolerance: f64) -> Option<(usize, usize)> {
    let mut up = None;
    let mut up_value = f64::NEG_INFINITY;
    let mut low = None;
    let mut low_value = f64::NEG_INFINITY;

    for (t, (&a, &g)) in alpha.iter().zip(grad.iter()).enumerate() {
        if a < 1.0 && -g >= up_value {
            up_value = -g;
            up = Some(t);
        }
        if a > 0.0 && g >= low_value {
            low_value = g;
            low = Some(t);
        }
    }

    match (up, low) {
        (Some(i), Some(j)) if up_value + low_value >= tolerance => Some((i, j)),
        _ => None,
    }
}

/// Move `step` of mass from `alpha[j]` to `alpha[i]`, clipped to the box.
/// Returns the mass actually moved.
fn clip_pair(alpha: &mut [f64], i: usize, j: usize, step: f64) -> f64 {
    let room_i = 1.0 - alpha[i];
    let room_j = alpha[j];
    let step = step.max(0.0);

    if step >= room_i.min(room_j) {
        if room_i <= room_j {
            alpha[i] = 1.0;
            alpha[j] = (alpha[j] - room_i).max(0.0);
            room_i
        } else {
            alpha[j] = 0.0;
            alpha[i] = (alpha[i] + room_j).min(1.0);
            room_j
        }
    } else {
        alpha[i] += step;
        alpha[j] -= step;
        step
    }
}

/// ρ = mean gradient over free coefficients, otherwise the midpoint of the
/// interval implied by the bounded ones.
fn compute_rho(alpha: &[f64], grad: &[f64]) -> f64 {
    let mut upper = f64::INFINITY;
    let mut lower = f64::NEG_INFINITY;
    let mut free_sum = 0.0;
    let mut free_count = 0usize;

    for (&a, &g) in alpha.iter().zip(grad.iter()) {
        if a >= 1.0 {
            lower = lower.max(g);
        } else if a <= 0.0 {
            upper = upper.min(g);
        } else {
            free_sum += g;
            free_count += 1;
        }
    }

    if free_count > 0 {
        return free_sum / free_count as f64;
    }

    match (upper.is_finite(), lower.is_finite()) {
        (true, true) => (upper + lower) / 2.0,
        (true, false) => upper,
        (false, true) => {
            // ν = 1 puts every coefficient at the bound
            warn!("Offset interval is unbounded above; using its lower end");
            lower
        }
        (false, false) => f64::NAN,
    }
}
