//! Shared scalar root-finder.
//!
//! Both yield solvers invert a pricing function numerically. They hand a
//! residual closure and a starting guess to [`solve_root`], which runs a
//! secant iteration (a Newton-type method whose derivative is estimated from
//! the last two iterates) and either returns a converged root or a
//! [`FinCalcError::ConvergenceFailure`]. A partially converged value is never
//! returned.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default maximum secant iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default convergence threshold on |residual|.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.0000000001);

/// Default threshold on |x_{n+1} - x_n| below which the iteration has stalled.
pub const DEFAULT_STEP_TOLERANCE: Decimal = dec!(0.000000000000001);

/// Relative offset used to place the second secant point next to the guess.
const SECANT_BUMP: Decimal = dec!(0.0001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Iteration budget and tolerances for [`solve_root`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of secant steps.
    pub max_iterations: u32,
    /// Converged once |residual| falls below this.
    pub tolerance: Decimal,
    /// A step smaller than this ends the iteration.
    pub step_tolerance: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            step_tolerance: DEFAULT_STEP_TOLERANCE,
        }
    }
}

/// A converged root and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub root: Decimal,
    pub iterations: u32,
    pub residual: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find `x` such that `f(x) = 0`, starting from `initial_guess`.
///
/// `function` names the caller in the error. An error raised by `f` at the
/// initial guess is returned unchanged; errors raised at later iterates mean
/// the iteration wandered outside the function's domain and are reported as
/// a convergence failure.
pub fn solve_root<F>(
    function: &str,
    f: F,
    initial_guess: Decimal,
    config: &SolverConfig,
) -> FinCalcResult<SolverResult>
where
    F: Fn(Decimal) -> FinCalcResult<Decimal>,
{
    let diverged = |iterations: u32, last_delta: Decimal| FinCalcError::ConvergenceFailure {
        function: function.to_string(),
        iterations,
        last_delta,
    };

    let mut x_prev = initial_guess;
    let mut f_prev = f(x_prev)?;
    if f_prev.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x_prev,
            iterations: 0,
            residual: f_prev,
        });
    }

    let scaled = x_prev.checked_mul(Decimal::ONE + SECANT_BUMP);
    let mut x_curr = if x_prev >= Decimal::ZERO {
        scaled.and_then(|x| x.checked_add(SECANT_BUMP))
    } else {
        scaled.and_then(|x| x.checked_sub(SECANT_BUMP))
    }
    .ok_or_else(|| diverged(0, f_prev))?;
    let mut f_curr = f(x_curr).map_err(|_| diverged(0, f_prev))?;

    for iteration in 1..=config.max_iterations {
        if f_curr.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x_curr,
                iterations: iteration,
                residual: f_curr,
            });
        }

        // Flat secant line: no usable slope
        let denom = f_curr
            .checked_sub(f_prev)
            .filter(|d| !d.is_zero())
            .ok_or_else(|| diverged(iteration, f_curr))?;

        let step = x_curr
            .checked_sub(x_prev)
            .and_then(|dx| f_curr.checked_mul(dx))
            .and_then(|num| num.checked_div(denom))
            .ok_or_else(|| diverged(iteration, f_curr))?;
        let x_next = x_curr
            .checked_sub(step)
            .ok_or_else(|| diverged(iteration, f_curr))?;
        let f_next = f(x_next).map_err(|_| diverged(iteration, f_curr))?;

        if step.abs() < config.step_tolerance {
            if f_next.abs() < config.tolerance {
                return Ok(SolverResult {
                    root: x_next,
                    iterations: iteration,
                    residual: f_next,
                });
            }
            return Err(diverged(iteration, f_next));
        }

        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = x_next;
        f_curr = f_next;
    }

    Err(diverged(config.max_iterations, f_curr))
}
