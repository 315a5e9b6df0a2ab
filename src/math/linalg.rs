/// Solve a tridiagonal system with the Thomas algorithm.
///
/// Row `i` reads `lower[i] * x[i-1] + diag[i] * x[i] + upper[i] * x[i+1] = rhs[i]`;
/// `lower[0]` and `upper[n-1]` are ignored. The system must be diagonally dominant enough
/// that no pivot vanishes (spline systems always are).
pub fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> anyhow::Result<Vec<f64>> {
    let n = diag.len();
    anyhow::ensure!(n > 0, "empty tridiagonal system");
    anyhow::ensure!(
        lower.len() == n && upper.len() == n && rhs.len() == n,
        "tridiagonal bands must all have length {}",
        n
    );

    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    let mut pivot = diag[0];
    anyhow::ensure!(pivot != 0.0, "zero pivot at row 0");
    c[0] = upper[0] / pivot;
    d[0] = rhs[0] / pivot;

    // Forward sweep
    for i in 1..n {
        pivot = diag[i] - lower[i] * c[i - 1];
        anyhow::ensure!(pivot != 0.0, "zero pivot at row {}", i);
        c[i] = upper[i] / pivot;
        d[i] = (rhs[i] - lower[i] * d[i - 1]) / pivot;
    }

    // Back substitution
    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    Ok(x)
}
