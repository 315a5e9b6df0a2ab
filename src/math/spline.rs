use crate::math::linalg::solve_tridiagonal;

/// Interpolating cubic spline with not-a-knot end conditions.
///
/// Passes through every node exactly. Outside `[x_0, x_{n-1}]` the end segments' cubics are
/// continued, so callers that must stay bounded clamp or range-check themselves.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    // second derivative at each node
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn not_a_knot(xs: &[f64], ys: &[f64]) -> anyhow::Result<Self> {
        let n = xs.len();
        anyhow::ensure!(n >= 4, "not-a-knot spline needs at least 4 nodes, got {}", n);
        anyhow::ensure!(ys.len() == n, "xs.len ({}) != ys.len ({})", n, ys.len());
        anyhow::ensure!(xs.windows(2).all(|w| w[0] < w[1]), "spline nodes must be strictly increasing");
        anyhow::ensure!(ys.iter().all(|y| y.is_finite()), "spline values must be finite");

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Unknowns are M_1..M_{n-2}; M_0 and M_{n-1} are eliminated through the
        // not-a-knot conditions (continuous third derivative at x_1 and x_{n-2}).
        let k = n - 2;
        let mut lower = vec![0.0; k];
        let mut diag = vec![0.0; k];
        let mut upper = vec![0.0; k];
        let mut rhs = vec![0.0; k];
        for r in 0..k {
            let i = r + 1;
            lower[r] = h[i - 1];
            diag[r] = 2.0 * (h[i - 1] + h[i]);
            upper[r] = h[i];
            rhs[r] = 6.0 * (slope[i] - slope[i - 1]);
        }

        let (h0, h1) = (h[0], h[1]);
        diag[0] += h0 * (h0 + h1) / h1;
        upper[0] -= h0 * h0 / h1;

        let (ha, hb) = (h[n - 3], h[n - 2]);
        diag[k - 1] += hb * (ha + hb) / ha;
        lower[k - 1] -= hb * hb / ha;

        let inner = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;

        let mut m = Vec::with_capacity(n);
        m.push(((h0 + h1) * inner[0] - h0 * inner[1]) / h1);
        m.extend_from_slice(&inner);
        m.push(((ha + hb) * inner[k - 1] - hb * inner[k - 2]) / ha);

        Ok(Self { xs: xs.to_vec(), ys: ys.to_vec(), m })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.binary_search_by(|v| v.total_cmp(&x)) {
            Ok(i) => return self.ys[i],
            Err(p) => p.clamp(1, n - 1) - 1,
        };

        let h = self.xs[i + 1] - self.xs[i];
        let a = self.xs[i + 1] - x;
        let b = x - self.xs[i];
        (self.m[i] * a * a * a + self.m[i + 1] * b * b * b) / (6.0 * h)
            + (self.ys[i] / h - self.m[i] * h / 6.0) * a
            + (self.ys[i + 1] / h - self.m[i + 1] * h / 6.0) * b
    }
}
