// 1-D interpolation used by tabulated reaction rates.

/// Index `i` of the interval with `x[i] <= x_new < x[i + 1]`.
///
/// `x` must be sorted ascending with at least two points and `x_new` must lie
/// strictly inside `[x[0], x[n - 1])`; callers handle the end points.
fn find_interval(x: &[f64], x_new: f64) -> usize {
    let mut low = 0usize;
    let mut high = x.len() - 1; // invariant: target interval within (low, high]
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] <= x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Linear interpolation on a linear scale.
///
/// Given arrays of x and y values, interpolate to find the y value at x_new.
/// If x_new is outside the range of x, returns the first or last y value.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 {
        return y[0];
    }
    if x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }

    let idx = find_interval(x, x_new);
    let x1 = x[idx];
    let x2 = x[idx + 1];
    let y1 = y[idx];
    let y2 = y[idx + 1];
    y1 + (x_new - x1) * (y2 - y1) / (x2 - x1)
}

/// Cubic spline with not-a-knot end conditions.
///
/// The third derivative is continuous across the second and the next-to-last
/// knots. With exactly three knots this makes the spline the parabola through
/// the points; with two it is the straight line.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative of the spline at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build the spline through `(x, y)`. `x` must be sorted ascending with
    /// distinct values.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        let m = match n {
            0..=2 => vec![0.0; n],
            3 => {
                let d0 = (y[1] - y[0]) / (x[1] - x[0]);
                let d1 = (y[2] - y[1]) / (x[2] - x[1]);
                let curvature = 2.0 * (d1 - d0) / (x[2] - x[0]);
                vec![curvature; 3]
            }
            _ => not_a_knot_second_derivatives(x, y),
        };
        CubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        }
    }

    /// Evaluate the spline at `x_new`, clamping to the end values outside the
    /// knot range.
    pub fn eval(&self, x_new: f64) -> f64 {
        let n = self.x.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 || x_new <= self.x[0] {
            return self.y[0];
        }
        if x_new >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = find_interval(&self.x, x_new);
        let h = self.x[i + 1] - self.x[i];
        let left = self.x[i + 1] - x_new;
        let right = x_new - self.x[i];
        self.m[i] * left.powi(3) / (6.0 * h)
            + self.m[i + 1] * right.powi(3) / (6.0 * h)
            + (self.y[i] / h - self.m[i] * h / 6.0) * left
            + (self.y[i + 1] / h - self.m[i + 1] * h / 6.0) * right
    }
}

/// Solve for the knot second derivatives of a not-a-knot spline (n >= 4).
///
/// The end conditions are eliminated into the first and last interior rows so
/// the remaining system over M[1..n-1] is tridiagonal.
fn not_a_knot_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    let size = n - 2;
    let mut lower = vec![0.0; size];
    let mut diag = vec![0.0; size];
    let mut upper = vec![0.0; size];
    let mut rhs = vec![0.0; size];
    for k in 0..size {
        let i = k + 1;
        lower[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        upper[k] = h[i];
        rhs[k] = 6.0 * (d[i] - d[i - 1]);
    }

    diag[0] = (h[0] + h[1]) * (h[0] + 2.0 * h[1]) / h[1];
    upper[0] = (h[1] * h[1] - h[0] * h[0]) / h[1];

    let (ha, hb) = (h[n - 3], h[n - 2]);
    lower[size - 1] = (ha * ha - hb * hb) / ha;
    diag[size - 1] = (ha + hb) * (2.0 * ha + hb) / ha;

    let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs);

    let mut m = Vec::with_capacity(n);
    m.push(((h[0] + h[1]) * interior[0] - h[0] * interior[1]) / h[1]);
    m.extend_from_slice(&interior);
    m.push(((ha + hb) * interior[size - 1] - hb * interior[size - 2]) / ha);
    m
}

/// Thomas algorithm. `lower[0]` and `upper[n - 1]` are ignored.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut r = vec![0.0; n];

    c[0] = upper[0] / diag[0];
    r[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - lower[i] * c[i - 1];
        c[i] = upper[i] / denom;
        r[i] = (rhs[i] - lower[i] * r[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = r[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = r[i] - c[i] * out[i + 1];
    }
    out
}

/// Interpolation scheme chosen for a rate table column.
#[derive(Debug, Clone)]
pub enum Interpolant {
    Linear { x: Vec<f64>, y: Vec<f64> },
    Cubic(CubicSpline),
}

impl Interpolant {
    /// Linear for tables of at most two points, cubic spline otherwise.
    pub fn for_table(x: &[f64], y: &[f64]) -> Self {
        if x.len() <= 2 {
            Interpolant::Linear {
                x: x.to_vec(),
                y: y.to_vec(),
            }
        } else {
            Interpolant::Cubic(CubicSpline::new(x, y))
        }
    }

    pub fn eval(&self, x_new: f64) -> f64 {
        match self {
            Interpolant::Linear { x, y } => interpolate_linear(x, y, x_new),
            Interpolant::Cubic(spline) => spline.eval(x_new),
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, Interpolant::Cubic(_))
    }
}
