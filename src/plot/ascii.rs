//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of spectra in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Both axes are logarithmic. Plot elements:
//! - data points: `.`
//! - reference curve (e.g. the ASD): `-` line, drawn over the points

/// Render a log-log plot of `points` with `curve` on top.
///
/// Non-positive and non-finite samples are dropped (they have no logarithm).
pub fn render_spectrum_plot(curve: &[(f64, f64)], points: &[(f64, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let curve = to_log(curve);
    let points = to_log(points);

    let Some((x_min, x_max, y_min, y_max)) = ranges(&curve, &points) else {
        return "Plot: no positive samples to show\n".to_string();
    };
    let (y_lo, y_hi) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for &(x, y) in &points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_lo, y_hi, height);
        grid[row][col] = '.';
    }
    draw_curve(&mut grid, &curve, x_min, x_max, y_lo, y_hi);

    // Header shows the unpadded data ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: f=[{:.1}, {:.1}] Hz | y=[{:.2e}, {:.2e}] (log-log)\n",
        10f64.powf(x_min),
        10f64.powf(x_max),
        10f64.powf(y_min),
        10f64.powf(y_max),
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn to_log(samples: &[(f64, f64)]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
        .map(|(x, y)| (x.log10(), y.log10()))
        .collect()
}

fn ranges(curve: &[(f64, f64)], points: &[(f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in curve.iter().chain(points) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_max > x_min && y_max > y_min {
        Some((x_min, x_max, y_min, y_max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
