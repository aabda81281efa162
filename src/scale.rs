//! "Nice number" axis scale for charts.
//!
//! Bounds and tick spacing are rounded to 1, 2 or 5 × 10^n so gridlines
//! fall on readable values.

/// Lower/upper bounds and tick spacing of a chart axis.
///
/// `upper_bound - lower_bound` is always a whole multiple of
/// `tick_spacing`, up to floating point rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    lower: f64,
    upper: f64,
    tick: f64,
}

impl AxisScale {
    pub const DEFAULT_TICKS: usize = 10;

    pub fn new(lower: f64, upper: f64) -> Self {
        Self::with_ticks(lower, upper, Self::DEFAULT_TICKS)
    }

    /// Computes a scale for the given raw bounds, aiming for at most
    /// `max_ticks` ticks (at least 2).
    pub fn with_ticks(lower: f64, upper: f64, max_ticks: usize) -> Self {
        let max_ticks = max_ticks.max(2);
        let (mut lower, mut upper) = (lower, upper);

        if lower == upper {
            lower -= lower.abs() * 0.01;
            upper += upper.abs() * 0.01;
        }
        if lower > upper {
            std::mem::swap(&mut lower, &mut upper);
        }

        // keep data off the chart border
        let range = upper - lower;
        if upper > 0.0 {
            upper += range * 0.01;
        }
        if lower < 0.0 {
            lower -= range * 0.01;
        }
        if lower == 0.0 && upper == 0.0 {
            upper = 1.0;
        }

        let range = nice_number(upper - lower, false);
        let tick = nice_number(range / (max_ticks - 1) as f64, true);
        Self {
            lower: (lower / tick).floor() * tick,
            upper: (upper / tick).ceil() * tick,
            tick,
        }
    }

    /// Scale with a caller-chosen tick spacing; bounds are snapped outward
    /// to multiples of it.
    pub fn with_spacing(lower: f64, upper: f64, tick: f64) -> Self {
        if tick <= 0.0 || !tick.is_finite() {
            return Self::new(lower, upper);
        }
        let (lower, upper) = (lower.min(upper), lower.max(upper));
        let mut scale = Self {
            lower: (lower / tick).floor() * tick,
            upper: (upper / tick).ceil() * tick,
            tick,
        };
        if scale.upper <= scale.lower {
            scale.upper = scale.lower + tick;
        }
        scale
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper
    }

    pub fn tick_spacing(&self) -> f64 {
        self.tick
    }

    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    /// Number of tick positions, both bounds included.
    pub fn tick_count(&self) -> usize {
        (self.range() / self.tick).round() as usize + 1
    }

    /// Tick values from the lower to the upper bound.
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.tick_count()).map(move |i| self.lower + i as f64 * self.tick)
    }
}

/// Rounds `x` to 1, 2, 5 or 10 × 10^n. With `round` the closest nice
/// number is taken, otherwise the smallest one not below `x`.
fn nice_number(x: f64, round: bool) -> f64 {
    if x <= 0.0 || !x.is_finite() {
        return 1.0;
    }
    let exponent = x.log10().floor();
    let base = 10f64.powf(exponent);
    let fraction = x / base;
    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}
