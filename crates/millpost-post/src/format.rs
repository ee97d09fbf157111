//! Fixed-precision number formatting for G-code words
//!
//! Rounding is half away from zero (`f64::round`) applied to the scaled
//! value, so `0.0005` at three decimals becomes `0.001` and `-0.0005`
//! becomes `-0.001`. Values are binary floats: a decimal tie that is not
//! exactly representable (e.g. `2.675`) rounds by its actual binary value.
//! Negative zero, including negative values that round to zero, is printed
//! as `0`.

/// Number formatter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimals: u8,
    trailing_zeros: bool,
    force_sign: bool,
}

impl NumberFormat {
    /// Formatter with `decimals` fraction digits, trailing zeros trimmed
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            trailing_zeros: false,
            force_sign: false,
        }
    }

    /// Keep trailing zeros (`1.500` instead of `1.5`)
    pub fn with_trailing_zeros(mut self) -> Self {
        self.trailing_zeros = true;
        self
    }

    /// Prefix positive values with `+`
    pub fn with_sign(mut self) -> Self {
        self.force_sign = true;
        self
    }

    /// Round `value` to the configured precision
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(i32::from(self.decimals));
        let rounded = (value * scale).round() / scale;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Render `value`
    pub fn format(&self, value: f64) -> String {
        let rounded = self.round(value);
        let mut text = format!("{:.*}", usize::from(self.decimals), rounded);

        if !self.trailing_zeros && text.contains('.') {
            let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
            text.truncate(trimmed);
        }

        if self.force_sign && rounded > 0.0 {
            text.insert(0, '+');
        }
        text
    }
}
