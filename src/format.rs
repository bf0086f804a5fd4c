//! # format.rs
//!
//! Human-readable rendering of evaluation results.
//!
//! Real numbers are rounded to a fixed number of significant digits so that
//! binary floating-point artifacts (`0.30000000000000004`) never reach the
//! display. Values whose magnitude is below the zero threshold print as `0`.
//! Every string produced here parses back to the same displayed value.

use num_complex::Complex;

/// Default number of significant digits.
pub const DEFAULT_PRECISION: usize = 14;

/// Default magnitude below which a component is treated as zero.
pub const DEFAULT_ZERO_THRESHOLD: f64 = 1.0e-14;

/// Plain decimal notation is used for magnitudes in `[1e-7, 1e21)`.
const MIN_PLAIN_EXPONENT: i32 = -7;
const MAX_PLAIN_EXPONENT: i32 = 21;

/// Formatting rules for real and complex results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFormat {
    precision: usize,
    zero_threshold: f64,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION, DEFAULT_ZERO_THRESHOLD)
    }
}

impl NumberFormat {
    /// Creates a format with `precision` significant digits (at least one).
    pub fn new(precision: usize, zero_threshold: f64) -> Self {
        Self {
            precision: precision.max(1),
            zero_threshold,
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn zero_threshold(&self) -> f64 {
        self.zero_threshold
    }

    /// Maps noise below the zero threshold (and `-0`) to `0`.
    fn clean(&self, x: f64) -> f64 {
        if x.abs() < self.zero_threshold || x == 0.0 {
            0.0
        } else {
            x
        }
    }

    /// Formats a real number.
    ///
    /// # Examples
    ///
    /// ```
    /// use complexcalc::format::NumberFormat;
    ///
    /// let format = NumberFormat::default();
    /// assert_eq!(format.format_real(0.1 + 0.2), "0.3");
    /// assert_eq!(format.format_real(-2.5e-9), "-2.5e-9");
    /// assert_eq!(format.format_real(1.0e21), "1e+21");
    /// ```
    pub fn format_real(&self, x: f64) -> String {
        let x = self.clean(x);
        if x == 0.0 {
            return "0".to_string();
        }
        if !x.is_finite() {
            return x.to_string();
        }

        let scientific = format!("{:.*e}", self.precision - 1, x.abs());
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return x.to_string();
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            return x.to_string();
        };

        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let digits = digits.trim_end_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };

        let body = if (MIN_PLAIN_EXPONENT..MAX_PLAIN_EXPONENT).contains(&exponent) {
            Self::plain(digits, exponent)
        } else {
            Self::exponential(digits, exponent)
        };

        if x < 0.0 {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// `digits` = `d0 d1 d2 ...` meaning `d0.d1d2... * 10^exponent`.
    fn plain(digits: &str, exponent: i32) -> String {
        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            return format!("0.{}{}", zeros, digits);
        }

        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    }

    fn exponential(digits: &str, exponent: i32) -> String {
        let (head, tail) = digits.split_at(1);
        let sign = if exponent < 0 { '-' } else { '+' };
        if tail.is_empty() {
            format!("{}e{}{}", head, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", head, tail, sign, exponent.abs())
        }
    }

    /// Formats a complex number.
    ///
    /// - imaginary part zero: the real part alone
    /// - real part zero: `i`, `-i`, or `<im>i`
    /// - otherwise `<re> + <im>i` or `<re> - <|im|>i`, with a unit coefficient omitted
    ///
    /// # Examples
    ///
    /// ```
    /// use complexcalc::format::NumberFormat;
    /// use num_complex::Complex;
    ///
    /// let format = NumberFormat::default();
    /// assert_eq!(format.format(Complex::new(3.0, 0.0)), "3");
    /// assert_eq!(format.format(Complex::new(0.0, -1.0)), "-i");
    /// assert_eq!(format.format(Complex::new(0.0, 2.0)), "2i");
    /// assert_eq!(format.format(Complex::new(1.0, -1.0)), "1 - i");
    /// assert_eq!(format.format(Complex::new(1.5, 2.0)), "1.5 + 2i");
    /// ```
    pub fn format(&self, z: Complex<f64>) -> String {
        let re = self.clean(z.re);
        let im = self.clean(z.im);

        if im == 0.0 {
            return self.format_real(re);
        }

        let magnitude = self.format_real(im.abs());
        let coefficient = if magnitude == "1" { "" } else { magnitude.as_str() };

        if re == 0.0 {
            let sign = if im < 0.0 { "-" } else { "" };
            return format!("{}{}i", sign, coefficient);
        }

        let sign = if im < 0.0 { '-' } else { '+' };
        format!("{} {} {}i", self.format_real(re), sign, coefficient)
    }
}
