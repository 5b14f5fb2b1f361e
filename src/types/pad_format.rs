use std::fmt::Write;

use miette::IntoDiagnostic;
use regex::Regex;

use crate::result::{Error, Result};

/// A printf-style `%d` directive used to render the clip times in filenames,
/// like `%06d` (zero padded to 6 digits), `%6d` (space padded) or `%d`.
///
/// Text around the directive is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadFormat {
    prefix: String,
    suffix: String,
    width: usize,
    zero: bool,
}

impl PadFormat {
    pub const DEFAULT: &'static str = "%06d";

    pub fn parse(format: &str) -> Result<Self> {
        let re = Regex::new(r"^(?P<prefix>[^%]*)%(?P<zero>0)?(?P<width>\d+)?d(?P<suffix>[^%]*)$")
            .into_diagnostic()?;

        let cap = re
            .captures(format)
            .ok_or_else(|| Error::InvalidPadFormat(format.to_owned()))?;

        let width = match cap.name("width") {
            Some(width) => width
                .as_str()
                .parse()
                .map_err(|_| Error::InvalidPadFormat(format.to_owned()))?,
            None => 0,
        };

        Ok(Self {
            prefix: cap["prefix"].to_owned(),
            suffix: cap["suffix"].to_owned(),
            width,
            zero: cap.name("zero").is_some(),
        })
    }

    /// Render a number of seconds.
    ///
    /// The integral part is padded the way printf would. A non-zero fractional
    /// part is appended after it (`12.5` gives `000012.5`), so that two
    /// different times never render the same.
    pub fn render(&self, seconds: f64) -> String {
        // Formatted as a float to keep every digit of large values. `+ 0.` turns -0 into 0
        let integral = seconds.trunc() + 0.;
        let mut out = self.prefix.clone();

        // Writing to a String cannot fail
        let _ = if self.zero {
            write!(out, "{integral:0width$}", width = self.width)
        } else {
            write!(out, "{integral:>width$}", width = self.width)
        };

        if seconds.fract() != 0. {
            let repr = seconds.abs().to_string();
            if let Some((_, fract)) = repr.split_once('.') {
                out.push('.');
                out.push_str(fract);
            }
        }

        out.push_str(&self.suffix);
        out
    }
}

impl Default for PadFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            width: 6,
            zero: true,
        }
    }
}
