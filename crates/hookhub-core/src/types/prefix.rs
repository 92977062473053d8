//! Disambiguation prefix patterns for form hooks.

use std::fmt;
use std::str::FromStr;

use crate::error::HooksError;

/// A printf-like pattern with exactly one integer placeholder.
///
/// The placeholder is `%d` or `%i`, optionally with a width (`%3d`) or a
/// zero-padded width (`%03d`). `%%` stands for a literal percent sign.
/// Formatting with the member's position yields the token that keeps field
/// names of several hooked forms apart on one page (`hook0`, `hook1`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPattern {
    raw: String,
    head: String,
    tail: String,
    width: usize,
    zero_pad: bool,
}

impl PrefixPattern {
    /// Parses a pattern, rejecting anything without exactly one integer
    /// placeholder.
    pub fn parse(raw: &str) -> Result<Self, HooksError> {
        let mut head = String::new();
        let mut tail = String::new();
        let mut placeholder: Option<(usize, bool)> = None;
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                match placeholder {
                    Some(_) => tail.push(c),
                    None => head.push(c),
                }
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                match placeholder {
                    Some(_) => tail.push('%'),
                    None => head.push('%'),
                }
                continue;
            }

            let zero_pad = chars.next_if_eq(&'0').is_some();
            let mut digits = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                digits.push(d);
            }
            let width = if digits.is_empty() {
                0
            } else {
                digits.parse().map_err(|_| {
                    HooksError::validation(format!("Prefix pattern '{raw}' has an invalid width"))
                })?
            };

            match chars.next() {
                Some('d' | 'i') if placeholder.is_none() => placeholder = Some((width, zero_pad)),
                Some('d' | 'i') => {
                    return Err(HooksError::validation(format!(
                        "Prefix pattern '{raw}' has more than one integer placeholder"
                    )));
                }
                Some(other) => {
                    return Err(HooksError::validation(format!(
                        "Prefix pattern '{raw}' has unsupported placeholder '%{other}'"
                    )));
                }
                None => {
                    return Err(HooksError::validation(format!(
                        "Prefix pattern '{raw}' ends with a dangling '%'"
                    )));
                }
            }
        }

        let Some((width, zero_pad)) = placeholder else {
            return Err(HooksError::validation(format!(
                "Prefix pattern '{raw}' must contain a %d placeholder"
            )));
        };

        Ok(Self {
            raw: raw.to_string(),
            head,
            tail,
            width,
            zero_pad,
        })
    }

    /// Produces the token for the member at `index`.
    pub fn format(&self, index: usize) -> String {
        let width = self.width;
        let number = if self.zero_pad {
            format!("{index:0width$}")
        } else {
            format!("{index:width$}")
        };
        format!("{}{}{}", self.head, number, self.tail)
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for PrefixPattern {
    fn default() -> Self {
        Self {
            raw: "hook%d".to_string(),
            head: "hook".to_string(),
            tail: String::new(),
            width: 0,
            zero_pad: false,
        }
    }
}

impl FromStr for PrefixPattern {
    type Err = HooksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PrefixPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
