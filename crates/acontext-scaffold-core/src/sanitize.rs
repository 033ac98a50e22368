//! Project name sanitizing for package ecosystems.
//!
//! Turns a free-form display name (`"My Acontext App"`) into the package
//! identifier a given ecosystem expects (`my_acontext_app` for Python,
//! `my-acontext-app` for npm).

use std::fmt;

/// Package naming convention of a target ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageFormat {
    /// PEP 503-style names joined with `_`.
    Python,
    /// npm package names joined with `-`.
    Npm,
}

impl PackageFormat {
    /// The single separator this format allows between words.
    pub fn separator(self) -> char {
        match self {
            Self::Python => '_',
            Self::Npm => '-',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Npm => "npm",
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters treated as word boundaries in a display name.
fn is_word_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '_')
}

/// Convert a display name into a canonical package identifier for `format`.
///
/// The input is lower-cased, every run of spaces, `-` and `_` collapses into
/// one separator for the format, and separators at either end are dropped.
/// Other characters pass through lower-cased. The result may be empty when
/// the input holds nothing but separators.
pub fn sanitize(display_name: &str, format: PackageFormat) -> String {
    let lowered = display_name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for word in lowered.split(is_word_separator).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(format.separator());
        }
        out.push_str(word);
    }

    out
}
