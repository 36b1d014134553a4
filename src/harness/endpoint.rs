use std::fmt;
use std::str::FromStr;

use super::error::HarnessError;

/// A path relative to the base URL, e.g. `sync-slow` or `runpod/echo`.
///
/// Rejects anything that would not stay under the base URL: absolute URLs,
/// leading slashes, whitespace, query strings, fragments, and `..` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses an ordered list, failing on the first malformed entry.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, HarnessError> {
        raw.iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl FromStr for Endpoint {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = s.is_empty()
            || s.starts_with('/')
            || s.contains("://")
            || s.chars().any(|c| c.is_whitespace() || matches!(c, '?' | '#' | '\\'))
            || s.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
        if invalid {
            return Err(HarnessError::InvalidEndpoint(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_paths() {
        let ep: Endpoint = "huggingface/sentiment".parse().unwrap();
        assert_eq!(ep.as_str(), "huggingface/sentiment");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "/sync-slow", "http://x/y", "a b", "a?b=1", "a//b", "../etc", "x#y"] {
            assert!(bad.parse::<Endpoint>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn parse_all_fails_on_any_bad_entry() {
        let err = Endpoint::parse_all(&["sync-slow", "", "async-slow"]).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidEndpoint(s) if s.is_empty()));
    }
}
