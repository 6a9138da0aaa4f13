//! Secret wrapper for credentials such as the LINE Notify access token.
//!
//! The token travels through clap arguments, engine context structs and
//! `Debug` output; wrapping it keeps it out of every log line.

use std::fmt;

/// Placeholder printed instead of a wrapped secret
pub const REDACTED: &str = "***REDACTED***";

/// A value that prints as [`REDACTED`] in both Debug and Display
///
/// ```
/// use listwatch_core_types::Sensitive;
///
/// let token = Sensitive::from("line-token".to_string());
/// assert_eq!(format!("{:?} {}", token, token), "***REDACTED*** ***REDACTED***");
/// assert_eq!(token.expose(), "line-token");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// The secret itself; call only where it is handed to a transport
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Sensitive<String> {
    /// True when the secret is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(Sensitive::from(String::new()).is_blank());
        assert!(Sensitive::from(" \t".to_string()).is_blank());
        assert!(!Sensitive::from("abc".to_string()).is_blank());
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct NotifyConfig {
            endpoint: String,
            token: Sensitive<String>,
        }

        let config = NotifyConfig {
            endpoint: "https://notify.example".to_string(),
            token: Sensitive::new("abc123".to_string()),
        };

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("notify.example"));
        assert!(debug_str.contains(REDACTED));
        assert!(!debug_str.contains("abc123"));
    }

    #[test]
    fn test_into_inner_returns_secret() {
        let secret = Sensitive::new(String::from("token"));
        assert_eq!(secret.into_inner(), "token");
    }
}
