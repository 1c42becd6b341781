//! Machine-readable error codes shared by all applier crates.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! the sequencer can record *why* a request left the pipeline without
//! carrying the concrete error type around.
//!
//! # Example
//!
//! ```
//! use applier_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LoadError {
//!     Missing,
//!     Busy,
//! }
//!
//! impl ErrorCode for LoadError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing => "LOAD_MISSING",
//!             Self::Busy => "LOAD_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(LoadError::Busy.code(), "LOAD_BUSY");
//! assert!(!LoadError::Missing.is_recoverable());
//! ```

/// Unified error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**, e.g. `"STORE_NOT_FOUND"`
/// - **Prefixed by crate area**: `STORE_`, `SEQUENCER_`, `REQUEST_`, `CONFIG_`
/// - **Stable**: codes end up in logs and dispatch reports
pub trait ErrorCode {
    /// Returns the machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns whether the failure is local to one request.
    ///
    /// A recoverable error never stops the sequencer; it only removes the
    /// affected request from the pipeline.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// Intended for unit tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// ```
/// use applier_types::{assert_error_code, ErrorCode};
///
/// struct Gone;
/// impl ErrorCode for Gone {
///     fn code(&self) -> &'static str { "STORE_GONE" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Gone, "STORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Runs [`assert_error_code`] over a list of variants.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Sample {
        Local,
        Fatal,
    }

    impl ErrorCode for Sample {
        fn code(&self) -> &'static str {
            match self {
                Self::Local => "SAMPLE_LOCAL",
                Self::Fatal => "SAMPLE_FATAL",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Local)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(Sample::Local.code(), "SAMPLE_LOCAL");
        assert!(Sample::Local.is_recoverable());
        assert!(!Sample::Fatal.is_recoverable());
    }

    #[test]
    fn all_variants_pass_assertion() {
        assert_error_codes(&[Sample::Local, Sample::Fatal], "SAMPLE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&Sample::Local, "STORE_");
    }

    #[test]
    fn snake_case_detection() {
        assert!(is_upper_snake_case("STORE_NOT_FOUND"));
        assert!(is_upper_snake_case("E2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("store"));
        assert!(!is_upper_snake_case("_STORE"));
        assert!(!is_upper_snake_case("STORE_"));
        assert!(!is_upper_snake_case("STORE__X"));
    }
}
