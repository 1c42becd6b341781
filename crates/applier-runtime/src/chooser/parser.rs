//! Stateless parser for chooser answers typed on a terminal.
//!
//! # Example
//!
//! ```
//! use applier_runtime::chooser::{ChoiceInput, ChoiceParser};
//! use applier_types::ProfileState;
//!
//! assert_eq!(ChoiceParser::parse("1"), ChoiceInput::Select(ProfileState::On));
//! assert_eq!(ChoiceParser::parse(""), ChoiceInput::AcceptPreselected);
//! assert_eq!(ChoiceParser::parse("q"), ChoiceInput::Dismiss);
//! ```

use applier_types::ProfileState;

/// One parsed line of chooser input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceInput {
    /// An explicit pick.
    Select(ProfileState),
    /// Blank line: take the preselected option.
    AcceptPreselected,
    /// Close without picking.
    Dismiss,
    /// Anything else; the prompt is repeated.
    Unknown(String),
}

/// Stateless chooser input parser.
pub struct ChoiceParser;

impl ChoiceParser {
    /// Parses a line of input.
    ///
    /// | Input | Result |
    /// |-------|--------|
    /// | `1`, `on`, `y`, `yes` | Select On |
    /// | `2`, `0`, `off`, `n`, `no` | Select Off |
    /// | empty | AcceptPreselected |
    /// | `q`, `quit`, `c`, `cancel` | Dismiss |
    #[must_use]
    pub fn parse(line: &str) -> ChoiceInput {
        let line = line.trim();
        if line.is_empty() {
            return ChoiceInput::AcceptPreselected;
        }

        match line.to_lowercase().as_str() {
            "1" | "on" | "y" | "yes" => ChoiceInput::Select(ProfileState::On),
            "2" | "0" | "off" | "n" | "no" => ChoiceInput::Select(ProfileState::Off),
            "q" | "quit" | "c" | "cancel" => ChoiceInput::Dismiss,
            _ => ChoiceInput::Unknown(line.to_string()),
        }
    }
}
