use thiserror::Error;

/// Errors raised while reading SVG path data (`d` attribute text).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A numeric token could not be read as a floating point value.
    #[error("malformed number '{token}' in path data")]
    MalformedNumber { token: String },

    /// The command is recognised but not implemented (elliptical arcs).
    #[error("unsupported path command '{command}'")]
    UnsupportedCommand { command: char },

    /// `S`/`T` used without a preceding curve of the matching kind.
    #[error("smooth command '{command}' cannot follow {previous}")]
    InvalidShorthand {
        command: char,
        /// What preceded the shorthand, e.g. "a line segment".
        previous: String,
    },

    /// A drawing command appeared before the first moveto.
    #[error("path data must start with a moveto, found '{command}'")]
    MissingMoveTo { command: char },

    /// The active command still had pending operands when it ended.
    #[error("command '{command}' expects {expected} operands, found {found}")]
    IncompleteOperands {
        command: char,
        expected: usize,
        found: usize,
    },

    /// An operand followed a close-path command without a new command letter.
    #[error("unexpected operand '{token}' after close-path")]
    UnexpectedOperand { token: String },
}

/// Errors raised while loading a drawing document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read drawing: {0}")]
    Io(#[from] std::io::Error),

    #[error("drawing is not well-formed XML: {0}")]
    Xml(String),

    /// A declared width/height did not match `<number><unit>?`.
    #[error("cannot parse {attribute} dimension '{value}'")]
    Dimension { attribute: String, value: String },

    #[error("invalid viewBox '{value}'")]
    ViewBox { value: String },

    #[error(transparent)]
    Path(#[from] ParseError),
}

impl From<quick_xml::Error> for LoadError {
    fn from(err: quick_xml::Error) -> Self {
        LoadError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_offending_token() {
        let err = ParseError::MalformedNumber {
            token: "1.2.x".to_string(),
        };
        assert!(err.to_string().contains("1.2.x"));
    }

    #[test]
    fn load_error_wraps_parse_error() {
        let err: LoadError = ParseError::UnsupportedCommand { command: 'A' }.into();
        assert!(matches!(err, LoadError::Path(ParseError::UnsupportedCommand { command: 'A' })));
        assert_eq!(err.to_string(), "unsupported path command 'A'");
    }
}
