use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind, SourceLocation};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScopedCssError {
  #[error("Failed to parse CSS at {line}:{column}: {message}")]
  Parse {
    line: u32,
    column: u32,
    message: String,
  },
  #[error("Invalid stylesheet config: {0}")]
  InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScopedCssError>;

/// Reasons the rule tree parser rejects a stylesheet.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxError {
  EmptySelector,
  ExpectedProperty,
  MalformedValue,
  UnexpectedCloseBrace,
  UnterminatedRule,
}

impl std::fmt::Display for SyntaxError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SyntaxError::EmptySelector => write!(f, "rule has an empty selector"),
      SyntaxError::ExpectedProperty => write!(f, "expected a property name"),
      SyntaxError::MalformedValue => write!(f, "malformed value"),
      SyntaxError::UnexpectedCloseBrace => write!(f, "unexpected '}}'"),
      SyntaxError::UnterminatedRule => write!(f, "rule is missing its '{{' block"),
    }
  }
}

impl<'i> From<ParseError<'i, SyntaxError>> for ScopedCssError {
  fn from(error: ParseError<'i, SyntaxError>) -> Self {
    let message = match &error.kind {
      ParseErrorKind::Custom(syntax_error) => syntax_error.to_string(),
      ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
        format!("unexpected token {:?}", token)
      }
      ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => "unexpected end of input".into(),
      ParseErrorKind::Basic(kind) => format!("{:?}", kind),
    };

    ScopedCssError::parse(error.location, message)
  }
}

impl ScopedCssError {
  pub(crate) fn parse(location: SourceLocation, message: String) -> Self {
    // cssparser lines are 0-based, columns 1-based
    ScopedCssError::Parse {
      line: location.line + 1,
      column: location.column,
      message,
    }
  }
}
