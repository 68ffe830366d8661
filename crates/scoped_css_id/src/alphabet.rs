#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IdAlphabetError {
  #[error("An identifier alphabet needs at least one letter")]
  NoLetters,
  #[error("An identifier alphabet needs at least two symbols, found {0}")]
  TooFewSymbols(usize),
  #[error("Identifier alphabet characters must be ASCII alphanumeric, found {0:?}")]
  InvalidCharacter(char),
}

/// Characters an identifier is built from.
///
/// Identifiers always start with one of `letters` so they are valid CSS class
/// names and custom property segments. Every following character is drawn from
/// `letters` or `digits`.
#[derive(Clone, Debug, PartialEq)]
pub struct IdAlphabet {
  letters: Vec<char>,
  digits: Vec<char>,
}

impl Default for IdAlphabet {
  fn default() -> Self {
    IdAlphabet {
      letters: ('a'..='z').chain('A'..='Z').collect(),
      digits: ('0'..='9').collect(),
    }
  }
}

impl IdAlphabet {
  pub fn new(letters: &str, digits: &str) -> Result<Self, IdAlphabetError> {
    let letters = letters.chars().collect::<Vec<_>>();
    let digits = digits.chars().collect::<Vec<_>>();

    if letters.is_empty() {
      return Err(IdAlphabetError::NoLetters);
    }

    if let Some(invalid) = letters
      .iter()
      .find(|c| !c.is_ascii_alphabetic())
      .or_else(|| digits.iter().find(|c| !c.is_ascii_alphanumeric()))
    {
      return Err(IdAlphabetError::InvalidCharacter(*invalid));
    }

    // Positional encoding in base 1 never terminates
    let symbols = letters.len() + digits.len();
    if symbols < 2 {
      return Err(IdAlphabetError::TooFewSymbols(symbols));
    }

    Ok(IdAlphabet { letters, digits })
  }

  pub fn letters(&self) -> &[char] {
    &self.letters
  }

  pub fn digits(&self) -> &[char] {
    &self.digits
  }

  /// Digits first, then letters. Used for positional encodings.
  pub(crate) fn symbols(&self) -> Vec<char> {
    self.digits.iter().chain(self.letters.iter()).copied().collect()
  }

  /// Encodes `value` in the base of [`IdAlphabet::symbols`], most significant symbol first.
  pub(crate) fn encode(&self, mut value: u64) -> Vec<char> {
    let symbols = self.symbols();
    let base = symbols.len() as u64;

    if value == 0 {
      return vec![symbols[0]];
    }

    let mut encoded = Vec::new();
    while value > 0 {
      encoded.push(symbols[(value % base) as usize]);
      value /= base;
    }

    encoded.reverse();
    encoded
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn rejects_alphabets_without_letters() {
    assert_eq!(IdAlphabet::new("", "0123"), Err(IdAlphabetError::NoLetters));
  }

  #[test]
  fn rejects_non_alphanumeric_characters() {
    assert_eq!(
      IdAlphabet::new("ab-", "01"),
      Err(IdAlphabetError::InvalidCharacter('-'))
    );
    assert_eq!(
      IdAlphabet::new("ab", "0_"),
      Err(IdAlphabetError::InvalidCharacter('_'))
    );
  }

  #[test]
  fn rejects_single_symbol_alphabets() {
    assert_eq!(IdAlphabet::new("a", ""), Err(IdAlphabetError::TooFewSymbols(1)));
    assert!(IdAlphabet::new("ab", "").is_ok());
    assert!(IdAlphabet::new("a", "0").is_ok());
  }

  #[test]
  fn encodes_in_symbol_base() {
    let alphabet = IdAlphabet::new("ab", "01").unwrap();

    assert_eq!(alphabet.encode(0), vec!['0']);
    assert_eq!(alphabet.encode(3), vec!['b']);
    assert_eq!(alphabet.encode(4), vec!['1', '0']);
  }
}
