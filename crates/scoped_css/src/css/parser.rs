use std::ops::Range;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, SourcePosition, Token};

use super::ast::{AtRule, AtRuleBody, AtRuleKind, CssRule, Declaration, DeclarationItem, StyleRule, StyleSheet};
use crate::error::{Result, SyntaxError};

type ParseResult<'i, T> = std::result::Result<T, ParseError<'i, SyntaxError>>;

/// Parses a stylesheet into a rule tree.
///
/// Parsing is fail-fast: the first malformed rule or declaration aborts with a
/// [`crate::ScopedCssError::Parse`] pointing at the offending location.
pub fn parse(source: &str) -> Result<StyleSheet> {
  let mut input = ParserInput::new(source);
  let mut parser = Parser::new(&mut input);

  let rules = parse_rule_list(&mut parser)?;

  Ok(StyleSheet { rules })
}

fn parse_rule_list<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, Vec<CssRule>> {
  let mut rules = Vec::new();

  loop {
    let start = input.position();
    let token = match input.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => return Ok(rules),
    };

    match token {
      Token::WhiteSpace(_) | Token::CDO | Token::CDC => {}
      Token::Comment(text) => rules.push(CssRule::Comment(text.to_string())),
      Token::AtKeyword(name) => rules.push(CssRule::At(parse_at_rule(input, name.to_string())?)),
      Token::CloseCurlyBracket => {
        return Err(input.new_custom_error(SyntaxError::UnexpectedCloseBrace));
      }
      token => rules.push(CssRule::Style(parse_style_rule(input, start, token)?)),
    }
  }
}

fn parse_style_rule<'i>(
  input: &mut Parser<'i, '_>,
  start: SourcePosition,
  first: Token<'i>,
) -> ParseResult<'i, StyleRule> {
  let mut selectors = Vec::new();
  let mut segment_start = start;
  let mut before = start;
  let mut token = first;

  loop {
    match token {
      Token::CurlyBracketBlock => {
        push_selector(input, &mut selectors, segment_start..before)?;
        break;
      }
      Token::Comma => {
        push_selector(input, &mut selectors, segment_start..before)?;
        segment_start = input.position();
      }
      Token::Semicolon | Token::CloseCurlyBracket => {
        return Err(input.new_custom_error(SyntaxError::UnterminatedRule));
      }
      _ => {}
    }

    before = input.position();
    token = match input.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => return Err(input.new_custom_error(SyntaxError::UnterminatedRule)),
    };
  }

  let declarations = input.parse_nested_block(|input| parse_declaration_list(input))?;

  Ok(StyleRule {
    selectors,
    declarations,
  })
}

fn push_selector<'i>(
  input: &Parser<'i, '_>,
  selectors: &mut Vec<String>,
  range: Range<SourcePosition>,
) -> ParseResult<'i, ()> {
  let selector = input.slice(range).trim();
  if selector.is_empty() {
    return Err(input.new_custom_error(SyntaxError::EmptySelector));
  }

  selectors.push(selector.to_string());
  Ok(())
}

fn parse_declaration_list<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, Vec<DeclarationItem>> {
  let mut items = Vec::new();

  loop {
    let token = match input.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => return Ok(items),
    };

    match token {
      Token::WhiteSpace(_) | Token::Semicolon => {}
      Token::Comment(text) => items.push(DeclarationItem::Comment(text.to_string())),
      Token::AtKeyword(name) => {
        items.push(DeclarationItem::At(parse_at_rule(input, name.to_string())?));
      }
      Token::Ident(property) => {
        input.expect_colon()?;
        let value = input.parse_until_after(Delimiter::Semicolon, |input| {
          consume_raw(input).map(|value| value.trim().to_string())
        })?;

        items.push(DeclarationItem::Declaration(Declaration::new(
          property.to_string(),
          value,
        )));
      }
      _ => return Err(input.new_custom_error(SyntaxError::ExpectedProperty)),
    }
  }
}

fn parse_at_rule<'i>(input: &mut Parser<'i, '_>, name: String) -> ParseResult<'i, AtRule> {
  let prelude_start = input.position();

  loop {
    let before = input.position();
    let token = match input.next_including_whitespace_and_comments() {
      Ok(token) => token.clone(),
      Err(_) => {
        return Ok(AtRule {
          name,
          prelude: input.slice_from(prelude_start).trim().to_string(),
          body: AtRuleBody::Statement,
        });
      }
    };

    match token {
      Token::Semicolon => {
        return Ok(AtRule {
          name,
          prelude: input.slice(prelude_start..before).trim().to_string(),
          body: AtRuleBody::Statement,
        });
      }
      Token::CurlyBracketBlock => {
        let prelude = input.slice(prelude_start..before).trim().to_string();
        let body = match AtRuleKind::of(&name) {
          AtRuleKind::Group | AtRuleKind::Keyframes => {
            AtRuleBody::Rules(input.parse_nested_block(|input| parse_rule_list(input))?)
          }
          AtRuleKind::Declarations => {
            AtRuleBody::Declarations(input.parse_nested_block(|input| parse_declaration_list(input))?)
          }
          AtRuleKind::Raw => AtRuleBody::Raw(
            input.parse_nested_block(|input| consume_raw(input).map(|raw| raw.trim().to_string()))?,
          ),
        };

        return Ok(AtRule {
          name,
          prelude,
          body,
        });
      }
      Token::CloseCurlyBracket => {
        return Err(input.new_custom_error(SyntaxError::UnexpectedCloseBrace));
      }
      _ => {}
    }
  }
}

/// Consumes the rest of the (possibly delimited) input and returns its source text.
fn consume_raw<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, &'i str> {
  let start = input.position();

  loop {
    let malformed = match input.next_including_whitespace_and_comments() {
      Ok(token) => matches!(
        token,
        Token::BadString(_)
          | Token::BadUrl(_)
          | Token::CloseParenthesis
          | Token::CloseSquareBracket
          | Token::CloseCurlyBracket
      ),
      Err(_) => break,
    };

    if malformed {
      return Err(input.new_custom_error(SyntaxError::MalformedValue));
    }
  }

  Ok(input.slice_from(start))
}
