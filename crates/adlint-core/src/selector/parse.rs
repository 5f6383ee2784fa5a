//! Recursive-descent parser for selector text.

use super::{AttrOp, CombinatorKind, Selector, SelectorError};

/// Parses a selector list; a single-branch list collapses to its branch.
pub(super) fn parse(text: &str) -> Result<Selector, SelectorError> {
    let mut parser = Parser {
        chars: text.char_indices().collect(),
        pos: 0,
    };
    parser.skip_ws();
    if parser.at_end() {
        return Err(SelectorError::Empty);
    }
    let sel = parser.parse_list()?;
    parser.skip_ws();
    if let Some((at, found)) = parser.peek_indexed() {
        return Err(SelectorError::UnexpectedChar { found, at });
    }
    Ok(sel)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_indexed(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) -> bool {
        let before = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > before
    }

    fn expect(&mut self, wanted: char) -> Result<(), SelectorError> {
        match self.peek_indexed() {
            Some((_, c)) if c == wanted => {
                self.pos += 1;
                Ok(())
            }
            Some((at, found)) => Err(SelectorError::UnexpectedChar { found, at }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// `list := complex (',' complex)*`
    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        let mut branches = vec![self.parse_complex()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(',') {
                self.pos += 1;
                self.skip_ws();
                branches.push(self.parse_complex()?);
            } else {
                break;
            }
        }
        if branches.len() == 1 {
            Ok(branches.remove(0))
        } else {
            Ok(Selector::Union(branches))
        }
    }

    /// `complex := compound ((ws | '>' | '~' | '+') compound)*`
    ///
    /// Left-associative: `A > B C` parses as `(A > B) C`.
    fn parse_complex(&mut self) -> Result<Selector, SelectorError> {
        let mut left = self.parse_compound()?;
        loop {
            let had_ws = self.skip_ws();
            let kind = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    CombinatorKind::Child
                }
                Some('~') => {
                    self.pos += 1;
                    CombinatorKind::Sibling
                }
                Some('+') => {
                    self.pos += 1;
                    CombinatorKind::Adjacent
                }
                Some(c) if had_ws && is_compound_start(c) => CombinatorKind::Descendant,
                _ => break,
            };
            self.skip_ws();
            let right = self.parse_compound()?;
            left = Selector::Combinator {
                kind,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `compound := '!'? simple+`
    fn parse_compound(&mut self) -> Result<Selector, SelectorError> {
        let subject = if self.peek() == Some('!') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            if !is_compound_start(c) {
                break;
            }
            parts.push(self.parse_simple()?);
        }
        if parts.is_empty() {
            return match self.peek_indexed() {
                Some((at, found)) => Err(SelectorError::UnexpectedChar { found, at }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }

        let inner = if parts.len() == 1 {
            parts.remove(0)
        } else {
            Selector::Compound(parts)
        };
        Ok(if subject {
            Selector::Subject(Box::new(inner))
        } else {
            inner
        })
    }

    /// `simple := ident | '*' | attribute | pseudo`
    fn parse_simple(&mut self) -> Result<Selector, SelectorError> {
        match self.peek_indexed() {
            Some((_, '*')) => {
                self.pos += 1;
                Ok(Selector::Wildcard)
            }
            Some((_, '[')) => self.parse_attribute(),
            Some((_, ':')) => self.parse_pseudo(),
            Some((_, c)) if is_ident_char(c) => Ok(Selector::Type(self.parse_ident())),
            Some((at, found)) => Err(SelectorError::UnexpectedChar { found, at }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn parse_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    /// `attribute := '[' ident ('=' value)? ']'`
    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.expect('[')?;
        self.skip_ws();
        let name = self.parse_ident();
        if name.is_empty() {
            return match self.peek_indexed() {
                Some((at, found)) => Err(SelectorError::UnexpectedChar { found, at }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        self.skip_ws();
        let op = if self.peek() == Some('=') {
            self.pos += 1;
            self.skip_ws();
            self.parse_attr_value()?
        } else {
            AttrOp::Exists
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(Selector::Attribute { name, op })
    }

    /// `value := '"' … '"' | '/' … '/' | bare-token`
    fn parse_attr_value(&mut self) -> Result<AttrOp, SelectorError> {
        match self.peek() {
            Some('"') | Some('\'') => {
                let quote = self.bump().ok_or(SelectorError::UnexpectedEnd)?;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some(c) => value.push(c),
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                Ok(AttrOp::Equals(value))
            }
            Some('/') => {
                self.pos += 1;
                let mut pattern = String::new();
                loop {
                    match self.bump() {
                        Some('/') => break,
                        Some(c) => pattern.push(c),
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                let compiled =
                    regex::Regex::new(&pattern).map_err(|e| SelectorError::InvalidRegex {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(AttrOp::Regex(compiled))
            }
            Some(_) => {
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if c == ']' || c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    self.pos += 1;
                }
                if value.is_empty() {
                    return Err(SelectorError::UnexpectedEnd);
                }
                Ok(AttrOp::Equals(value))
            }
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// `pseudo := ':' ident ('(' list ')')?`
    fn parse_pseudo(&mut self) -> Result<Selector, SelectorError> {
        self.expect(':')?;
        let name = self.parse_ident();
        if name.is_empty() {
            return match self.peek_indexed() {
                Some((at, found)) => Err(SelectorError::UnexpectedChar { found, at }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        if self.peek() != Some('(') {
            return Ok(Selector::PseudoClass(name));
        }
        self.pos += 1;
        self.skip_ws();
        let inner = self.parse_list()?;
        self.skip_ws();
        self.expect(')')?;

        match name.as_str() {
            "matches" | "is" => Ok(match inner {
                Selector::Union(_) => inner,
                single => Selector::Union(vec![single]),
            }),
            "not" => Ok(Selector::Not(Box::new(inner))),
            "has" => Ok(Selector::Has(Box::new(inner))),
            _ => Err(SelectorError::UnsupportedPseudo { name }),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_compound_start(c: char) -> bool {
    is_ident_char(c) || c == '*' || c == '[' || c == ':' || c == '!'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_type() {
        assert_eq!(
            Selector::parse("NetworkRule").unwrap(),
            Selector::Type("NetworkRule".to_string())
        );
    }

    #[test]
    fn wildcard() {
        assert_eq!(Selector::parse("*").unwrap(), Selector::Wildcard);
    }

    #[test]
    fn union_at_top_level() {
        let sel = Selector::parse("NetworkRule, CosmeticRule").unwrap();
        let Selector::Union(branches) = sel else {
            panic!("expected union, got {sel:?}");
        };
        assert_eq!(branches.len(), 2);
    }

    #[test]
    fn attribute_forms() {
        assert_eq!(
            Selector::parse("[name]").unwrap(),
            Selector::Attribute {
                name: "name".to_string(),
                op: AttrOp::Exists,
            }
        );
        assert_eq!(
            Selector::parse("[name=PLATFORM]").unwrap(),
            Selector::Attribute {
                name: "name".to_string(),
                op: AttrOp::Equals("PLATFORM".to_string()),
            }
        );
        assert_eq!(
            Selector::parse("[name=\"PLATFORM\"]").unwrap(),
            Selector::Attribute {
                name: "name".to_string(),
                op: AttrOp::Equals("PLATFORM".to_string()),
            }
        );
    }

    #[test]
    fn regex_attribute() {
        let sel = Selector::parse("[type=/Rule$/]").unwrap();
        let Selector::Attribute {
            op: AttrOp::Regex(re),
            ..
        } = sel
        else {
            panic!("expected regex attribute");
        };
        assert_eq!(re.as_str(), "Rule$");
    }

    #[test]
    fn invalid_regex_rejected() {
        assert!(matches!(
            Selector::parse("[type=/(/]"),
            Err(SelectorError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn compound_selector() {
        let sel = Selector::parse("Hint[name=PLATFORM]").unwrap();
        let Selector::Compound(parts) = sel else {
            panic!("expected compound");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], Selector::Type("Hint".to_string()));
    }

    #[test]
    fn combinators() {
        let sel = Selector::parse("HintCommandRule > Hint").unwrap();
        let Selector::Combinator { kind, left, right } = sel else {
            panic!("expected combinator");
        };
        assert_eq!(kind, CombinatorKind::Child);
        assert_eq!(*left, Selector::Type("HintCommandRule".to_string()));
        assert_eq!(*right, Selector::Type("Hint".to_string()));

        let sel = Selector::parse("HintCommandRule HintParameter").unwrap();
        assert!(matches!(
            sel,
            Selector::Combinator {
                kind: CombinatorKind::Descendant,
                ..
            }
        ));
    }

    #[test]
    fn combinator_is_left_associative() {
        let sel = Selector::parse("A > B > C").unwrap();
        let Selector::Combinator { left, right, .. } = sel else {
            panic!("expected combinator");
        };
        assert!(matches!(*left, Selector::Combinator { .. }));
        assert_eq!(*right, Selector::Type("C".to_string()));
    }

    #[test]
    fn subject_marker() {
        let sel = Selector::parse("!Hint > HintParameter").unwrap();
        let Selector::Combinator { left, .. } = sel else {
            panic!("expected combinator");
        };
        assert!(matches!(*left, Selector::Subject(_)));
    }

    #[test]
    fn pseudo_classes() {
        assert_eq!(
            Selector::parse(":first-child").unwrap(),
            Selector::PseudoClass("first-child".to_string())
        );
        assert!(matches!(
            Selector::parse(":not(CommentRule)").unwrap(),
            Selector::Not(_)
        ));
        assert!(matches!(
            Selector::parse(":has(Modifier)").unwrap(),
            Selector::Has(_)
        ));
        assert!(matches!(
            Selector::parse(":matches(A, B)").unwrap(),
            Selector::Union(_)
        ));
    }

    #[test]
    fn unsupported_pseudo_with_args() {
        assert!(matches!(
            Selector::parse(":nth-child(2)"),
            Err(SelectorError::UnsupportedPseudo { .. })
        ));
    }

    #[test]
    fn empty_and_trailing_garbage() {
        assert!(matches!(Selector::parse(""), Err(SelectorError::Empty)));
        assert!(matches!(Selector::parse("   "), Err(SelectorError::Empty)));
        assert!(Selector::parse("A )").is_err());
    }
}
