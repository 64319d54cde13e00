use super::{ResidueRange, Selection};
use crate::core::models::element::Element;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("Unexpected end of selection after '{0}'")]
    UnexpectedEnd(String),
    #[error("Keyword '{0}' requires at least one value")]
    EmptyValueList(String),
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Invalid residue range '{0}'")]
    InvalidResidueRange(String),
    #[error("Selection is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Word(String),
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::And => "and".into(),
            Token::Or => "or".into(),
            Token::Not => "not".into(),
            Token::Word(w) => w.clone(),
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if word.is_empty() {
            return;
        }
        let token = match word.to_ascii_lowercase().as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Word(word.clone()),
        };
        tokens.push(token);
        word.clear();
    };

    for c in input.chars() {
        let symbol = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '&' => Some(Token::And),
            '|' => Some(Token::Or),
            '!' => Some(Token::Not),
            _ => None,
        };
        if let Some(symbol) = symbol {
            flush(&mut word, &mut tokens);
            tokens.push(symbol);
        } else if c.is_whitespace() {
            flush(&mut word, &mut tokens);
        } else {
            word.push(c);
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    All,
    None,
    Hetatm,
    Resn,
    Resi,
    Name,
    Chain,
    Elem,
}

fn keyword(word: &str) -> Option<Keyword> {
    match word.to_ascii_lowercase().as_str() {
        "all" => Some(Keyword::All),
        "none" => Some(Keyword::None),
        "hetatm" => Some(Keyword::Hetatm),
        "resn" | "r." => Some(Keyword::Resn),
        "resi" | "i." => Some(Keyword::Resi),
        "name" | "n." => Some(Keyword::Name),
        "chain" | "c." => Some(Keyword::Chain),
        "elem" | "e." => Some(Keyword::Elem),
        _ => None,
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn previous_text(&self) -> String {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(Token::text)
            .unwrap_or_default()
    }

    fn parse_or(&mut self) -> Result<Selection, SelectionError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.next();
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Selection, SelectionError> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.next();
            let right = self.parse_unary()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Selection, SelectionError> {
        if self.peek() == Some(&Token::Not) {
            self.next();
            let inner = self.parse_unary()?;
            return Ok(!inner);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Selection, SelectionError> {
        let position = self.position;
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(SelectionError::UnexpectedToken {
                        token: other.text(),
                        position: self.position - 1,
                    }),
                    None => Err(SelectionError::UnexpectedEnd(self.previous_text())),
                }
            }
            Some(Token::Word(word)) => match keyword(&word) {
                Some(kw) => self.parse_keyword(kw, &word),
                None => Ok(Selection::Object(word)),
            },
            Some(other) => Err(SelectionError::UnexpectedToken {
                token: other.text(),
                position,
            }),
            None => Err(SelectionError::UnexpectedEnd(self.previous_text())),
        }
    }

    fn parse_keyword(&mut self, kw: Keyword, word: &str) -> Result<Selection, SelectionError> {
        match kw {
            Keyword::All => Ok(Selection::All),
            Keyword::None => Ok(Selection::None),
            Keyword::Hetatm => Ok(Selection::Hetatm),
            Keyword::Resn => Ok(Selection::ResidueName(self.value_list(word)?)),
            Keyword::Name => Ok(Selection::AtomName(self.value_list(word)?)),
            Keyword::Chain => {
                let chains = self
                    .value_list(word)?
                    .iter()
                    .filter_map(|v| v.chars().next())
                    .collect();
                Ok(Selection::Chain(chains))
            }
            Keyword::Elem => {
                let elements = self
                    .value_list(word)?
                    .iter()
                    .map(|v| {
                        Element::from_symbol(v)
                            .ok_or_else(|| SelectionError::UnknownElement(v.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Selection::Element(elements))
            }
            Keyword::Resi => {
                let ranges = self
                    .value_list(word)?
                    .iter()
                    .map(|v| parse_residue_range(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Selection::ResidueNumber(ranges))
            }
        }
    }

    fn value_list(&mut self, keyword: &str) -> Result<Vec<String>, SelectionError> {
        let position = self.position;
        match self.next() {
            Some(Token::Word(values)) => {
                let values: Vec<String> = values
                    .split('+')
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if values.is_empty() {
                    return Err(SelectionError::EmptyValueList(keyword.to_string()));
                }
                Ok(values)
            }
            Some(other) => Err(SelectionError::UnexpectedToken {
                token: other.text(),
                position,
            }),
            None => Err(SelectionError::UnexpectedEnd(keyword.to_string())),
        }
    }
}

fn parse_residue_range(value: &str) -> Result<ResidueRange, SelectionError> {
    let invalid = || SelectionError::InvalidResidueRange(value.to_string());

    // A leading '-' belongs to a negative start, not to the range separator.
    let (start, end) = match value.get(1..).and_then(|rest| rest.find('-')) {
        Some(i) => (&value[..i + 1], &value[i + 2..]),
        None => (value, value),
    };
    let start: isize = start.parse().map_err(|_| invalid())?;
    let end: isize = end.parse().map_err(|_| invalid())?;
    if start > end {
        return Err(invalid());
    }
    Ok(ResidueRange { start, end })
}

/// Parses a selection expression such as `complex_copy and not resn UNL`.
pub fn parse(input: &str) -> Result<Selection, SelectionError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(SelectionError::Empty);
    }
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let selection = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(SelectionError::UnexpectedToken {
            token: token.text(),
            position: parser.position,
        });
    }
    Ok(selection)
}
