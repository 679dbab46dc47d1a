use crate::error::SyntaxError;

/// A litr token. Newlines are kept: they terminate statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    True,
    False,
    Ident(String),
    If,
    Else,
    While,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    BangEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    AmpAmp,
    PipePipe,
    Bang,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Newline,
}

/// Net count of unclosed `(`/`[`/`{` in `source`.
///
/// This is the "statement incomplete" signal: the accumulator keeps
/// buffering lines while it is positive. Unterminated strings and unknown
/// characters are reported immediately rather than treated as incomplete.
pub fn open_delimiters(source: &str) -> Result<usize, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut open = 0isize;
    for (token, _) in &tokens {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => open += 1,
            Token::RParen | Token::RBracket | Token::RBrace => open -= 1,
            _ => {}
        }
    }
    Ok(open.max(0) as usize)
}

/// Tokenize `source`, pairing each token with its 1-based line.
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                chars.next();
                tokens.push((Token::Newline, line));
                line += 1;
            }
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '#' => {
                // Comment to end of line.
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '"' => {
                chars.next();
                tokens.push((Token::Str(lex_string(&mut chars, line)?), line));
            }
            '0'..='9' => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if !c.is_ascii_digit() && c != '.' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                let number = text
                    .parse::<f64>()
                    .map_err(|_| SyntaxError::new(format!("invalid number '{}'", text), line))?;
                tokens.push((Token::Number(number), line));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !c.is_ascii_alphanumeric() && c != '_' {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                let token = match name.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "if" => Token::If,
                    "else" => Token::Else,
                    "while" => Token::While,
                    _ => Token::Ident(name),
                };
                tokens.push((token, line));
            }
            _ => {
                chars.next();
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    ',' => Token::Comma,
                    '=' => two_char(&mut chars, '=', Token::EqEq, Token::Eq),
                    '!' => two_char(&mut chars, '=', Token::BangEq, Token::Bang),
                    '>' => two_char(&mut chars, '=', Token::GtEq, Token::Gt),
                    '<' => two_char(&mut chars, '=', Token::LtEq, Token::Lt),
                    '&' => {
                        if chars.peek() == Some(&'&') {
                            chars.next();
                            Token::AmpAmp
                        } else {
                            return Err(SyntaxError::new("unexpected character '&'", line));
                        }
                    }
                    '|' => {
                        if chars.peek() == Some(&'|') {
                            chars.next();
                            Token::PipePipe
                        } else {
                            return Err(SyntaxError::new("unexpected character '|'", line));
                        }
                    }
                    other => {
                        return Err(SyntaxError::new(
                            format!("unexpected character '{}'", other),
                            line,
                        ));
                    }
                };
                tokens.push((token, line));
            }
        }
    }

    Ok(tokens)
}

fn two_char(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    next: char,
    matched: Token,
    single: Token,
) -> Token {
    if chars.peek() == Some(&next) {
        chars.next();
        matched
    } else {
        single
    }
}

fn lex_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<String, SyntaxError> {
    let mut text = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(text),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('\\') => text.push('\\'),
                Some('"') => text.push('"'),
                Some(other) => {
                    return Err(SyntaxError::new(
                        format!("unknown escape '\\{}'", other),
                        line,
                    ));
                }
                None => return Err(SyntaxError::new("unterminated string literal", line)),
            },
            Some('\n') | None => {
                return Err(SyntaxError::new("unterminated string literal", line));
            }
            Some(other) => text.push(other),
        }
    }
}
