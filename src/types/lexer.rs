use super::resolver::{ResolutionErrorKind, TypeResolutionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Number(i64),
    Str(String),
    LParen,
    RParen,
    Comma,
    Eq,
}

/// A token and the byte offset where it starts in the descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    /// Source text of the token
    pub text: String,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a descriptor into tokens, skipping whitespace between them
pub fn tokenize(input: &str) -> Result<Vec<Token>, TypeResolutionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' | ')' | ',' | '=' => {
                chars.next();
                match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Eq,
                }
            }
            '\'' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\'' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        _ => value.push(c),
                    }
                }
                if !closed {
                    return Err(TypeResolutionError::new(
                        ResolutionErrorKind::UnterminatedString,
                        &input[start..],
                        start,
                        input,
                    ));
                }
                TokenKind::Str(value)
            }
            c if c == '-' || c.is_ascii_digit() => {
                chars.next();
                while chars.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                    chars.next();
                }
                let end = chars.peek().map_or(input.len(), |&(i, _)| i);
                let text = &input[start..end];
                match text.parse::<i64>() {
                    Ok(n) => TokenKind::Number(n),
                    Err(_) => {
                        return Err(TypeResolutionError::new(
                            ResolutionErrorKind::InvalidNumber,
                            text,
                            start,
                            input,
                        ));
                    }
                }
            }
            c if is_ident_start(c) => {
                chars.next();
                while chars.peek().is_some_and(|&(_, c)| is_ident_continue(c)) {
                    chars.next();
                }
                let end = chars.peek().map_or(input.len(), |&(i, _)| i);
                TokenKind::Ident(input[start..end].to_string())
            }
            other => {
                return Err(TypeResolutionError::new(
                    ResolutionErrorKind::UnexpectedCharacter,
                    other.to_string(),
                    start,
                    input,
                ));
            }
        };

        let end = chars.peek().map_or(input.len(), |&(i, _)| i);
        tokens.push(Token {
            kind,
            offset: start,
            text: input[start..end].to_string(),
        });
    }

    Ok(tokens)
}
