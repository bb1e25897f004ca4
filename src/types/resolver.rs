use super::lexer::{Token, TokenKind, tokenize};
use crate::constant::MAX_TYPE_DEPTH_LIMIT;
use super::{ParamKind, TypeNode, TypeParam, TypeRegistry, TypeStrategy};

/// What went wrong while resolving a descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionErrorKind {
    #[error("unknown type")]
    UnknownType,

    #[error("expected {} argument(s), found {found}", arity(.min, .max))]
    ArityMismatch {
        min: usize,
        max: Option<usize>,
        found: usize,
    },

    #[error("argument {index} must be a {expected}, found a {found}")]
    ParamMismatch {
        index: usize,
        expected: ParamKind,
        found: ParamKind,
    },

    #[error("expected {expected}")]
    UnexpectedToken { expected: &'static str },

    #[error("unexpected end of descriptor, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("trailing input after type")]
    TrailingInput,

    #[error("invalid number literal")]
    InvalidNumber,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("nesting exceeds the depth limit of {limit}")]
    TooDeep { limit: usize },

    #[error("type takes no arguments, found an empty argument list")]
    EmptyArguments,

    #[error("named elements are not supported")]
    NamedElement,
}

fn arity(min: &usize, max: &Option<usize>) -> String {
    match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{min} to {max}"),
        None => format!("at least {min}"),
    }
}

fn column_note(column: &Option<String>) -> String {
    column
        .as_ref()
        .map(|c| format!(" for column `{c}`"))
        .unwrap_or_default()
}

/// A descriptor this client cannot turn into a [`TypeNode`]
///
/// The server's response was valid; the client does not support the type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset} (`{token}`) in `{descriptor}`{}", column_note(.column))]
pub struct TypeResolutionError {
    pub kind: ResolutionErrorKind,
    /// The offending token
    pub token: String,
    /// Byte offset of `token` in `descriptor`
    pub offset: usize,
    pub descriptor: String,
    pub column: Option<String>,
}

impl TypeResolutionError {
    pub fn new(
        kind: ResolutionErrorKind,
        token: impl Into<String>,
        offset: usize,
        descriptor: &str,
    ) -> Self {
        Self {
            kind,
            token: token.into(),
            offset,
            descriptor: descriptor.to_string(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

type ParseResult<T> = std::result::Result<T, TypeResolutionError>;

/// Resolve a type descriptor against `registry`
///
/// `max_depth` bounds the depth of the type tree (`UInt8` is 1, `Array(UInt8)` is 2),
/// so hostile descriptors fail instead of exhausting the stack. It is capped at
/// [`MAX_TYPE_DEPTH_LIMIT`].
pub fn resolve(
    descriptor: &str,
    registry: &TypeRegistry,
    max_depth: usize,
) -> ParseResult<TypeNode> {
    let tokens = tokenize(descriptor)?;
    let mut parser = Parser {
        descriptor,
        tokens,
        pos: 0,
        registry,
        max_depth: max_depth.min(MAX_TYPE_DEPTH_LIMIT),
    };

    let node = parser.parse_type(0)?;
    if let Some(token) = parser.peek() {
        return Err(parser.error_at(ResolutionErrorKind::TrailingInput, token));
    }
    Ok(node)
}

struct Parser<'a> {
    descriptor: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a TypeRegistry,
    max_depth: usize,
}

/// A parsed argument and the token it started at
struct Arg {
    param: TypeParam,
    offset: usize,
    text: String,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next(&mut self, expected: &'static str) -> ParseResult<Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(TypeResolutionError::new(
                ResolutionErrorKind::UnexpectedEnd { expected },
                "",
                self.descriptor.len(),
                self.descriptor,
            )),
        }
    }

    fn error_at(&self, kind: ResolutionErrorKind, token: &Token) -> TypeResolutionError {
        TypeResolutionError::new(kind, token.text.as_str(), token.offset, self.descriptor)
    }

    fn parse_type(&mut self, depth: usize) -> ParseResult<TypeNode> {
        let token = self.next("type name")?;
        if depth >= self.max_depth {
            return Err(self.error_at(
                ResolutionErrorKind::TooDeep {
                    limit: self.max_depth,
                },
                &token,
            ));
        }

        let TokenKind::Ident(name) = &token.kind else {
            return Err(self.error_at(
                ResolutionErrorKind::UnexpectedToken {
                    expected: "type name",
                },
                &token,
            ));
        };

        // Look the name up before its arguments so an unknown constructor is
        // reported at its own position.
        let Some(strategy) = self.registry.get(name) else {
            return Err(self.error_at(ResolutionErrorKind::UnknownType, &token));
        };

        let args = if self.peek_kind() == Some(&TokenKind::LParen) {
            Some(self.parse_args(depth)?)
        } else {
            None
        };

        self.build(strategy, &token, name, args)
    }

    fn parse_args(&mut self, depth: usize) -> ParseResult<Vec<Arg>> {
        self.next("`(`")?;
        let mut args = Vec::new();
        if self.peek_kind() == Some(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }

        loop {
            args.push(self.parse_arg(depth)?);
            let token = self.next("`,` or `)`")?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(args),
                _ => {
                    return Err(self.error_at(
                        ResolutionErrorKind::UnexpectedToken {
                            expected: "`,` or `)`",
                        },
                        &token,
                    ));
                }
            }
        }
    }

    fn parse_arg(&mut self, depth: usize) -> ParseResult<Arg> {
        let Some(first) = self.peek().cloned() else {
            return Err(TypeResolutionError::new(
                ResolutionErrorKind::UnexpectedEnd {
                    expected: "argument",
                },
                "",
                self.descriptor.len(),
                self.descriptor,
            ));
        };

        let param = match &first.kind {
            TokenKind::Ident(_) => {
                // `Tuple(a UInt8)`: an element name followed by its type
                if let Some(Token {
                    kind: TokenKind::Ident(_),
                    ..
                }) = self.tokens.get(self.pos + 1)
                {
                    return Err(self.error_at(ResolutionErrorKind::NamedElement, &first));
                }
                TypeParam::Type(self.parse_type(depth + 1)?)
            }
            TokenKind::Number(n) => {
                self.pos += 1;
                TypeParam::Number(*n)
            }
            TokenKind::Str(s) => {
                self.pos += 1;
                if self.peek_kind() == Some(&TokenKind::Eq) {
                    self.pos += 1;
                    let value_token = self.next("enum value")?;
                    let TokenKind::Number(value) = value_token.kind else {
                        return Err(self.error_at(
                            ResolutionErrorKind::UnexpectedToken {
                                expected: "enum value",
                            },
                            &value_token,
                        ));
                    };
                    TypeParam::EnumEntry {
                        name: s.clone(),
                        value,
                    }
                } else {
                    TypeParam::Str(s.clone())
                }
            }
            TokenKind::LParen | TokenKind::RParen | TokenKind::Comma | TokenKind::Eq => {
                return Err(self.error_at(
                    ResolutionErrorKind::UnexpectedToken {
                        expected: "argument",
                    },
                    &first,
                ));
            }
        };

        Ok(Arg {
            param,
            offset: first.offset,
            text: first.text,
        })
    }

    fn arity_error(
        &self,
        token: &Token,
        min: usize,
        max: Option<usize>,
        found: usize,
    ) -> TypeResolutionError {
        self.error_at(ResolutionErrorKind::ArityMismatch { min, max, found }, token)
    }

    fn check_kind(&self, index: usize, arg: &Arg, expected: ParamKind) -> ParseResult<()> {
        let found = arg.param.kind();
        if found == expected {
            return Ok(());
        }
        Err(TypeResolutionError::new(
            ResolutionErrorKind::ParamMismatch {
                index,
                expected,
                found,
            },
            arg.text.as_str(),
            arg.offset,
            self.descriptor,
        ))
    }

    fn build(
        &self,
        strategy: TypeStrategy,
        token: &Token,
        name: &str,
        args: Option<Vec<Arg>>,
    ) -> ParseResult<TypeNode> {
        match strategy {
            TypeStrategy::Base => match args {
                None => Ok(TypeNode::Base(name.to_string())),
                Some(args) if args.is_empty() => {
                    Err(self.error_at(ResolutionErrorKind::EmptyArguments, token))
                }
                Some(args) => Err(self.arity_error(token, 0, Some(0), args.len())),
            },
            TypeStrategy::Nullable | TypeStrategy::Array => {
                let args = args.unwrap_or_default();
                let [arg] = <[Arg; 1]>::try_from(args)
                    .map_err(|args| self.arity_error(token, 1, Some(1), args.len()))?;
                self.check_kind(0, &arg, ParamKind::Type)?;
                let TypeParam::Type(inner) = arg.param else {
                    return Err(self.error_at(
                        ResolutionErrorKind::UnexpectedToken { expected: "type" },
                        token,
                    ));
                };
                Ok(match strategy {
                    TypeStrategy::Nullable => TypeNode::nullable(inner),
                    _ => TypeNode::array(inner),
                })
            }
            TypeStrategy::Tuple => {
                let args = args.unwrap_or_default();
                if args.is_empty() {
                    return Err(self.arity_error(token, 1, None, 0));
                }
                let mut elements = Vec::with_capacity(args.len());
                for (index, arg) in args.into_iter().enumerate() {
                    self.check_kind(index, &arg, ParamKind::Type)?;
                    if let TypeParam::Type(ty) = arg.param {
                        elements.push(ty);
                    }
                }
                Ok(TypeNode::Tuple(elements))
            }
            TypeStrategy::Parameterized(shape) => {
                if shape.min() == 0 && args.as_ref().is_some_and(Vec::is_empty) {
                    return Err(self.error_at(ResolutionErrorKind::EmptyArguments, token));
                }
                let args = args.unwrap_or_default();
                let found = args.len();
                if found < shape.min() || shape.max().is_some_and(|max| found > max) {
                    return Err(self.arity_error(token, shape.min(), shape.max(), found));
                }
                if args.is_empty() {
                    return Ok(TypeNode::Base(name.to_string()));
                }
                let mut params = Vec::with_capacity(found);
                for (index, arg) in args.into_iter().enumerate() {
                    if let Some(expected) = shape.kind_at(index) {
                        self.check_kind(index, &arg, expected)?;
                    }
                    params.push(arg.param);
                }
                Ok(TypeNode::Parameterized {
                    name: name.to_string(),
                    params,
                })
            }
        }
    }
}
