//! Recursive-descent parser for the supported XPath subset. LL(1): the
//! parser holds exactly one token of lookahead and never backtracks.

pub mod ast;
pub mod lexer;

use crate::model::QName;
use ast::{AxisKind, BinaryOp, Expr, Predicate, Step};
use lexer::{Lexer, Token, TokenKind};

/// Resolves namespace prefixes encountered while parsing qualified names.
pub trait NamespaceContext {
    fn namespace_uri(&self, prefix: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {found} at offset {offset}, expected one of {expected:?}")]
    UnexpectedToken { found: String, offset: usize, expected: Vec<TokenKind> },
    #[error("trailing input `{found}` at offset {offset} after a complete expression")]
    TrailingToken { found: String, offset: usize },
    #[error("unrecognized input `{found}` at offset {offset}")]
    UnrecognizedInput { found: String, offset: usize },
    #[error("`{found}` at offset {offset} is not an axis name")]
    InvalidAxis { found: String, offset: usize },
}

/// Parse an XPath expression without namespace support. Prefixes occurring
/// in qualified names are silently dropped and the name is treated as
/// unprefixed.
pub fn parse(xpath: &str) -> Result<Expr, ParseError> {
    Parser::new(xpath, None).parse_complete()
}

/// Parse an XPath expression, resolving `prefix:local` names through the
/// given namespace context.
pub fn parse_with_context(xpath: &str, namespaces: &dyn NamespaceContext) -> Result<Expr, ParseError> {
    Parser::new(xpath, Some(namespaces)).parse_complete()
}

struct Parser<'a, 'ns> {
    lexer: Lexer<'a>,
    lookahead: Token<'a>,
    namespaces: Option<&'ns dyn NamespaceContext>,
}

impl<'a, 'ns> Parser<'a, 'ns> {
    fn new(input: &'a str, namespaces: Option<&'ns dyn NamespaceContext>) -> Self {
        let mut lexer = Lexer::new(input);
        let lookahead = lexer.next_token();
        Self { lexer, lookahead, namespaces }
    }

    fn parse_complete(mut self) -> Result<Expr, ParseError> {
        let expr = self.expr()?;
        match self.lookahead.kind {
            TokenKind::Eof => Ok(expr),
            TokenKind::Error => Err(self.unrecognized()),
            _ => Err(ParseError::TrailingToken {
                found: self.lookahead.text.to_string(),
                offset: self.lookahead.offset,
            }),
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let current = self.lookahead;
        self.lookahead = self.lexer.next_token();
        current
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        if self.lookahead.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        if self.lookahead.kind == TokenKind::Error {
            return self.unrecognized();
        }
        ParseError::UnexpectedToken {
            found: format!("{} `{}`", self.lookahead.kind, self.lookahead.text),
            offset: self.lookahead.offset,
            expected: expected.to_vec(),
        }
    }

    fn unrecognized(&self) -> ParseError {
        ParseError::UnrecognizedInput {
            found: self.lookahead.text.to_string(),
            offset: self.lookahead.offset,
        }
    }

    // Expr := ComparisonExpr
    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.comparison_expr()
    }

    // ComparisonExpr := UnaryExpr (compop UnaryExpr)?
    // Comparisons do not chain.
    fn comparison_expr(&mut self) -> Result<Expr, ParseError> {
        let left = self.unary_expr()?;
        let op = match self.lookahead.kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.unary_expr()?;
        Ok(Expr::Binary { op, left: Box::new(left), right: Box::new(right) })
    }

    // UnaryExpr := '-' UnaryExpr | ValueExpr
    fn unary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.lookahead.kind == TokenKind::Minus {
            self.advance();
            let inner = self.unary_expr()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.value_expr()
    }

    // ValueExpr := LITERAL | NUMBER | PathExpr
    fn value_expr(&mut self) -> Result<Expr, ParseError> {
        match self.lookahead.kind {
            TokenKind::Literal => {
                let t = self.advance();
                Ok(Expr::Literal(t.text.to_string()))
            }
            TokenKind::Number => {
                let t = self.advance();
                // the lexer only emits digits with at most one decimal point
                let value: f64 = t.text.parse().map_err(|_| ParseError::UnrecognizedInput {
                    found: t.text.to_string(),
                    offset: t.offset,
                })?;
                Ok(Expr::Number(value))
            }
            _ => self.path_expr(),
        }
    }

    // PathExpr := '/' RelativePathExpr? | '//' RelativePathExpr | RelativePathExpr
    fn path_expr(&mut self) -> Result<Expr, ParseError> {
        let mut steps = Vec::new();
        match self.lookahead.kind {
            TokenKind::Slash => {
                self.advance();
                steps.push(Step::Root);
                if self.starts_step() {
                    self.relative_path(&mut steps)?;
                }
            }
            TokenKind::DoubleSlash => {
                self.advance();
                steps.push(Step::Root);
                steps.push(descendant_or_self_any());
                self.relative_path(&mut steps)?;
            }
            _ => self.relative_path(&mut steps)?,
        }
        Ok(Expr::Path(steps))
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.lookahead.kind,
            TokenKind::Dot | TokenKind::DoubleDot | TokenKind::At | TokenKind::Star | TokenKind::Identifier
        )
    }

    // RelativePathExpr := StepExpr (('/' | '//') StepExpr)*
    fn relative_path(&mut self, steps: &mut Vec<Step>) -> Result<(), ParseError> {
        steps.push(self.step_expr()?);
        loop {
            match self.lookahead.kind {
                TokenKind::Slash => {
                    self.advance();
                }
                TokenKind::DoubleSlash => {
                    self.advance();
                    steps.push(descendant_or_self_any());
                }
                _ => return Ok(()),
            }
            steps.push(self.step_expr()?);
        }
    }

    // StepExpr := '.' preds | '..' preds | '@' NodeTest preds
    //           | IDENTIFIER '::' NodeTest preds | NodeTest preds
    fn step_expr(&mut self) -> Result<Step, ParseError> {
        match self.lookahead.kind {
            TokenKind::Dot => {
                self.advance();
                Ok(Step::Identity(self.predicate_list()?))
            }
            TokenKind::DoubleDot => {
                self.advance();
                Ok(Step::Parent(self.predicate_list()?))
            }
            TokenKind::At => {
                self.advance();
                let name = self.node_test()?;
                Ok(Step::Attribute { name, predicates: self.predicate_list()? })
            }
            TokenKind::Star => {
                let name = self.node_test()?;
                Ok(Step::Element { name, predicates: self.predicate_list()? })
            }
            TokenKind::Identifier => {
                if self.peek_is_axis() {
                    let axis_token = self.advance();
                    let Some(axis) = AxisKind::from_name(axis_token.text) else {
                        return Err(ParseError::InvalidAxis {
                            found: axis_token.text.to_string(),
                            offset: axis_token.offset,
                        });
                    };
                    self.expect(TokenKind::DoubleColon)?;
                    let name = self.node_test()?;
                    Ok(Step::Axis { axis, name, predicates: self.predicate_list()? })
                } else {
                    let name = self.node_test()?;
                    Ok(Step::Element { name, predicates: self.predicate_list()? })
                }
            }
            _ => Err(self.unexpected(&[
                TokenKind::Dot,
                TokenKind::DoubleDot,
                TokenKind::At,
                TokenKind::Star,
                TokenKind::Identifier,
            ])),
        }
    }

    /// `a::b` vs `a:b` vs plain `a` needs one extra token of lookahead;
    /// probe on a cloned lexer cursor so the parser itself stays LL(1).
    fn peek_is_axis(&self) -> bool {
        let mut probe = self.lexer.clone();
        probe.next_token().kind == TokenKind::DoubleColon
    }

    // NodeTest := ('*' | IDENTIFIER) (':' ('*' | IDENTIFIER))?
    fn node_test(&mut self) -> Result<QName, ParseError> {
        let first = match self.lookahead.kind {
            TokenKind::Star | TokenKind::Identifier => self.advance(),
            _ => return Err(self.unexpected(&[TokenKind::Star, TokenKind::Identifier])),
        };
        if self.lookahead.kind != TokenKind::Colon {
            return Ok(if first.kind == TokenKind::Star { QName::any() } else { QName::new(first.text) });
        }
        self.advance();
        let second = match self.lookahead.kind {
            TokenKind::Star | TokenKind::Identifier => self.advance(),
            _ => return Err(self.unexpected(&[TokenKind::Star, TokenKind::Identifier])),
        };
        Ok(self.qualified(first.text, second.text))
    }

    /// `prefix:local` resolves through the namespace context when one is
    /// supplied. Without a context the prefix is silently dropped and the
    /// name becomes unprefixed; downstream documents depend on this.
    fn qualified(&self, prefix: &str, local: &str) -> QName {
        match self.namespaces {
            Some(ctx) => QName::prefixed(prefix, local, ctx.namespace_uri(prefix)),
            None => QName::new(local),
        }
    }

    // PredicateList := ('[' Expr ']')*
    fn predicate_list(&mut self) -> Result<Vec<Predicate>, ParseError> {
        let mut predicates = Vec::new();
        while self.lookahead.kind == TokenKind::LBracket {
            self.advance();
            let inner = self.expr()?;
            self.expect(TokenKind::RBracket)?;
            predicates.push(Predicate(inner));
        }
        Ok(predicates)
    }
}

fn descendant_or_self_any() -> Step {
    Step::Axis { axis: AxisKind::DescendantOrSelf, name: QName::any(), predicates: Vec::new() }
}
