//! Cursor-based XPath tokenizer. Single forward pass, one character of
//! lookahead for the two-character operators, whitespace consumed silently.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    /// Unrecognized or unterminated input; spans to the end of the string.
    Error,
    Identifier,
    Literal,
    Number,
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    At,
    Colon,
    DoubleColon,
    Dot,
    DoubleDot,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Error => "unrecognized input",
            TokenKind::Identifier => "identifier",
            TokenKind::Literal => "string literal",
            TokenKind::Number => "number",
            TokenKind::Slash => "'/'",
            TokenKind::DoubleSlash => "'//'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Eq => "'='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::At => "'@'",
            TokenKind::Colon => "':'",
            TokenKind::DoubleColon => "'::'",
            TokenKind::Dot => "'.'",
            TokenKind::DoubleDot => "'..'",
        };
        f.write_str(s)
    }
}

/// A token over the input string. `text` excludes the quotes of a string
/// literal; for all other kinds it is the exact source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token { kind, text: &self.input[start..self.pos], offset: start }
    }

    /// Two-character operator when the next char matches, otherwise the
    /// one-character form.
    fn one_or_two(&mut self, second: char, two: TokenKind, one: TokenKind, start: usize) -> Token<'a> {
        if self.peek() == Some(second) {
            self.bump();
            self.token(two, start)
        } else {
            self.token(one, start)
        }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        let start = self.pos;
        let Some(c) = self.bump() else {
            return self.token(TokenKind::Eof, start);
        };
        match c {
            '\'' | '"' => self.literal(c, start),
            '0'..='9' => self.number(start),
            '/' => self.one_or_two('/', TokenKind::DoubleSlash, TokenKind::Slash, start),
            ':' => self.one_or_two(':', TokenKind::DoubleColon, TokenKind::Colon, start),
            '.' => self.one_or_two('.', TokenKind::DoubleDot, TokenKind::Dot, start),
            '<' => self.one_or_two('=', TokenKind::Le, TokenKind::Lt, start),
            '>' => self.one_or_two('=', TokenKind::Ge, TokenKind::Gt, start),
            '=' => self.token(TokenKind::Eq, start),
            '!' => {
                if self.peek() == Some('=') {
                    self.bump();
                    self.token(TokenKind::Ne, start)
                } else {
                    self.error_to_end(start)
                }
            }
            '[' => self.token(TokenKind::LBracket, start),
            ']' => self.token(TokenKind::RBracket, start),
            '+' => self.token(TokenKind::Plus, start),
            '-' => self.token(TokenKind::Minus, start),
            '*' => self.token(TokenKind::Star, start),
            '@' => self.token(TokenKind::At, start),
            c if is_name_start(c) => self.identifier(start),
            _ => self.error_to_end(start),
        }
    }

    /// Quoted string with no escape processing. An unterminated literal is
    /// reported as an error token spanning to the end of the input.
    fn literal(&mut self, quote: char, start: usize) -> Token<'a> {
        let content_start = self.pos;
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    let content_end = self.pos - quote.len_utf8();
                    return Token {
                        kind: TokenKind::Literal,
                        text: &self.input[content_start..content_end],
                        offset: start,
                    };
                }
                Some(_) => {}
                None => return self.error_to_end(start),
            }
        }
    }

    /// Digits with at most one decimal point.
    fn number(&mut self, start: usize) -> Token<'a> {
        let mut seen_dot = false;
        loop {
            match self.peek() {
                Some('0'..='9') => {
                    self.bump();
                }
                // a second dot terminates the number (it belongs to `.` / `..`)
                Some('.') if !seen_dot && matches!(self.peek_second(), Some('0'..='9')) => {
                    seen_dot = true;
                    self.bump();
                }
                _ => break,
            }
        }
        self.token(TokenKind::Number, start)
    }

    fn identifier(&mut self, start: usize) -> Token<'a> {
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.bump();
        }
        self.token(TokenKind::Identifier, start)
    }

    fn error_to_end(&mut self, start: usize) -> Token<'a> {
        self.pos = self.input.len();
        self.token(TokenKind::Error, start)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '.' | '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token();
            let done = matches!(t.kind, TokenKind::Eof | TokenKind::Error);
            out.push(t.kind);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn path_with_predicate() {
        use TokenKind::*;
        assert_eq!(
            kinds("/a/b[@id = '1']"),
            vec![Slash, Identifier, Slash, Identifier, LBracket, At, Identifier, Eq, Literal, RBracket, Eof]
        );
    }

    #[test]
    fn two_character_operators() {
        use TokenKind::*;
        assert_eq!(kinds("// :: <= >= != .."), vec![DoubleSlash, DoubleColon, Le, Ge, Ne, DoubleDot, Eof]);
    }

    #[test]
    fn number_keeps_single_decimal_point() {
        let mut lexer = Lexer::new("1.25");
        let t = lexer.next_token();
        assert_eq!(t.kind, TokenKind::Number);
        assert_eq!(t.text, "1.25");
    }

    #[test]
    fn literal_strips_quotes() {
        let mut lexer = Lexer::new("\"hello\"");
        let t = lexer.next_token();
        assert_eq!(t.kind, TokenKind::Literal);
        assert_eq!(t.text, "hello");
    }

    #[test]
    fn unterminated_literal_is_error() {
        let mut lexer = Lexer::new("'abc");
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
    }

    #[test]
    fn unrecognized_character_spans_to_end() {
        let mut lexer = Lexer::new("a $rest ignored");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        let err = lexer.next_token();
        assert_eq!(err.kind, TokenKind::Error);
        assert_eq!(err.text, "$rest ignored");
    }
}
