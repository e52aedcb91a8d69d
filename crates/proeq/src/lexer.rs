//! Lexer and tokens for pro-eq notation.
//!
//! The lexer reads the source text left to right with a single pending
//! accumulator. Identifier characters (letters, digits, underscore) extend
//! the accumulator; a space flushes it and is discarded; any other character
//! flushes it and then becomes a token of its own. The one wrinkle is `:`,
//! which opens a fresh accumulator so that an immediately following `=` can
//! combine with it into the definition operator `:=`. Newlines are tokens,
//! not separators: they are the line-boundary signal for the document
//! driver.
//!
//! There are no error conditions. Every character is either part of a word
//! or becomes its own token, so lexing any finite string succeeds, and
//! lexing the same string twice yields the same token sequence.

/// Returns true for characters that may appear in an identifier.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A token in pro-eq notation.
///
/// Tokens borrow from the source text and carry no position information;
/// their index in the lexed sequence is the only addressing mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token<'a> {
    /// A maximal run of identifier characters.
    ///
    /// A word may start with a `:` that failed to combine into `:=`, e.g.
    /// lexing `a:b` produces the words `a` and `:b`.
    Word(&'a str),
    /// The definition operator `:=`.
    Define,
    /// Parameter separator `,`.
    Comma,
    /// Opening parenthesis `(`, which starts a parameter list.
    GroupOpen,
    /// Closing parenthesis `)`.
    GroupClose,
    /// Opening brace `{`.
    BraceOpen,
    /// Closing brace `}`.
    BraceClose,
    /// Line boundary.
    Newline,
    /// Any other single character, passed through verbatim.
    Other(&'a str),
}

impl<'a> Token<'a> {
    /// The literal text of this token.
    pub fn text(&self) -> &'a str {
        match self {
            Token::Word(s) | Token::Other(s) => s,
            Token::Define => ":=",
            Token::Comma => ",",
            Token::GroupOpen => "(",
            Token::GroupClose => ")",
            Token::BraceOpen => "{",
            Token::BraceClose => "}",
            Token::Newline => "\n",
        }
    }
}

/// The pro-eq lexer.
pub struct Lexer<'a> {
    /// The source text being lexed.
    s: &'a str,
    /// Byte index of the next unread character.
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { s: source, pos: 0 }
    }

    /// Extends a word until the next non-identifier character.
    ///
    /// `start` is the byte index of the word's first character, which has
    /// already been consumed.
    fn read_word(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.s[self.pos..].chars().next() {
            if !is_word_char(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        Token::Word(&self.s[start..self.pos])
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        // Spaces end the current word and are otherwise discarded.
        while self.s[self.pos..].starts_with(' ') {
            self.pos += 1;
        }
        let c = self.s[self.pos..].chars().next()?;
        let start = self.pos;
        self.pos += c.len_utf8();
        let token = match c {
            '\n' => Token::Newline,
            ',' => Token::Comma,
            '(' => Token::GroupOpen,
            ')' => Token::GroupClose,
            '{' => Token::BraceOpen,
            '}' => Token::BraceClose,
            ':' => {
                // A colon combines with an immediately following `=` into
                // the definition operator. Otherwise it opens a fresh word,
                // so `a:b` lexes as the two words `a` and `:b`.
                if self.s[self.pos..].starts_with('=') {
                    self.pos += 1;
                    Token::Define
                } else {
                    self.read_word(start)
                }
            }
            c if is_word_char(c) => self.read_word(start),
            _ => Token::Other(&self.s[start..self.pos]),
        };
        Some(token)
    }
}
