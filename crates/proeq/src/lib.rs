//! # Pro-eq
//!
//! This crate translates pro-eq notation into LaTeX markup.
//! Pro-eq is a compact notation for mathematical formulas that is designed
//!     to be typed quickly by hand:
//!     function-call syntax like `frac(a, b)` replaces LaTeX's
//!     `\frac{a}{b}`, and anything the translator doesn't recognize passes
//!     through untouched.
//! The output is a LaTeX string ready to be handed to a math renderer.
//!
//! This is a basic example of translating a short document:
//!
//! ```
//! let source = "e := mathrm(e)\n\
//!     i := mathrm(i)\n\
//!     e^{i theta} = cos(theta) + i sin(theta)";
//! assert_eq!(
//!     proeq::translate(source),
//!     r"\mathrm{e} ^ { \mathrm{i} theta } = \cos{theta} + \mathrm{i} \sin{theta}",
//! );
//! ```
//!
//! The main takeaway from this example is that a terse, plain-text formula
//! expands into the longer LaTeX spelling, including definitions that are
//! reused across lines.
//!
//! ## Language walkthrough
//!
//! A pro-eq document is a sequence of lines, each a sequence of
//! expressions. An expression is either a function call like `cos(theta)`
//! or a single raw token; bare words, numbers, operators and braces all
//! pass through as-is:
//!
//! ```
//! assert_eq!(proeq::translate("a + b = c"), "a + b = c");
//! ```
//!
//! ### Function calls
//!
//! An identifier immediately followed by `(` is a call. Unless the name is
//! one of the built-ins below or a user macro, the call renders as the
//! LaTeX command of the same name with each parameter brace-wrapped:
//!
//! ```
//! assert_eq!(proeq::translate("frac(a, 1 - r)"), r"\frac{a}{1-r}");
//! assert_eq!(proeq::translate("theta()"), r"\theta ");
//! ```
//!
//! Parameters are separated by commas, and a parameter slot may hold
//! several tokens; their rendered fragments are concatenated, so `1 - r`
//! above fills a single slot. Calls nest:
//!
//! ```
//! assert_eq!(
//!     proeq::translate("par(sum(a, b))"),
//!     r"\left( \sum_{b}{a} \right)",
//! );
//! ```
//!
//! ### Built-in large operations
//!
//! A small set of names has special, arity-sensitive layout. Missing
//! trailing parameters are simply omitted from the layout, and extras are
//! ignored.
//!
//! | Call | Rendered LaTeX |
//! |------|----------------|
//! | `par(x)` | `\left( x \right)` |
//! | `sum(body)` | `\sum{body}` |
//! | `sum(body, lo)` | `\sum_{lo}{body}` |
//! | `sum(body, lo, hi)` | `\sum_{lo}^{hi}{body}` |
//! | `int(…)` | as `sum`, with `\int` |
//! | `lim(body, lo)` | `\lim_{lo}{body}` |
//!
//! ```
//! assert_eq!(proeq::translate("sum(a, b, c)"), r"\sum_{b}^{c}{a}");
//! assert_eq!(proeq::translate("lim(f, 0)"), r"\lim_{0}{f}");
//! ```
//!
//! ### Macros
//!
//! A line of the form `name := body` registers `name` as a macro for the
//! rest of the document. The body is translated once, when the definition
//! line is processed, and every later use of the name replays the captured
//! fragment. Definition lines produce no output of their own:
//!
//! ```
//! let source = "half := frac(1, 2)\nhalf + half = 1";
//! assert_eq!(proeq::translate(source), r"\frac{1}{2} + \frac{1}{2} = 1");
//! ```
//!
//! Definitions are processed in source order: a name used before its
//! definition line is plain text, and defining the same name again
//! overwrites the earlier entry for the remainder of the document. The
//! macro table lives for exactly one [`translate`] call; separate documents
//! never share definitions.
//!
//! ### Lines
//!
//! Each newline that ends a non-definition line becomes a `\\` line-break
//! marker in the output, and all output fragments are joined with single
//! spaces:
//!
//! ```
//! assert_eq!(proeq::translate("a = b\nc"), r"a = b \\ c");
//! ```
//!
//! ## Malformed input
//!
//! There are no parse errors. Unmatched parentheses, dangling commas and
//! trailing definition operators all degrade gracefully: parsing stops at
//! the end of the line or of the input, and whatever was built so far is
//! emitted.
//!
//! ```
//! assert_eq!(proeq::translate("par(x"), r"\left( x \right)");
//! ```

pub mod command;
pub mod lexer;
pub mod parse;

/// Translate a pro-eq document into a LaTeX string.
///
/// This lexes the source text and runs the line driver and expression
/// parser over it with a fresh macro table. It never fails.
pub fn translate(source: &str) -> String {
    let tokens: Vec<lexer::Token> = lexer::Lexer::new(source).collect();
    parse::Driver::new(&tokens).run()
}

/// Returns true if the text at `position` begins a function call.
///
/// This is the classifier hook for syntax highlighting: it reports whether
/// a non-empty run of identifier characters starts at byte `position` and
/// is immediately followed by `(`. Positions out of range or not on a
/// character boundary return false.
///
/// ```
/// assert!(proeq::starts_call("sum(k, 0, n)", 0));
/// assert!(proeq::starts_call("a + cos(x)", 4));
/// assert!(!proeq::starts_call("k + 1", 0));
/// ```
pub fn starts_call(text: &str, position: usize) -> bool {
    let Some(rest) = text.get(position..) else {
        return false;
    };
    let run = rest
        .find(|c: char| !lexer::is_word_char(c))
        .unwrap_or(rest.len());
    run > 0 && rest[run..].starts_with('(')
}
