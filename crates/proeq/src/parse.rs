//! The pro-eq expression parser and line/document driver.
//!
//! The parser is a recursive descent consumer of the lexed token sequence
//! with one token of lookahead. Rendering is bottom-up and single-pass: a
//! node's parameters are fully rendered LaTeX fragments before the node
//! itself renders, so no tree is ever retained and nothing is backpatched.
//!
//! The driver walks the sequence one line at a time. A line containing the
//! `:=` operator registers a user macro and produces no output; any other
//! line is parsed as a sequence of expressions whose fragments are appended
//! to the document output, followed by a `\\` line-break marker if the line
//! ended in a newline.
//!
//! Malformed input is not diagnosed. Running off the end of a line or of the
//! input simply ends the construct being parsed, and whatever fragments were
//! built so far are emitted.

use crate::command;
use crate::command::Classification;
use crate::lexer::Token;

/// The line-break marker emitted for each newline that terminated a
/// non-definition line.
const LINE_BREAK: &str = r"\\";

/// A node produced by the expression parser.
///
/// Nodes are ephemeral: they are rendered immediately after construction and
/// never linked into a tree. Nesting is expressed by parameters already
/// being rendered fragments by the time the enclosing node renders.
enum Node<'a> {
    /// Literal text that renders to itself.
    Text(&'a str),
    /// A function call with already-rendered parameter fragments.
    Call {
        name: &'a str,
        params: Vec<String>,
    },
}

impl Node<'_> {
    fn render(&self, commands: &command::Map) -> String {
        match self {
            Node::Text(text) => (*text).to_string(),
            Node::Call { name, params } => match commands.classify(name, true) {
                Classification::Passthrough => render_passthrough(name, params),
                Classification::Layout(layout) => layout.render(params),
                // A macro expands to the fragment captured at definition
                // time; parameters, if any were supplied, are ignored.
                Classification::Macro(body) => body.to_string(),
                Classification::Unclassified => (*name).to_string(),
            },
        }
    }
}

fn render_passthrough(name: &str, params: &[String]) -> String {
    let mut tex = String::with_capacity(name.len() + 2);
    tex.push('\\');
    tex.push_str(name);
    for param in params {
        tex.push('{');
        tex.push_str(param);
        tex.push('}');
    }
    if params.is_empty() {
        // The trailing space separates the command name from whatever
        // follows it in the assembled LaTeX.
        tex.push(' ');
    }
    tex
}

/// Driver states, advanced once per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Looking at the start of a line, deciding how to treat it.
    ScanningLine,
    /// The line contains `:=` and registers a macro.
    Definition,
    /// The line is a sequence of expressions emitted to the output.
    Expression,
    /// The line's tokens are consumed; handle its terminator.
    LineEnd { definition: bool },
    /// All tokens are consumed.
    Done,
}

/// The line/document driver.
///
/// A driver owns the cursor into the token sequence, the command map for
/// this run, and the output fragments built so far. It is consumed by
/// [`Driver::run`]; each full translation of a document uses a fresh driver
/// and therefore a fresh macro table.
pub struct Driver<'a, 't> {
    tokens: &'t [Token<'a>],
    pos: usize,
    commands: command::Map,
    output: Vec<String>,
}

impl<'a, 't> Driver<'a, 't> {
    /// Create a driver with a freshly seeded command map.
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self::with_commands(tokens, command::Map::default())
    }

    /// Create a driver with a caller-provided command map.
    ///
    /// This is the hook for embedders that pre-register passthrough names
    /// or macros before the document is processed.
    pub fn with_commands(tokens: &'t [Token<'a>], commands: command::Map) -> Self {
        Self {
            tokens,
            pos: 0,
            commands,
            output: Vec::new(),
        }
    }

    /// Run the driver over the whole token sequence and assemble the
    /// document output.
    pub fn run(mut self) -> String {
        log::trace!("translating {} tokens", self.tokens.len());
        let mut state = State::ScanningLine;
        loop {
            state = match state {
                State::ScanningLine => {
                    if self.pos >= self.tokens.len() {
                        State::Done
                    } else if self.line_is_definition() {
                        State::Definition
                    } else {
                        State::Expression
                    }
                }
                State::Definition => {
                    self.definition();
                    State::LineEnd { definition: true }
                }
                State::Expression => {
                    let fragments = self.expressions();
                    self.output.extend(fragments);
                    State::LineEnd { definition: false }
                }
                State::LineEnd { definition } => {
                    if let Some(Token::Newline) = self.tokens.get(self.pos) {
                        self.pos += 1;
                        if !definition {
                            self.output.push(LINE_BREAK.to_string());
                        }
                    }
                    State::ScanningLine
                }
                State::Done => break,
            };
        }
        self.output.join(" ")
    }

    /// True at a newline or at the end of the token sequence.
    fn at_line_break(&self) -> bool {
        matches!(self.tokens.get(self.pos), None | Some(Token::Newline))
    }

    /// Scan the rest of the current line, without consuming, for the
    /// definition operator.
    fn line_is_definition(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .take_while(|t| !matches!(t, Token::Newline))
            .any(|t| matches!(t, Token::Define))
    }

    /// Parse expressions until the line boundary.
    fn expressions(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        while !self.at_line_break() {
            fragments.push(self.expression());
        }
        fragments
    }

    /// Parse one expression and render it.
    ///
    /// A word whose classification is callable begins a function call;
    /// every other token is consumed as literal text.
    fn expression(&mut self) -> String {
        let token = self.tokens[self.pos];
        if let Token::Word(name) = token {
            let call_follows = matches!(self.tokens.get(self.pos + 1), Some(Token::GroupOpen));
            if self.commands.classify(name, call_follows) != Classification::Unclassified {
                return self.function_call(name);
            }
        }
        self.pos += 1;
        Node::Text(token.text()).render(&self.commands)
    }

    /// Parse a function call whose name token is at the cursor.
    fn function_call(&mut self, name: &'a str) -> String {
        self.pos += 1;
        let params = match self.tokens.get(self.pos) {
            Some(Token::GroupOpen) => {
                self.pos += 1;
                self.parameter_list()
            }
            _ => Vec::new(),
        };
        Node::Call { name, params }.render(&self.commands)
    }

    /// Parse a parameter list whose opening parenthesis has been consumed.
    ///
    /// Each comma closes a parameter slot; within a slot, expression
    /// fragments are concatenated without a separator, so `k = 0` fills one
    /// slot with `k=0`. The closing parenthesis, if present, is consumed. A
    /// line boundary ends the list without error; the newline is left for
    /// the driver.
    fn parameter_list(&mut self) -> Vec<String> {
        let mut params = Vec::new();
        let mut pending = String::new();
        loop {
            match self.tokens.get(self.pos) {
                None | Some(Token::Newline) => break,
                Some(Token::GroupClose) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Comma) => {
                    self.pos += 1;
                    params.push(std::mem::take(&mut pending));
                }
                Some(_) => pending.push_str(&self.expression()),
            }
        }
        if !pending.is_empty() {
            params.push(pending);
        }
        params
    }

    /// Process a definition line: consume the name and the operator, parse
    /// the remainder as expressions, and register the joined fragments as a
    /// zero-argument macro.
    ///
    /// The body expands once, here; invoking the macro later replays the
    /// captured fragment without re-evaluation.
    fn definition(&mut self) {
        let Some(name) = self.tokens.get(self.pos).map(Token::text) else {
            return;
        };
        self.pos += 1;
        // The `:=` located by the line scan. On well-formed input it
        // directly follows the name; on garbage input this consumes
        // whatever token is there instead.
        self.pos += 1;
        let body = self.expressions().join(" ");
        log::debug!("defined macro {name:?} as {body:?}");
        self.commands.insert_macro(name, body);
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;

    use super::*;

    fn run_translate_test(input: &str, want: &str) {
        let tokens: Vec<Token> = Lexer::new(input).collect();
        let got = Driver::new(&tokens).run();
        assert_eq!(got, want);
    }

    macro_rules! translate_tests {
        ( $( ($name: ident, $input: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let input = $input;
                    let want = $want;
                    run_translate_test(input, want);
                }
            )+
        };
    }

    translate_tests!(
        (empty_document, "", "",),
        (plain_word, "theta", "theta",),
        (passthrough_call, "foo(x)", r"\foo{x}",),
        (passthrough_multiple_params, "frac(a,b)", r"\frac{a}{b}",),
        (passthrough_zero_params, "theta()", r"\theta ",),
        (sum_one_param, "sum(a)", r"\sum{a}",),
        (sum_two_params, "sum(a,b)", r"\sum_{b}{a}",),
        (sum_three_params, "sum(a,b,c)", r"\sum_{b}^{c}{a}",),
        (int_three_params, "int(f,0,1)", r"\int_{0}^{1}{f}",),
        (lim_two_params, "lim(f,0)", r"\lim_{0}{f}",),
        (lim_ignores_extra_params, "lim(a,b,c)", r"\lim_{b}{a}",),
        (builtin_zero_params, "sum()", r"\sum{}",),
        (builtin_without_parens, "sum", r"\sum{}",),
        (par_wraps, "par(x)", r"\left( x \right)",),
        (
            par_space_joins_slots,
            "par(a,b)",
            r"\left( a b \right)",
        ),
        (
            slot_fragments_concatenate,
            "par(|r| < 1)",
            r"\left( |r|<1 \right)",
        ),
        (
            slot_with_operators,
            "sum(k = 0, n, r)",
            r"\sum_{n}^{r}{k=0}",
        ),
        (
            nested_calls,
            "par(sum(a,b))",
            r"\left( \sum_{b}{a} \right)",
        ),
        (
            call_inside_slot_concatenates,
            "frac(a + sum(b), c)",
            r"\frac{a+\sum{b}}{c}",
        ),
        (
            raw_tokens_pass_through,
            "a + b = c",
            "a + b = c",
        ),
        (
            braces_pass_through,
            "e ^ { n }",
            "e ^ { n }",
        ),
        (
            expression_lines_get_break_markers,
            "a\nb",
            r"a \\ b",
        ),
        (
            trailing_newline_gets_a_marker,
            "a\n",
            r"a \\",
        ),
        (
            empty_line_gets_a_marker,
            "a\n\nb",
            r"a \\ \\ b",
        ),
        (
            macro_definition_then_use,
            "e := mathrm(e)\ne",
            r"\mathrm{e}",
        ),
        (
            macro_call_with_parens_ignores_params,
            "e := mathrm(e)\ne(x)",
            r"\mathrm{e}",
        ),
        (
            macro_use_before_definition_is_text,
            "e\ne := mathrm(e)\ne",
            r"e \\ \mathrm{e}",
        ),
        (
            redefinition_overwrites,
            "e := x\ne := y\ne",
            "y",
        ),
        (
            definition_captures_at_definition_time,
            "a := x\nb := a\na := y\nb",
            "x",
        ),
        (
            definition_body_joins_with_spaces,
            "f := a + b\nf",
            "a + b",
        ),
        (
            definition_overwrites_builtin,
            "sum := Sigma\nsum(a)",
            "Sigma",
        ),
        (
            empty_definition_body,
            "e :=\ne",
            "",
        ),
        (
            unterminated_call_truncates_gracefully,
            "par(x",
            r"\left( x \right)",
        ),
        (
            unterminated_call_keeps_the_line_break,
            "par(x\ny",
            r"\left( x \right) \\ y",
        ),
        (
            dangling_comma,
            "frac(a,",
            r"\frac{a}",
        ),
        (
            empty_slot_is_kept,
            "frac(,a)",
            r"\frac{}{a}",
        ),
        (
            trailing_empty_slot_is_dropped,
            "frac(a,)",
            r"\frac{a}",
        ),
        (
            trailing_definition_operator,
            "e :=",
            "",
        ),
        (
            euler_identity_document,
            "e := mathrm(e)\ni := mathrm(i)\ne^{i theta} = cos(theta) + i sin(theta)",
            r"\mathrm{e} ^ { \mathrm{i} theta } = \cos{theta} + \mathrm{i} \sin{theta}",
        ),
        (
            geometric_series_line,
            "lim(n, infty, sum(k = 0, n, a cdot r^k)) = frac(a, 1 - r) quad par(|r| < 1)",
            r"\lim_{infty}{n} = \frac{a}{1-r} quad \left( |r|<1 \right)",
        ),
    );

    #[test]
    fn runs_use_independent_macro_tables() {
        let tokens: Vec<Token> = Lexer::new("e := mathrm(e)\ne").collect();
        assert_eq!(Driver::new(&tokens).run(), r"\mathrm{e}");

        // A second document never sees the first document's definitions.
        let tokens: Vec<Token> = Lexer::new("e").collect();
        assert_eq!(Driver::new(&tokens).run(), "e");
    }

    #[test]
    fn seeded_commands_apply_to_the_whole_run() {
        let mut commands = command::Map::default();
        commands.insert("theta", command::Command::Passthrough);
        let tokens: Vec<Token> = Lexer::new("theta + 1").collect();
        let got = Driver::with_commands(&tokens, commands).run();
        assert_eq!(got, r"\theta  + 1");
    }
}
