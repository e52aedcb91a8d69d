//! Classification of pro-eq identifiers into LaTeX production strategies.
//!
//! Every identifier the parser treats as callable resolves to a
//! [`Command`]: a LaTeX passthrough, one of the built-in large operation
//! layouts, or a user defined macro. Commands live in a [`Map`] keyed by
//! identifier text. The map is an explicit value owned by the document
//! driver for one translation run; independent runs use independent maps.
//!
//! The built-in layouts are seeded when the map is constructed and are never
//! removed. User macros are registered while the document is being processed
//! and overwrite any existing entry for the same name, built-ins included.

use std::collections::HashMap;
use std::fmt::Write;

/// A pro-eq command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Render as the LaTeX command of the same name with each parameter
    /// brace-wrapped, e.g. `frac(a,b)` becomes `\frac{a}{b}`.
    ///
    /// A call with no parameters renders as `\name ` with a trailing space,
    /// which keeps the command name from gluing onto following text.
    Passthrough,

    /// One of the built-in large operation layouts.
    Layout(Layout),

    /// A user defined macro registered by a `name := body` line.
    ///
    /// The body is the LaTeX fragment captured when the definition line was
    /// processed; invoking the macro yields it verbatim.
    Macro(String),
}

/// A built-in large operation layout.
///
/// Layouts are arity-flexible: each reads as many optional parameters as
/// were supplied and ignores any extras.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// `par`: wrap in `\left( … \right)`.
    Parens,
    /// `sum`: `\sum`, an optional lower and upper bound, then the body.
    Sum,
    /// `int`: as `sum`, but `\int`.
    Integral,
    /// `lim`: `\lim`, an optional lower bound, then the body.
    Limit,
}

impl Layout {
    /// Render the layout given the already-rendered parameter fragments.
    ///
    /// A missing body renders as an empty `{}` rather than failing.
    pub fn render(self, params: &[String]) -> String {
        let body = params.first().map(String::as_str).unwrap_or_default();
        match self {
            Layout::Parens => format!(r"\left( {} \right)", params.join(" ")),
            Layout::Sum | Layout::Integral => {
                let mut tex = String::from(match self {
                    Layout::Sum => r"\sum",
                    _ => r"\int",
                });
                if let Some(lower) = params.get(1) {
                    write!(tex, "_{{{lower}}}").unwrap();
                }
                if let Some(upper) = params.get(2) {
                    write!(tex, "^{{{upper}}}").unwrap();
                }
                write!(tex, "{{{body}}}").unwrap();
                tex
            }
            Layout::Limit => {
                let mut tex = String::from(r"\lim");
                if let Some(lower) = params.get(1) {
                    write!(tex, "_{{{lower}}}").unwrap();
                }
                write!(tex, "{{{body}}}").unwrap();
                tex
            }
        }
    }
}

/// Result of classifying an identifier against a [`Map`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The identifier renders as a LaTeX command with brace-wrapped
    /// arguments.
    Passthrough,
    /// The identifier is a built-in large operation.
    Layout(Layout),
    /// The identifier is a user defined macro with the given body.
    Macro(&'a str),
    /// The identifier is not callable here and must be treated as plain
    /// text.
    Unclassified,
}

/// Mapping from identifier text to command.
///
/// At most one command is registered per identifier; registering a name
/// again overwrites the previous entry (last write wins, no error).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Map {
    commands: HashMap<String, Command>,
}

impl Default for Map {
    /// Build a map seeded with the built-in layouts.
    fn default() -> Self {
        let commands = [
            ("par", Layout::Parens),
            ("sum", Layout::Sum),
            ("int", Layout::Integral),
            ("lim", Layout::Limit),
        ]
        .into_iter()
        .map(|(name, layout)| (name.to_string(), Command::Layout(layout)))
        .collect();
        Self { commands }
    }
}

impl Map {
    /// Classify an identifier, given whether a parameter list immediately
    /// follows it.
    ///
    /// A registered name is callable regardless of what follows. An
    /// unregistered name is callable only when a parameter list follows, in
    /// which case it renders as a LaTeX passthrough command; otherwise it is
    /// [`Classification::Unclassified`] and passes through as plain text.
    pub fn classify(&self, name: &str, call_follows: bool) -> Classification<'_> {
        match self.commands.get(name) {
            Some(Command::Passthrough) => Classification::Passthrough,
            Some(Command::Layout(layout)) => Classification::Layout(*layout),
            Some(Command::Macro(body)) => Classification::Macro(body),
            None if call_follows => Classification::Passthrough,
            None => Classification::Unclassified,
        }
    }

    /// Get the command registered for an identifier.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Register a command, overwriting any existing entry for the name.
    pub fn insert(&mut self, name: impl Into<String>, command: Command) {
        self.commands.insert(name.into(), command);
    }

    /// Register a user macro with the given expansion.
    pub fn insert_macro(&mut self, name: impl Into<String>, body: String) {
        self.insert(name, Command::Macro(body));
    }

    /// The number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(fragments: &[&str]) -> Vec<String> {
        fragments.iter().map(|s| s.to_string()).collect()
    }

    macro_rules! layout_tests {
        ( $( ($name: ident, $layout: expr, $params: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let got = $layout.render(&params(&$params));
                    assert_eq!(got, $want);
                }
            )+
        };
    }

    layout_tests!(
        (par_one_param, Layout::Parens, ["x"], r"\left( x \right)",),
        (
            par_joins_params_with_spaces,
            Layout::Parens,
            ["a", "b"],
            r"\left( a b \right)",
        ),
        (sum_body_only, Layout::Sum, ["a"], r"\sum{a}",),
        (sum_with_lower, Layout::Sum, ["a", "b"], r"\sum_{b}{a}",),
        (
            sum_with_bounds,
            Layout::Sum,
            ["a", "b", "c"],
            r"\sum_{b}^{c}{a}",
        ),
        (
            int_with_bounds,
            Layout::Integral,
            ["a", "b", "c"],
            r"\int_{b}^{c}{a}",
        ),
        (lim_with_lower, Layout::Limit, ["a", "b"], r"\lim_{b}{a}",),
        (
            lim_ignores_extra_params,
            Layout::Limit,
            ["a", "b", "c"],
            r"\lim_{b}{a}",
        ),
        (sum_empty_body, Layout::Sum, [], r"\sum{}",),
    );

    #[test]
    fn built_ins_are_seeded() {
        let map = Map::default();
        assert_eq!(
            map.classify("sum", false),
            Classification::Layout(Layout::Sum)
        );
        assert_eq!(
            map.classify("par", false),
            Classification::Layout(Layout::Parens)
        );
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn unregistered_name_is_callable_only_before_a_parameter_list() {
        let map = Map::default();
        assert_eq!(map.classify("theta", false), Classification::Unclassified);
        assert_eq!(map.classify("theta", true), Classification::Passthrough);
    }

    #[test]
    fn macro_registration_overwrites_built_ins() {
        let mut map = Map::default();
        map.insert_macro("sum", r"\Sigma".to_string());
        assert_eq!(
            map.classify("sum", false),
            Classification::Macro(r"\Sigma")
        );
    }

    #[test]
    fn later_registration_wins() {
        let mut map = Map::default();
        map.insert_macro("e", r"\mathrm{e}".to_string());
        map.insert_macro("e", r"\epsilon".to_string());
        assert_eq!(map.classify("e", false), Classification::Macro(r"\epsilon"));
    }
}
