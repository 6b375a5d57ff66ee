//! Grammar of generic schema type names.
//!
//! Java-flavoured schema generators encode generic instantiations in the schema
//! key itself, e.g. `Result«Page«List«User»»»`. A name is read as a chain of
//! tokens, outermost first. `List` is a structural marker: it is not a class and
//! means the token after it arrives as a JSON array.
//!
//! ```
//! use clientgen::generation::grammar::{parse_chain, root_class, inner_class};
//!
//! assert_eq!(parse_chain("Page«List«User»»"), vec!["Page", "List", "User"]);
//! assert_eq!(root_class("Page«List«User»»"), "Page");
//! assert_eq!(inner_class("Page«List«User»»"), "List«User»");
//! ```

/// Opens one nesting level
pub const OPEN: char = '«';
/// Closes one nesting level
pub const CLOSE: char = '»';
/// Token marking that the next token is wrapped in a sequence
pub const LIST_MARKER: &str = "List";
/// Bracket form some generators use instead of guillemets
const SEQUENCE_BRACKET: char = '[';

/// Last `/`-separated segment of a `$ref`, i.e. the schema key it points at.
///
/// `#/components/schemas/Page«User»` becomes `Page«User»`; a bare name is
/// returned unchanged.
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Split a type name into its chain of tokens in declaration order.
///
/// A non-generic name yields a single-element chain equal to the input.
pub fn parse_chain(type_ref: &str) -> Vec<String> {
    type_ref
        .replace(CLOSE, "")
        .split(OPEN)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_chain`]: `[A, List, B]` becomes `A«List«B»»`.
pub fn join_chain<S: AsRef<str>>(tokens: &[S]) -> String {
    let parts: Vec<&str> = tokens.iter().map(|token| token.as_ref()).collect();
    let mut joined = parts.join(&OPEN.to_string());
    for _ in 1..tokens.len() {
        joined.push(CLOSE);
    }
    joined
}

/// The outer class, with every generic parameter dropped.
pub fn root_class(type_ref: &str) -> &str {
    type_ref.split(OPEN).next().unwrap_or(type_ref)
}

/// Content of the first nesting level, or the whole name when not generic.
pub fn inner_class(type_ref: &str) -> &str {
    match type_ref.find(OPEN) {
        Some(index) => {
            let rest = &type_ref[index + OPEN.len_utf8()..];
            rest.strip_suffix(CLOSE).unwrap_or(rest)
        }
        None => type_ref,
    }
}

/// Whether the name carries generic parameters
pub fn is_generic(type_ref: &str) -> bool {
    type_ref.contains(OPEN) || type_ref.contains(SEQUENCE_BRACKET)
}

/// One class in a chain with the `List` markers folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLevel<'a> {
    pub class: &'a str,
    /// How many `List` markers directly precede this class; `List«List«X»»`
    /// gives `X` a depth of two.
    pub list_depth: usize,
}

impl ChainLevel<'_> {
    pub fn is_list_wrapped(&self) -> bool {
        self.list_depth > 0
    }
}

/// Walk a chain left to right, folding `List` markers into the level that
/// follows them.
///
/// Both type formatting and unwrap generation consume this walk, so a level's
/// sequence wrapping is decided in exactly one place. A trailing marker with no
/// element type after it carries no class and is dropped.
pub fn levels(chain: &[String]) -> Vec<ChainLevel<'_>> {
    let mut levels = Vec::with_capacity(chain.len());
    let mut pending_lists = 0;
    for (index, token) in chain.iter().enumerate() {
        // The root is always a class, even one literally named `List`.
        if index > 0 && token == LIST_MARKER {
            pending_lists += 1;
            continue;
        }
        levels.push(ChainLevel {
            class: token,
            list_depth: pending_lists,
        });
        pending_lists = 0;
    }
    levels
}
