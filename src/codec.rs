//! Flat control identifiers.
//!
//! An identifier flattens a path through the schema into one string:
//! `.` descends into an object field and `-N` marks the N-th repetition of
//! the segment it is attached to.
//!
//! ```text
//! name                      top-level flat field
//! address.street            field of a nested object
//! tags-2                    third row of a primitive array
//! things-0.thing_attribute  field of the first row of an array of objects
//! ```
//!
//! The renderer only ever builds identifiers through [`Identifier`], and the
//! parser only ever takes them apart through [`tokenize`] / [`field_path`].
use std::borrow::Borrow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ————————————————————————————————————————————————————————————————————————————
// PATTERNS
// ————————————————————————————————————————————————————————————————————————————

/// Either an index suffix (`-N`, optionally eating the following `.`) or a
/// plain `.` between two field names. Group 1 is the index.
static SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)\.?|\.").expect("split pattern"));

static INDEX_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\d+").expect("suffix pattern"));

static AMBIGUOUS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.+]|-\d|^\d+$").expect("name pattern"));

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Token {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

// ————————————————————————————————————————————————————————————————————————————
// ENCODE
// ————————————————————————————————————————————————————————————————————————————

impl Identifier {
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// `self.name`
    pub fn field(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// `self-index`
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}-{index}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> Vec<Token> {
        tokenize(&self.0)
    }

    pub fn field_path(&self) -> Vec<String> {
        field_path(&self.0)
    }

    /// True when `other` lives strictly below this identifier.
    pub fn is_ancestor_of(&self, other: &str) -> bool {
        match other.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.starts_with('.') || rest.starts_with('-'),
            None => false,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Inverse of [`tokenize`] for well-formed token runs (a run starts with a field).
pub fn encode(tokens: &[Token]) -> Identifier {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Token::Index(index) => {
                out.push('-');
                out.push_str(&index.to_string());
            }
        }
    }
    Identifier(out)
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

/// Split an identifier into its ordered field/index walk.
///
/// `welp-1.womp.welp-2.wilp` → `[welp, 1, womp, welp, 2, wilp]`. Empty pieces
/// left over by the split are dropped.
pub fn tokenize(identifier: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for caps in SPLIT.captures_iter(identifier) {
        let Some(whole) = caps.get(0) else { continue };
        push_field(&mut tokens, &identifier[last..whole.start()]);
        if let Some(index) = caps.get(1) {
            match index.as_str().parse::<usize>() {
                Ok(n) => tokens.push(Token::Index(n)),
                // too many digits for an index; keep the text rather than lose it
                Err(_) => push_field(&mut tokens, index.as_str()),
            }
        }
        last = whole.end();
    }
    push_field(&mut tokens, &identifier[last..]);
    tokens
}

fn push_field(tokens: &mut Vec<Token>, piece: &str) {
    if !piece.is_empty() {
        tokens.push(Token::Field(piece.to_string()));
    }
}

/// Schema path of an identifier: every `-N` suffix removed, then split on `.`.
pub fn field_path(identifier: &str) -> Vec<String> {
    INDEX_SUFFIX
        .replace_all(identifier, "")
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `name` can be used as a single identifier segment without being
/// misread by [`tokenize`] or colliding with event suffixes.
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && !AMBIGUOUS_NAME.is_match(name)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn f(name: &str) -> Token {
        Token::Field(name.to_string())
    }

    #[test]
    fn tokenizes_interleaved_fields_and_indices() {
        assert_eq!(
            tokenize("welp-1.womp.welp-2.wilp"),
            vec![f("welp"), Token::Index(1), f("womp"), f("welp"), Token::Index(2), f("wilp")],
        );
    }

    #[test]
    fn trailing_index_has_no_empty_artifact() {
        assert_eq!(
            tokenize("welp-1.womp-2"),
            vec![f("welp"), Token::Index(1), f("womp"), Token::Index(2)],
        );
        assert_eq!(tokenize("tags-0"), vec![f("tags"), Token::Index(0)]);
        assert_eq!(tokenize("name"), vec![f("name")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn field_path_strips_indices_in_either_order() {
        assert_eq!(field_path("things.thing_attribute-3"), ["things", "thing_attribute"]);
        assert_eq!(field_path("things-3.thing_attribute"), ["things", "thing_attribute"]);
        assert_eq!(field_path("tags-12"), ["tags"]);
    }

    #[test]
    fn builder_and_tokenizer_agree() {
        let id = Identifier::root("things").index(4).field("tags").index(0);
        assert_eq!(id.as_str(), "things-4.tags-0");
        assert_eq!(encode(&id.tokens()), id);

        let nested = Identifier::root("address").field("geo").field("lat");
        assert_eq!(nested.as_str(), "address.geo.lat");
        assert_eq!(nested.tokens(), vec![f("address"), f("geo"), f("lat")]);
    }

    #[test]
    fn ancestry_respects_segment_boundaries() {
        let things = Identifier::root("things");
        assert!(things.is_ancestor_of("things-0.name"));
        assert!(things.is_ancestor_of("things.name"));
        assert!(!things.is_ancestor_of("things"));
        assert!(!things.is_ancestor_of("thingsx-0"));
    }

    #[test]
    fn rejects_names_the_tokenizer_would_split() {
        for ok in ["name", "thing_attribute", "first-name", "a1", "x-y"] {
            assert!(is_valid_field_name(ok), "{ok}");
        }
        for bad in ["", "a.b", "a-1", "b-2c", "42", "save+add"] {
            assert!(!is_valid_field_name(bad), "{bad}");
        }
    }
}
