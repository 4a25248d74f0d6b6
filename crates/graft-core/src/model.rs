//! Host-facing declaration model.
//!
//! The pipeline never touches a concrete compiler API. A host implements
//! [`SyntaxTree`] (the node snapshot) and [`SymbolModel`] (resolution) and the
//! rest of the crate only speaks these types.

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// NodeId
///
/// Host-assigned identity of a syntax node. Must be stable across reparses of
/// an unchanged declaration so extraction results can be reused.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("node#{_0:016x}")]
pub struct NodeId(pub u64);

///
/// SymbolId
///
/// Host-assigned identity of a resolved declaration. Two declarations with the
/// same short name in different scopes must have different ids.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("symbol#{_0:016x}")]
pub struct SymbolId(pub u64);

///
/// NodeKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    /// A field-like declaration and the number of attribute lists on it.
    Field { marker_lists: usize },

    /// A type declaration (struct or enum).
    Type,

    Other,
}

///
/// SyntaxNode
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub kind: NodeKind,

    /// Fingerprint of everything extraction reads for this node. A node whose
    /// revision is unchanged between passes is not re-extracted.
    pub revision: u64,
}

impl SyntaxNode {
    #[must_use]
    pub const fn new(id: NodeId, kind: NodeKind, revision: u64) -> Self {
        Self { id, kind, revision }
    }
}

///
/// SyntaxTree
///
/// Snapshot of the host's parsed tree, flattened to declaration nodes in
/// source order.
///

pub trait SyntaxTree {
    fn nodes(&self) -> &[SyntaxNode];
}

impl SyntaxTree for [SyntaxNode] {
    fn nodes(&self) -> &[SyntaxNode] {
        self
    }
}

impl SyntaxTree for Vec<SyntaxNode> {
    fn nodes(&self) -> &[SyntaxNode] {
        self
    }
}

///
/// MarkerPath
///
/// Fully-qualified identity of a marker, after the host has resolved imports
/// and aliases. Unresolved markers keep their written text, which never
/// contains the crate prefix of a recognised marker.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct MarkerPath(String);

impl MarkerPath {
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        let path: String = path
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        Self(path.trim_start_matches("::").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, i.e. the name the marker is written with.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or_default()
    }
}

///
/// ArgValue
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ArgValue {
    Bool(bool),
    Int(i128),
    Null,
    Str(String),
}

impl ArgValue {
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

///
/// Marker
///
/// One marker application: its resolved identity and its named arguments in
/// written order.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Marker {
    pub path: MarkerPath,
    pub args: Vec<(String, ArgValue)>,
}

impl Marker {
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: MarkerPath::new(path),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.args.push((name.into(), value));
        self
    }

    /// First named argument with the given name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

///
/// Visibility
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[remain::sorted]
pub enum Visibility {
    #[display("private")]
    Private,

    #[display("public")]
    Public,

    /// `pub(crate)`, `pub(super)` and `pub(in path)`.
    #[display("restricted")]
    Restricted,
}

impl Visibility {
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

///
/// Constructor
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Constructor {
    pub name: String,
    pub visibility: Visibility,
    pub params: usize,
}

impl Constructor {
    #[must_use]
    pub fn new(name: impl Into<String>, visibility: Visibility, params: usize) -> Self {
        Self {
            name: name.into(),
            visibility,
            params,
        }
    }

    /// Private and without parameters: the only shape the instance accessor
    /// may call.
    #[must_use]
    pub const fn is_private_parameterless(&self) -> bool {
        self.visibility.is_private() && self.params == 0
    }
}

///
/// Location
///

#[derive(
    Clone, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("{file}:{line}:{column}")]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

///
/// SymbolModel
///
/// Resolution queries the pipeline asks of its host. Every query is a pure
/// read; `None` means the host could not bind the node or symbol (typically a
/// declaration in a broken parse), and the pipeline drops that candidate.
///

pub trait SymbolModel: Sync {
    /// Symbol declared by a syntax node.
    fn declared_symbol(&self, node: NodeId) -> Option<SymbolId>;

    /// Source identifier of a symbol.
    fn symbol_name(&self, symbol: SymbolId) -> Option<String>;

    /// Marker applications on a symbol, in source order.
    fn markers(&self, symbol: SymbolId) -> Vec<Marker>;

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId>;

    /// Namespace (module path) a symbol is declared in.
    fn containing_namespace(&self, symbol: SymbolId) -> Option<String>;

    /// Declared constructors of a type, in source order.
    fn constructors(&self, ty: SymbolId) -> Vec<Constructor>;

    /// Written type of a field symbol.
    fn declared_type_display_name(&self, symbol: SymbolId) -> Option<String>;

    /// Location of the symbol's name token.
    fn location(&self, symbol: SymbolId) -> Option<Location>;

    /// Number of generic parameters declared on a type.
    fn type_parameter_count(&self, _ty: SymbolId) -> usize {
        0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_path_normalises_leading_colons_and_spacing() {
        let path = MarkerPath::new(":: graft :: singleton");

        assert_eq!(path.as_str(), "graft::singleton");
        assert_eq!(path.short_name(), "singleton");
    }

    #[test]
    fn first_named_argument_wins() {
        let marker = Marker::new("graft::notify_changed")
            .with_arg("generate_event", ArgValue::Bool(true))
            .with_arg("generate_event", ArgValue::Bool(false));

        assert_eq!(marker.arg("generate_event"), Some(&ArgValue::Bool(true)));
        assert_eq!(marker.arg("missing"), None);
    }

    #[test]
    fn only_private_zero_arg_constructors_qualify() {
        assert!(Constructor::new("new", Visibility::Private, 0).is_private_parameterless());
        assert!(!Constructor::new("new", Visibility::Public, 0).is_private_parameterless());
        assert!(!Constructor::new("new", Visibility::Restricted, 0).is_private_parameterless());
        assert!(!Constructor::new("with", Visibility::Private, 1).is_private_parameterless());
    }
}
