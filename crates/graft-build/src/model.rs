//! `SymbolModel` over parsed Rust source.
//!
//! Indexing copies everything the pipeline may ask about into plain data, so
//! the model is `Sync` even though `syn` trees are not.

use crate::{
    resolve::Imports,
    source::{Module, SourceTree},
};
use graft_core::{
    markers::MarkerSet,
    model::{
        ArgValue, Constructor, Location, Marker, NodeId, NodeKind, SymbolId, SymbolModel,
        SyntaxNode, SyntaxTree, Visibility,
    },
};
use proc_macro2::Span;
use quote::ToTokens;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};
use syn::{
    Attribute, Expr, ExprLit, FnArg, Generics, ImplItem, Item, Lit, Meta, ReturnType,
    Token, Type, punctuated::Punctuated,
};
use tracing::{debug, trace};
use xxhash_rust::xxh3::xxh3_64;

struct TypeSymbol {
    name: String,
    namespace: String,
    markers: Vec<Marker>,
    constructors: Vec<Constructor>,
    type_params: usize,
    location: Location,
}

struct FieldSymbol {
    name: String,
    owner: SymbolId,
    ty: String,
    markers: Vec<Marker>,
    location: Location,
}

enum Symbol {
    Field(FieldSymbol),
    Type(TypeSymbol),
}

// A type declaration waiting for its constructors.
struct PendingType<'a> {
    module: &'a Module,
    imports: &'a Imports,
    imports_fingerprint: u64,
    item: &'a Item,
}

///
/// SourceModel
///

#[derive(Default)]
pub struct SourceModel {
    nodes: Vec<SyntaxNode>,
    bindings: HashMap<NodeId, SymbolId>,
    symbols: HashMap<SymbolId, Symbol>,
    taken: HashSet<u64>,
    namespaces: Vec<String>,
    files: Vec<PathBuf>,
}

impl SourceModel {
    /// Index a loaded module tree. `root` shortens file names in locations.
    #[must_use]
    pub fn build(tree: &SourceTree, markers: &MarkerSet, root: &Path) -> Self {
        let mut model = Self {
            namespaces: tree.modules.iter().map(|m| m.namespace.clone()).collect(),
            files: tree.files.clone(),
            ..Self::default()
        };
        let crate_name = tree
            .modules
            .first()
            .map(|m| m.namespace.clone())
            .unwrap_or_default();

        let imports: Vec<Imports> = tree
            .modules
            .iter()
            .map(|m| Imports::collect(&m.items, &crate_name, &m.namespace))
            .collect();

        let declared: HashSet<String> = tree
            .modules
            .iter()
            .flat_map(|m| {
                m.items.iter().filter_map(move |item| match item {
                    Item::Struct(s) => Some(format!("{}::{}", m.namespace, s.ident)),
                    Item::Enum(e) => Some(format!("{}::{}", m.namespace, e.ident)),
                    Item::Union(u) => Some(format!("{}::{}", m.namespace, u.ident)),
                    _ => None,
                })
            })
            .collect();

        // constructors may live in any module's impl blocks
        let mut constructors: HashMap<String, Vec<Constructor>> = HashMap::new();
        let mut pending = Vec::new();

        for (module, imports) in tree.modules.iter().zip(&imports) {
            let imports_fingerprint = xxh3_64(format!("{imports:?}").as_bytes());

            for item in &module.items {
                match item {
                    Item::Struct(_) | Item::Enum(_) | Item::Union(_) => {
                        pending.push(PendingType {
                            module,
                            imports,
                            imports_fingerprint,
                            item,
                        });
                    }
                    Item::Impl(imp) if imp.trait_.is_none() => {
                        let Type::Path(self_ty) = imp.self_ty.as_ref() else {
                            continue;
                        };
                        if self_ty.qself.is_some() {
                            continue;
                        }
                        let Some(last) = self_ty.path.segments.last() else {
                            continue;
                        };

                        let owner = imports.resolve_local(&self_ty.path, &declared);
                        let found = inherent_constructors(&imp.items, &last.ident.to_string());
                        constructors.entry(owner).or_default().extend(found);
                    }
                    _ => {}
                }
            }
        }

        for pending in pending {
            model.index_type(&pending, &constructors, markers, root);
        }
        debug!(
            nodes = model.nodes.len(),
            modules = model.namespaces.len(),
            "source model built"
        );

        model
    }

    /// Every module scanned, in tree order.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Every file read.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn index_type(
        &mut self,
        pending: &PendingType<'_>,
        constructors: &HashMap<String, Vec<Constructor>>,
        markers: &MarkerSet,
        root: &Path,
    ) {
        let (ident, attrs, generics, fields) = match pending.item {
            Item::Struct(s) => (&s.ident, &s.attrs, &s.generics, Some(&s.fields)),
            Item::Enum(e) => (&e.ident, &e.attrs, &e.generics, None),
            Item::Union(u) => (&u.ident, &u.attrs, &u.generics, None),
            _ => return,
        };
        let namespace = &pending.module.namespace;
        let name = ident.to_string();
        let fq = format!("{namespace}::{name}");
        let ctors = constructors.get(&fq).cloned().unwrap_or_default();

        let mut fingerprint = pending.item.to_token_stream().to_string();
        fingerprint.push_str(&pending.imports_fingerprint.to_string());
        for ctor in &ctors {
            fingerprint.push_str(&format!(";{}:{}:{}", ctor.name, ctor.visibility, ctor.params));
        }
        let revision = xxh3_64(fingerprint.as_bytes());

        let derives = derive_paths(attrs, pending.imports, markers);
        let type_markers = attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("derive"))
            .map(|attr| Marker {
                path: pending.imports.resolve_marker(attr.path(), markers),
                args: marker_args(attr),
            })
            .collect();

        let file = &pending.module.file;
        let owner = self.declare(&format!("type:{fq}"), NodeKind::Type, revision);
        self.symbols.insert(
            owner,
            Symbol::Type(TypeSymbol {
                name,
                namespace: namespace.clone(),
                markers: type_markers,
                constructors: ctors,
                type_params: generic_count(generics),
                location: location(root, file, ident.span()),
            }),
        );
        trace!(%owner, %fq, "type indexed");

        let Some(fields) = fields else {
            return;
        };

        for (index, field) in fields.iter().enumerate() {
            let kind = NodeKind::Field {
                marker_lists: field.attrs.len(),
            };

            let Some(field_ident) = &field.ident else {
                // positional fields have no name to expose
                if !field.attrs.is_empty() {
                    self.declare_unbound(&format!("field:{fq}#{index}"), kind, revision);
                }
                continue;
            };

            let field_markers = field
                .attrs
                .iter()
                .map(|attr| Marker {
                    path: helper_marker(attr, &derives, markers)
                        .unwrap_or_else(|| pending.imports.resolve_marker(attr.path(), markers)),
                    args: marker_args(attr),
                })
                .collect();

            let symbol = self.declare(&format!("field:{fq}::{field_ident}"), kind, revision);
            self.symbols.insert(
                symbol,
                Symbol::Field(FieldSymbol {
                    name: field_ident.to_string(),
                    owner,
                    ty: field.ty.to_token_stream().to_string(),
                    markers: field_markers,
                    location: location(root, file, field_ident.span()),
                }),
            );
        }
    }

    // bound node plus symbol; returns the symbol
    fn declare(&mut self, key: &str, kind: NodeKind, revision: u64) -> SymbolId {
        let node = NodeId(self.allocate(&format!("node:{key}")));
        let symbol = SymbolId(self.allocate(&format!("symbol:{key}")));

        self.nodes.push(SyntaxNode::new(node, kind, revision));
        self.bindings.insert(node, symbol);

        symbol
    }

    fn declare_unbound(&mut self, key: &str, kind: NodeKind, revision: u64) {
        let node = NodeId(self.allocate(&format!("node:{key}")));
        self.nodes.push(SyntaxNode::new(node, kind, revision));
    }

    // stable id for a key; cfg-duplicated declarations get a suffix
    fn allocate(&mut self, key: &str) -> u64 {
        let mut id = xxh3_64(key.as_bytes());
        let mut suffix = 0_u32;

        while !self.taken.insert(id) {
            suffix += 1;
            id = xxh3_64(format!("{key}#{suffix}").as_bytes());
        }

        id
    }

    fn entry(&self, symbol: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&symbol)
    }
}

impl SyntaxTree for SourceModel {
    fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }
}

impl SymbolModel for SourceModel {
    fn declared_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.bindings.get(&node).copied()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Option<String> {
        match self.entry(symbol)? {
            Symbol::Type(t) => Some(t.name.clone()),
            Symbol::Field(f) => Some(f.name.clone()),
        }
    }

    fn markers(&self, symbol: SymbolId) -> Vec<Marker> {
        match self.entry(symbol) {
            Some(Symbol::Type(t)) => t.markers.clone(),
            Some(Symbol::Field(f)) => f.markers.clone(),
            None => Vec::new(),
        }
    }

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId> {
        match self.entry(symbol)? {
            Symbol::Field(f) => Some(f.owner),
            Symbol::Type(_) => None,
        }
    }

    fn containing_namespace(&self, symbol: SymbolId) -> Option<String> {
        match self.entry(symbol)? {
            Symbol::Type(t) => Some(t.namespace.clone()),
            Symbol::Field(f) => self.containing_namespace(f.owner),
        }
    }

    fn constructors(&self, ty: SymbolId) -> Vec<Constructor> {
        match self.entry(ty) {
            Some(Symbol::Type(t)) => t.constructors.clone(),
            _ => Vec::new(),
        }
    }

    fn declared_type_display_name(&self, symbol: SymbolId) -> Option<String> {
        match self.entry(symbol)? {
            Symbol::Field(f) => Some(f.ty.clone()),
            Symbol::Type(_) => None,
        }
    }

    fn location(&self, symbol: SymbolId) -> Option<Location> {
        match self.entry(symbol)? {
            Symbol::Type(t) => Some(t.location.clone()),
            Symbol::Field(f) => Some(f.location.clone()),
        }
    }

    fn type_parameter_count(&self, ty: SymbolId) -> usize {
        match self.entry(ty) {
            Some(Symbol::Type(t)) => t.type_params,
            _ => 0,
        }
    }
}

// Associated functions with no receiver returning the type itself.
fn inherent_constructors(items: &[ImplItem], type_name: &str) -> Vec<Constructor> {
    items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(f) => Some(f),
            _ => None,
        })
        .filter(|f| !matches!(f.sig.inputs.first(), Some(FnArg::Receiver(_))))
        .filter(|f| returns_self(&f.sig.output, type_name))
        .map(|f| {
            Constructor::new(
                f.sig.ident.to_string(),
                visibility(&f.vis),
                f.sig.inputs.len(),
            )
        })
        .collect()
}

fn returns_self(output: &ReturnType, type_name: &str) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };

    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "Self" || s.ident == type_name)
}

const fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(_) => Visibility::Restricted,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

fn generic_count(generics: &Generics) -> usize {
    generics.params.len()
}

fn location(root: &Path, file: &Path, span: Span) -> Location {
    let start = span.start();
    let file = file.strip_prefix(root).unwrap_or(file);

    Location::new(file.display().to_string(), start.line, start.column + 1)
}

// Resolved paths of every `#[derive(..)]` on the type.
fn derive_paths(
    attrs: &[Attribute],
    imports: &Imports,
    markers: &MarkerSet,
) -> Vec<graft_core::model::MarkerPath> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .map(|path| imports.resolve_marker(&path, markers))
        .collect()
}

// A helper attribute only means something when a derive on the owning type
// registers it.
fn helper_marker(
    attr: &Attribute,
    derives: &[graft_core::model::MarkerPath],
    markers: &MarkerSet,
) -> Option<graft_core::model::MarkerPath> {
    let helper = attr.path().get_ident()?.to_string();

    derives
        .iter()
        .any(|derive| markers.helper_attributes(derive).contains(&helper.as_str()))
        .then(|| markers.helper_identity(&helper))
}

// Named arguments in written order; a bare name is a `true` flag.
fn marker_args(attr: &Attribute) -> Vec<(String, ArgValue)> {
    let Meta::List(_) = &attr.meta else {
        return Vec::new();
    };
    let Ok(nested) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
        return Vec::new();
    };

    nested
        .iter()
        .filter_map(|meta| match meta {
            Meta::Path(path) => Some((path.get_ident()?.to_string(), ArgValue::Bool(true))),
            Meta::NameValue(nv) => Some((nv.path.get_ident()?.to_string(), arg_value(&nv.value))),
            Meta::List(_) => None,
        })
        .collect()
}

fn arg_value(expr: &Expr) -> ArgValue {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Bool(b) => ArgValue::Bool(b.value),
            Lit::Int(i) => i.base10_parse().map_or(ArgValue::Null, ArgValue::Int),
            Lit::Str(s) => ArgValue::Str(s.value()),
            _ => ArgValue::Null,
        },
        _ => ArgValue::Null,
    }
}

///
/// TESTS
///
