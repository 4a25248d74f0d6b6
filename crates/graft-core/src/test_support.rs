use crate::{
    markers::MarkerSet,
    model::{
        Constructor, Location, Marker, NodeId, NodeKind, SymbolId, SymbolModel, SyntaxNode,
        SyntaxTree,
    },
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

///
/// Declared
///
/// Node and symbol of a declaration added to a `FakeModel`.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct Declared {
    pub node: NodeId,
    pub symbol: SymbolId,
}

enum Entry {
    Type {
        name: String,
        namespace: String,
        markers: Vec<Marker>,
        constructors: Vec<Constructor>,
        type_params: usize,
        location: Location,
    },
    Field {
        name: String,
        owner: SymbolId,
        ty: String,
        markers: Vec<Marker>,
        location: Location,
    },
}

///
/// FakeModel
///
/// In-memory host: a flat node list plus a symbol table. Counts resolution
/// calls so tests can observe incremental reuse.
///

pub(crate) struct FakeModel {
    nodes: Vec<SyntaxNode>,
    symbols: HashMap<SymbolId, Entry>,
    bindings: HashMap<NodeId, SymbolId>,
    markers: MarkerSet,
    next: u64,
    resolutions: AtomicUsize,
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            symbols: HashMap::new(),
            bindings: HashMap::new(),
            markers: MarkerSet::default(),
            next: 0,
            resolutions: AtomicUsize::new(0),
        }
    }

    pub fn singleton(&self) -> Marker {
        Marker {
            path: self.markers.singleton().clone(),
            args: Vec::new(),
        }
    }

    pub fn notify(&self) -> Marker {
        Marker {
            path: self.markers.notify_changed().clone(),
            args: Vec::new(),
        }
    }

    pub fn add_type(&mut self, namespace: &str, name: &str, markers: Vec<Marker>) -> Declared {
        let declared = self.declare(NodeKind::Type);
        let location = Location::new(format!("{namespace}.rs"), self.nodes.len(), 12);

        self.symbols.insert(
            declared.symbol,
            Entry::Type {
                name: name.to_string(),
                namespace: namespace.to_string(),
                markers,
                constructors: Vec::new(),
                type_params: 0,
                location,
            },
        );

        declared
    }

    pub fn add_field(
        &mut self,
        owner: Declared,
        name: &str,
        ty: &str,
        markers: Vec<Marker>,
    ) -> Declared {
        let declared = self.declare(NodeKind::Field {
            marker_lists: markers.len(),
        });
        let location = Location::new("fields.rs", self.nodes.len(), 4);

        self.symbols.insert(
            declared.symbol,
            Entry::Field {
                name: name.to_string(),
                owner: owner.symbol,
                ty: ty.to_string(),
                markers,
                location,
            },
        );

        declared
    }

    pub fn add_constructor(&mut self, owner: Declared, constructor: Constructor) {
        if let Some(Entry::Type { constructors, .. }) = self.symbols.get_mut(&owner.symbol) {
            constructors.push(constructor);
        }
        self.touch(owner.node);
    }

    pub fn set_type_parameters(&mut self, owner: Declared, count: usize) {
        if let Some(Entry::Type { type_params, .. }) = self.symbols.get_mut(&owner.symbol) {
            *type_params = count;
        }
        self.touch(owner.node);
    }

    /// Detach a node from its symbol, as a broken parse would.
    pub fn unbind(&mut self, node: NodeId) {
        self.bindings.remove(&node);
        self.touch(node);
    }

    pub fn touch(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.iter_mut().find(|n| n.id == node) {
            n.revision += 1;
        }
    }

    pub fn remove(&mut self, node: NodeId) {
        self.nodes.retain(|n| n.id != node);
        self.bindings.remove(&node);
    }

    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    fn declare(&mut self, kind: NodeKind) -> Declared {
        self.next += 1;
        let declared = Declared {
            node: NodeId(self.next),
            symbol: SymbolId(self.next * 1_000),
        };

        self.nodes.push(SyntaxNode::new(declared.node, kind, 0));
        self.bindings.insert(declared.node, declared.symbol);

        declared
    }
}

impl SyntaxTree for FakeModel {
    fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }
}

impl SymbolModel for FakeModel {
    fn declared_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.bindings.get(&node).copied()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Option<String> {
        match self.symbols.get(&symbol)? {
            Entry::Type { name, .. } | Entry::Field { name, .. } => Some(name.clone()),
        }
    }

    fn markers(&self, symbol: SymbolId) -> Vec<Marker> {
        match self.symbols.get(&symbol) {
            Some(Entry::Type { markers, .. } | Entry::Field { markers, .. }) => markers.clone(),
            None => Vec::new(),
        }
    }

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId> {
        match self.symbols.get(&symbol)? {
            Entry::Field { owner, .. } => Some(*owner),
            Entry::Type { .. } => None,
        }
    }

    fn containing_namespace(&self, symbol: SymbolId) -> Option<String> {
        match self.symbols.get(&symbol)? {
            Entry::Type { namespace, .. } => Some(namespace.clone()),
            Entry::Field { owner, .. } => self.containing_namespace(*owner),
        }
    }

    fn constructors(&self, ty: SymbolId) -> Vec<Constructor> {
        match self.symbols.get(&ty) {
            Some(Entry::Type { constructors, .. }) => constructors.clone(),
            _ => Vec::new(),
        }
    }

    fn declared_type_display_name(&self, symbol: SymbolId) -> Option<String> {
        match self.symbols.get(&symbol)? {
            Entry::Field { ty, .. } => Some(ty.clone()),
            Entry::Type { .. } => None,
        }
    }

    fn location(&self, symbol: SymbolId) -> Option<Location> {
        match self.symbols.get(&symbol)? {
            Entry::Type { location, .. } | Entry::Field { location, .. } => {
                Some(location.clone())
            }
        }
    }

    fn type_parameter_count(&self, ty: SymbolId) -> usize {
        match self.symbols.get(&ty) {
            Some(Entry::Type { type_params, .. }) => *type_params,
            _ => 0,
        }
    }
}
