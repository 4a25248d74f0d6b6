//! Declaration scanning.
//!
//! Node-kind tests only: nothing here resolves symbols, so a scan is cheap
//! enough to rerun on every reparse.

use crate::model::{NodeKind, SyntaxNode, SyntaxTree};

/// Structural predicate selecting candidate nodes for one synthesizer.
pub type Predicate = fn(&SyntaxNode) -> bool;

/// Field-like declaration carrying at least one attribute list.
#[must_use]
pub const fn is_marked_field(node: &SyntaxNode) -> bool {
    matches!(node.kind, NodeKind::Field { marker_lists } if marker_lists > 0)
}

/// Any type declaration; marker filtering happens during extraction.
#[must_use]
pub const fn is_type_declaration(node: &SyntaxNode) -> bool {
    matches!(node.kind, NodeKind::Type)
}

/// Lazily yield the nodes of `tree` accepted by `predicate`, in tree order.
pub fn candidates<T>(tree: &T, predicate: Predicate) -> impl Iterator<Item = &SyntaxNode>
where
    T: SyntaxTree + ?Sized,
{
    tree.nodes().iter().filter(move |node| predicate(node))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;

    fn tree() -> Vec<SyntaxNode> {
        vec![
            SyntaxNode::new(NodeId(1), NodeKind::Type, 0),
            SyntaxNode::new(NodeId(2), NodeKind::Field { marker_lists: 0 }, 0),
            SyntaxNode::new(NodeId(3), NodeKind::Field { marker_lists: 2 }, 0),
            SyntaxNode::new(NodeId(4), NodeKind::Other, 0),
            SyntaxNode::new(NodeId(5), NodeKind::Type, 0),
        ]
    }

    #[test]
    fn field_scan_skips_unattributed_fields() {
        let tree = tree();
        let ids: Vec<_> = candidates(&tree, is_marked_field).map(|n| n.id).collect();

        assert_eq!(ids, vec![NodeId(3)]);
    }

    #[test]
    fn type_scan_keeps_every_type_in_order() {
        let tree = tree();
        let ids: Vec<_> = candidates(&tree, is_type_declaration)
            .map(|n| n.id)
            .collect();

        assert_eq!(ids, vec![NodeId(1), NodeId(5)]);
    }
}
