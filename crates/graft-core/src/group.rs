use crate::{extract::Owned, model::SymbolId};
use indexmap::IndexMap;

///
/// TypeGroup
///
/// All records owned by one type, in first-seen order. Never empty; rebuilt
/// from scratch every pass.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeGroup<M> {
    owner: SymbolId,
    members: Vec<M>,
}

impl<M> TypeGroup<M> {
    #[must_use]
    pub const fn owner(&self) -> SymbolId {
        self.owner
    }

    #[must_use]
    pub fn members(&self) -> &[M] {
        &self.members
    }

    /// First record of the group; every group has one.
    #[must_use]
    pub fn first(&self) -> &M {
        &self.members[0]
    }
}

/// Partition extracted records by owner identity, dropping absent records.
///
/// Groups are ordered by the first record seen for each owner; records keep
/// their scan order inside a group.
pub fn group_by_owner<M, I>(records: I) -> Vec<TypeGroup<M>>
where
    M: Owned,
    I: IntoIterator<Item = Option<M>>,
{
    let mut groups: IndexMap<SymbolId, Vec<M>> = IndexMap::new();

    for record in records.into_iter().flatten() {
        groups.entry(record.owner()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(owner, members)| TypeGroup { owner, members })
        .collect()
}

///
/// TESTS
///
