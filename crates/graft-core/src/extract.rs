//! Metadata extraction.
//!
//! Turns a candidate node into the flat record a synthesizer consumes. The
//! record is a pure function of the node's resolved shape, so two passes over
//! an unchanged declaration produce equal records and the generator can skip
//! re-rendering.

use crate::{
    markers::MarkerSet,
    model::{ArgValue, Constructor, NodeId, SymbolId, SymbolModel},
    naming,
};
use derive_more::Display;
use tracing::{debug, trace};

/// Named argument on the change-notification marker.
pub const GENERATE_EVENT: &str = "generate_event";

/// Name of the constructor synthesized for types without a usable one.
pub const AUTO_CONSTRUCTOR: &str = "new";

// used when the type already declares a `new` of its own
const FALLBACK_CONSTRUCTOR: &str = "__graft_new";

///
/// Owned
///
/// Records that belong to exactly one owning type.
///

pub trait Owned {
    fn owner(&self) -> SymbolId;
}

///
/// FieldMetadata
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldMetadata {
    pub owner: SymbolId,
    pub owner_name: String,
    pub namespace: String,
    pub field: SymbolId,
    pub field_name: String,

    /// Written type of the field, as Rust source.
    pub ty: String,
    pub exposed_name: String,
    pub generate_event: bool,
}

impl Owned for FieldMetadata {
    fn owner(&self) -> SymbolId {
        self.owner
    }
}

///
/// TypeMetadata
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeMetadata {
    pub owner: SymbolId,
    pub name: String,
    pub namespace: String,
    pub constructor: ConstructorPlan,
}

impl Owned for TypeMetadata {
    fn owner(&self) -> SymbolId {
        self.owner
    }
}

///
/// ConstructorPlan
///
/// Which constructor a generated accessor calls.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ConstructorPlan {
    /// A declared private parameterless constructor, by name.
    Existing(String),

    /// None qualifies; one is synthesized alongside the accessor under a
    /// name no declared constructor uses.
    Synthesize(String),
}

impl ConstructorPlan {
    /// First declared private parameterless constructor wins.
    #[must_use]
    pub fn for_constructors(constructors: &[Constructor]) -> Self {
        if let Some(existing) = constructors.iter().find(|c| c.is_private_parameterless()) {
            return Self::Existing(existing.name.clone());
        }

        let taken = |name: &str| constructors.iter().any(|c| c.name == name);
        let mut name = AUTO_CONSTRUCTOR.to_string();
        if taken(&name) {
            name = FALLBACK_CONSTRUCTOR.to_string();
            while taken(&name) {
                name.push('_');
            }
        }

        Self::Synthesize(name)
    }

    /// Name of the constructor the accessor calls.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(name) | Self::Synthesize(name) => name,
        }
    }

    #[must_use]
    pub const fn needs_auto_constructor(&self) -> bool {
        matches!(self, Self::Synthesize(_))
    }
}

///
/// Skip
///
/// Why a candidate produced no record.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
enum Skip {
    #[display("declared type does not parse")]
    BadType,

    #[display("no usable exposed name")]
    BadName,

    #[display("owner has generic parameters")]
    Generic,

    #[display("marker not present")]
    NoMarker,

    #[display("symbol did not resolve")]
    Unresolved,
}

/// Extract change-notification metadata from a field candidate.
#[must_use]
pub fn field_metadata(
    model: &dyn SymbolModel,
    markers: &MarkerSet,
    node: NodeId,
) -> Option<FieldMetadata> {
    report(node, try_field_metadata(model, markers, node))
}

/// Extract instance-accessor metadata from a type candidate.
#[must_use]
pub fn type_metadata(
    model: &dyn SymbolModel,
    markers: &MarkerSet,
    node: NodeId,
) -> Option<TypeMetadata> {
    report(node, try_type_metadata(model, markers, node))
}

fn report<T>(node: NodeId, result: Result<T, Skip>) -> Option<T> {
    match result {
        Ok(record) => Some(record),
        Err(Skip::NoMarker) => {
            trace!(%node, "candidate has no recognised marker");
            None
        }
        Err(reason) => {
            debug!(%node, %reason, "dropping candidate");
            None
        }
    }
}

fn try_field_metadata(
    model: &dyn SymbolModel,
    markers: &MarkerSet,
    node: NodeId,
) -> Result<FieldMetadata, Skip> {
    let field = model.declared_symbol(node).ok_or(Skip::Unresolved)?;

    // first matching application wins
    let marker = model
        .markers(field)
        .into_iter()
        .find(|m| m.path == *markers.notify_changed())
        .ok_or(Skip::NoMarker)?;

    let generate_event = marker
        .arg(GENERATE_EVENT)
        .and_then(ArgValue::as_bool)
        .unwrap_or(false);

    let owner = model.containing_type(field).ok_or(Skip::Unresolved)?;
    if model.type_parameter_count(owner) > 0 {
        return Err(Skip::Generic);
    }

    let owner_name = model.symbol_name(owner).ok_or(Skip::Unresolved)?;
    let namespace = model.containing_namespace(owner).ok_or(Skip::Unresolved)?;
    let field_name = model.symbol_name(field).ok_or(Skip::Unresolved)?;

    let ty = model
        .declared_type_display_name(field)
        .ok_or(Skip::Unresolved)?;
    syn::parse_str::<syn::Type>(&ty).map_err(|_| Skip::BadType)?;

    let exposed_name = naming::exposed_name(&field_name);
    if !naming::is_usable(&exposed_name) {
        return Err(Skip::BadName);
    }

    Ok(FieldMetadata {
        owner,
        owner_name,
        namespace,
        field,
        field_name,
        ty,
        exposed_name,
        generate_event,
    })
}

fn try_type_metadata(
    model: &dyn SymbolModel,
    markers: &MarkerSet,
    node: NodeId,
) -> Result<TypeMetadata, Skip> {
    let owner = model.declared_symbol(node).ok_or(Skip::Unresolved)?;

    if !model
        .markers(owner)
        .iter()
        .any(|m| m.path == *markers.singleton())
    {
        return Err(Skip::NoMarker);
    }
    if model.type_parameter_count(owner) > 0 {
        return Err(Skip::Generic);
    }

    let name = model.symbol_name(owner).ok_or(Skip::Unresolved)?;
    let namespace = model.containing_namespace(owner).ok_or(Skip::Unresolved)?;
    let constructor = ConstructorPlan::for_constructors(&model.constructors(owner));

    Ok(TypeMetadata {
        owner,
        name,
        namespace,
        constructor,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Marker, Visibility},
        test_support::FakeModel,
    };

    #[test]
    fn generate_event_defaults_to_false() {
        let mut model = FakeModel::new();
        let owner = model.add_type("app::counter", "Counter", vec![]);
        let plain = model.add_field(owner, "_count", "i32", vec![model.notify()]);
        let null = model.add_field(
            owner,
            "_total",
            "u64",
            vec![model.notify().with_arg(GENERATE_EVENT, ArgValue::Null)],
        );
        let markers = MarkerSet::default();

        let plain = field_metadata(&model, &markers, plain.node).unwrap();
        let null = field_metadata(&model, &markers, null.node).unwrap();

        assert!(!plain.generate_event);
        assert!(!null.generate_event);
        assert_eq!(plain.exposed_name, "Count");
        assert_eq!(plain.owner_name, "Counter");
        assert_eq!(plain.namespace, "app::counter");
    }

    #[test]
    fn first_marker_application_wins() {
        let mut model = FakeModel::new();
        let owner = model.add_type("app", "Counter", vec![]);
        let field = model.add_field(
            owner,
            "_name",
            "String",
            vec![
                model.notify().with_arg(GENERATE_EVENT, ArgValue::Bool(true)),
                model.notify().with_arg(GENERATE_EVENT, ArgValue::Bool(false)),
            ],
        );

        let meta = field_metadata(&model, &MarkerSet::default(), field.node).unwrap();

        assert!(meta.generate_event);
    }

    #[test]
    fn same_short_name_from_another_crate_is_ignored() {
        let mut model = FakeModel::new();
        let owner = model.add_type("app", "Counter", vec![Marker::new("other::singleton")]);
        let field = model.add_field(
            owner,
            "_count",
            "i32",
            vec![Marker::new("other::notify_changed")],
        );
        let markers = MarkerSet::default();

        assert!(field_metadata(&model, &markers, field.node).is_none());
        assert!(type_metadata(&model, &markers, owner.node).is_none());
    }

    #[test]
    fn unresolved_nodes_yield_nothing() {
        let model = FakeModel::new();
        let markers = MarkerSet::default();

        assert!(field_metadata(&model, &markers, NodeId(404)).is_none());
        assert!(type_metadata(&model, &markers, NodeId(404)).is_none());
    }

    #[test]
    fn unparsable_field_type_is_dropped() {
        let mut model = FakeModel::new();
        let owner = model.add_type("app", "Counter", vec![]);
        let field = model.add_field(owner, "_count", "Vec<", vec![model.notify()]);

        assert!(field_metadata(&model, &MarkerSet::default(), field.node).is_none());
    }

    #[test]
    fn generic_owners_are_dropped() {
        let mut model = FakeModel::new();
        let owner = model.add_type("app", "Holder", vec![model.singleton()]);
        model.set_type_parameters(owner, 1);

        assert!(type_metadata(&model, &MarkerSet::default(), owner.node).is_none());
    }

    #[test]
    fn constructor_plan_uses_existing_private_parameterless() {
        let ctors = [
            Constructor::new("with_seed", Visibility::Private, 1),
            Constructor::new("create", Visibility::Private, 0),
        ];

        assert_eq!(
            ConstructorPlan::for_constructors(&ctors),
            ConstructorPlan::Existing("create".to_string())
        );
    }

    #[test]
    fn constructor_plan_synthesizes_when_none_qualify() {
        let none: [Constructor; 0] = [];
        let public = [Constructor::new("new", Visibility::Public, 0)];
        let restricted = [Constructor::new("new", Visibility::Restricted, 0)];
        let parameterised = [Constructor::new("new", Visibility::Private, 2)];

        for ctors in [&none[..], &public[..], &restricted[..], &parameterised[..]] {
            assert!(ConstructorPlan::for_constructors(ctors).needs_auto_constructor());
        }
    }

    #[test]
    fn synthesized_constructor_avoids_declared_names() {
        let none: [Constructor; 0] = [];
        let public = [Constructor::new("new", Visibility::Public, 0)];
        let both = [
            Constructor::new("new", Visibility::Public, 0),
            Constructor::new("__graft_new", Visibility::Public, 1),
        ];

        assert_eq!(ConstructorPlan::for_constructors(&none).name(), "new");
        assert_eq!(ConstructorPlan::for_constructors(&public).name(), "__graft_new");
        assert_eq!(ConstructorPlan::for_constructors(&both).name(), "__graft_new_");
    }
}
