//! Change-notification pattern.
//!
//! Every marked storage field of a type gains a getter and a value-checked
//! setter that announces changes through the type's change registration point.
//! Fields marked with `generate_event` also get a dedicated per-property event.

use crate::{
    extract::{self, FieldMetadata},
    group::TypeGroup,
    markers::MarkerSet,
    model::{NodeId, SymbolModel},
    naming,
    options::NotifyOptions,
    scan::{self, Predicate},
    synth::{
        FragmentBuilder, Member, SynthesizedFragment, Synthesizer,
        fragment::{prefixed, to_ident},
    },
};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::collections::HashSet;
use tracing::debug;

pub const PATTERN: &str = "notify";

// inherent members of the change registration point
const REGISTRY_MEMBERS: [&str; 3] = [
    "__graft_property_changed_handlers",
    "subscribe_property_changed",
    "on_property_changed",
];

///
/// NotifySynthesizer
///

#[derive(Clone, Debug)]
pub struct NotifySynthesizer {
    markers: MarkerSet,
    options: NotifyOptions,
}

impl NotifySynthesizer {
    #[must_use]
    pub const fn new(markers: MarkerSet, options: NotifyOptions) -> Self {
        Self { markers, options }
    }
}

impl Synthesizer for NotifySynthesizer {
    type Metadata = FieldMetadata;

    fn pattern(&self) -> &'static str {
        PATTERN
    }

    fn predicate(&self) -> Predicate {
        scan::is_marked_field
    }

    fn extract(&self, model: &dyn SymbolModel, node: NodeId) -> Option<FieldMetadata> {
        extract::field_metadata(model, &self.markers, node)
    }

    fn synthesize(&self, group: &TypeGroup<FieldMetadata>) -> Option<SynthesizedFragment> {
        let first = group.first();
        let mut builder =
            FragmentBuilder::new(PATTERN, &first.namespace, first.owner, &first.owner_name);

        // every member lands in one inherent impl, so names must stay unique
        let mut claimed: HashSet<String> =
            REGISTRY_MEMBERS.iter().map(ToString::to_string).collect();
        let mut events = Vec::new();

        builder.push(Member::ChangeRegistry);
        for field in group.members() {
            let accessors = [
                naming::getter_name(&field.exposed_name),
                naming::setter_name(&field.exposed_name),
            ];
            if !claim(&mut claimed, accessors) {
                debug!(
                    owner = %first.owner_name,
                    field = %field.field_name,
                    "property name already taken, skipping field"
                );
                continue;
            }

            let mut event = field.generate_event;
            if event && !claim(&mut claimed, event_members(&field.exposed_name)) {
                debug!(
                    owner = %first.owner_name,
                    field = %field.field_name,
                    "event name already taken, raising only the generic change"
                );
                event = false;
            }
            if event {
                events.push(field.exposed_name.clone());
            }

            builder.push(Member::Property {
                field: field.field_name.clone(),
                exposed: field.exposed_name.clone(),
                ty: field.ty.clone(),
                event,
            });
        }
        for exposed in events {
            builder.push(Member::PropertyEvent { exposed });
        }
        if self.options.implement_trait {
            builder.push(Member::NotifyTrait {
                crate_name: self.markers.crate_name().to_string(),
            });
        }

        builder.build()
    }
}

// claims all names or none
fn claim<const N: usize>(claimed: &mut HashSet<String>, names: [String; N]) -> bool {
    if names.iter().any(|name| claimed.contains(name)) {
        return false;
    }
    claimed.extend(names);

    true
}

// handler list, subscribe and raise members of one property event
fn event_members(exposed: &str) -> [String; 3] {
    let stem = naming::event_name(exposed);

    [
        format!("__graft_{stem}_handlers"),
        format!("subscribe_{stem}"),
        format!("on_{stem}"),
    ]
}

pub(crate) fn registry(owner: &Ident) -> TokenStream {
    quote! {
        fn __graft_property_changed_handlers() -> &'static ::std::sync::RwLock<
            ::std::vec::Vec<::std::boxed::Box<dyn Fn(&#owner, &str) + Send + Sync>>,
        > {
            static HANDLERS: ::std::sync::RwLock<
                ::std::vec::Vec<::std::boxed::Box<dyn Fn(&#owner, &str) + Send + Sync>>,
            > = ::std::sync::RwLock::new(::std::vec::Vec::new());

            &HANDLERS
        }

        /// Register a handler called with the sender and the exposed property
        /// name whenever a property changes.
        pub fn subscribe_property_changed<F>(handler: F)
        where
            F: Fn(&Self, &str) + Send + Sync + 'static,
        {
            Self::__graft_property_changed_handlers()
                .write()
                .unwrap_or_else(::std::sync::PoisonError::into_inner)
                .push(::std::boxed::Box::new(handler));
        }

        /// Raise the change event for `property_name`.
        pub fn on_property_changed(&self, property_name: &str) {
            let handlers = Self::__graft_property_changed_handlers()
                .read()
                .unwrap_or_else(::std::sync::PoisonError::into_inner);
            for handler in handlers.iter() {
                handler(self, property_name);
            }
        }
    }
}

pub(crate) fn property(field: &Ident, exposed: &str, ty: &str, event: bool) -> Option<TokenStream> {
    let ty = ty.parse::<TokenStream>().ok()?;
    let getter = to_ident(&naming::getter_name(exposed));
    let setter = to_ident(&naming::setter_name(exposed));
    let raise_event = event.then(|| {
        let on_event = prefixed("on_", &naming::event_name(exposed));
        quote!(Self::#on_event();)
    });

    Some(quote! {
        #[must_use]
        pub fn #getter(&self) -> &#ty {
            &self.#field
        }

        pub fn #setter(&mut self, value: #ty) {
            if self.#field == value {
                return;
            }
            self.#field = value;
            self.on_property_changed(#exposed);
            #raise_event
        }
    })
}

pub(crate) fn event(exposed: &str) -> TokenStream {
    let stem = naming::event_name(exposed);
    let handlers = prefixed("__graft_", &format!("{stem}_handlers"));
    let subscribe = prefixed("subscribe_", &stem);
    let on_event = prefixed("on_", &stem);

    quote! {
        fn #handlers() -> &'static ::std::sync::RwLock<
            ::std::vec::Vec<::std::boxed::Box<dyn Fn() + Send + Sync>>,
        > {
            static HANDLERS: ::std::sync::RwLock<
                ::std::vec::Vec<::std::boxed::Box<dyn Fn() + Send + Sync>>,
            > = ::std::sync::RwLock::new(::std::vec::Vec::new());

            &HANDLERS
        }

        pub fn #subscribe<F>(handler: F)
        where
            F: Fn() + Send + Sync + 'static,
        {
            Self::#handlers()
                .write()
                .unwrap_or_else(::std::sync::PoisonError::into_inner)
                .push(::std::boxed::Box::new(handler));
        }

        fn #on_event() {
            let handlers = Self::#handlers()
                .read()
                .unwrap_or_else(::std::sync::PoisonError::into_inner);
            for handler in handlers.iter() {
                handler();
            }
        }
    }
}

pub(crate) fn trait_impl(owner: &Ident, crate_name: &Ident) -> TokenStream {
    quote! {
        impl ::#crate_name::NotifyPropertyChanged for #owner {
            fn subscribe_property_changed<F>(handler: F)
            where
                F: Fn(&Self, &str) + Send + Sync + 'static,
            {
                #owner::subscribe_property_changed(handler);
            }

            fn on_property_changed(&self, property_name: &str) {
                #owner::on_property_changed(self, property_name);
            }
        }
    }
}

///
/// TESTS
///
