//! Instance-accessor pattern.
//!
//! A marked type gains a static accessor returning one shared instance,
//! created on first access, plus a private parameterless constructor when it
//! does not already declare one.

use crate::{
    extract::{self, TypeMetadata},
    group::TypeGroup,
    markers::MarkerSet,
    model::{NodeId, SymbolModel},
    options::{InstanceInit, SingletonOptions},
    scan::{self, Predicate},
    synth::{FragmentBuilder, Member, SynthesizedFragment, Synthesizer},
};
use proc_macro2::{Ident, TokenStream};
use quote::quote;

pub const PATTERN: &str = "singleton";

///
/// SingletonSynthesizer
///

#[derive(Clone, Debug)]
pub struct SingletonSynthesizer {
    markers: MarkerSet,
    options: SingletonOptions,
}

impl SingletonSynthesizer {
    #[must_use]
    pub const fn new(markers: MarkerSet, options: SingletonOptions) -> Self {
        Self { markers, options }
    }
}

impl Synthesizer for SingletonSynthesizer {
    type Metadata = TypeMetadata;

    fn pattern(&self) -> &'static str {
        PATTERN
    }

    fn predicate(&self) -> Predicate {
        scan::is_type_declaration
    }

    fn extract(&self, model: &dyn SymbolModel, node: NodeId) -> Option<TypeMetadata> {
        extract::type_metadata(model, &self.markers, node)
    }

    fn synthesize(&self, group: &TypeGroup<TypeMetadata>) -> Option<SynthesizedFragment> {
        let meta = group.first();
        let mut builder = FragmentBuilder::new(PATTERN, &meta.namespace, meta.owner, &meta.name);

        let constructor = meta.constructor.name().to_string();

        builder.push(Member::InstanceAccessor {
            accessor: self.options.accessor.clone(),
            constructor: constructor.clone(),
            init: self.options.init,
        });
        if meta.constructor.needs_auto_constructor() {
            builder.push(Member::Constructor { name: constructor });
        }
        if self.options.implement_trait {
            builder.push(Member::SingletonTrait {
                crate_name: self.markers.crate_name().to_string(),
                accessor: self.options.accessor.clone(),
            });
        }

        builder.build()
    }
}

pub(crate) fn accessor(
    owner: &Ident,
    accessor: &Ident,
    constructor: &Ident,
    init: InstanceInit,
) -> TokenStream {
    let body = create_if_absent(owner, constructor, init);

    quote! {
        /// Shared instance, created on first access.
        #[must_use]
        pub fn #accessor() -> &'static Self {
            #body
        }
    }
}

// create_if_absent
// the only place that decides how the shared instance comes into being
fn create_if_absent(owner: &Ident, constructor: &Ident, init: InstanceInit) -> TokenStream {
    match init {
        InstanceInit::CheckThenCreate => quote! {
            static INSTANCE: ::std::sync::RwLock<::core::option::Option<&'static #owner>> =
                ::std::sync::RwLock::new(::core::option::Option::None);

            let current = *INSTANCE
                .read()
                .unwrap_or_else(::std::sync::PoisonError::into_inner);
            if let ::core::option::Option::Some(instance) = current {
                return instance;
            }

            let instance: &'static #owner =
                ::std::boxed::Box::leak(::std::boxed::Box::new(#owner::#constructor()));
            *INSTANCE
                .write()
                .unwrap_or_else(::std::sync::PoisonError::into_inner) =
                ::core::option::Option::Some(instance);

            instance
        },
        InstanceInit::Once => quote! {
            static INSTANCE: ::std::sync::OnceLock<#owner> = ::std::sync::OnceLock::new();

            INSTANCE.get_or_init(#owner::#constructor)
        },
    }
}

pub(crate) fn constructor(name: &Ident) -> TokenStream {
    quote! {
        fn #name() -> Self {
            ::core::default::Default::default()
        }
    }
}

pub(crate) fn trait_impl(owner: &Ident, crate_name: &Ident, accessor: &Ident) -> TokenStream {
    quote! {
        impl ::#crate_name::Singleton for #owner {
            fn instance() -> &'static Self {
                Self::#accessor()
            }
        }
    }
}

///
/// TESTS
///
