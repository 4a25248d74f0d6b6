//! Structured fragment builder.
//!
//! Synthesizers describe what a type gains as a list of [`Member`] values;
//! rendering to tokens happens once, here, so templates never deal with
//! formatting and tests can assert on members instead of text.

use crate::{
    model::SymbolId,
    options::InstanceInit,
    synth::{notify, singleton},
};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

///
/// Member
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Member {
    /// Static accessor returning the shared instance.
    InstanceAccessor {
        accessor: String,
        constructor: String,
        init: InstanceInit,
    },

    /// Synthesized private parameterless constructor.
    Constructor { name: String },

    /// Impl of the marker crate's `Singleton` trait, delegating to the accessor.
    SingletonTrait { crate_name: String, accessor: String },

    /// The per-type change registration point.
    ChangeRegistry,

    /// Getter and value-checked setter over a storage field.
    Property {
        field: String,
        exposed: String,
        ty: String,
        event: bool,
    },

    /// Dedicated no-argument event for one property.
    PropertyEvent { exposed: String },

    /// Impl of the marker crate's `NotifyPropertyChanged` trait.
    NotifyTrait { crate_name: String },
}

impl Member {
    // Tokens placed inside the inherent `impl` block.
    fn inherent(&self, owner: &Ident) -> Option<TokenStream> {
        match self {
            Self::InstanceAccessor {
                accessor,
                constructor,
                init,
            } => Some(singleton::accessor(
                owner,
                &to_ident(accessor),
                &to_ident(constructor),
                *init,
            )),
            Self::Constructor { name } => Some(singleton::constructor(&to_ident(name))),
            Self::ChangeRegistry => Some(notify::registry(owner)),
            Self::Property {
                field,
                exposed,
                ty,
                event,
            } => notify::property(&to_ident(field), exposed, ty, *event),
            Self::PropertyEvent { exposed } => Some(notify::event(exposed)),
            Self::SingletonTrait { .. } | Self::NotifyTrait { .. } => None,
        }
    }

    // Items placed after the inherent block.
    fn outer(&self, owner: &Ident) -> Option<TokenStream> {
        match self {
            Self::SingletonTrait {
                crate_name,
                accessor,
            } => Some(singleton::trait_impl(
                owner,
                &to_ident(crate_name),
                &to_ident(accessor),
            )),
            Self::NotifyTrait { crate_name } => {
                Some(notify::trait_impl(owner, &to_ident(crate_name)))
            }
            _ => None,
        }
    }
}

///
/// SynthesizedFragment
///
/// Everything one synthesizer adds to one owning type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SynthesizedFragment {
    pub pattern: &'static str,
    pub namespace: String,
    pub owner: SymbolId,
    pub owner_name: String,
    pub members: Vec<Member>,
}

impl SynthesizedFragment {
    #[must_use]
    pub fn render(&self) -> TokenStream {
        let owner = to_ident(&self.owner_name);
        let inherent = self.members.iter().filter_map(|m| m.inherent(&owner));
        let outer = self.members.iter().filter_map(|m| m.outer(&owner));

        quote! {
            #[allow(dead_code)]
            impl #owner {
                #(#inherent)*
            }

            #(#outer)*
        }
    }

    #[must_use]
    pub fn has_member(&self, predicate: impl Fn(&Member) -> bool) -> bool {
        self.members.iter().any(predicate)
    }
}

///
/// FragmentBuilder
///
/// One builder per type group.
///

pub struct FragmentBuilder {
    fragment: SynthesizedFragment,
}

impl FragmentBuilder {
    #[must_use]
    pub fn new(
        pattern: &'static str,
        namespace: impl Into<String>,
        owner: SymbolId,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            fragment: SynthesizedFragment {
                pattern,
                namespace: namespace.into(),
                owner,
                owner_name: owner_name.into(),
                members: Vec::new(),
            },
        }
    }

    pub fn push(&mut self, member: Member) -> &mut Self {
        self.fragment.members.push(member);
        self
    }

    /// Finish the fragment; `None` when nothing was added.
    #[must_use]
    pub fn build(self) -> Option<SynthesizedFragment> {
        if self.fragment.members.is_empty() {
            None
        } else {
            Some(self.fragment)
        }
    }
}

/// Identifier for a name, falling back to a raw identifier for keywords.
pub(crate) fn to_ident(name: &str) -> Ident {
    let bare = name.strip_prefix("r#").unwrap_or(name);

    syn::parse_str::<Ident>(bare).unwrap_or_else(|_| Ident::new_raw(bare, Span::call_site()))
}

/// `stem` with a prefix, e.g. `subscribe_` + `count_changed`.
pub(crate) fn prefixed(prefix: &str, stem: &str) -> Ident {
    format_ident!("{prefix}{stem}")
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_yields_nothing() {
        let builder = FragmentBuilder::new("singleton", "app", SymbolId(1), "Widget");

        assert!(builder.build().is_none());
    }

    #[test]
    fn keywords_become_raw_identifiers() {
        assert_eq!(to_ident("count").to_string(), "count");
        assert_eq!(to_ident("type").to_string(), "r#type");
        assert_eq!(to_ident("r#match").to_string(), "r#match");
    }

    #[test]
    fn trait_impls_render_outside_the_inherent_block() {
        let mut builder = FragmentBuilder::new("singleton", "app", SymbolId(1), "Widget");
        builder
            .push(Member::InstanceAccessor {
                accessor: "instance".to_string(),
                constructor: "new".to_string(),
                init: InstanceInit::Once,
            })
            .push(Member::SingletonTrait {
                crate_name: "graft".to_string(),
                accessor: "instance".to_string(),
            });

        let file: syn::File = syn::parse2(builder.build().unwrap().render()).unwrap();

        assert_eq!(file.items.len(), 2);
        let syn::Item::Impl(trait_impl) = &file.items[1] else {
            panic!("expected trait impl");
        };
        assert!(trait_impl.trait_.is_some());
    }
}
