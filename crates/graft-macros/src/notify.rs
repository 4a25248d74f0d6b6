use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use syn::{DeriveInput, Generics, Ident};

///
/// NotifyInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct NotifyInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, NotifyField>,
}

///
/// NotifyField
///
/// One storage field; `generate_event` also requests a dedicated
/// per-property event.
///

#[derive(Debug, FromField)]
#[darling(attributes(notify_changed))]
#[allow(dead_code)]
struct NotifyField {
    ident: Option<Ident>,

    #[darling(default)]
    generate_event: bool,
}

// derive_notify_changed
pub fn derive_notify_changed(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match check(&input) {
        Ok(()) => TokenStream::new(),
        Err(err) => err.write_errors(),
    }
}

fn check(input: &DeriveInput) -> Result<(), darling::Error> {
    let parsed = NotifyInput::from_derive_input(input)?;

    if !parsed.generics.params.is_empty() {
        return Err(darling::Error::custom(format!(
            "NotifyChanged cannot be derived for generic type `{}`",
            parsed.ident
        ))
        .with_span(&parsed.generics));
    }

    // field attributes were validated while parsing; graft-build reads them
    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn accepts_marked_named_fields() {
        let output = derive_notify_changed(quote! {
            struct Counter {
                #[notify_changed]
                _count: i32,
                #[notify_changed(generate_event = true)]
                _name: String,
                #[notify_changed(generate_event)]
                _total: u64,
                plain: bool,
            }
        });

        assert!(output.is_empty());
    }

    #[test]
    fn rejects_unknown_marker_arguments() {
        let output = derive_notify_changed(quote! {
            struct Counter {
                #[notify_changed(loud = true)]
                _count: i32,
            }
        });

        assert!(output.to_string().contains("compile_error"));
    }

    #[test]
    fn rejects_tuple_structs_and_generics() {
        let tuple = derive_notify_changed(quote!(struct Pair(i32, i32);));
        let generic = derive_notify_changed(quote! {
            struct Holder<T> {
                #[notify_changed]
                _value: T,
            }
        });

        assert!(tuple.to_string().contains("compile_error"));
        assert!(generic.to_string().contains("generic type `Holder`"));
    }
}
