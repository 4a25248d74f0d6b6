use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Error, Generics, Item};

// singleton
pub fn singleton(args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(args, input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: TokenStream) -> Result<TokenStream, Error> {
    if !args.is_empty() {
        return Err(Error::new_spanned(args, "`#[singleton]` takes no arguments"));
    }

    let item: Item = syn::parse2(input)?;
    match &item {
        Item::Struct(s) => reject_generics(&s.generics)?,
        Item::Enum(e) => reject_generics(&e.generics)?,
        Item::Union(u) => reject_generics(&u.generics)?,
        other => {
            return Err(Error::new_spanned(
                other,
                "`#[singleton]` can only be applied to a struct, enum or union",
            ));
        }
    }

    Ok(item.into_token_stream())
}

// a per-type static cannot name a generic type
fn reject_generics(generics: &Generics) -> Result<(), Error> {
    if generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            generics,
            "`#[singleton]` types cannot have generic parameters",
        ))
    }
}

///
/// TESTS
///
