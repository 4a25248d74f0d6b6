//! Marker macros.
//!
//! Both markers are inert at expansion time: they check that they sit on a
//! supported declaration and otherwise leave the item alone. The members they
//! stand for are synthesized by `graft-build` and pulled in with
//! `graft::include_generated!()`.

use proc_macro::TokenStream;

mod notify;
mod singleton;

/// Give a type a shared instance reachable through a generated accessor.
#[proc_macro_attribute]
pub fn singleton(args: TokenStream, input: TokenStream) -> TokenStream {
    singleton::singleton(args.into(), input.into()).into()
}

/// Register `#[notify_changed]` for storage fields that should get a
/// generated getter and change-announcing setter.
#[proc_macro_derive(NotifyChanged, attributes(notify_changed))]
pub fn derive_notify_changed(input: TokenStream) -> TokenStream {
    notify::derive_notify_changed(input.into()).into()
}
