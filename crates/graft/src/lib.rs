//! Marker-driven member synthesis.
//!
//! Mark types and fields here, run `graft_build::build!()` from `build.rs`,
//! then pull the synthesized members into each module that declares marked
//! types:
//!
//! ```ignore
//! use graft::prelude::*;
//!
//! #[singleton]
//! #[derive(Default)]
//! pub struct Registry {
//!     entries: Vec<String>,
//! }
//!
//! #[derive(Default, NotifyChanged)]
//! pub struct Counter {
//!     #[notify_changed(generate_event = true)]
//!     _count: i32,
//! }
//!
//! graft::include_generated!();
//! ```

pub use graft_macros::{NotifyChanged, singleton};

///
/// Singleton
///
/// Implemented by generated code for every `#[singleton]` type.
///

pub trait Singleton: 'static {
    fn instance() -> &'static Self;
}

///
/// NotifyPropertyChanged
///
/// Implemented by generated code for every type with `#[notify_changed]`
/// fields. Handlers receive the sender and the exposed property name.
///

pub trait NotifyPropertyChanged {
    fn subscribe_property_changed<F>(handler: F)
    where
        Self: Sized,
        F: Fn(&Self, &str) + Send + Sync + 'static;

    fn on_property_changed(&self, property_name: &str);
}

/// Include the members synthesized for the calling module.
///
/// Generated files are named after `module_path!()`, e.g.
/// `OUT_DIR/graft/my_crate::ui.rs`. Windows does not allow `:` in file
/// names, so this only builds on Unix-like hosts.
#[macro_export]
macro_rules! include_generated {
    () => {
        include!(concat!(env!("OUT_DIR"), "/graft/", module_path!(), ".rs"));
    };
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{NotifyChanged, NotifyPropertyChanged, Singleton, singleton};
}
