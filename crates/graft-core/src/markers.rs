use crate::model::MarkerPath;

/// Crate name consumers import markers through, unless configured otherwise.
pub const DEFAULT_MARKER_CRATE: &str = "graft";

/// Type-level instance-accessor marker.
pub const SINGLETON: &str = "singleton";

/// Field-level change-notification marker (a derive helper attribute).
pub const NOTIFY_CHANGED: &str = "notify_changed";

/// Derive that registers the change-notification helper attribute.
pub const NOTIFY_CHANGED_DERIVE: &str = "NotifyChanged";

/// Runtime traits generated code can implement.
pub const SINGLETON_TRAIT: &str = "Singleton";
pub const NOTIFY_TRAIT: &str = "NotifyPropertyChanged";

// Module re-exporting every marker under the crate root.
const PRELUDE: &str = "prelude";

///
/// MarkerSet
///
/// Fully-qualified marker identities for one marker crate name. Hosts use it
/// to canonicalise resolved paths; extractors compare against it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerSet {
    crate_name: String,
    singleton: MarkerPath,
    notify_changed: MarkerPath,
    notify_changed_derive: MarkerPath,
}

impl MarkerSet {
    #[must_use]
    pub fn new(crate_name: &str) -> Self {
        let crate_name = crate_name.trim().replace('-', "_");
        let qualify = |name: &str| MarkerPath::new(format!("{crate_name}::{name}"));

        Self {
            singleton: qualify(SINGLETON),
            notify_changed: qualify(NOTIFY_CHANGED),
            notify_changed_derive: qualify(NOTIFY_CHANGED_DERIVE),
            crate_name,
        }
    }

    #[must_use]
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    #[must_use]
    pub const fn singleton(&self) -> &MarkerPath {
        &self.singleton
    }

    #[must_use]
    pub const fn notify_changed(&self) -> &MarkerPath {
        &self.notify_changed
    }

    #[must_use]
    pub const fn notify_changed_derive(&self) -> &MarkerPath {
        &self.notify_changed_derive
    }

    /// Whether `name` is exported from the marker crate root. Used to resolve
    /// names brought in through glob imports.
    #[must_use]
    pub fn exports(&self, name: &str) -> bool {
        matches!(
            name,
            SINGLETON | NOTIFY_CHANGED_DERIVE | SINGLETON_TRAIT | NOTIFY_TRAIT
        )
    }

    /// Whether `path` names the marker crate root or its prelude, i.e. a
    /// module a glob import can pull markers from.
    #[must_use]
    pub fn is_export_module(&self, path: &MarkerPath) -> bool {
        let path = path.as_str();

        path == self.crate_name || path == format!("{}::{PRELUDE}", self.crate_name)
    }

    /// Fold the prelude re-export onto the canonical crate-root identity.
    #[must_use]
    pub fn canonicalize(&self, path: MarkerPath) -> MarkerPath {
        let prelude = format!("{}::{PRELUDE}::", self.crate_name);

        match path.as_str().strip_prefix(&prelude) {
            Some(rest) if !rest.contains("::") => {
                MarkerPath::new(format!("{}::{rest}", self.crate_name))
            }
            _ => path,
        }
    }

    /// Helper attributes registered by a resolved derive path.
    #[must_use]
    pub fn helper_attributes(&self, derive: &MarkerPath) -> &'static [&'static str] {
        if *derive == self.notify_changed_derive {
            &[NOTIFY_CHANGED]
        } else {
            &[]
        }
    }

    /// Resolved identity of a helper attribute registered by `derive`.
    #[must_use]
    pub fn helper_identity(&self, helper: &str) -> MarkerPath {
        MarkerPath::new(format!("{}::{helper}", self.crate_name))
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_CRATE)
    }
}

///
/// TESTS
///
