//! Per-module name resolution.
//!
//! Just enough of Rust's path resolution to tell which markers an attribute
//! names: `use` declarations (aliases, groups, globs), `extern crate` renames
//! and the `crate`/`self`/`super` prefixes.

use graft_core::{markers::MarkerSet, model::MarkerPath};
use std::collections::{BTreeMap, HashSet};
use syn::{Item, Path, UseTree};

///
/// Imports
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Imports {
    crate_name: String,
    namespace: String,

    /// Local name to fully-qualified path.
    names: BTreeMap<String, String>,

    /// Fully-qualified modules imported with `*`.
    globs: Vec<String>,
}

impl Imports {
    /// Collect the imports declared directly in one module's items.
    #[must_use]
    pub fn collect(items: &[Item], crate_name: &str, namespace: &str) -> Self {
        let mut imports = Self {
            crate_name: crate_name.to_string(),
            namespace: namespace.to_string(),
            ..Self::default()
        };

        for item in items {
            match item {
                Item::Use(item) => {
                    let absolute = item.leading_colon.is_some();
                    imports.add_tree(&item.tree, Vec::new(), absolute);
                }
                Item::ExternCrate(item) => {
                    if let Some((_, rename)) = &item.rename {
                        imports
                            .names
                            .insert(rename.to_string(), item.ident.to_string());
                    }
                }
                _ => {}
            }
        }

        imports
    }

    /// Canonical marker identity for an attribute or derive path.
    #[must_use]
    pub fn resolve_marker(&self, path: &Path, markers: &MarkerSet) -> MarkerPath {
        let segments = segments(path);

        let resolved = if path.leading_colon.is_some() {
            segments.join("::")
        } else if let [name] = segments.as_slice()
            && !self.names.contains_key(name)
        {
            self.globs
                .iter()
                .find(|glob| {
                    markers.is_export_module(&MarkerPath::new(glob.as_str()))
                        && markers.exports(name)
                })
                .map_or_else(|| name.clone(), |glob| format!("{glob}::{name}"))
        } else {
            self.expand(&segments)
        };

        markers.canonicalize(MarkerPath::new(resolved))
    }

    /// Fully-qualified path of a type named from this module. `declared`
    /// holds the fully-qualified name of every type declared in the crate;
    /// a bare name prefers a local declaration, then a glob import that
    /// supplies it, then the current module.
    #[must_use]
    pub fn resolve_local(&self, path: &Path, declared: &HashSet<String>) -> String {
        let segments = segments(path);
        let local = format!("{}::{}", self.namespace, segments.join("::"));

        match segments.as_slice() {
            [name] if !self.names.contains_key(name) => {
                if declared.contains(&local) {
                    return local;
                }

                self.globs
                    .iter()
                    .map(|glob| format!("{glob}::{name}"))
                    .find(|candidate| declared.contains(candidate))
                    .unwrap_or(local)
            }
            _ => {
                // `child::Type` names a module below this one
                let expanded = self.expand(&segments);
                if !declared.contains(&expanded) && declared.contains(&local) {
                    local
                } else {
                    expanded
                }
            }
        }
    }

    fn expand(&self, segments: &[String]) -> String {
        let Some((first, rest)) = segments.split_first() else {
            return String::new();
        };

        let head = match first.as_str() {
            "crate" => self.crate_name.clone(),
            "self" => self.namespace.clone(),
            "super" => parent(&self.namespace).to_string(),
            name => self
                .names
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string()),
        };

        rest.iter().fold(head, |acc, segment| match segment.as_str() {
            "super" => parent(&acc).to_string(),
            _ => format!("{acc}::{segment}"),
        })
    }

    fn add_tree(&mut self, tree: &UseTree, mut prefix: Vec<String>, absolute: bool) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.add_tree(&path.tree, prefix, absolute);
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                if ident == "self" {
                    if let Some(last) = prefix.last().cloned() {
                        let full = self.qualify(&prefix, absolute);
                        self.names.insert(last, full);
                    }
                } else {
                    prefix.push(ident.clone());
                    let full = self.qualify(&prefix, absolute);
                    self.names.insert(ident, full);
                }
            }
            UseTree::Rename(rename) => {
                let ident = rename.ident.to_string();
                if ident != "self" {
                    prefix.push(ident);
                }
                let full = self.qualify(&prefix, absolute);
                self.names.insert(rename.rename.to_string(), full);
            }
            UseTree::Glob(_) => {
                let full = self.qualify(&prefix, absolute);
                self.globs.push(full);
            }
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.add_tree(tree, prefix.clone(), absolute);
                }
            }
        }
    }

    // use paths resolve like any other path, except that a leading `::` pins
    // them to an external crate
    fn qualify(&self, segments: &[String], absolute: bool) -> String {
        if absolute {
            segments.join("::")
        } else {
            self.expand(segments)
        }
    }
}

fn segments(path: &Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Parent module path; the crate root is its own parent.
#[must_use]
pub fn parent(namespace: &str) -> &str {
    namespace.rsplit_once("::").map_or(namespace, |(parent, _)| parent)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn imports(source: &str) -> Imports {
        let file: syn::File = syn::parse_str(source).unwrap();

        Imports::collect(&file.items, "app", "app::ui")
    }

    fn marker(imports: &Imports, path: &str) -> String {
        let path: Path = syn::parse_str(path).unwrap();

        imports
            .resolve_marker(&path, &MarkerSet::default())
            .as_str()
            .to_string()
    }

    #[test]
    fn qualified_and_imported_markers_resolve_alike() {
        let imports = imports("use graft::singleton;");

        assert_eq!(marker(&imports, "graft::singleton"), "graft::singleton");
        assert_eq!(marker(&imports, "::graft::singleton"), "graft::singleton");
        assert_eq!(marker(&imports, "singleton"), "graft::singleton");
    }

    #[test]
    fn aliases_groups_and_crate_renames() {
        let imports = imports(
            "use graft::{singleton as only_one, prelude::{self as p}};
             extern crate graft as g;",
        );

        assert_eq!(marker(&imports, "only_one"), "graft::singleton");
        assert_eq!(marker(&imports, "p::singleton"), "graft::singleton");
        assert_eq!(marker(&imports, "g::NotifyChanged"), "graft::NotifyChanged");
    }

    #[test]
    fn globs_only_supply_exported_names() {
        let imports = imports("use graft::prelude::*; use other::*;");

        assert_eq!(marker(&imports, "singleton"), "graft::singleton");
        assert_eq!(marker(&imports, "NotifyChanged"), "graft::NotifyChanged");
        assert_eq!(marker(&imports, "unknown"), "unknown");
    }

    #[test]
    fn unimported_short_names_stay_unresolved() {
        let imports = imports("use other::singleton as solo;");

        assert_eq!(marker(&imports, "singleton"), "singleton");
        assert_eq!(marker(&imports, "solo"), "other::singleton");
    }

    fn declared(names: &[&str]) -> HashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn local_paths_resolve_against_the_module() {
        let imports = imports("use super::model::Widget;");
        let declared = declared(&["app::model::Widget", "app::ui::forms::Form"]);
        let local = |s: &str| imports.resolve_local(&syn::parse_str::<Path>(s).unwrap(), &declared);

        assert_eq!(local("Gadget"), "app::ui::Gadget");
        assert_eq!(local("Widget"), "app::model::Widget");
        assert_eq!(local("crate::a::B"), "app::a::B");
        assert_eq!(local("self::C"), "app::ui::C");
        assert_eq!(local("super::D"), "app::D");
        assert_eq!(local("forms::Form"), "app::ui::forms::Form");
    }

    #[test]
    fn glob_imports_supply_declared_types() {
        let imports = imports("use super::model::*; use crate::*;");
        let declared = declared(&[
            "app::model::Gadget",
            "app::model::Local",
            "app::Root",
            "app::ui::Local",
        ]);
        let local = |s: &str| imports.resolve_local(&syn::parse_str::<Path>(s).unwrap(), &declared);

        assert_eq!(local("Gadget"), "app::model::Gadget");
        assert_eq!(local("Root"), "app::Root");
        assert_eq!(local("Local"), "app::ui::Local");
        assert_eq!(local("Missing"), "app::ui::Missing");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(parent("app"), "app");
        assert_eq!(parent("app::ui::forms"), "app::ui");
    }
}
