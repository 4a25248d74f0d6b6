//! Module tree loading.
//!
//! Follows `mod` declarations from the crate root the way rustc does: inline
//! modules, `foo.rs` next to the parent, `foo/mod.rs`, nested directories for
//! non-`mod.rs` parents and `#[path]` overrides.

use crate::Error;
use std::{
    fs,
    path::{Path, PathBuf},
};
use syn::{Attribute, Expr, ExprLit, Item, ItemMod, Lit, Meta, ext::IdentExt};
use tracing::{debug, warn};

///
/// Module
///
/// One module's own items, with child modules split out.
///

pub struct Module {
    pub namespace: String,
    pub file: PathBuf,
    pub items: Vec<Item>,
}

///
/// SourceTree
///

pub struct SourceTree {
    pub modules: Vec<Module>,

    /// Every file read, for `cargo:rerun-if-changed`.
    pub files: Vec<PathBuf>,
}

impl SourceTree {
    /// Load the module tree rooted at `entry`.
    pub fn load(entry: &Path, crate_name: &str) -> Result<Self, Error> {
        let mut tree = Self {
            modules: Vec::new(),
            files: Vec::new(),
        };
        let dir = entry.parent().map(Path::to_path_buf).unwrap_or_default();
        let items = tree.read(entry)?;
        tree.add(crate_name.to_string(), entry, &dir, items)?;

        Ok(tree)
    }

    /// A single in-memory file as crate root; `mod foo;` declarations are
    /// skipped.
    pub fn from_source(file: &Path, text: &str, crate_name: &str) -> Result<Self, Error> {
        let parsed = syn::parse_file(text).map_err(|err| Error::parse(file, &err))?;
        let mut tree = Self {
            modules: Vec::new(),
            files: Vec::new(),
        };
        tree.add_inline_only(crate_name.to_string(), file, parsed.items);

        Ok(tree)
    }

    fn read(&mut self, path: &Path) -> Result<Vec<Item>, Error> {
        let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let file = syn::parse_file(&text).map_err(|err| Error::parse(path, &err))?;
        self.files.push(path.to_path_buf());
        debug!(file = %path.display(), "parsed");

        Ok(file.items)
    }

    // `dir` is where this module's non-inline children live
    fn add(
        &mut self,
        namespace: String,
        file: &Path,
        dir: &Path,
        items: Vec<Item>,
    ) -> Result<(), Error> {
        let (own, children) = split_modules(items);
        self.modules.push(Module {
            namespace: namespace.clone(),
            file: file.to_path_buf(),
            items: own,
        });

        for child in children {
            let name = child.ident.unraw().to_string();
            let child_ns = format!("{namespace}::{name}");
            let path_attr = path_attribute(&child.attrs);

            if let Some((_, content)) = child.content {
                let child_dir = match &path_attr {
                    Some(path) => dir.join(path),
                    None => dir.join(&name),
                };
                self.add(child_ns, file, &child_dir, content)?;
                continue;
            }

            let Some(child_file) = locate(dir, &name, path_attr.as_deref()) else {
                warn!(module = %child_ns, dir = %dir.display(), "module file not found, skipping");
                continue;
            };

            let child_dir = if path_attr.is_some() || child_file.ends_with("mod.rs") {
                child_file.parent().map(Path::to_path_buf).unwrap_or_default()
            } else {
                dir.join(&name)
            };
            let items = self.read(&child_file)?;
            self.add(child_ns, &child_file, &child_dir, items)?;
        }

        Ok(())
    }

    fn add_inline_only(&mut self, namespace: String, file: &Path, items: Vec<Item>) {
        let (own, children) = split_modules(items);
        self.modules.push(Module {
            namespace: namespace.clone(),
            file: file.to_path_buf(),
            items: own,
        });

        for child in children {
            let child_ns = format!("{namespace}::{}", child.ident.unraw());
            match child.content {
                Some((_, content)) => self.add_inline_only(child_ns, file, content),
                None => debug!(module = %child_ns, "out-of-line module skipped"),
            }
        }
    }
}

fn split_modules(items: Vec<Item>) -> (Vec<Item>, Vec<ItemMod>) {
    let mut own = Vec::with_capacity(items.len());
    let mut children = Vec::new();

    for item in items {
        match item {
            Item::Mod(module) => children.push(module),
            other => own.push(other),
        }
    }

    (own, children)
}

fn locate(dir: &Path, name: &str, path_attr: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = path_attr {
        let path = dir.join(path);
        return path.is_file().then_some(path);
    }

    [dir.join(format!("{name}.rs")), dir.join(name).join("mod.rs")]
        .into_iter()
        .find(|path| path.is_file())
}

fn path_attribute(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("path") => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn namespaces(tree: &SourceTree) -> Vec<&str> {
        tree.modules.iter().map(|m| m.namespace.as_str()).collect()
    }

    #[test]
    fn inline_modules_nest_namespaces() {
        let tree = SourceTree::from_source(
            Path::new("lib.rs"),
            "struct A; mod ui { struct B; mod forms { struct C; } } mod ext;",
            "app",
        )
        .unwrap();

        assert_eq!(namespaces(&tree), vec!["app", "app::ui", "app::ui::forms"]);
        assert_eq!(tree.modules[1].items.len(), 1);
    }

    #[test]
    fn raw_module_names_lose_their_prefix() {
        let tree =
            SourceTree::from_source(Path::new("lib.rs"), "mod r#type { }", "app").unwrap();

        assert_eq!(namespaces(&tree), vec!["app", "app::type"]);
    }

    #[test]
    fn syntax_errors_carry_a_location() {
        let err = SourceTree::from_source(Path::new("lib.rs"), "struct {", "app")
            .err()
            .unwrap();

        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn path_attribute_is_read() {
        let file: syn::File = syn::parse_str("#[path = \"other/x.rs\"] mod x;").unwrap();
        let Item::Mod(module) = &file.items[0] else {
            panic!("expected mod");
        };

        assert_eq!(path_attribute(&module.attrs).as_deref(), Some("other/x.rs"));
    }
}
