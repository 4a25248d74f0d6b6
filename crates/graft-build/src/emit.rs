//! Writing generated sources under `OUT_DIR`.
//!
//! Pattern files are named `{namespace}.{pattern}.rs`. Every scanned module
//! also gets an aggregate `{namespace}.rs` that `include!`s its pattern files,
//! which is what `graft::include_generated!()` pulls in.

use crate::Error;
use graft_core::{
    diagnostic::Diagnostic,
    pipeline::{GENERATED_HEADER, Host},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, trace};
use xxhash_rust::xxh3::xxh3_64;

/// Directory under `OUT_DIR` holding generated files.
pub const OUT_SUBDIR: &str = "graft";

///
/// EmitReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmitReport {
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitReport {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

///
/// OutDir
///
/// `Host` writing into one directory. Files whose content did not change are
/// left untouched so cargo does not see them as modified.
///

pub struct OutDir {
    dir: PathBuf,
    by_namespace: BTreeMap<String, Vec<PathBuf>>,
    kept: BTreeSet<PathBuf>,
    report: EmitReport,
    failure: Option<Error>,
}

impl OutDir {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| Error::io(&dir, err))?;

        Ok(Self {
            dir,
            by_namespace: BTreeMap::new(),
            kept: BTreeSet::new(),
            report: EmitReport::default(),
            failure: None,
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one aggregate per namespace and drop files from earlier runs
    /// that this run no longer produces.
    pub fn finish(mut self, namespaces: &[String]) -> Result<EmitReport, Error> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }

        for namespace in namespaces {
            let includes = self.by_namespace.remove(namespace).unwrap_or_default();
            let text = aggregate(&includes);
            let path = self.dir.join(format!("{namespace}.rs"));
            self.write(&path, &text)?;
        }

        // pattern files for modules that no longer exist
        for (namespace, files) in &self.by_namespace {
            debug!(%namespace, files = files.len(), "generated files without a scanned module");
        }

        self.prune()?;

        Ok(self.report)
    }

    fn write(&mut self, path: &Path, text: &str) -> Result<(), Error> {
        self.kept.insert(path.to_path_buf());

        let unchanged = fs::read(path)
            .map(|existing| xxh3_64(&existing) == xxh3_64(text.as_bytes()))
            .unwrap_or(false);

        if unchanged {
            self.report.unchanged += 1;
            trace!(file = %path.display(), "unchanged");
        } else {
            fs::write(path, text).map_err(|err| Error::io(path, err))?;
            self.report.written += 1;
            debug!(file = %path.display(), "written");
        }

        Ok(())
    }

    fn prune(&mut self) -> Result<(), Error> {
        let entries = fs::read_dir(&self.dir).map_err(|err| Error::io(&self.dir, err))?;

        for entry in entries {
            let path = entry.map_err(|err| Error::io(&self.dir, err))?.path();
            let generated = path.extension().is_some_and(|ext| ext == "rs");

            if generated && !self.kept.contains(&path) {
                fs::remove_file(&path).map_err(|err| Error::io(&path, err))?;
                self.report.removed += 1;
                debug!(file = %path.display(), "removed stale file");
            }
        }

        Ok(())
    }
}

impl Host for OutDir {
    fn emit_source(&mut self, file_name: &str, text: &str) {
        if self.failure.is_some() {
            return;
        }

        let path = self.dir.join(file_name);
        if let Err(err) = self.write(&path, text) {
            self.failure = Some(err);
            return;
        }

        if let Some(namespace) = namespace_of(file_name) {
            self.by_namespace
                .entry(namespace.to_string())
                .or_default()
                .push(path);
        }
    }

    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.report.diagnostics.push(diagnostic);
    }
}

// `{namespace}.{pattern}.rs` -> `{namespace}`
fn namespace_of(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".rs")?;

    stem.rsplit_once('.').map(|(namespace, _)| namespace)
}

fn aggregate(includes: &[PathBuf]) -> String {
    let mut text = String::from(GENERATED_HEADER);
    text.push('\n');

    for path in includes {
        // Debug formatting yields an escaped string literal
        text.push_str(&format!("include!({:?});\n", path.display().to_string()));
    }

    text
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // scratch directory under the system temp dir, removed on drop
    struct Scratch(PathBuf);

    impl Scratch {
        fn new() -> Self {
            static NEXT: AtomicUsize = AtomicUsize::new(0);
            let dir = std::env::temp_dir().join(format!(
                "graft-emit-{}-{}",
                std::process::id(),
                NEXT.fetch_add(1, Ordering::Relaxed)
            ));
            let _ = fs::remove_dir_all(&dir);

            Self(dir)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn namespaces(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn namespace_is_everything_before_the_pattern() {
        assert_eq!(namespace_of("app::ui.singleton.rs"), Some("app::ui"));
        assert_eq!(namespace_of("app.notify.rs"), Some("app"));
        assert_eq!(namespace_of("app.rs"), None);
    }

    #[test]
    fn aggregates_exist_for_every_module() {
        let scratch = Scratch::new();
        let mut host = OutDir::create(&scratch.0).unwrap();
        host.emit_source("app::ui.singleton.rs", "// one");

        let report = host.finish(&namespaces(&["app", "app::ui"])).unwrap();

        let root = fs::read_to_string(scratch.0.join("app.rs")).unwrap();
        let ui = fs::read_to_string(scratch.0.join("app::ui.rs")).unwrap();
        assert!(!root.contains("include!"));
        assert!(ui.contains("app::ui.singleton.rs"));
        assert_eq!(report.written, 3);
    }

    #[test]
    fn rerun_skips_unchanged_and_prunes_stale() {
        let scratch = Scratch::new();
        let modules = namespaces(&["app"]);

        let mut first = OutDir::create(&scratch.0).unwrap();
        first.emit_source("app.singleton.rs", "// a");
        first.emit_source("app.notify.rs", "// b");
        first.finish(&modules).unwrap();

        let mut second = OutDir::create(&scratch.0).unwrap();
        second.emit_source("app.singleton.rs", "// a");
        let report = second.finish(&modules).unwrap();

        assert_eq!(report.unchanged, 1);
        assert_eq!(report.written, 1);
        assert_eq!(report.removed, 1);
        assert!(!scratch.0.join("app.notify.rs").exists());
    }
}
