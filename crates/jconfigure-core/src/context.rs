//! The ambient, read-only state available to tag handlers.

use crate::value::ConfigValue;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Evaluation context for one parse-and-evaluate pass.
///
/// A context is never mutated. Include boundaries derive a fresh child
/// context with [`for_included_file`](Self::for_included_file), which points
/// `current_file` at the included file and inherits the bindings unchanged,
/// so caller bindings reach arbitrarily deep include chains.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    current_file: PathBuf,

    /// Caller-supplied values for `!ContextValue`, shared between derived
    /// contexts.
    bindings: Arc<IndexMap<String, ConfigValue>>,

    /// Identities of the files on the include path, outermost first,
    /// ending with `current_file`.
    include_chain: Arc<Vec<PathBuf>>,
}

impl EvaluationContext {
    /// Context for evaluating `current_file` with no bindings.
    pub fn new(current_file: impl Into<PathBuf>) -> Self {
        Self::with_bindings(current_file, IndexMap::new())
    }

    pub fn with_bindings(
        current_file: impl Into<PathBuf>,
        bindings: IndexMap<String, ConfigValue>,
    ) -> Self {
        let current_file = current_file.into();
        let include_chain = vec![file_identity(&current_file)];
        Self {
            current_file,
            bindings: Arc::new(bindings),
            include_chain: Arc::new(include_chain),
        }
    }

    /// Derive a context that adds or overrides one binding.
    pub fn with_binding(&self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        let mut bindings = (*self.bindings).clone();
        bindings.insert(key.into(), value.into());
        Self {
            current_file: self.current_file.clone(),
            bindings: Arc::new(bindings),
            include_chain: Arc::clone(&self.include_chain),
        }
    }

    /// Derive the context for a file included from the current one.
    pub fn for_included_file(&self, path: impl Into<PathBuf>) -> Self {
        let current_file = path.into();
        let mut include_chain = (*self.include_chain).clone();
        include_chain.push(file_identity(&current_file));
        Self {
            current_file,
            bindings: Arc::clone(&self.bindings),
            include_chain: Arc::new(include_chain),
        }
    }

    /// The file whose content is being evaluated.
    pub fn current_file(&self) -> &Path {
        &self.current_file
    }

    /// Directory relative includes resolve against.
    pub fn current_dir(&self) -> &Path {
        match self.current_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    pub fn bindings(&self) -> &IndexMap<String, ConfigValue> {
        &self.bindings
    }

    pub fn binding(&self, key: &str) -> Option<&ConfigValue> {
        self.bindings.get(key)
    }

    /// True if `path` is already being evaluated further up the include chain.
    pub fn is_including(&self, path: &Path) -> bool {
        let identity = file_identity(path);
        self.include_chain.contains(&identity)
    }

    /// Number of files on the include path, the root file counting as one.
    pub fn include_depth(&self) -> usize {
        self.include_chain.len()
    }
}

// Canonical path when the file exists, the path as given otherwise.
fn file_identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_dir() {
        let context = EvaluationContext::new("config/app.yaml");
        assert_eq!(context.current_dir(), Path::new("config"));

        let bare = EvaluationContext::new("app.yaml");
        assert_eq!(bare.current_dir(), Path::new("."));
    }

    #[test]
    fn test_derived_context_inherits_bindings() {
        let mut bindings = IndexMap::new();
        bindings.insert("cat".to_string(), ConfigValue::from("echo"));
        let root = EvaluationContext::with_bindings("config/app.yaml", bindings);

        let child = root.for_included_file("config/includes/pets.yaml");
        assert_eq!(child.current_file(), Path::new("config/includes/pets.yaml"));
        assert_eq!(child.binding("cat"), Some(&ConfigValue::from("echo")));
        assert_eq!(child.include_depth(), 2);

        // The parent is untouched.
        assert_eq!(root.current_file(), Path::new("config/app.yaml"));
        assert_eq!(root.include_depth(), 1);
    }

    #[test]
    fn test_with_binding_overrides_without_mutating() {
        let root = EvaluationContext::new("app.yaml").with_binding("dog", "oscar");
        let derived = root.with_binding("dog", "rex");

        assert_eq!(root.binding("dog"), Some(&ConfigValue::from("oscar")));
        assert_eq!(derived.binding("dog"), Some(&ConfigValue::from("rex")));
    }

    #[test]
    fn test_is_including() {
        let root = EvaluationContext::new("a.yaml");
        let child = root.for_included_file("b.yaml");
        assert!(child.is_including(Path::new("a.yaml")));
        assert!(child.is_including(Path::new("b.yaml")));
        assert!(!child.is_including(Path::new("c.yaml")));
    }
}
