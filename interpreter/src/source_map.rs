use std::collections::HashMap;

/// Filename given to the `index`-th code chunk of document `name`.
pub fn synthetic_id(name: &str, index: usize) -> String {
    format!("<literate {}[{}]>", name, index)
}

/// Registry of chunk sources keyed by synthetic id, so error traces can
/// quote the offending line even though the source never touched disk.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    entries: HashMap<String, Vec<String>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        SourceRegistry::default()
    }

    pub fn register(&mut self, id: &str, source: &str) {
        let lines = source.lines().map(str::to_string).collect();
        self.entries.insert(id.to_string(), lines);
    }

    /// Look up `line` (1-based) of the source registered under `id`.
    pub fn resolve_line(&self, id: &str, line: usize) -> Option<&str> {
        self.entries
            .get(id)?
            .get(line.checked_sub(1)?)
            .map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
