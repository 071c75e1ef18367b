//! The persistent asset catalog: a Dart class of
//! `static const String name = 'path';` lines.
//!
//! The catalog is additive. Existing identifiers are never reassigned; new
//! ones stay pending until [`AssetCatalog::flush`] writes them back.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::naming::catalog_const_name;

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"static const String (\w+)\s*=\s*'([^']+)';").expect("valid catalog regex")
});

/// In-memory view of the catalog file plus this run's additions.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    path: PathBuf,
    path_to_const: BTreeMap<String, String>,
    const_names: BTreeSet<String>,
    pending: BTreeMap<String, String>,
}

impl AssetCatalog {
    /// Load the catalog. `None` when the file is missing or unreadable;
    /// callers then reference assets by path literal.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no asset catalog");
            return None;
        }
        match fs::read_to_string(path) {
            Ok(content) => Some(Self::from_source(path, &content)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read asset catalog");
                None
            }
        }
    }

    /// Build from catalog source text.
    pub fn from_source(path: &Path, content: &str) -> Self {
        let mut path_to_const = BTreeMap::new();
        let mut const_names = BTreeSet::new();
        for caps in ENTRY.captures_iter(content) {
            let name = caps[1].to_string();
            let asset = caps[2].replace('\\', "/");
            const_names.insert(name.clone());
            path_to_const.entry(asset).or_insert(name);
        }
        Self {
            path: path.to_path_buf(),
            path_to_const,
            const_names,
            pending: BTreeMap::new(),
        }
    }

    /// The identifier for `asset_path`, allocating a pending one if the path
    /// is new. Clashing identifiers get a numeric suffix starting at 2.
    pub fn resolve(&mut self, asset_path: &str) -> String {
        let normalized = asset_path.replace('\\', "/");
        if let Some(existing) = self.path_to_const.get(&normalized) {
            return existing.clone();
        }
        let base = catalog_const_name(&normalized);
        let mut candidate = base.clone();
        let mut index = 2;
        while self.const_names.contains(&candidate) {
            candidate = format!("{base}{index}");
            index += 1;
        }
        debug!(asset = %normalized, name = %candidate, "new catalog entry");
        self.const_names.insert(candidate.clone());
        self.path_to_const.insert(normalized.clone(), candidate.clone());
        self.pending.insert(normalized, candidate.clone());
        candidate
    }

    /// Entries allocated since the last flush, as `(path, identifier)`.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pending.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert pending entries, sorted by identifier, before the final `\n}`
    /// of the catalog file. Returns the number of entries written.
    pub fn flush(&mut self) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let content = fs::read_to_string(&self.path)?;
        let Some(insert_at) = content.rfind("\n}") else {
            warn!(path = %self.path.display(), "asset catalog has no closing brace");
            return Ok(0);
        };
        let mut entries: Vec<(&String, &String)> = self.pending.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(b.1));
        let lines: Vec<String> = entries
            .iter()
            .map(|(asset, name)| format!("  static const String {name} = '{asset}';"))
            .collect();
        let updated = format!(
            "{}\n{}{}",
            &content[..insert_at],
            lines.join("\n"),
            &content[insert_at..]
        );
        fs::write(&self.path, updated)?;
        let written = lines.len();
        info!(path = %self.path.display(), entries = written, "asset catalog updated");
        self.pending.clear();
        Ok(written)
    }
}
