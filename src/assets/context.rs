//! Per-compilation asset state.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::catalog::AssetCatalog;
use super::naming::{
    is_better_token, is_generic_token, normalize_semantic_token, sanitize_token,
    semantic_token_from_class,
};
use crate::config::CompileOptions;
use crate::error::{CompileError, Result};
use crate::markup::Dom;
use crate::widget::Expr;

/// A local media file resolved for the generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAsset {
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,
    pub is_vector: bool,
    /// Catalog constant (`AppAssets.x`) or a path string literal.
    pub reference: Expr,
}

/// Asset registrations, canonical names and the catalog delta of one
/// compilation.
#[derive(Debug)]
pub struct AssetContext {
    markup_dir: PathBuf,
    asset_dir: String,
    prefix: String,
    rename: bool,
    copy: bool,
    project_root: PathBuf,
    registrations: BTreeMap<PathBuf, String>,
    file_names: HashMap<PathBuf, String>,
    used_names: HashSet<String>,
    hints: HashMap<PathBuf, String>,
    catalog: Option<AssetCatalog>,
}

impl AssetContext {
    /// Fresh context for markup located in `markup_dir`. Loads the catalog
    /// named by the options, if it exists.
    pub fn new(options: &CompileOptions, markup_dir: &Path) -> Self {
        let prefix = sanitize_token(&options.asset_prefix);
        Self {
            markup_dir: markup_dir.to_path_buf(),
            asset_dir: options.asset_dir.replace('\\', "/").trim_end_matches('/').to_string(),
            rename: options.rename_assets.unwrap_or(!prefix.is_empty()),
            prefix,
            copy: options.copy_assets,
            project_root: options.project_root.clone(),
            registrations: BTreeMap::new(),
            file_names: HashMap::new(),
            used_names: HashSet::new(),
            hints: HashMap::new(),
            catalog: AssetCatalog::load(&options.catalog_file()),
        }
    }

    /// Source files registered so far, mapped to their relative output path.
    pub fn registrations(&self) -> &BTreeMap<PathBuf, String> {
        &self.registrations
    }

    pub fn catalog(&self) -> Option<&AssetCatalog> {
        self.catalog.as_ref()
    }

    /// The on-disk file a relative `src` refers to. Remote and `data:`
    /// references, and files that do not exist, are not local.
    pub fn local_path(&self, src: &str) -> Option<PathBuf> {
        let cleaned = src.split(['?', '#']).next().unwrap_or_default().trim();
        if cleaned.is_empty() {
            return None;
        }
        let lower = cleaned.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:") {
            return None;
        }
        fs::canonicalize(self.markup_dir.join(cleaned)).ok()
    }

    /// Collect naming hints from the class names of every `img` that uses a
    /// local file, keeping the best hint per file.
    pub fn collect_hints(&mut self, dom: &Dom) {
        let Some(root) = dom.root() else {
            return;
        };
        for id in dom.descendants(root) {
            let Some(element) = dom.element(id).filter(|e| e.is("img")) else {
                continue;
            };
            let Some(path) = element.attr("src").and_then(|src| self.local_path(src)) else {
                continue;
            };
            let Some(hint) = element.class_attr().and_then(semantic_token_from_class) else {
                continue;
            };
            let better = self
                .hints
                .get(&path)
                .is_none_or(|existing| is_better_token(&hint, existing));
            if better {
                self.hints.insert(path, hint);
            }
        }
        debug!(hints = self.hints.len(), "collected asset naming hints");
    }

    /// Resolve a local media reference: pick its output name, register it
    /// for copying and look up (or allocate) its catalog identifier.
    pub fn resolve_local_asset(&mut self, src: &str, hint: Option<&str>) -> Option<LocalAsset> {
        let path = self.local_path(src)?;
        let file_name = self.output_name(&path, hint.unwrap_or_default());
        let relative_path = if self.asset_dir.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{}", self.asset_dir, file_name)
        };
        let reference = match self.catalog.as_mut() {
            Some(catalog) => Expr::ident(format!("AppAssets.{}", catalog.resolve(&relative_path))),
            None => Expr::str(relative_path.clone()),
        };
        self.registrations.insert(path, relative_path.clone());
        Some(LocalAsset {
            is_vector: file_name.to_ascii_lowercase().ends_with(".svg"),
            relative_path,
            reference,
        })
    }

    /// Output file name for `path`, unique within this context. With
    /// renaming off the source name is kept, suffixed only on a clash.
    fn output_name(&mut self, path: &Path, hint: &str) -> String {
        if let Some(existing) = self.file_names.get(path) {
            return existing.clone();
        }
        let (base, ext) = if self.rename {
            self.canonical_base(path, hint)
        } else {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            (stem, ext)
        };

        let mut candidate = format!("{base}{ext}");
        let mut index = 2;
        while self.used_names.contains(&candidate) {
            candidate = format!("{base}_{index}{ext}");
            index += 1;
        }
        debug!(source = %path.display(), name = %candidate, "asset output name");
        self.used_names.insert(candidate.clone());
        self.file_names.insert(path.to_path_buf(), candidate.clone());
        candidate
    }

    /// `{ic|img}_{prefix}_{token}` and the lowercased extension.
    fn canonical_base(&self, path: &Path, hint: &str) -> (String, String) {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or_else(|| ".bin".to_string());
        let is_vector = ext == ".svg";
        let stem = path
            .file_stem()
            .map(|s| sanitize_token(&s.to_string_lossy()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "asset".to_string());
        let token = self
            .semantic_token(path, hint, &stem)
            .unwrap_or_else(|| if is_vector { "icon" } else { "image" }.to_string());
        let kind = if is_vector { "ic" } else { "img" };
        let base = [kind, self.prefix.as_str(), token.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        (base, ext)
    }

    /// Token priority: direct hint, collected hint, file stem.
    fn semantic_token(&self, path: &Path, hint: &str, stem: &str) -> Option<String> {
        let collected = self.hints.get(path).map(String::as_str).unwrap_or_default();
        [hint, collected, stem]
            .into_iter()
            .map(normalize_semantic_token)
            .find(|token| !token.is_empty() && !is_generic_token(token))
    }

    /// Copy registered files below the project root. Failures are logged and
    /// skipped. Returns the number of files copied.
    pub fn copy_assets(&self) -> usize {
        if !self.copy {
            return 0;
        }
        let mut copied = 0;
        for (source, relative) in &self.registrations {
            let dest = self.project_root.join(relative);
            let result = match dest.parent() {
                Some(parent) => fs::create_dir_all(parent),
                None => Ok(()),
            }
            .and_then(|_| fs::copy(source, &dest));
            match result {
                Ok(_) => copied += 1,
                Err(err) => {
                    warn!(source = %source.display(), dest = %dest.display(), error = %err, "asset copy failed")
                }
            }
        }
        copied
    }

    /// Write pending catalog entries. No-op without a catalog.
    pub fn flush_catalog(&mut self) -> Result<usize> {
        let Some(catalog) = self.catalog.as_mut() else {
            return Ok(0);
        };
        catalog.flush().map_err(|source| CompileError::Catalog {
            path: catalog.path().to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            for file in files {
                let path = dir.path().join("design").join(file);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, b"x").unwrap();
            }
            Self { dir }
        }

        fn markup_dir(&self) -> PathBuf {
            self.dir.path().join("design")
        }

        fn options(&self) -> CompileOptions {
            CompileOptions::default().with_project_root(self.dir.path().join("app"))
        }
    }

    // ── Local resolution ─────────────────────────────────────────────

    #[test]
    fn non_local_references() {
        let fx = Fixture::new(&["a.svg"]);
        let ctx = AssetContext::new(&fx.options(), &fx.markup_dir());
        assert!(ctx.local_path("https://x.test/a.svg").is_none());
        assert!(ctx.local_path("data:image/png;base64,AAAA").is_none());
        assert!(ctx.local_path("missing.svg").is_none());
        assert!(ctx.local_path("").is_none());
        assert!(ctx.local_path("./a.svg?v=2#frag").is_some());
    }

    #[test]
    fn keeps_source_name_without_prefix() {
        let fx = Fixture::new(&["Home Icon.SVG"]);
        let mut ctx = AssetContext::new(&fx.options(), &fx.markup_dir());
        let asset = ctx.resolve_local_asset("Home Icon.SVG", Some("home")).unwrap();
        assert_eq!(asset.relative_path, "assets/figma/Home Icon.SVG");
        assert!(asset.is_vector);
        assert_eq!(asset.reference, Expr::str("assets/figma/Home Icon.SVG"));
    }

    #[test]
    fn same_file_name_from_two_folders_gets_suffixed() {
        let fx = Fixture::new(&["a/icon.svg", "b/icon.svg"]);
        let mut ctx = AssetContext::new(&fx.options(), &fx.markup_dir());
        let first = ctx.resolve_local_asset("a/icon.svg", None).unwrap();
        let second = ctx.resolve_local_asset("b/icon.svg", None).unwrap();
        let again = ctx.resolve_local_asset("./b/icon.svg", None).unwrap();
        assert_eq!(first.relative_path, "assets/figma/icon.svg");
        assert_eq!(second.relative_path, "assets/figma/icon_2.svg");
        assert_eq!(again.relative_path, second.relative_path);
        assert_eq!(ctx.registrations().len(), 2);
    }

    // ── Canonical names ──────────────────────────────────────────────

    #[test]
    fn forced_rename_into_custom_dir() {
        let fx = Fixture::new(&["Bell 01.svg"]);
        let options = fx
            .options()
            .with_asset_dir("assets/images/")
            .with_rename_assets(true);
        let mut ctx = AssetContext::new(&options, &fx.markup_dir());
        let asset = ctx.resolve_local_asset("Bell 01.svg", None).unwrap();
        assert_eq!(asset.relative_path, "assets/images/ic_bell.svg");
    }

    #[test]
    fn canonical_names_and_dedup() {
        let fx = Fixture::new(&["a1.svg", "b2.svg", "photo.png", "vector.svg"]);
        let options = fx.options().with_asset_prefix("Top Page");
        let mut ctx = AssetContext::new(&options, &fx.markup_dir());

        let first = ctx.resolve_local_asset("a1.svg", Some("icon_bell")).unwrap();
        let second = ctx.resolve_local_asset("b2.svg", Some("bell")).unwrap();
        let again = ctx.resolve_local_asset("a1.svg", None).unwrap();
        let photo = ctx.resolve_local_asset("photo.png", Some("frame12")).unwrap();
        let generic = ctx.resolve_local_asset("vector.svg", None).unwrap();

        assert_eq!(first.relative_path, "assets/figma/ic_top_page_bell.svg");
        assert_eq!(second.relative_path, "assets/figma/ic_top_page_bell_2.svg");
        assert_eq!(again.relative_path, first.relative_path);
        assert_eq!(photo.relative_path, "assets/figma/img_top_page_photo.png");
        assert_eq!(generic.relative_path, "assets/figma/ic_top_page_icon.svg");
        assert_eq!(ctx.registrations().len(), 4);
    }

    #[test]
    fn collected_hints_name_unhinted_uses() {
        let fx = Fixture::new(&["x9.svg"]);
        let dom = parse(
            r#"<div><img className="vector3" src="x9.svg" /><img className="searchIcon" src="x9.svg" /></div>"#,
        )
        .unwrap();
        let options = fx.options().with_asset_prefix("p");
        let mut ctx = AssetContext::new(&options, &fx.markup_dir());
        ctx.collect_hints(&dom);
        let asset = ctx.resolve_local_asset("x9.svg", Some("vector3")).unwrap();
        assert_eq!(asset.relative_path, "assets/figma/ic_p_searchicon.svg");
    }

    // ── Side effects ─────────────────────────────────────────────────

    #[test]
    fn copy_and_catalog() {
        let fx = Fixture::new(&["logo.png"]);
        let catalog = fx.dir.path().join("app/lib/src/utils/app_assets.dart");
        fs::create_dir_all(catalog.parent().unwrap()).unwrap();
        fs::write(&catalog, "class AppAssets {\n}\n").unwrap();

        let mut ctx = AssetContext::new(&fx.options(), &fx.markup_dir());
        let asset = ctx.resolve_local_asset("logo.png", None).unwrap();
        assert_eq!(asset.reference, Expr::ident("AppAssets.figmaLogoPng"));
        assert!(!asset.is_vector);

        assert_eq!(ctx.copy_assets(), 1);
        assert!(fx.dir.path().join("app/assets/figma/logo.png").exists());
        assert_eq!(ctx.flush_catalog().unwrap(), 1);
        assert!(fs::read_to_string(&catalog)
            .unwrap()
            .contains("static const String figmaLogoPng = 'assets/figma/logo.png';"));
    }

    #[test]
    fn copy_disabled() {
        let fx = Fixture::new(&["logo.png"]);
        let options = fx.options().with_copy_assets(false);
        let mut ctx = AssetContext::new(&options, &fx.markup_dir());
        ctx.resolve_local_asset("logo.png", None).unwrap();
        assert_eq!(ctx.copy_assets(), 0);
        assert_eq!(ctx.flush_catalog().unwrap(), 0);
    }
}
