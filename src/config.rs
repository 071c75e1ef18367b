//! Compilation options.
//!
//! [`CompileOptions`] is a plain struct with builder methods. Every field has
//! a default; [`CompileOptions::from_env`] overlays the `JSX2FLUTTER_*`
//! environment variables on top of those defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::geometry::Size;
use crate::values::Vocabulary;

/// Default directory, relative to the project root, that assets are
/// referenced from.
pub const DEFAULT_ASSET_DIR: &str = "assets/figma";

/// Default catalog location, relative to the project root.
pub const DEFAULT_CATALOG_PATH: &str = "lib/src/utils/app_assets.dart";

// ---------------------------------------------------------------------------
// GenerationMode
// ---------------------------------------------------------------------------

/// How the root widget is wrapped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// The root widget as synthesized, root decoration kept on the node.
    Raw,
    /// `Scaffold` with a full-width decorated container and a scroll view.
    Scaffold,
    /// A scroll view around a width-fitting box, decorated when the root has
    /// a decoration.
    #[default]
    Fit,
}

impl GenerationMode {
    /// Parse a mode name. `classic` is accepted for [`GenerationMode::Raw`].
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "raw" | "classic" => Some(Self::Raw),
            "scaffold" => Some(Self::Scaffold),
            "fit" => Some(Self::Fit),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Size heuristics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Thresholds {
    /// Boxes whose known dimensions are all at most this are icon-sized.
    pub icon_max_extent: f64,
    /// Declared heights above this are treated as design-canvas artifacts
    /// and dropped (unless the box is icon-sized).
    pub max_plausible_height: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            icon_max_extent: 128.0,
            max_plausible_height: 1200.0,
        }
    }
}

impl Thresholds {
    /// Whether every known dimension of `size` is icon-sized.
    pub fn is_icon_sized(&self, size: Size) -> bool {
        size.fits_within(self.icon_max_extent)
    }

    /// Drop an implausibly tall height unless the box is icon-sized.
    pub fn normalize(&self, size: Size) -> Size {
        if self.is_icon_sized(size) {
            return size;
        }
        match size.height {
            Some(h) if h > self.max_plausible_height => size.without_height(),
            _ => size,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassIcons
// ---------------------------------------------------------------------------

/// Icon lookup for image elements that have no usable source.
///
/// An exact class match wins; otherwise the first keyword contained in the
/// lowercased class name decides.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassIcons {
    pub exact: BTreeMap<String, String>,
    pub keywords: Vec<(String, String)>,
}

impl ClassIcons {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            exact: BTreeMap::new(),
            keywords: Vec::new(),
        }
    }

    /// Asset reference for a class name.
    pub fn lookup(&self, class_name: &str) -> Option<&str> {
        if let Some(asset) = self.exact.get(class_name) {
            return Some(asset.as_str());
        }
        let lower = class_name.to_lowercase();
        self.keywords
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|(_, asset)| asset.as_str())
    }

    /// Map one class name exactly (builder).
    pub fn with_exact(mut self, class_name: &str, asset: &str) -> Self {
        self.exact.insert(class_name.to_string(), asset.to_string());
        self
    }
}

impl Default for ClassIcons {
    fn default() -> Self {
        let keywords = [
            ("calendar", "AppAssets.iconsCalendarSvg"),
            ("search", "AppAssets.iconsSearchSvg"),
            ("user", "AppAssets.iconsUserSvg"),
            ("key", "AppAssets.iconsUserKeySvg"),
            ("family", "AppAssets.iconsFamilySvg"),
            ("phone", "AppAssets.iconsPhoneSvg"),
            ("location", "AppAssets.iconsLocationSvg"),
            ("battery", "AppAssets.iconsBatterySvg"),
            ("solar", "AppAssets.iconsSolarSvg"),
            ("water", "AppAssets.iconsWaterSystemSvg"),
            ("home", "AppAssets.iconsHomeSvg"),
            ("notification", "AppAssets.iconsNotificationSvg"),
            ("percent", "AppAssets.iconsPercentSvg"),
            ("plus", "AppAssets.iconsPlusSvg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            exact: BTreeMap::new(),
            keywords,
        }
    }
}

// ---------------------------------------------------------------------------
// CompileOptions
// ---------------------------------------------------------------------------

/// Everything that steers one compilation.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    pub mode: GenerationMode,
    /// Prefix inserted into canonical asset names.
    pub asset_prefix: String,
    /// Directory (relative to the project root) assets are referenced from.
    pub asset_dir: String,
    /// Copy referenced local assets into `project_root/asset_dir`.
    pub copy_assets: bool,
    /// Rename assets to canonical names. `None` means "when a non-empty
    /// prefix is configured".
    pub rename_assets: Option<bool>,
    /// Wrap sized rows/columns in an `OverflowBox`.
    pub overflow_box: bool,
    pub project_root: PathBuf,
    /// Asset catalog file. Relative paths resolve against `project_root`.
    pub catalog_path: PathBuf,
    /// Dart package name used in `package:` imports.
    pub package_name: String,
    pub thresholds: Thresholds,
    pub vocabulary: Vocabulary,
    pub class_icons: ClassIcons,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            asset_prefix: String::new(),
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            copy_assets: true,
            rename_assets: None,
            overflow_box: false,
            project_root: PathBuf::from("."),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            package_name: "app".to_string(),
            thresholds: Thresholds::default(),
            vocabulary: Vocabulary::default(),
            class_icons: ClassIcons::default(),
        }
    }
}

impl CompileOptions {
    /// Defaults overlaid with `JSX2FLUTTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unset or unparsable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(mode) = lookup("JSX2FLUTTER_MODE").and_then(|m| GenerationMode::parse(&m)) {
            options.mode = mode;
        }
        if let Some(prefix) = lookup("JSX2FLUTTER_ASSET_PREFIX") {
            options.asset_prefix = prefix;
        }
        if let Some(dir) = lookup("JSX2FLUTTER_ASSET_DIR").filter(|d| !d.trim().is_empty()) {
            options.asset_dir = dir;
        }
        if let Some(copy) = lookup("JSX2FLUTTER_COPY_ASSETS") {
            options.copy_assets = copy.trim() != "0";
        }
        if let Some(rename) = lookup("JSX2FLUTTER_RENAME_ASSETS") {
            options.rename_assets = Some(rename.trim() != "0");
        }
        if let Some(overflow) = lookup("JSX2FLUTTER_ENABLE_OVERFLOW") {
            options.overflow_box = overflow.trim() == "1";
        }
        if let Some(package) = lookup("JSX2FLUTTER_PACKAGE").filter(|p| !p.trim().is_empty()) {
            options.package_name = package;
        }
        options
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = prefix.into();
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<String>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn with_copy_assets(mut self, copy: bool) -> Self {
        self.copy_assets = copy;
        self
    }

    pub fn with_rename_assets(mut self, rename: bool) -> Self {
        self.rename_assets = Some(rename);
        self
    }

    pub fn with_overflow_box(mut self, enabled: bool) -> Self {
        self.overflow_box = enabled;
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_class_icons(mut self, icons: ClassIcons) -> Self {
        self.class_icons = icons;
        self
    }

    /// The catalog file, resolved against the project root.
    pub fn catalog_file(&self) -> PathBuf {
        resolve_against(&self.project_root, &self.catalog_path)
    }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
