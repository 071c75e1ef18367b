//! Compilation driver.
//!
//! [`Compiler::compile`] reads the markup and stylesheet, owns the asset
//! context for that one run, synthesizes and assembles the document, and
//! only then performs side effects: copying assets and flushing the catalog.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::assemble::{assemble_root, render_document};
use crate::assets::AssetContext;
use crate::config::CompileOptions;
use crate::css::{Preprocessor, StyleTable};
use crate::error::{CompileError, Result};
use crate::markup;
use crate::synth::Synthesizer;

/// Result of one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutput {
    /// The generated Dart file.
    pub source: String,
    pub component_name: String,
    /// Local assets referenced by the output, relative to the project root.
    pub assets: Vec<String>,
}

/// Markup + stylesheet → Dart compiler.
#[derive(Default)]
pub struct Compiler {
    options: CompileOptions,
    preprocessor: Option<Box<dyn Preprocessor>>,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            preprocessor: None,
        }
    }

    /// Use an external stylesheet compiler, falling back to the built-in
    /// flattener when it fails.
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Some(Box::new(preprocessor));
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one component.
    pub fn compile(
        &self,
        markup_path: &Path,
        style_path: &Path,
        component_name: &str,
    ) -> Result<CompileOutput> {
        let markup_source = read_source(markup_path)?;
        let style_source = read_source(style_path)?;

        let styles = StyleTable::compile(&style_source, style_path, self.preprocessor.as_deref());
        debug!(classes = styles.len(), "style table compiled");
        let dom = markup::parse(&markup_source)?;
        debug!(nodes = dom.len(), "markup parsed");

        let markup_dir = markup_path.parent().unwrap_or_else(|| Path::new("."));
        let mut assets = AssetContext::new(&self.options, markup_dir);
        assets.collect_hints(&dom);

        let mut synth = Synthesizer::new(&dom, &styles, &self.options, &mut assets)?;
        let root_style = synth.resolve(synth.root());
        let root = synth.synthesize();
        let widget = assemble_root(root.widget, &root_style, self.options.mode);
        let source = render_document(component_name, &widget, &self.options.package_name);

        let copied = assets.copy_assets();
        let added = assets.flush_catalog()?;
        info!(
            component = component_name,
            assets = assets.registrations().len(),
            copied,
            catalog_added = added,
            "compiled"
        );

        Ok(CompileOutput {
            source,
            component_name: component_name.to_string(),
            assets: assets.registrations().values().cloned().collect(),
        })
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CompileError::MissingSource {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationMode;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_markup_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let css = write(dir.path(), "index.module.scss", "");
        let err = Compiler::default()
            .compile(&dir.path().join("nope.jsx"), &css, "X")
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingSource { .. }));
    }

    #[test]
    fn markup_without_elements_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let jsx = write(dir.path(), "index.jsx", "export default function A() { return null }");
        let css = write(dir.path(), "index.module.scss", "");
        let err = Compiler::new(CompileOptions::default().with_project_root(dir.path()))
            .compile(&jsx, &css, "X")
            .unwrap_err();
        assert!(matches!(err, CompileError::Markup(_)));
    }

    #[test]
    fn compiles_a_component() {
        let dir = tempfile::tempdir().unwrap();
        let jsx = write(
            dir.path(),
            "index.jsx",
            r#"export default function Page() { return (<div className={styles.root}><p>Hi</p></div>) }"#,
        );
        let css = write(dir.path(), "index.module.scss", ".root { width: 375px; }");
        let options = CompileOptions::default()
            .with_project_root(dir.path())
            .with_mode(GenerationMode::Raw);
        let out = Compiler::new(options).compile(&jsx, &css, "Page").unwrap();
        assert_eq!(out.component_name, "Page");
        assert!(out.assets.is_empty());
        assert!(out.source.contains("class Page extends StatelessWidget"));
        assert!(out.source.contains("return RichText(text: TextSpan(children: [TextSpan(text: 'Hi')]));"));
    }

    #[test]
    fn preprocessor_output_is_used() {
        struct Fixed;
        impl Preprocessor for Fixed {
            fn compile(&self, _: &str, _: &Path) -> std::result::Result<String, Box<dyn std::error::Error>> {
                Ok(".root { background: #123456; }".to_string())
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let jsx = write(dir.path(), "index.jsx", r#"<div className="root" />"#);
        let css = write(dir.path(), "index.module.scss", "not css at all {");
        let out = Compiler::new(CompileOptions::default().with_project_root(dir.path()))
            .with_preprocessor(Fixed)
            .compile(&jsx, &css, "Root")
            .unwrap();
        assert!(out.source.contains("#ff123456"), "{}", out.source);
    }
}
