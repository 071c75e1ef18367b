//! Widget synthesizer: the recursive markup → widget compiler.
//!
//! Each element is compiled once into a [`Descriptor`]. A node first tries
//! the semantic override table (form controls); otherwise it is built
//! generically from its children:
//!
//! - `img` leaves resolve network, local or class-keyword media
//! - `span`/`p` become rich text with inherited styles
//! - other children split into flow and absolute layers; flow children go
//!   through flex composition, absolute ones are stacked over a base
//! - the body is finalized with sizing, padding, decoration, clip and
//!   rotation wrappers
//!
//! The document root is special: it never gets a fixed-size box, its
//! decoration moves to the root shell unless the mode is raw, and its flex
//! main axis always counts as determinate.

pub mod classify;
pub mod date;
pub mod descriptor;
pub mod flex;
pub mod media;
pub mod overrides;
pub mod stack;
pub mod text;

use std::collections::BTreeMap;

use tracing::debug;

pub use descriptor::Descriptor;

use crate::assets::AssetContext;
use crate::config::{CompileOptions, GenerationMode};
use crate::css::{PropertyMap, StyleTable};
use crate::geometry::{Extent, Size};
use crate::markup::{Dom, Element, MarkupError, NodeData, NodeId};
use crate::style::{insets_expr, ResolvedStyle};
use crate::widget::{call0, Call, Expr};
use classify::{candidates, NodeView};
use overrides::{owns_input_background, Semantic};

static EMPTY_PROPS: PropertyMap = BTreeMap::new();

/// Callees that must not sit inside an `OverflowBox`.
const OVERFLOW_BLOCKERS: &[&str] = &["Expanded", "Flexible", "Spacer", media::SVG_ASSET];

/// What synthesis knows about the element being compiled.
pub(crate) struct NodeInfo<'a> {
    pub id: NodeId,
    pub element: &'a Element,
    pub style: ResolvedStyle,
    pub is_root: bool,
    /// Every known dimension is icon-sized.
    pub small: bool,
}

impl NodeInfo<'_> {
    /// A descriptor carrying this node's layout facets.
    pub fn describe(&self, widget: Expr) -> Descriptor {
        Descriptor {
            widget,
            placement: self.style.position,
            z_index: self.style.z_index,
            flex_grow: self.style.flex_grow,
            size: self.style.size,
        }
    }

    /// Small placed or rotated icons are simplified into the flow.
    pub fn strips_icon_placement(&self) -> bool {
        (self.style.position.is_some() || self.style.rotation.is_some()) && self.small
    }
}

/// Compiles one markup tree against one style table.
pub struct Synthesizer<'a> {
    dom: &'a Dom,
    styles: &'a StyleTable,
    options: &'a CompileOptions,
    assets: &'a mut AssetContext,
    root: NodeId,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        dom: &'a Dom,
        styles: &'a StyleTable,
        options: &'a CompileOptions,
        assets: &'a mut AssetContext,
    ) -> Result<Self, MarkupError> {
        let root = dom.root().ok_or(MarkupError::NoElement)?;
        Ok(Self {
            dom,
            styles,
            options,
            assets,
            root,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Synthesize the whole tree.
    pub fn synthesize(&mut self) -> Descriptor {
        self.node(self.root)
    }

    /// The resolved style of a node, with its size normalized.
    pub fn resolve(&self, id: NodeId) -> ResolvedStyle {
        let props = self.dom.element(id).map_or(&EMPTY_PROPS, |e| self.props(e));
        let mut style = ResolvedStyle::resolve(props, &self.options.vocabulary);
        style.size = self.options.thresholds.normalize(style.size);
        style
    }

    /// Properties of an element's class; empty when the class is unknown.
    fn props(&self, element: &Element) -> &'a PropertyMap {
        let styles = self.styles;
        element
            .class_attr()
            .and_then(|attr| styles.select_class(attr))
            .and_then(|class| styles.get(class))
            .unwrap_or(&EMPTY_PROPS)
    }

    fn node(&mut self, id: NodeId) -> Descriptor {
        let dom = self.dom;
        let Some(element) = dom.element(id) else {
            return Descriptor::flow(call0("SizedBox.shrink"));
        };
        let style = self.resolve(id);
        let info = NodeInfo {
            id,
            element,
            small: self.options.thresholds.is_icon_sized(style.size),
            is_root: id == self.root,
            style,
        };

        let semantic = self.semantic(&info);
        if let Some(Semantic { widget, leaf: true }) = semantic {
            return info.describe(info.style.rotate(widget));
        }
        if semantic.is_none() {
            if element.is("img") {
                return self.image(&info);
            }
            if text::is_inline_text_tag(&element.tag) {
                return self.rich_text(&info);
            }
        }

        let kids = match semantic {
            Some(_) => Vec::new(),
            None => self.children(&info),
        };

        if semantic.is_none() && info.strips_icon_placement() {
            if let Some(icon) = self.simplified_icon(&info, &kids) {
                return Descriptor {
                    placement: None,
                    ..info.describe(icon)
                };
            }
        }

        self.compose(info, semantic.map(|s| s.widget), kids)
    }

    /// First semantic override whose builder yields a widget.
    fn semantic(&self, info: &NodeInfo<'_>) -> Option<Semantic> {
        let view = NodeView {
            dom: self.dom,
            id: info.id,
            element: info.element,
            styles: self.styles,
            vocab: &self.options.vocabulary,
        };
        candidates(&view)
            .into_iter()
            .find_map(|kind| overrides::build(kind, &view))
    }

    fn children(&mut self, info: &NodeInfo<'_>) -> Vec<Descriptor> {
        let dom = self.dom;
        let mut kids = Vec::new();
        for &child in dom.children(info.id) {
            match dom.get(child) {
                Some(NodeData::Text(raw)) => {
                    if let Some(widget) = text::text_run(raw, &info.style) {
                        kids.push(Descriptor::flow(widget));
                    }
                }
                Some(NodeData::Element(_)) => kids.push(self.node(child)),
                None => {}
            }
        }
        kids
    }

    /// A small wrapper whose only content is one vector icon collapses to
    /// the sized icon.
    fn simplified_icon(&self, info: &NodeInfo<'_>, kids: &[Descriptor]) -> Option<Expr> {
        if self.dom.has_direct_text(info.id) {
            return None;
        }
        let [only] = kids else {
            return None;
        };
        if only.is_absolute() {
            return None;
        }
        let icon = media::simplify_svg(&only.widget, info.style.size)?;
        debug!(tag = %info.element.tag, "icon wrapper simplified");
        Some(icon)
    }

    /// Flow composition, stacking and box finalization.
    fn compose(&self, info: NodeInfo<'_>, semantic: Option<Expr>, kids: Vec<Descriptor>) -> Descriptor {
        let style = &info.style;
        let (flow, mut absolute): (Vec<_>, Vec<_>) =
            kids.into_iter().partition(|kid| !kid.is_absolute());
        absolute.sort_by_key(|kid| kid.z_index);

        let input_owned = match &semantic {
            Some(widget) => owns_input_background(widget),
            None => matches!(flow.as_slice(), [only] if owns_input_background(&only.widget)),
        };
        let layout_size = if input_owned {
            style.size.without_height()
        } else {
            style.size
        };

        let flow_body = match semantic {
            Some(widget) => Some(widget),
            None => {
                let determinate = style.flex.is_some_and(|config| {
                    flex::main_axis_determinate(config.axis, layout_size, style.stretches, info.is_root)
                });
                flex::compose_flow(style.flex.as_ref(), flow, !absolute.is_empty(), determinate)
            }
        };

        let body = if absolute.is_empty() {
            flow_body.unwrap_or_else(|| call0("SizedBox.shrink"))
        } else {
            stack::compose_stack(flow_body, absolute, info.is_root, &self.options.thresholds)
        };

        let widget = style.rotate(style.clip(self.finalize_box(&info, body, layout_size, input_owned)));
        Descriptor {
            size: layout_size,
            ..info.describe(widget)
        }
    }

    /// Sizing box, then a `Container` for padding, margin and decoration.
    fn finalize_box(&self, info: &NodeInfo<'_>, body: Expr, size: Size, input_owned: bool) -> Expr {
        let style = &info.style;
        let skip_decoration = info.is_root && self.options.mode != GenerationMode::Raw;
        let decoration = if skip_decoration {
            None
        } else {
            style.decoration.to_expr(input_owned)
        };

        let content = if size.has_extent() && !info.is_root {
            let width = size.width.filter(|w| *w != 0.0);
            let height = size.height.filter(|h| *h != 0.0);
            Call::new("SizedBox")
                .named_opt("width", width.map(|w| Expr::Extent(Extent::Fixed(w))))
                .named_opt("height", height)
                .child(self.overflow_box(body, size))
                .build()
        } else {
            body
        };

        if style.padding.is_none() && style.margin.is_none() && decoration.is_none() {
            return content;
        }
        Call::new("Container")
            .named_opt("padding", style.padding.as_ref().map(insets_expr))
            .named_opt("margin", style.margin.as_ref().map(insets_expr))
            .named_opt("decoration", decoration)
            .child(content)
            .build()
    }

    /// Let a sized row or column overflow along its main axis. Needs both
    /// dimensions so the cross axis stays bounded.
    fn overflow_box(&self, body: Expr, size: Size) -> Expr {
        if !self.options.overflow_box {
            return body;
        }
        let (Some(width), Some(height)) = (size.width, size.height) else {
            return body;
        };
        let is_row = body.is_call("Row");
        if !is_row && !body.is_call("Column") {
            return body;
        }
        if OVERFLOW_BLOCKERS.iter().any(|callee| body.uses_callee(callee)) {
            return body;
        }
        let infinity = Expr::ident("double.infinity");
        let (max_width, max_height) = if is_row {
            (infinity, Expr::Num(height))
        } else {
            (Expr::Extent(Extent::Fixed(width)), infinity)
        };
        Call::new("OverflowBox")
            .named("alignment", Expr::ident("Alignment.topLeft"))
            .named("minWidth", 0.0)
            .named("minHeight", 0.0)
            .named("maxWidth", max_width)
            .named("maxHeight", max_height)
            .child(body)
            .build()
    }
}

/// Synthesize `markup` against `css` with default options and render the
/// root widget on one line.
#[cfg(test)]
pub(crate) fn synthesize_flat(markup: &str, css: &str) -> String {
    synthesize_with(markup, css, CompileOptions::default())
}

#[cfg(test)]
pub(crate) fn synthesize_with(markup: &str, css: &str, options: CompileOptions) -> String {
    let dir = tempfile::tempdir().unwrap();
    let options = options.with_project_root(dir.path()).with_copy_assets(false);
    let dom = crate::markup::parse(markup).unwrap();
    let styles = StyleTable::parse(css);
    let mut assets = AssetContext::new(&options, dir.path());
    let mut synth = Synthesizer::new(&dom, &styles, &options, &mut assets).unwrap();
    crate::widget::dart::render_flat(&synth.synthesize().widget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassIcons, Thresholds};
    use crate::values::Vocabulary;
    use pretty_assertions::assert_eq;

    // ── Generic boxes ────────────────────────────────────────────────

    #[test]
    fn empty_root_is_placeholder() {
        assert_eq!(synthesize_flat("<div />", ""), "SizedBox.shrink()");
    }

    #[test]
    fn sized_child_with_decoration() {
        let out = synthesize_flat(
            r#"<div><div className="card">Hi</div></div>"#,
            ".card { width: 120px; height: 40px; padding: 4px; background: #fff; }",
        );
        assert_eq!(
            out,
            "Container(padding: EdgeInsets.fromLTRB(4, 4, 4, 4), decoration: BoxDecoration(color: AppColors.fromHex('#ffffffff')), child: SizedBox(width: 120, height: 40, child: Text('Hi')))"
        );
    }

    #[test]
    fn root_is_never_sized_and_loses_decoration() {
        let css = ".root { width: 375px; height: 812px; background: #000; }";
        assert_eq!(synthesize_flat(r#"<div className="root">x</div>"#, css), "Text('x')");
        let raw = synthesize_with(
            r#"<div className="root">x</div>"#,
            css,
            CompileOptions::default().with_mode(GenerationMode::Raw),
        );
        assert_eq!(
            raw,
            "Container(decoration: BoxDecoration(color: AppColors.fromHex('#ff000000')), child: Text('x'))"
        );
    }

    #[test]
    fn canvas_height_is_dropped() {
        let out = synthesize_flat(
            r#"<div><div className="page">x</div></div>"#,
            ".page { width: 300px; height: 4000px; }",
        );
        assert_eq!(out, "SizedBox(width: 300, child: Text('x'))");
    }

    #[test]
    fn clip_wraps_container_and_rotation_wraps_clip() {
        let out = synthesize_flat(
            r#"<div><div className="c">x</div></div>"#,
            ".c { overflow: hidden; border-radius: 6px; margin: 2px; transform: rotate(180deg); }",
        );
        assert!(
            out.starts_with("Transform.rotate(angle: 3.141592653589793, child: ClipRRect(borderRadius: BorderRadius.circular(6), child: Container(margin: EdgeInsets.fromLTRB(2, 2, 2, 2), decoration: BoxDecoration(borderRadius: BorderRadius.circular(6)), child: Text('x'))))"),
            "{out}"
        );
    }

    // ── Flex and stacks ──────────────────────────────────────────────

    #[test]
    fn root_row_expands_children() {
        let out = synthesize_flat(
            r#"<div className="row"><div className="grow">a</div><div>b</div></div>"#,
            ".row { display: flex; gap: 10px; } .grow { flex: 1 0 0; }",
        );
        assert_eq!(
            out,
            "Row(mainAxisAlignment: MainAxisAlignment.start, crossAxisAlignment: CrossAxisAlignment.start, children: [Expanded(flex: 1, child: Text('a')), SizedBox(width: 10), Text('b')])"
        );
    }

    #[test]
    fn nested_column_without_height_does_not_expand() {
        let out = synthesize_flat(
            r#"<div><div className="col"><div className="grow">a</div></div></div>"#,
            ".col { display: flex; flex-direction: column; } .grow { flex-grow: 1; }",
        );
        assert_eq!(
            out,
            "Column(crossAxisAlignment: CrossAxisAlignment.start, mainAxisAlignment: MainAxisAlignment.start, children: [Text('a')])"
        );
    }

    #[test]
    fn absolute_children_are_ordered_by_z_index() {
        let out = synthesize_flat(
            r#"<div className="frame"><div className="b">B</div><div className="a">A</div></div>"#,
            ".frame { position: relative; }
             .a { position: absolute; left: 10px; width: 20px; z-index: 1; }
             .b { position: absolute; left: 50px; width: 5px; z-index: 2; }",
        );
        assert_eq!(
            out,
            "Stack(clipBehavior: Clip.none, children: [SizedBox(width: 55), Positioned(left: 10, child: SizedBox(width: 20, child: Text('A'))), Positioned(left: 50, child: SizedBox(width: 5, child: Text('B')))])"
        );
    }

    #[test]
    fn small_placed_icon_wrapper_is_simplified() {
        let out = synthesize_flat(
            r#"<div><div className="wrap"><img className="searchIcon" /></div></div>"#,
            ".wrap { position: absolute; top: 4px; left: 4px; width: 20px; height: 20px; }",
        );
        // The wrapper joins the flow, so no stack is needed.
        assert_eq!(
            out,
            "SizedBox(width: 20, height: 20, child: SvgPicture.asset(AppAssets.iconsSearchSvg))"
        );
    }

    // ── Inputs and overflow ──────────────────────────────────────────

    #[test]
    fn input_owns_background_and_height() {
        let out = synthesize_flat(
            r#"<div><div className="nameInput"><span>氏名</span></div></div>"#,
            ".nameInput { width: 300px; height: 48px; background: #eee; border: 1px solid #ccc; }",
        );
        assert_eq!(
            out,
            "Container(decoration: BoxDecoration(border: Border.all(color: AppColors.fromHex('#ffcccccc'), width: 1)), child: SizedBox(width: 300, child: AppInput(label: '氏名')))"
        );
    }

    #[test]
    fn overflow_box_for_sized_rows() {
        let css = ".r { display: flex; width: 200px; height: 40px; }";
        let markup = r#"<div><div className="r"><p>a</p><p>b</p></div></div>"#;
        let plain = synthesize_flat(markup, css);
        assert!(!plain.contains("OverflowBox"));
        let out = synthesize_with(markup, css, CompileOptions::default().with_overflow_box(true));
        assert!(
            out.starts_with("SizedBox(width: 200, height: 40, child: OverflowBox(alignment: Alignment.topLeft, minWidth: 0, minHeight: 0, maxWidth: double.infinity, maxHeight: 40, child: Row("),
            "{out}"
        );
    }

    // ── Configured tables ────────────────────────────────────────────

    #[test]
    fn icon_threshold_controls_leaf_simplification() {
        let markup = r#"<div><img className="badge" src="https://x.test/b.png" /></div>"#;
        let css = ".badge { position: absolute; top: 4px; left: 4px; width: 24px; height: 24px; transform: rotate(45deg); }";
        assert!(!synthesize_flat(markup, css).contains("Positioned"));

        let strict = Thresholds {
            icon_max_extent: 16.0,
            ..Thresholds::default()
        };
        let out = synthesize_with(markup, css, CompileOptions::default().with_thresholds(strict));
        assert!(out.contains("Positioned(top: 4, left: 4, child: Transform.rotate("), "{out}");
    }

    #[test]
    fn vocabulary_maps_tokens_and_fonts() {
        let vocabulary = Vocabulary::default()
            .with_color_token("brandAccent", "AppColors.accent")
            .with_font_family("Brand Sans", Some("BrandFont"));
        let out = synthesize_with(
            r#"<div><p className="t">x</p></div>"#,
            r#".t { color: var(--brand-accent); font-family: "Brand Sans", sans-serif; }"#,
            CompileOptions::default().with_vocabulary(vocabulary),
        );
        assert!(out.contains("fontFamily: 'BrandFont'"), "{out}");
        assert!(out.contains("color: AppColors.accent"), "{out}");
    }

    #[test]
    fn custom_class_icons_replace_defaults() {
        let icons = ClassIcons::empty().with_exact("logoMark", "AppAssets.logo");
        let options = CompileOptions::default().with_class_icons(icons);
        assert_eq!(
            synthesize_with(r#"<div><img className="logoMark" /></div>"#, "", options.clone()),
            "SvgPicture.asset(AppAssets.logo)"
        );
        assert_eq!(
            synthesize_with(r#"<div><img className="searchIcon" /></div>"#, "", options),
            "SizedBox.shrink()"
        );
    }

}
