//! Image leaves and vector icon simplification.

use tracing::debug;

use super::descriptor::Descriptor;
use super::{NodeInfo, Synthesizer};
use crate::geometry::{Extent, Size};
use crate::widget::{call0, Call, Expr};

/// Callee of a vector asset widget.
pub const SVG_ASSET: &str = "SvgPicture.asset";

/// The first `SvgPicture.asset(...)` call nested in `widget`.
pub fn svg_call(widget: &Expr) -> Option<&Expr> {
    let mut found = None;
    widget.walk(&mut |e| {
        if found.is_none() && e.is_call(SVG_ASSET) {
            found = Some(e);
        }
    });
    found
}

/// Wrap `widget` in a `SizedBox` carrying every known dimension.
pub fn sized(widget: Expr, size: Size) -> Expr {
    if size.is_unknown() {
        return widget;
    }
    Call::new("SizedBox")
        .named_opt("width", size.width.map(|w| Expr::Extent(Extent::Fixed(w))))
        .named_opt("height", size.height)
        .child(widget)
        .build()
}

/// Reduce a wrapper around a vector icon to the bare, sized icon.
pub fn simplify_svg(widget: &Expr, size: Size) -> Option<Expr> {
    svg_call(widget).map(|svg| sized(svg.clone(), size))
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

impl Synthesizer<'_> {
    /// Synthesize an `img` leaf: network image, local vector or raster
    /// asset, class-keyword icon, or an empty placeholder.
    pub(super) fn image(&mut self, node: &NodeInfo<'_>) -> Descriptor {
        let src = node.element.attr("src").unwrap_or_default().trim();
        let size = node.style.size;

        if is_remote(src) {
            let widget = Call::new("Image.network")
                .arg(Expr::str(src))
                .named("fit", Expr::ident("BoxFit.cover"))
                .build();
            return leaf(node, sized(widget, size));
        }

        if let Some(local) = self.assets.resolve_local_asset(src, node.element.class_attr()) {
            if local.is_vector {
                return vector_icon(node, local.reference);
            }
            let widget = Call::new("Image.asset")
                .arg(local.reference)
                .named("fit", Expr::ident("BoxFit.contain"))
                .build();
            return leaf(node, sized(widget, size));
        }

        let icon = node
            .element
            .class_attr()
            .and_then(|class| self.options.class_icons.lookup(class));
        if let Some(asset) = icon {
            debug!(asset, "image resolved from class keyword");
            return vector_icon(node, Expr::ident(asset));
        }

        debug!(src, "image without usable source");
        node.describe(node.style.rotate(call0("SizedBox.shrink")))
    }
}

fn vector_icon(node: &NodeInfo<'_>, reference: Expr) -> Descriptor {
    leaf(node, sized(Call::new(SVG_ASSET).arg(reference).build(), node.style.size))
}

/// Small placed or rotated image leaves join the flow unrotated.
fn leaf(node: &NodeInfo<'_>, widget: Expr) -> Descriptor {
    if node.strips_icon_placement() {
        return Descriptor {
            placement: None,
            ..node.describe(widget)
        };
    }
    node.describe(node.style.rotate(widget))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::synthesize_flat;
    use crate::widget::dart::render_flat;

    fn svg(name: &str) -> Expr {
        Call::new(SVG_ASSET).arg(Expr::ident(name)).build()
    }

    // ── Helpers ──────────────────────────────────────────────────────

    #[test]
    fn finds_nested_svg_call() {
        let wrapped = Call::new("Container")
            .child(Call::new("Center").child(svg("AppAssets.icA")).build())
            .build();
        assert_eq!(svg_call(&wrapped), Some(&svg("AppAssets.icA")));
        assert!(svg_call(&call0("SizedBox.shrink")).is_none());
    }

    #[test]
    fn simplify_sizes_known_dimensions() {
        let wrapped = Call::new("Container").child(svg("AppAssets.icA")).build();
        assert_eq!(
            render_flat(&simplify_svg(&wrapped, Size::new(Some(24.0), None)).unwrap()),
            "SizedBox(width: 24, child: SvgPicture.asset(AppAssets.icA))"
        );
        assert_eq!(
            simplify_svg(&wrapped, Size::UNKNOWN),
            Some(svg("AppAssets.icA"))
        );
    }

    // ── Image leaves ─────────────────────────────────────────────────

    #[test]
    fn network_image() {
        assert_eq!(
            synthesize_flat(
                r#"<div><img className="photo" src="https://x.test/a.png" /></div>"#,
                ".photo { width: 100px; height: 50px; }"
            ),
            "SizedBox(width: 100, height: 50, child: Image.network('https://x.test/a.png', fit: BoxFit.cover))"
        );
    }

    #[test]
    fn small_raster_leaf_drops_placement_and_rotation() {
        let out = synthesize_flat(
            r#"<div><img className="badge" src="https://x.test/b.png" /></div>"#,
            ".badge { position: absolute; top: 4px; left: 4px; width: 24px; height: 24px; transform: rotate(45deg); }",
        );
        assert_eq!(
            out,
            "SizedBox(width: 24, height: 24, child: Image.network('https://x.test/b.png', fit: BoxFit.cover))"
        );
    }

    #[test]
    fn large_raster_leaf_keeps_placement() {
        let out = synthesize_flat(
            r#"<div><img className="hero" src="https://x.test/h.png" /></div>"#,
            ".hero { position: absolute; top: 4px; left: 4px; width: 300px; height: 200px; }",
        );
        assert!(out.contains("Positioned(top: 4, left: 4, child: SizedBox(width: 300, height: 200, child: Image.network("), "{out}");
    }

    #[test]
    fn class_keyword_icon() {
        assert_eq!(
            synthesize_flat(r#"<div><img className="homeIcon" /></div>"#, ".homeIcon { width: 24px; height: 24px; }"),
            "SizedBox(width: 24, height: 24, child: SvgPicture.asset(AppAssets.iconsHomeSvg))"
        );
    }

    #[test]
    fn missing_source_is_placeholder() {
        assert_eq!(
            synthesize_flat(r#"<div><img src="data:image/png;base64,AAAA" /></div>"#, ""),
            "SizedBox.shrink()"
        );
    }
}
