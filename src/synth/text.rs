//! Text runs and inline rich text.

use super::descriptor::Descriptor;
use super::{NodeInfo, Synthesizer};
use crate::markup::{NodeData, NodeId};
use crate::style::ResolvedStyle;
use crate::values::{TextAlign, TextStyleSpec};
use crate::widget::{call0, Call, Expr};

/// Tags whose children flow as inline spans.
pub fn is_inline_text_tag(tag: &str) -> bool {
    matches!(tag, "span" | "p")
}

/// Widget for a text run placed directly in a node, styled by that node.
/// `None` for blank runs.
pub fn text_run(raw: &str, style: &ResolvedStyle) -> Option<Expr> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let text_style = style.text_style.as_ref().map(TextStyleSpec::to_expr);
    let align = style.text_align.map(TextAlign::to_expr);
    let widget = match &style.text_gradient {
        Some(gradient) => Call::new("AppTextGradient")
            .named("text", Expr::str(text))
            .named_opt("style", text_style)
            .named_opt("textAlign", align)
            .named("gradient", gradient.to_expr())
            .build(),
        None => Call::new("Text")
            .arg(Expr::str(text))
            .named_opt("style", text_style)
            .named_opt("textAlign", align)
            .build(),
    };
    Some(widget)
}

fn text_span(text: &str, style: Option<&TextStyleSpec>) -> Expr {
    Call::new("TextSpan")
        .named("text", Expr::str(text))
        .named_opt("style", style.map(TextStyleSpec::to_expr))
        .build()
}

impl Synthesizer<'_> {
    /// `RichText` for a `span`/`p` node. Nested inline tags merge their
    /// style over the inherited one; any other element is embedded as a
    /// `WidgetSpan`.
    pub(super) fn rich_text(&mut self, node: &NodeInfo<'_>) -> Descriptor {
        let spans = self.inline_spans(node.id, None);
        let widget = if spans.is_empty() {
            call0("SizedBox.shrink")
        } else {
            Call::new("RichText")
                .named("text", Call::new("TextSpan").children(spans).build())
                .named_opt("textAlign", node.style.text_align.map(TextAlign::to_expr))
                .build()
        };
        node.describe(node.style.rotate(widget))
    }

    fn inline_spans(&mut self, id: NodeId, inherited: Option<&TextStyleSpec>) -> Vec<Expr> {
        let dom = self.dom;
        let own = dom
            .element(id)
            .and_then(|element| TextStyleSpec::from_props(self.props(element), &self.options.vocabulary));
        let style = TextStyleSpec::merge_opt(inherited, own.as_ref());

        let mut spans = Vec::new();
        for &child in dom.children(id) {
            match dom.get(child) {
                Some(NodeData::Text(text)) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        spans.push(text_span(text, style.as_ref()));
                    }
                }
                Some(NodeData::Element(element)) if element.is("br") => {
                    spans.push(text_span("\n", style.as_ref()));
                }
                Some(NodeData::Element(element)) if is_inline_text_tag(&element.tag) => {
                    spans.extend(self.inline_spans(child, style.as_ref()));
                }
                Some(NodeData::Element(_)) => {
                    let embedded = self.node(child);
                    spans.push(Call::new("WidgetSpan").child(embedded.widget).build());
                }
                None => {}
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::PropertyMap;
    use crate::synth::synthesize_flat;
    use crate::values::Vocabulary;
    use crate::widget::dart::render_flat;

    fn style(pairs: &[(&str, &str)]) -> ResolvedStyle {
        let props: PropertyMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ResolvedStyle::resolve(&props, &Vocabulary::default())
    }

    // ── Text runs ────────────────────────────────────────────────────

    #[test]
    fn blank_runs_are_skipped() {
        assert!(text_run("  \n  ", &ResolvedStyle::default()).is_none());
    }

    #[test]
    fn plain_run_with_style_and_align() {
        let s = style(&[("font-size", "14px"), ("text-align", "center")]);
        assert_eq!(
            render_flat(&text_run("  Hello ", &s).unwrap()),
            "Text('Hello', style: TextStyle(fontSize: 14), textAlign: TextAlign.center)"
        );
    }

    #[test]
    fn gradient_run() {
        let s = style(&[
            ("background", "linear-gradient(90deg, #000000 0%, #ffffff 100%)"),
            ("background-clip", "text"),
            ("-webkit-text-fill-color", "transparent"),
        ]);
        let rendered = render_flat(&text_run("Hi", &s).unwrap());
        assert!(rendered.starts_with("AppTextGradient(text: 'Hi'"), "{rendered}");
        assert!(rendered.contains("gradient: LinearGradient("), "{rendered}");
    }

    // ── Rich text ────────────────────────────────────────────────────

    #[test]
    fn nested_spans_merge_styles() {
        let out = synthesize_flat(
            r#"<p className="p"><span className="b">Bold</span> tail<br/></p>"#,
            ".p { font-size: 12px; } .b { font-weight: 700; }",
        );
        assert_eq!(
            out,
            "RichText(text: TextSpan(children: [TextSpan(text: 'Bold', style: TextStyle(fontSize: 12, fontWeight: FontWeight.w700)), TextSpan(text: 'tail', style: TextStyle(fontSize: 12)), TextSpan(text: '\\n', style: TextStyle(fontSize: 12))]))"
        );
    }

    #[test]
    fn empty_span_is_a_placeholder() {
        assert_eq!(synthesize_flat("<span></span>", ""), "SizedBox.shrink()");
    }

    #[test]
    fn other_elements_become_widget_spans() {
        let out = synthesize_flat("<p>a<div>b</div></p>", "");
        assert_eq!(
            out,
            "RichText(text: TextSpan(children: [TextSpan(text: 'a'), WidgetSpan(child: Text('b'))]))"
        );
    }
}
