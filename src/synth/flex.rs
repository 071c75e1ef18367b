//! Flow composition: rows, columns, gaps and weighted expansion.

use super::descriptor::Descriptor;
use crate::geometry::Size;
use crate::values::{Axis, CrossAlign, FlexConfig};
use crate::widget::{Call, Expr};

/// Whether a flex container's main axis has a determinate extent, which is
/// what `Expanded` children need. The document root always counts.
pub fn main_axis_determinate(axis: Axis, size: Size, stretches: bool, is_root: bool) -> bool {
    if is_root {
        return true;
    }
    match axis {
        Axis::Row => size.width.is_some() || stretches,
        Axis::Column => size.height.is_some(),
    }
}

/// Compose flow children into a single body widget.
///
/// With a flex configuration this is a `Row` or `Column`. Without one, a
/// lone child passes through (unless absolute siblings need a stack base)
/// and anything else stacks in a start-aligned `Column`.
pub fn compose_flow(
    flex: Option<&FlexConfig>,
    kids: Vec<Descriptor>,
    has_absolute: bool,
    determinate: bool,
) -> Option<Expr> {
    if kids.is_empty() {
        return None;
    }
    if let Some(config) = flex {
        return Some(flex_box(config, kids, determinate));
    }
    if kids.len() == 1 && !has_absolute {
        return kids.into_iter().next().map(|kid| kid.widget);
    }
    Some(
        Call::new("Column")
            .named("crossAxisAlignment", CrossAlign::Start.to_expr())
            .children(kids.into_iter().map(|kid| kid.widget).collect())
            .build(),
    )
}

fn flex_box(config: &FlexConfig, kids: Vec<Descriptor>, determinate: bool) -> Expr {
    let mut children = Vec::with_capacity(kids.len() * 2);
    for (i, kid) in kids.into_iter().enumerate() {
        if i > 0 {
            if let Some(gap) = config.gap {
                children.push(gap_box(config.axis, gap));
            }
        }
        if determinate && kid.flex_grow > 0.0 {
            children.push(expanded(kid.flex_grow, kid.widget));
        } else {
            children.push(kid.widget);
        }
    }
    match config.axis {
        Axis::Row => Call::new("Row")
            .named("mainAxisAlignment", config.main.to_expr())
            .named("crossAxisAlignment", config.cross.to_expr())
            .children(children)
            .build(),
        Axis::Column => Call::new("Column")
            .named("crossAxisAlignment", config.cross.to_expr())
            .named("mainAxisAlignment", config.main.to_expr())
            .children(children)
            .build(),
    }
}

fn gap_box(axis: Axis, gap: f64) -> Expr {
    let dimension = match axis {
        Axis::Row => "width",
        Axis::Column => "height",
    };
    Call::new("SizedBox").named(dimension, gap).build()
}

fn expanded(grow: f64, child: Expr) -> Expr {
    Call::new("Expanded")
        .named("flex", grow.round().max(1.0))
        .child(child)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::MainAlign;
    use crate::widget::call0;
    use crate::widget::dart::render_flat;

    fn kid(name: &str, grow: f64) -> Descriptor {
        Descriptor {
            flex_grow: grow,
            ..Descriptor::flow(call0(name))
        }
    }

    fn row(gap: Option<f64>) -> FlexConfig {
        FlexConfig {
            axis: Axis::Row,
            main: MainAlign::SpaceBetween,
            cross: CrossAlign::Center,
            gap,
        }
    }

    #[test]
    fn determinate_main_axis() {
        let sized = Size::new(Some(100.0), None);
        assert!(main_axis_determinate(Axis::Row, sized, false, false));
        assert!(!main_axis_determinate(Axis::Column, sized, false, false));
        assert!(main_axis_determinate(Axis::Row, Size::UNKNOWN, true, false));
        assert!(main_axis_determinate(Axis::Column, Size::UNKNOWN, false, true));
    }

    #[test]
    fn row_with_gap_and_expansion() {
        let body = compose_flow(Some(&row(Some(8.0))), vec![kid("A", 0.0), kid("B", 0.4)], false, true);
        assert_eq!(
            render_flat(&body.unwrap()),
            "Row(mainAxisAlignment: MainAxisAlignment.spaceBetween, crossAxisAlignment: CrossAxisAlignment.center, children: [A(), SizedBox(width: 8), Expanded(flex: 1, child: B())])"
        );
    }

    #[test]
    fn indeterminate_axis_skips_expansion() {
        let body = compose_flow(Some(&row(None)), vec![kid("A", 2.0)], false, false);
        assert_eq!(
            render_flat(&body.unwrap()),
            "Row(mainAxisAlignment: MainAxisAlignment.spaceBetween, crossAxisAlignment: CrossAxisAlignment.center, children: [A()])"
        );
    }

    #[test]
    fn column_puts_cross_axis_first() {
        let config = FlexConfig {
            axis: Axis::Column,
            main: MainAlign::Start,
            cross: CrossAlign::Stretch,
            gap: Some(4.0),
        };
        let body = compose_flow(Some(&config), vec![kid("A", 0.0), kid("B", 3.0)], false, true);
        assert_eq!(
            render_flat(&body.unwrap()),
            "Column(crossAxisAlignment: CrossAxisAlignment.stretch, mainAxisAlignment: MainAxisAlignment.start, children: [A(), SizedBox(height: 4), Expanded(flex: 3, child: B())])"
        );
    }

    #[test]
    fn without_flex() {
        assert_eq!(compose_flow(None, vec![], false, false), None);
        assert_eq!(compose_flow(None, vec![kid("A", 0.0)], false, false), Some(call0("A")));
        let column = compose_flow(None, vec![kid("A", 0.0)], true, false).unwrap();
        assert_eq!(
            render_flat(&column),
            "Column(crossAxisAlignment: CrossAxisAlignment.start, children: [A()])"
        );
    }
}
