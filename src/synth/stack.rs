//! Absolute children: stack base selection and positioned wrappers.

use tracing::debug;

use super::descriptor::Descriptor;
use super::media::simplify_svg;
use crate::config::Thresholds;
use crate::geometry::{Edges, Extent, Size};
use crate::widget::{Call, Expr};

/// Extent spanned by absolutely placed children: the furthest start offset
/// plus size on each axis. A non-positive extent is unknown.
pub fn estimate_stack_size(absolute: &[Descriptor]) -> Size {
    let mut right = 0.0_f64;
    let mut bottom = 0.0_f64;
    for kid in absolute {
        let edges = kid.placement.unwrap_or_default();
        right = right.max(edges.horizontal_start() + kid.size.width.unwrap_or(0.0));
        bottom = bottom.max(edges.vertical_start() + kid.size.height.unwrap_or(0.0));
    }
    Size::new((right > 0.0).then_some(right), (bottom > 0.0).then_some(bottom))
}

/// Layer absolute children over a base.
///
/// The base is the flow body when there is one, else the first top-left
/// anchored child that is not icon-sized, else an invisible box sized to
/// the children's estimated extent. `absolute` must already be ordered by
/// z-index.
pub fn compose_stack(
    flow_body: Option<Expr>,
    absolute: Vec<Descriptor>,
    is_root: bool,
    thresholds: &Thresholds,
) -> Expr {
    let mut children = Vec::with_capacity(absolute.len() + 1);
    let mut base_index = None;
    match flow_body {
        Some(body) => children.push(body),
        None => {
            base_index = absolute.iter().position(|kid| {
                kid.placement.is_some_and(|p| p.is_top_left_anchored())
                    && !thresholds.is_icon_sized(kid.size)
            });
            match base_index {
                Some(i) => children.push(absolute[i].widget.clone()),
                None => {
                    if let Some(spacer) = extent_box(&absolute, is_root, thresholds) {
                        children.push(spacer);
                    }
                }
            }
        }
    }

    for (i, kid) in absolute.into_iter().enumerate() {
        if Some(i) == base_index {
            continue;
        }
        if thresholds.is_icon_sized(kid.size) {
            if let Some(icon) = simplify_svg(&kid.widget, kid.size) {
                children.push(icon);
                continue;
            }
        }
        children.push(positioned(kid.placement.unwrap_or_default(), kid.widget));
    }

    Call::new("Stack")
        .named("clipBehavior", Expr::ident("Clip.none"))
        .children(children)
        .build()
}

/// Invisible sizing box for a stack with no base. The root's height is left
/// out because the root scrolls.
fn extent_box(absolute: &[Descriptor], is_root: bool, thresholds: &Thresholds) -> Option<Expr> {
    let mut estimate = thresholds.normalize(estimate_stack_size(absolute));
    if is_root {
        estimate = estimate.without_height();
    }
    if estimate.is_unknown() {
        return None;
    }
    debug!(width = ?estimate.width, height = ?estimate.height, "stack sized from absolute children");
    Some(
        Call::new("SizedBox")
            .named_opt("width", estimate.width.map(|w| Expr::Extent(Extent::Fixed(w))))
            .named_opt("height", estimate.height)
            .build(),
    )
}

/// `Positioned` using only the declared edges.
fn positioned(edges: Edges, child: Expr) -> Expr {
    if edges.is_empty() {
        return child;
    }
    Call::new("Positioned")
        .named_opt("top", edges.top)
        .named_opt("left", edges.left)
        .named_opt("right", edges.right)
        .named_opt("bottom", edges.bottom)
        .child(child)
        .build()
}
