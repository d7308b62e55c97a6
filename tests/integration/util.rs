use trellis::widgets::PixmapArea;
use trellis::{Align, FixedFont, RenderCtx, Size, WidgetId, WidgetTree};

/// A render context with the fixed test font and a chosen padding unit.
pub fn ctx_with_padd(padd: u32) -> RenderCtx {
    RenderCtx::new(
        Box::new(FixedFont::default()),
        Box::new(FixedFont::bold()),
        padd,
    )
}

/// A filling placeholder child with a fixed minimal size.
pub fn fill_box(tree: &mut WidgetTree, w: u32, h: u32) -> WidgetId {
    let id = PixmapArea::new(tree, Size::new(w, h));
    tree.set_align(id, Align::FILL);
    id
}

/// Every widget reachable from `root`, depth first, root included.
pub fn subtree(tree: &WidgetTree, root: WidgetId) -> Vec<WidgetId> {
    let mut ids = vec![root];
    let mut next = 0;

    while next < ids.len() {
        if let Some(widget) = tree.get(ids[next]) {
            ids.extend(widget.payload.children());
        }
        next += 1;
    }

    ids
}

/// Widgets below `root` carrying the focus flag. Correct focus handling
/// keeps this at one entry at most.
pub fn selected_widgets(tree: &WidgetTree, root: WidgetId) -> Vec<WidgetId> {
    subtree(tree, root)
        .into_iter()
        .filter(|id| tree.get(*id).is_some_and(|w| w.is_selected()))
        .collect()
}
