//! Read and write projections between a live canvas node and [`ElementData`].

use crate::config::ELEMENT_ID_ATTR;
use crate::error::StageResult;
use crate::types::{is_text_tag, BoundingBox, ElementData, ElementId, Point, Position, StyleProperty};
use crate::utils::{parse_px, px, px_f64};

/// The parts of a live node the projections need.
pub trait ElementHandle {
    /// Lower-case tag name.
    fn tag_name(&self) -> String;
    fn text_content(&self) -> Option<String>;
    fn set_text_content(&self, text: &str);
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> StageResult<()>;
    /// Inline style value, `None` when unset.
    fn inline_style(&self, property: &str) -> Option<String>;
    /// Resolved style value, `None` when unavailable.
    fn computed_style(&self, property: &str) -> Option<String>;
    fn set_inline_style(&self, property: &str, value: &str) -> StageResult<()>;
    /// Border box relative to the canvas origin.
    fn frame(&self) -> BoundingBox;
    /// Border box origin relative to the offset parent, the space CSS
    /// `left`/`top` are measured in.
    fn offset(&self) -> Point;
}

/// Build the snapshot of `node`.
///
/// Inline values win over resolved ones. `left`/`top` fall back to the
/// on-canvas frame whenever the inline value has no integer prefix, and
/// `position` is always derived from the chosen `left`/`top`.
pub fn read_snapshot<N: ElementHandle + ?Sized>(node: &N, id: &ElementId) -> ElementData {
    let mut data = ElementData::new(id.clone(), node.tag_name());
    // a cleared text node still reports its (empty) text
    data.content = node
        .text_content()
        .filter(|text| is_text_tag(&data.tag_name) || !text.is_empty());
    if data.is_image() {
        data.src = node.attribute("src");
        data.alt = node.attribute("alt");
    }

    let frame = node.frame();
    for property in StyleProperty::ALL {
        let css = property.css_name();
        let value = match property {
            StyleProperty::Left | StyleProperty::Top => continue,
            StyleProperty::Width => node.inline_style(css).or_else(|| Some(px_f64(frame.width))),
            StyleProperty::Height => node.inline_style(css).or_else(|| Some(px_f64(frame.height))),
            _ => node.inline_style(css).or_else(|| node.computed_style(css)),
        };
        if let Some(value) = value {
            data.style.set(property, value);
        }
    }

    let (left, x) = axis(node.inline_style("left"), frame.x);
    let (top, y) = axis(node.inline_style("top"), frame.y);
    data.style.left = Some(left);
    data.style.top = Some(top);
    data.position = Some(Position::new(x, y));
    data
}

/// Where a drag of `node` starts: its left/top in the offset parent's space,
/// and the canvas position of that space's origin.
pub fn drag_start<N: ElementHandle + ?Sized>(node: &N) -> (Position, Position) {
    let frame = node.frame();
    let offset = node.offset();
    let start = |inline: Option<String>, measured: f64| {
        inline
            .as_deref()
            .and_then(parse_px)
            .unwrap_or_else(|| measured.round() as i32)
    };
    let initial = Position::new(
        start(node.inline_style("left"), offset.x),
        start(node.inline_style("top"), offset.y),
    );
    let anchor = Position::new(
        (frame.x - offset.x).round() as i32,
        (frame.y - offset.y).round() as i32,
    );
    (initial, anchor)
}

fn axis(inline: Option<String>, fallback: f64) -> (String, i32) {
    match inline.as_deref().and_then(parse_px) {
        Some(value) => (inline.unwrap_or_default(), value),
        None => {
            let value = fallback.round() as i32;
            (px(value), value)
        }
    }
}

/// Write the fields of `proposed` that differ from what `node` currently
/// projects to. Absent fields are left alone.
pub fn apply_update<N: ElementHandle + ?Sized>(node: &N, proposed: &ElementData) -> StageResult<()> {
    let current = read_snapshot(node, &proposed.id);

    if let Some(content) = &proposed.content {
        if current.content.as_deref().unwrap_or_default() != content {
            node.set_text_content(content);
        }
    }

    if current.is_image() {
        if let Some(src) = proposed.src.as_deref().filter(|src| !src.is_empty()) {
            node.set_attribute("src", src)?;
        }
        if let Some(alt) = proposed.alt.as_deref().filter(|alt| !alt.is_empty()) {
            node.set_attribute("alt", alt)?;
        }
    }

    for (property, value) in proposed.style.entries() {
        if current.style.get(property) != Some(value) {
            node.set_inline_style(property.css_name(), value)?;
        }
    }

    for (name, value) in &proposed.attributes {
        if name != ELEMENT_ID_ATTR {
            node.set_attribute(name, value)?;
        }
    }
    Ok(())
}
