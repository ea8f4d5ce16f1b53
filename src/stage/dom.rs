use web_sys::HtmlElement;

use crate::error::StageResult;
use crate::stage::projection::ElementHandle;
use crate::types::{BoundingBox, Point};
use crate::utils::offset_within;

/// A live canvas node, measured against its canvas.
pub struct DomNode<'a> {
    element: &'a HtmlElement,
    canvas: &'a HtmlElement,
}

impl<'a> DomNode<'a> {
    pub fn new(element: &'a HtmlElement, canvas: &'a HtmlElement) -> Self {
        Self { element, canvas }
    }
}

impl ElementHandle for DomNode<'_> {
    fn tag_name(&self) -> String {
        self.element.tag_name().to_lowercase()
    }

    fn text_content(&self) -> Option<String> {
        self.element.text_content()
    }

    fn set_text_content(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> StageResult<()> {
        self.element.set_attribute(name, value)?;
        Ok(())
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        self.element
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn computed_style(&self, property: &str) -> Option<String> {
        gloo_utils::window()
            .get_computed_style(self.element)
            .ok()
            .flatten()?
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_inline_style(&self, property: &str, value: &str) -> StageResult<()> {
        self.element.style().set_property(property, value)?;
        Ok(())
    }

    fn frame(&self) -> BoundingBox {
        let offset = offset_within(self.element, self.canvas);
        let rect = self.element.get_bounding_client_rect();
        BoundingBox::new(offset.x, offset.y, rect.width(), rect.height())
    }

    fn offset(&self) -> Point {
        Point::new(
            self.element.offset_left() as f64,
            self.element.offset_top() as f64,
        )
    }
}
