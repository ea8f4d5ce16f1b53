use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::StageResult;
use crate::stage::projection::ElementHandle;
use crate::types::{BoundingBox, Point};

/// In-memory stand-in for a canvas node.
#[derive(Debug, Default)]
pub struct FakeElement {
    tag: String,
    text: RefCell<Option<String>>,
    attributes: RefCell<HashMap<String, String>>,
    inline: RefCell<HashMap<String, String>>,
    computed: HashMap<String, String>,
    frame: BoundingBox,
    offset: Option<Point>,
    text_writes: Cell<usize>,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.text.replace(Some(text.to_string()));
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_inline(self, property: &str, value: &str) -> Self {
        self.inline
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        self
    }

    pub fn with_computed(mut self, property: &str, value: &str) -> Self {
        self.computed.insert(property.to_string(), value.to_string());
        self
    }

    pub fn with_frame(mut self, frame: BoundingBox) -> Self {
        self.frame = frame;
        self
    }

    /// Defaults to the frame origin, as for a direct canvas child.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn inline(&self, property: &str) -> Option<String> {
        self.inline.borrow().get(property).cloned()
    }

    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }
}

impl ElementHandle for FakeElement {
    fn tag_name(&self) -> String {
        self.tag.to_lowercase()
    }

    fn text_content(&self) -> Option<String> {
        Some(self.text.borrow().clone().unwrap_or_default())
    }

    fn set_text_content(&self, text: &str) {
        self.text_writes.set(self.text_writes.get() + 1);
        self.text.replace(Some(text.to_string()));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> StageResult<()> {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        self.inline(property).filter(|value| !value.is_empty())
    }

    fn computed_style(&self, property: &str) -> Option<String> {
        // inline values resolve first, as in a browser
        self.inline_style(property)
            .or_else(|| self.computed.get(property).cloned())
    }

    fn set_inline_style(&self, property: &str, value: &str) -> StageResult<()> {
        self.inline
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn frame(&self) -> BoundingBox {
        self.frame
    }

    fn offset(&self) -> Point {
        self.offset
            .unwrap_or_else(|| Point::new(self.frame.x, self.frame.y))
    }
}
