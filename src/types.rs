use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ELEMENT_ID_PREFIX, TEXT_TAGS};
use crate::utils::{parse_px, px};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Grow the box by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// Integer canvas coordinates of an element, mirroring `style.left`/`style.top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Registry identifier of a canvas node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{ELEMENT_ID_PREFIX}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinds of element the toolbar can add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Image,
}

impl ElementKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            ElementKind::Text => "p",
            ElementKind::Image => "img",
        }
    }
}

pub fn is_text_tag(tag_name: &str) -> bool {
    TEXT_TAGS.contains(&tag_name)
}

pub fn is_image_tag(tag_name: &str) -> bool {
    tag_name == "img"
}

/// The visual properties tracked on every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProperty {
    Position,
    Left,
    Top,
    Width,
    Height,
    FontSize,
    Color,
    FontWeight,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 8] = [
        StyleProperty::Position,
        StyleProperty::Left,
        StyleProperty::Top,
        StyleProperty::Width,
        StyleProperty::Height,
        StyleProperty::FontSize,
        StyleProperty::Color,
        StyleProperty::FontWeight,
    ];

    /// CSS property name as used by `CSSStyleDeclaration`.
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::Position => "position",
            StyleProperty::Left => "left",
            StyleProperty::Top => "top",
            StyleProperty::Width => "width",
            StyleProperty::Height => "height",
            StyleProperty::FontSize => "font-size",
            StyleProperty::Color => "color",
            StyleProperty::FontWeight => "font-weight",
        }
    }
}

/// Sparse set of the tracked style properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl ElementStyle {
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.slot(property).as_deref()
    }

    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) {
        *self.slot_mut(property) = Some(value.into());
    }

    /// Present properties in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (StyleProperty, &str)> + '_ {
        StyleProperty::ALL
            .into_iter()
            .filter_map(move |property| self.get(property).map(|value| (property, value)))
    }

    /// Overwrite properties present in `other`, keeping the rest.
    pub fn merge(&mut self, other: &ElementStyle) {
        for (property, value) in other.entries() {
            self.set(property, value);
        }
    }

    fn slot(&self, property: StyleProperty) -> &Option<String> {
        match property {
            StyleProperty::Position => &self.position,
            StyleProperty::Left => &self.left,
            StyleProperty::Top => &self.top,
            StyleProperty::Width => &self.width,
            StyleProperty::Height => &self.height,
            StyleProperty::FontSize => &self.font_size,
            StyleProperty::Color => &self.color,
            StyleProperty::FontWeight => &self.font_weight,
        }
    }

    fn slot_mut(&mut self, property: StyleProperty) -> &mut Option<String> {
        match property {
            StyleProperty::Position => &mut self.position,
            StyleProperty::Left => &mut self.left,
            StyleProperty::Top => &mut self.top,
            StyleProperty::Width => &mut self.width,
            StyleProperty::Height => &mut self.height,
            StyleProperty::FontSize => &mut self.font_size,
            StyleProperty::Color => &mut self.color,
            StyleProperty::FontWeight => &mut self.font_weight,
        }
    }
}

/// Snapshot of one canvas node. Always re-derived from the live node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub id: ElementId,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ElementData {
    pub fn new(id: ElementId, tag_name: impl Into<String>) -> Self {
        Self {
            id,
            tag_name: tag_name.into().to_lowercase(),
            content: None,
            src: None,
            alt: None,
            style: ElementStyle::default(),
            position: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_tag(&self.tag_name)
    }

    /// Move the element, writing `style.left/top` and `position` together.
    pub fn set_position(&mut self, position: Position) {
        self.style.left = Some(px(position.x));
        self.style.top = Some(px(position.y));
        self.position = Some(position);
    }

    /// Re-derive `position` from `style.left/top`.
    ///
    /// Clears `position` when either side is missing or not a number, so the
    /// mirror can never disagree with the style it shadows.
    pub fn sync_position(&mut self) {
        let left = self.style.left.as_deref().and_then(parse_px);
        let top = self.style.top.as_deref().and_then(parse_px);
        self.position = match (left, top) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        };
    }

    /// Whether `position` agrees with `style.left/top`.
    pub fn position_in_sync(&self) -> bool {
        let left = self.style.left.as_deref().map(parse_px);
        let top = self.style.top.as_deref().map(parse_px);
        match (left, top, self.position) {
            (Some(Some(x)), Some(Some(y)), Some(position)) => position == Position::new(x, y),
            (Some(Some(_)), Some(Some(_)), None) => false,
            _ => true,
        }
    }
}
