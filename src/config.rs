/// Poster canvas edge length in CSS pixels (the canvas is square).
pub const CANVAS_SIZE: f64 = 720.0;

/// Attribute carrying the registry identifier of a canvas node.
pub const ELEMENT_ID_ATTR: &str = "data-element-id";

/// Prefix of generated element identifiers.
pub const ELEMENT_ID_PREFIX: &str = "element-";

/// Window in which a second press turns a click into inline-edit entry.
pub const DOUBLE_CLICK_WINDOW_MS: u32 = 250;

/// First position used by the add-element commands.
pub const CASCADE_ORIGIN: i32 = 50;
/// Shift applied to every further added element, on both axes.
pub const CASCADE_STEP: i32 = 20;

/// Outward margin of the selection highlight.
pub const OVERLAY_MARGIN: f64 = 2.0;

/// z-index applied to a node while it is being dragged.
pub const DRAG_Z_INDEX: &str = "1000";

/// Tags that carry editable text.
pub const TEXT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "span"];

/// Maximum number of characters shown in the import preview.
pub const PREVIEW_LIMIT: usize = 500;

/// Content type accepted by the import file picker.
pub const HTML_MIME: &str = "text/html";

pub const DEFAULT_TEXT: &str = "New text element";
pub const DEFAULT_FONT_SIZE: &str = "16px";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

pub const DEFAULT_IMAGE_ALT: &str = "New image";
pub const DEFAULT_IMAGE_SIZE: &str = "150px";
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' width='150' height='150'>\
<rect width='150' height='150' fill='%23cccccc'/>\
<text x='75' y='80' font-family='sans-serif' font-size='14' fill='%23666666' text-anchor='middle'>New Image</text>\
</svg>";

pub const FONT_WEIGHTS: &[&str] = &[
    "normal", "bold", "lighter", "100", "200", "300", "400", "500", "600", "700", "800", "900",
];
