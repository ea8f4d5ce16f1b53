use crate::types::Point;
use web_sys::{HtmlElement, MouseEvent};

/// Integer prefix of a CSS length, with `parseInt` semantics.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first
/// non-digit. Returns `None` when there are no leading digits.
pub fn parse_px(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i32 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub fn px(value: i32) -> String {
    format!("{value}px")
}

/// Pixel string for a measured (possibly fractional) length.
pub fn px_f64(value: f64) -> String {
    format!("{value}px")
}

pub fn client_point(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f64, event.client_y() as f64)
}

/// Offset of `element`'s border box from `canvas`'s padding box.
pub fn offset_within(element: &HtmlElement, canvas: &HtmlElement) -> Point {
    let rect = element.get_bounding_client_rect();
    let canvas_rect = canvas.get_bounding_client_rect();
    Point::new(
        rect.left() - canvas_rect.left() - canvas.client_left() as f64,
        rect.top() - canvas_rect.top() - canvas.client_top() as f64,
    )
}

/// Normalise a CSS colour to `#rrggbb` for `<input type="color">`.
pub fn color_to_hex(color: &str) -> Option<String> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return match hex.len() {
            6 if hex.chars().all(|c| c.is_ascii_hexdigit()) => Some(format!("#{}", hex.to_lowercase())),
            3 if hex.chars().all(|c| c.is_ascii_hexdigit()) => Some(
                hex.chars()
                    .flat_map(|c| [c, c])
                    .fold(String::from("#"), |mut out, c| {
                        out.push(c.to_ascii_lowercase());
                        out
                    }),
            ),
            _ => None,
        };
    }

    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let channels: Vec<u8> = inner
        .split(',')
        .take(3)
        .filter_map(|c| c.trim().parse::<f64>().ok())
        .map(|c| c.clamp(0.0, 255.0).round() as u8)
        .collect();
    if channels.len() != 3 {
        return None;
    }
    Some(format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2]))
}

/// First `limit` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
