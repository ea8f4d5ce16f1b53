use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlAnchorElement, HtmlElement};

use crate::config::{CANVAS_SIZE, ELEMENT_ID_ATTR};
use crate::error::{StageError, StageResult};

/// Today's date as `YYYY-MM-DD`, from the browser clock.
pub fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.split('T').next().unwrap_or_default().to_string()
}

pub fn poster_filename(date: &str) -> String {
    format!("html-poster-{date}.html")
}

/// Wrap canvas markup in the standalone poster document.
pub fn poster_document(markup: &str, date: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta data-generated-by="editable-html-poster" />
    <meta name="generator" content="Editable HTML Poster" />
    <meta name="created-date" content="{date}" />
    <title>HTML Poster - {date}</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            background: #f5f5f5;
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
        }}
        .poster {{
            width: {size}px;
            height: {size}px;
            position: relative;
            background: #f3f4f6;
            overflow: hidden;
            font-family: sans-serif;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
        }}
    </style>
</head>
<body>
    <div class="poster">
{markup}
    </div>
</body>
</html>"#,
        size = CANVAS_SIZE,
    )
}

/// Serialize the canvas children without registry bookkeeping.
///
/// Works on a deep clone; the live canvas is left untouched.
pub fn clean_markup(canvas: &HtmlElement) -> StageResult<String> {
    let clone: Element = canvas
        .clone_node_with_deep(true)?
        .dyn_into()
        .map_err(|_| StageError::Dom("canvas clone is not an element".to_string()))?;

    let nodes = clone.query_selector_all(&format!("[{ELEMENT_ID_ATTR}], [contenteditable]"))?;
    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        element.remove_attribute(ELEMENT_ID_ATTR)?;
        element.remove_attribute("contenteditable")?;
        let style = element.style();
        style.remove_property("cursor")?;
        if style.length() == 0 {
            element.remove_attribute("style")?;
        }
    }
    Ok(clone.inner_html())
}

/// Offer `content` to the user as an HTML file download.
pub fn download(filename: &str, content: &str) -> StageResult<()> {
    let document = gloo_utils::document();

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(content));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/html");

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| StageError::Dom("failed to create download link".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document.body().ok_or(StageError::Dom("document has no body".to_string()))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    web_sys::Url::revoke_object_url(&url)?;
    log::info!("exported {filename} ({} bytes)", content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_carries_date() {
        assert_eq!(poster_filename("2024-06-01"), "html-poster-2024-06-01.html");
    }

    #[test]
    fn test_document_embeds_markup_in_poster() {
        let markup = r#"<h1 style="position: absolute; left: 70px; top: 70px;">Summer Sale</h1>"#;
        let doc = poster_document(markup, "2024-06-01");

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.trim_end().ends_with("</html>"));
        assert!(doc.contains(r#"<meta name="generator" content="Editable HTML Poster" />"#));
        assert!(doc.contains(r#"<meta name="created-date" content="2024-06-01" />"#));
        assert!(doc.contains("<title>HTML Poster - 2024-06-01</title>"));
        assert!(doc.contains("width: 720px;"));
        assert!(doc.contains("height: 720px;"));
        assert!(doc.contains(&format!("<div class=\"poster\">\n{markup}\n    </div>")));
        assert!(!doc.contains(ELEMENT_ID_ATTR));
    }

    #[test]
    fn test_document_braces_are_literal_css() {
        let doc = poster_document("", "2024-06-01");
        assert!(doc.contains("body {\n"));
        assert!(doc.contains(".poster {\n"));
        assert!(!doc.contains("{{"));
    }
}
