use ammonia::Builder;

/// Strip executable and head-only content from untrusted poster HTML.
///
/// Structural tags survive along with `style`, `class` and `id` attributes so
/// the imported layout keeps its look. The output is a body-level fragment.
pub fn sanitize(raw: &str) -> String {
    let mut builder = Builder::default();
    builder
        .add_generic_attributes(&["style", "class", "id"])
        .add_url_schemes(&["data"])
        .add_clean_content_tags(&["title"]);
    builder.clean(raw).to_string()
}
