use scraper::Html;

/// Concatenates the text nodes of an HTML fragment, dropping all markup.
/// Runs of whitespace collapse to a single space.
pub fn strip_html(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text: String = document.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
