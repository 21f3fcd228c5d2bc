//! HTML text extraction
//!
//! Parses a fetched document and reports the text of every element that
//! matches the configured selector.

use crate::HarvestError;
use scraper::{Html, Selector};

/// Compiles a CSS selector, mapping parse failures into a crate error
pub fn compile_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Calls `on_fragment` once per matching element, in document order
///
/// The element's descendant text is concatenated and trimmed; elements whose
/// text is blank are skipped.
///
/// # Returns
///
/// The number of times `on_fragment` was called
///
/// # Example
///
/// ```
/// use wiki_reader::crawler::{compile_selector, extract_fragments};
///
/// let selector = compile_selector("p").unwrap();
/// let mut seen = Vec::new();
/// let count = extract_fragments(
///     "<p>Hello</p><div>skip</div><p> world </p>",
///     &selector,
///     |text| seen.push(text.to_string()),
/// );
/// assert_eq!(count, 2);
/// assert_eq!(seen, vec!["Hello", "world"]);
/// ```
pub fn extract_fragments<F>(html: &str, selector: &Selector, mut on_fragment: F) -> usize
where
    F: FnMut(&str),
{
    let document = Html::parse_document(html);
    let mut count = 0;

    for element in document.select(selector) {
        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        on_fragment(text);
        count += 1;
    }

    count
}
