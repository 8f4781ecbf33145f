use scraper::{ElementRef, Html, Node};

/// Elements whose contents never render as page text.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Page chrome skipped when boilerplate stripping is on.
const BOILERPLATE_ELEMENTS: &[&str] = &["nav", "header", "footer"];

/// Extract whitespace-normalized visible text from raw HTML.
pub fn extract_visible_text(html: &str, strip_boilerplate: bool) -> String {
    let document = Html::parse_document(html);
    visible_text(&document, strip_boilerplate)
}

pub fn visible_text(document: &Html, strip_boilerplate: bool) -> String {
    let mut buffer = String::new();
    collect_text(document.root_element(), strip_boilerplate, &mut buffer);
    normalize_whitespace(&buffer)
}

fn collect_text(element: ElementRef<'_>, strip_boilerplate: bool, buffer: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                buffer.push_str(text);
                buffer.push(' ');
            }
            Node::Element(child_element) => {
                let name = child_element.name();
                if HIDDEN_ELEMENTS.contains(&name)
                    || (strip_boilerplate && BOILERPLATE_ELEMENTS.contains(&name))
                {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, strip_boilerplate, buffer);
                }
            }
            _ => {}
        }
    }
}

/// Collapse every whitespace run into a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sentence count used for readability, split on `.`, `!` and `?` runs.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|sentence| sentence.chars().any(char::is_alphanumeric))
        .count()
}
