//! Topic page parser
//!
//! This module turns the HTML of one topic page into entries:
//! - Entry attributes from `ul#entry-item-list > li[data-id]`
//! - Entry body from `div.content`, with `<br>` kept as line breaks
//! - Entry date from `footer a.entry-date`
//! - Page count from `div.pager[data-pagecount]`
//!
//! Parsing is pure: no I/O, no logging, same input gives the same output.

use crate::state::Entry;
use crate::ParseError;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

struct Selectors {
    entry_list: Selector,
    entry_item: Selector,
    content: Selector,
    entry_date: Selector,
    pager: Selector,
    topic_marker: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    entry_list: Selector::parse("ul#entry-item-list").unwrap(),
    entry_item: Selector::parse("li[data-id]").unwrap(),
    content: Selector::parse("div.content").unwrap(),
    entry_date: Selector::parse("footer a.entry-date").unwrap(),
    pager: Selector::parse("div.pager[data-pagecount]").unwrap(),
    topic_marker: Selector::parse("#topic, h1#title").unwrap(),
});

/// Entries and pagination information extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Entries in page order
    pub entries: Vec<Entry>,

    /// Total pages of the topic as advertised by this page, at least 1
    pub page_count: u32,

    /// Entry elements dropped because they had no usable `data-id`
    pub skipped_elements: usize,

    /// Entries whose favorite count was missing or unreadable and defaulted to 0
    pub favorite_fallbacks: usize,
}

/// Parses a topic page
///
/// A page without the entry list is accepted as an empty topic (`page_count`
/// 1) as long as it still carries the topic header; anything else without the
/// list is treated as malformed, which covers anti-bot challenge pages.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_number` - 1-based page the content came from, stamped on every entry
///
/// # Example
///
/// ```
/// use sozluk_ripple::crawler::parse_page;
///
/// let html = r#"<div id="topic"><h1 id="title">test</h1>
///     <ul id="entry-item-list">
///       <li data-id="1" data-author="ssg" data-author-id="9" data-favorite-count="2">
///         <div class="content">hello</div>
///         <footer><a class="entry-date">15.02.1999</a></footer>
///       </li>
///     </ul></div>"#;
/// let parsed = parse_page(html, 1).unwrap();
/// assert_eq!(parsed.entries[0].author, "ssg");
/// assert_eq!(parsed.page_count, 1);
/// ```
pub fn parse_page(html: &str, page_number: u32) -> Result<ParsedPage, ParseError> {
    let document = Html::parse_document(html);
    let selectors = &*SELECTORS;

    // Extract page count
    let page_count = extract_page_count(&document);

    // Find the entry list; a topic header alone means an empty topic
    let list = match document.select(&selectors.entry_list).next() {
        Some(list) => list,
        None => {
            if document.select(&selectors.topic_marker).next().is_some() {
                return Ok(ParsedPage {
                    entries: Vec::new(),
                    page_count: 1,
                    skipped_elements: 0,
                    favorite_fallbacks: 0,
                });
            }
            return Err(ParseError::Malformed(
                "no entry list and no topic header".to_string(),
            ));
        }
    };

    let mut entries = Vec::new();
    let mut skipped_elements = 0;
    let mut favorite_fallbacks = 0;

    for item in list.select(&selectors.entry_item) {
        let attrs = item.value();

        // Extract entry id
        let entry_id = match attrs.attr("data-id").map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                skipped_elements += 1;
                continue;
            }
        };

        // Extract favorite count
        let favorite_count = match attrs
            .attr("data-favorite-count")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
        {
            Some(count) => count,
            None => {
                favorite_fallbacks += 1;
                0
            }
        };

        // Extract content
        let content = item
            .select(&selectors.content)
            .next()
            .map(extract_text)
            .unwrap_or_default();

        // Extract date
        let date = item
            .select(&selectors.entry_date)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        entries.push(Entry {
            entry_id,
            author: attr_or_empty(item, "data-author"),
            author_id: attr_or_empty(item, "data-author-id"),
            favorite_count,
            content,
            date,
            page_number,
        });
    }

    Ok(ParsedPage {
        entries,
        page_count,
        skipped_elements,
        favorite_fallbacks,
    })
}

/// Reads the topic's page count from the pager; 1 when absent or unreadable
fn extract_page_count(document: &Html) -> u32 {
    document
        .select(&SELECTORS.pager)
        .next()
        .and_then(|pager| pager.value().attr("data-pagecount"))
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|count| *count >= 1)
        .unwrap_or(1)
}

fn attr_or_empty(element: ElementRef<'_>, name: &str) -> String {
    element
        .value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Flattens an element to plain text
///
/// Whitespace runs inside text collapse to one space, `<br>` becomes a line
/// break, and every line is trimmed.
fn extract_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => {
                let mut last_was_space = raw.ends_with(' ');
                for c in text.chars() {
                    if c.is_whitespace() {
                        if !last_was_space {
                            raw.push(' ');
                            last_was_space = true;
                        }
                    } else {
                        raw.push(c);
                        last_was_space = false;
                    }
                }
            }
            Node::Element(el) if el.name() == "br" => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
