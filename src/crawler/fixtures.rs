//! HTML builders shared by crawler tests

/// Renders one entry element in the site's markup
pub fn entry_item(id: &str, author: &str, favorites: &str) -> String {
    format!(
        r#"<li data-id="{id}" data-author="{author}" data-author-id="{author}-id" data-favorite-count="{favorites}">
             <div class="content">entry {id}</div>
             <footer><div class="info"><a class="entry-date permalink" href="/entry/{id}">15.02.1999 10:00</a></div></footer>
           </li>"#
    )
}

/// Renders a topic page; `page_count` 0 leaves the pager out
pub fn topic_page(items: &[String], page_count: u32) -> String {
    let pager = if page_count > 0 {
        format!(r#"<div class="pager" data-currentpage="1" data-pagecount="{page_count}"></div>"#)
    } else {
        String::new()
    };

    format!(
        r#"<html><body><div id="topic"><h1 id="title" data-title="test">test</h1>{pager}
           <ul id="entry-item-list">{}</ul></div></body></html>"#,
        items.concat()
    )
}

/// Renders a page of `count` entries with ids `first_id..first_id + count`
pub fn numbered_page(first_id: u32, count: u32, page_count: u32) -> String {
    let items: Vec<String> = (first_id..first_id + count)
        .map(|id| entry_item(&id.to_string(), &format!("author{}", id % 4), "1"))
        .collect();
    topic_page(&items, page_count)
}
