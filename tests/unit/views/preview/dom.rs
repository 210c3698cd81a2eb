use super::*;

#[test]
fn test_new_preview_has_markdown_body() {
    let preview = Preview::new();
    assert_eq!(preview.parent(preview.body()), Some(preview.root()));
    assert!(preview.has_class(preview.body(), MARKDOWN_BODY_CLASS));
    assert_eq!(
        preview.to_html(),
        "<div class=\"preview\"><div class=\"markdown-body\"></div></div>"
    );
}

#[test]
fn test_text_nodes_in_document_order() {
    let mut preview = Preview::new();
    let list = preview.append_element(preview.body(), "ul", None);
    let item = preview.append_element(list, "li", None);
    preview.append_text(item, "one");
    preview.push_block("p", "two");

    let texts: Vec<_> = preview
        .text_nodes(preview.body())
        .into_iter()
        .filter_map(|k| preview.text(k))
        .collect();
    assert_eq!(texts, vec!["one", "two"]);
    assert_eq!(preview.elements(preview.body()).len(), 3);
    assert_eq!(preview.text_content(preview.body()), "onetwo");
}

#[test]
fn test_wrap_then_unwrap_restores_text() {
    let mut preview = Preview::new();
    let p = preview.push_block("p", "hello brave world");
    let text = preview.children(p)[0];

    let span = preview.wrap_text_range(text, 6, 11, "span", Some("mark")).unwrap();
    assert_eq!(preview.children(p).len(), 3);
    assert_eq!(preview.text_content(span), "brave");
    assert!(!preview.contains(text));

    preview.unwrap(span);
    preview.normalize(p);
    assert_eq!(preview.children(p).len(), 1);
    assert_eq!(preview.text_content(p), "hello brave world");
}

#[test]
fn test_wrap_at_edges_skips_empty_text() {
    let mut preview = Preview::new();
    let p = preview.push_block("p", "word");
    let text = preview.children(p)[0];
    preview.wrap_text_range(text, 0, 4, "span", None).unwrap();
    assert_eq!(preview.children(p).len(), 1);
}

#[test]
fn test_wrap_rejects_bad_ranges() {
    let mut preview = Preview::new();
    let p = preview.push_block("p", "né");
    let text = preview.children(p)[0];
    assert!(preview.wrap_text_range(text, 1, 1, "span", None).is_none());
    assert!(preview.wrap_text_range(text, 0, 2, "span", None).is_none());
    assert!(preview.wrap_text_range(text, 0, 10, "span", None).is_none());
    assert!(preview.contains(text));
}

#[test]
fn test_remove_drops_subtree() {
    let mut preview = Preview::new();
    let p = preview.push_block("p", "gone");
    let text = preview.children(p)[0];
    preview.remove(p);
    assert!(!preview.contains(p));
    assert!(!preview.contains(text));
    assert!(preview.children(preview.body()).is_empty());

    preview.remove(preview.body());
    assert!(preview.contains(preview.body()));
}

#[test]
fn test_style_and_html_escaping() {
    let mut preview = Preview::new();
    let p = preview.push_block("p", "a < b & c");
    preview.set_style(p, "top", "4px");
    preview.set_style(p, "top", "8px");
    assert_eq!(preview.style(p, "top"), Some("8px"));
    assert!(preview
        .to_html()
        .contains("<p style=\"top: 8px;\">a &lt; b &amp; c</p>"));
}

#[test]
fn test_clear_body() {
    let mut preview = Preview::new();
    preview.push_block("h1", "Title");
    preview.push_block("p", "Body");
    preview.clear_body();
    assert!(preview.elements(preview.body()).is_empty());
}
