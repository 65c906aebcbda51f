
use data::{body, doc, first, SELECTOR_PAGE, TAG_PAGE};
use html_dom::{Document, Matcher};

#[test]
fn test_select_counts() {
    let doc = doc(SELECTOR_PAGE);
    let cases = [
        ("p", 7),
        ("h1", 1),
        ("div", 2),
        ("span", 2),
        ("#heading", 1),
        ("#paragraph", 1),
        ("#unknown-id", 0),
        (".class-a", 6),
        (".class-b", 4),
        (".class-c", 3),
        (".class-a.class-b", 2),
        (".class-a.class-c", 2),
        (".class-b.class-c", 1),
        (".class-a.class-b.class-c", 1),
        (".class-a.class-b.class-d", 0),
        (".class-a, .class-b", 8),
        (".class-a, .class-c", 7),
        (".class-b, .class-c", 6),
        (".class-a, .class-b, .class-c", 9),
        (".class-a, .class-b, .class-c, .class-d", 9),
    ];

    for (selector, count) in cases.iter() {
        assert_eq!(body(&doc).select(selector).length(), *count, "{}", selector);
    }
}

#[test]
fn test_query_selector_first_match() {
    let doc = doc(SELECTOR_PAGE);
    let cases = [
        ("p", Some("p")),
        ("h1", Some("h1")),
        ("div", Some("div")),
        ("span", Some("span")),
        ("#heading", Some("h1")),
        ("#paragraph", Some("p")),
        ("#unknown-id", None),
        (".class-a", Some("p")),
        (".class-c", Some("span")),
        (".class-b.class-c", Some("p")),
        (".class-a.class-b.class-d", None),
        (".class-b, .class-c", Some("p")),
        (".class-c, .class-d", Some("span")),
    ];

    for (selector, tag) in cases.iter() {
        let found = body(&doc).query_selector(selector);
        assert_eq!(
            found.and_then(|n| n.tag_name()).as_deref(),
            *tag,
            "{}",
            selector
        );
    }
}

#[test]
fn test_query_selector_document_order() {
    let doc = doc(SELECTOR_PAGE);
    let found = doc.query_selector(".class-c, #heading").unwrap();
    assert_eq!(found.id_attr(), "heading");
}

#[test]
fn test_class_order_is_irrelevant() {
    let doc = doc(SELECTOR_PAGE);
    let ab = doc.select(".class-a.class-b");
    let ba = doc.select(".class-b.class-a");
    assert_eq!(ab.nodes(), ba.nodes());
}

#[test]
fn test_repeated_group_is_deduplicated() {
    let doc = doc(SELECTOR_PAGE);
    assert_eq!(doc.select("p, p").nodes(), doc.select("p").nodes());

    let union = doc.select(".class-a, p");
    let a = doc.select(".class-a").length();
    let p = doc.select("p").length();
    assert!(union.length() < a + p);
    assert_eq!(union.length(), 9);
}

#[test]
fn test_select_keeps_document_order() {
    let doc = doc(SELECTOR_PAGE);
    let tags: Vec<String> = doc
        .select("span, h1")
        .iter()
        .filter_map(|n| n.tag_name())
        .map(|t| t.to_string())
        .collect();
    assert_eq!(tags, vec!["h1", "span", "span"]);
}

#[test]
fn test_select_excludes_root() {
    let doc = doc("<div class=\"x\"><div class=\"x\"></div></div>");
    let outer = first(&doc);
    assert_eq!(outer.select(".x").length(), 1);
    assert_eq!(doc.select(".x").length(), 2);
}

#[test]
fn test_malformed_group_matches_nothing() {
    let doc = doc(SELECTOR_PAGE);
    assert_eq!(doc.select("p > span").length(), 0);
    assert_eq!(doc.select("h1, p:first-child").length(), 1);
    assert_eq!(doc.select("").length(), 0);
    assert!(doc.query_selector("[id]").is_none());
}

#[test]
fn test_strict_matcher() {
    let doc = doc(SELECTOR_PAGE);
    assert!(Matcher::new("h1, p:first-child").is_err());

    let matcher = Matcher::new("span.class-a, h1").unwrap();
    assert_eq!(doc.select_with_matcher(&matcher).length(), 2);
}

#[test]
fn test_tag_selector_ignores_case() {
    let doc = doc(SELECTOR_PAGE);
    assert_eq!(doc.select("SPAN").length(), 2);
    assert_eq!(doc.get_elements_by_tag_name("H1").length(), 1);
}

#[test]
fn test_get_element_by_id() {
    let doc = doc(
        r#"<div>
        <h1 id="heading"></h1>
        <p id="paragraph"></p>
        <p id="paragraph"></p>
        <p></p>
    </div>"#,
    );

    let found = |id: &str| doc.get_element_by_id(id).and_then(|n| n.tag_name());
    assert_eq!(found("heading").as_deref(), Some("h1"));
    assert_eq!(found("paragraph").as_deref(), Some("p"));
    assert_eq!(found("unknown-id"), None);
    assert_eq!(found(""), None);

    let paragraphs = doc.select("#paragraph");
    assert_eq!(doc.get_element_by_id("paragraph"), paragraphs.first());
}

#[test]
fn test_get_elements_by_class_name() {
    let doc = doc(
        r#"<div>
        <p class="class-a"></p>
        <p class="class-a"></p>
        <p class="class-a"></p>
        <p class="class-b"></p>
        <p class="class-b"></p>
        <p class="class-c"></p>
        <p class="class-a class-b"></p>
        <p class="class-a class-c"></p>
        <p class="class-a class-b class-c"></p>
    </div>"#,
    );

    let cases = [
        ("", 0),
        ("   ", 0),
        ("class-a", 6),
        ("class-b", 4),
        ("class-c", 3),
        ("class-a class-b", 2),
        ("class-b  class-a", 2),
        ("class-a class-c", 2),
        ("class-b class-c", 1),
        ("class-a class-b class-c", 1),
    ];

    for (names, count) in cases.iter() {
        assert_eq!(
            doc.get_elements_by_class_name(names).length(),
            *count,
            "{:?}",
            names
        );
    }
}

#[test]
fn test_get_elements_by_tag_name() {
    let doc = doc(TAG_PAGE);
    let main = first(&doc);
    let cases = [
        ("h1", 1),
        ("h2", 2),
        ("h3", 3),
        ("p", 6),
        ("div", 7),
        ("img", 12),
        ("*", 31),
    ];

    for (tag, count) in cases.iter() {
        assert_eq!(main.get_elements_by_tag_name(tag).length(), *count, "{}", tag);
    }
}

#[test]
fn test_wildcard_counts_every_element() {
    let doc = doc(TAG_PAGE);
    let main = first(&doc);
    let elements = main.descendants().filter(|n| n.is_element()).count();
    assert_eq!(main.get_elements_by_tag_name("*").length(), elements);
    assert_eq!(main.select("*").length(), elements);
}

#[test]
fn test_get_all_nodes_with_tag() {
    let doc = doc(TAG_PAGE);
    let main = first(&doc);
    let cases: Vec<(Vec<&str>, usize)> = vec![
        (vec!["h1"], 1),
        (vec!["h1", "h2"], 3),
        (vec!["h1", "h2", "h3"], 6),
        (vec!["p"], 6),
        (vec!["p", "span"], 6),
        (vec!["div", "img"], 19),
        (vec!["p", "p"], 6),
        (vec!["span"], 0),
        (vec![], 0),
    ];

    for (tags, count) in cases.iter() {
        assert_eq!(main.get_all_nodes_with_tag(tags).length(), *count, "{:?}", tags);
    }
}

#[test]
fn test_created_elements_are_found() {
    let cases = [
        ("h1", 3),
        ("h2", 4),
        ("p", 10),
        ("img", 8),
        ("custom-tag", 22),
    ];

    for (tag, count) in cases.iter() {
        let doc = Document::default();
        let root = doc.root();
        for _ in 0..*count {
            root.append_child(&doc.create_element(tag));
        }
        assert_eq!(doc.get_elements_by_tag_name(tag).length(), *count, "{}", tag);
    }
}

#[test]
fn test_chained_select() {
    let doc = doc(
        r#"<div class="hero"><p class="row"></p><div><p class="row"></p></div></div>
        <p class="row"></p>"#,
    );
    let sel = doc.select("div.hero").select(".row");
    assert_eq!(sel.length(), 2);

    let nested = doc.select("div").select("p");
    assert_eq!(nested.length(), 2);
}

#[test]
fn test_is() {
    let doc = doc(SELECTOR_PAGE);
    let sel = doc.select(".class-b");
    assert!(sel.is("div"));
    assert!(sel.is("p.class-a"));
    assert!(!sel.is("span"));
    assert!(!sel.is("p >"));
}

#[test]
fn test_template_children_are_ordinary_children() {
    let doc = doc(r#"<div><template><p class="x">hidden</p></template>shown</div>"#);
    let div = first(&doc);

    let found = doc.select(".x");
    assert_eq!(found.length(), 1);
    assert_eq!(found.text().to_string(), "hidden");
    assert_eq!(doc.get_elements_by_tag_name("p").length(), 1);
    assert_eq!(
        found.first().and_then(|p| p.parent()).and_then(|t| t.tag_name()).as_deref(),
        Some("template")
    );

    assert_eq!(div.text().to_string(), "hiddenshown");
    assert_eq!(
        div.html().to_string(),
        r#"<div><template><p class="x">hidden</p></template>shown</div>"#
    );
}

#[test]
fn test_created_template_takes_children() {
    let doc = Document::default();
    let template = doc.create_element("template");
    template.set_html("<span>inside</span>");
    doc.root().append_child(&template);

    assert_eq!(doc.select("template span").length(), 0);
    assert_eq!(doc.select("span").length(), 1);
    assert_eq!(doc.html().to_string(), "<template><span>inside</span></template>");
}
