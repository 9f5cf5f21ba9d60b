use xpath_forge::simple_node::{SimpleNode, doc, elem};
use xpath_forge::{Error, Navigator, parse};

fn resolve_greedy(document: &SimpleNode, xpath: &str) -> Result<xpath_forge::Value<SimpleNode>, Error> {
    parse(xpath).unwrap().resolve(document, true)
}

#[test]
fn builds_a_chain_from_an_empty_document() {
    let d = doc();
    let hits = resolve_greedy(&d, "/bookstore/book/title").unwrap();
    assert_eq!(hits.views().len(), 1);
    assert_eq!(d.render(), "<bookstore><book><title></title></book></bookstore>");
}

#[test]
fn greedy_resolution_is_idempotent() {
    let d = doc();
    resolve_greedy(&d, "/bookstore/book/title").unwrap();
    let before = d.render();
    let hits = resolve_greedy(&d, "/bookstore/book/title").unwrap();
    assert!(hits.to_boolean());
    assert_eq!(d.render(), before);
}

#[test]
fn existing_structure_is_reused_not_duplicated() {
    let d = doc().with_child(elem("bookstore").with_child(elem("book")));
    let book = d.elements()[0].elements()[0].clone();
    let hits = resolve_greedy(&d, "/bookstore/book/title").unwrap();
    assert_eq!(book.elements().len(), 1);
    assert_eq!(hits.views()[0].node.parent().unwrap(), book);
}

#[test]
fn creates_a_missing_attribute() {
    let d = doc().with_child(elem("a"));
    let hits = resolve_greedy(&d, "/a/@id").unwrap();
    assert_eq!(hits.views().len(), 1);
    assert_eq!(d.elements()[0].attributes()[0].name().local, "id");
}

#[test]
fn positional_shortfall_prepends_sibling_copies() {
    let parent = elem("parent");
    let hits = parse("item[3]").unwrap().resolve(&parent, true).unwrap();
    let items = parent.elements();
    assert_eq!(items.len(), 3);
    // the synthesized node ends up in the target slot, copies fill the gap
    assert_eq!(hits.views()[0].node, items[2]);
    assert_eq!(hits.views()[0].position, 3);
}

#[test]
fn positional_shortfall_copies_an_existing_sibling_subtree() {
    let d = doc().with_child(
        elem("bookstore")
            .with_child(elem("book").with_child(elem("title").with_text("Dune")))
            .with_child(elem("book").with_child(elem("title").with_text("Emma"))),
    );
    let hits = resolve_greedy(&d, "/bookstore/book[3]").unwrap();
    let books = d.elements()[0].elements();
    assert_eq!(books.len(), 3);
    assert_eq!(hits.views()[0].node, books[2]);
    // the inserted copy carries the reference node's subtree
    assert_eq!(books[1].elements()[0].text(), "Emma");
    assert_eq!(books[2].elements()[0].text(), "Emma");
}

#[test]
fn synthesized_nodes_keep_repairing_across_chained_predicates() {
    let d = doc();
    resolve_greedy(&d, "/a/b[@x = '1'][1]").unwrap();
    assert_eq!(d.render(), "<a><b x=\"1\"></b></a>");
}

#[test]
fn unsatisfiable_predicate_on_a_synthesized_node_fails_hard() {
    // a fractional position can never be repaired by sibling copies
    let d = doc();
    let err = resolve_greedy(&d, "/a/b[1.5]").unwrap_err();
    assert!(matches!(err, Error::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn satisfied_positional_predicate_creates_nothing() {
    let d = doc().with_child(elem("a").with_child(elem("b")).with_child(elem("b")));
    let before = d.render();
    let hits = resolve_greedy(&d, "/a/b[2]").unwrap();
    assert!(hits.to_boolean());
    assert_eq!(d.render(), before);
}

#[test]
fn equality_predicate_repairs_by_assignment() {
    let d = doc();
    resolve_greedy(&d, "/a[b = '1']").unwrap();
    assert_eq!(d.render(), "<a><b>1</b></a>");
}

#[test]
fn equality_predicate_prefers_an_existing_match() {
    let d = doc().with_child(
        elem("a")
            .with_child(elem("b").with_text("1"))
            .with_child(elem("b").with_text("2")),
    );
    let before = d.render();
    let hits = resolve_greedy(&d, "/a/b[. = '2']").unwrap();
    assert_eq!(hits.views().len(), 1);
    assert_eq!(hits.to_text(), "2");
    assert_eq!(d.render(), before);
}

#[test]
fn attribute_comparison_creates_and_assigns() {
    let d = doc();
    resolve_greedy(&d, "/book[@id = '42']").unwrap();
    assert_eq!(d.render(), "<book id=\"42\"></book>");
}

#[test]
fn top_level_equality_assigns_the_right_operands_text() {
    let d = doc().with_child(elem("a").with_child(elem("b")));
    let verdict = resolve_greedy(&d, "/a/b = 'x'").unwrap();
    assert!(verdict.to_boolean());
    assert_eq!(d.render(), "<a><b>x</b></a>");
}

#[test]
fn inequality_rewrites_an_equal_text() {
    let d = doc().with_child(elem("a").with_child(elem("b").with_text("abc")));
    let verdict = resolve_greedy(&d, "/a/b != 'abc'").unwrap();
    assert!(verdict.to_boolean());
    assert_eq!(d.elements()[0].elements()[0].text(), "cba");
}

#[test]
fn inequality_with_a_number_negates_it() {
    let d = doc().with_child(elem("a").with_child(elem("b").with_text("7")));
    resolve_greedy(&d, "/a/b != 7").unwrap();
    assert_eq!(d.elements()[0].elements()[0].text(), "-7");
}

#[test]
fn inequality_against_a_palindrome_is_unsatisfiable() {
    let d = doc().with_child(elem("a").with_child(elem("b").with_text("aba")));
    let err = resolve_greedy(&d, "/a/b != 'aba'").unwrap_err();
    assert!(matches!(err, Error::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn strict_ordering_cannot_be_repaired() {
    let d = doc();
    let err = resolve_greedy(&d, "/a/b > 5").unwrap_err();
    assert!(matches!(err, Error::UnsatisfiableOrdering(_)), "got {err:?}");
}

#[test]
fn less_or_equal_falls_back_to_assignment() {
    let d = doc().with_child(elem("a").with_child(elem("b").with_text("9")));
    let verdict = resolve_greedy(&d, "/a/b <= 5").unwrap();
    assert!(verdict.to_boolean());
    assert_eq!(d.elements()[0].elements()[0].text(), "5");
}

#[test]
fn satisfied_ordering_needs_no_repair() {
    let d = doc().with_child(elem("a").with_child(elem("b").with_text("9")));
    let before = d.render();
    let verdict = resolve_greedy(&d, "/a/b > 5").unwrap();
    assert!(verdict.to_boolean());
    assert_eq!(d.render(), before);
}

#[test]
fn scalar_comparisons_cannot_be_assigned_to() {
    let err = resolve_greedy(&doc(), "'x' = 'y'").unwrap_err();
    assert!(matches!(err, Error::ReadOnlyValue(_)), "got {err:?}");
}

#[test]
fn wildcard_names_cannot_be_created() {
    let e = elem("e");
    let err = parse("@*").unwrap().resolve(&e, true).unwrap_err();
    assert!(matches!(err, Error::WildcardName(_)), "got {err:?}");
    let err = parse("*").unwrap().resolve(&e, true).unwrap_err();
    assert!(matches!(err, Error::WildcardName(_)), "got {err:?}");
}

#[test]
fn read_only_axes_refuse_to_create() {
    let d = doc();
    let err = resolve_greedy(&d, "/a/parent::b").unwrap_err();
    assert!(matches!(err, Error::UncreatableAxis { .. }), "got {err:?}");
    let err = resolve_greedy(&d, "/a/ancestor::b").unwrap_err();
    assert!(matches!(err, Error::UncreatableAxis { .. }), "got {err:?}");
}

#[test]
fn sibling_axes_create_next_to_the_context_node() {
    let d = doc().with_child(elem("r").with_child(elem("a")));
    resolve_greedy(&d, "/r/a/following-sibling::b").unwrap();
    let children = d.elements()[0].elements();
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].name().local, "b");

    resolve_greedy(&d, "/r/a/preceding-sibling::c").unwrap();
    let children = d.elements()[0].elements();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].name().local, "c");
    assert_eq!(children[1].name().local, "a");
}

#[test]
fn sibling_creation_without_a_parent_fails() {
    let orphan = elem("alone");
    let err = parse("following-sibling::b").unwrap().resolve(&orphan, true).unwrap_err();
    assert!(matches!(err, Error::MissingParent(_)), "got {err:?}");
}

#[test]
fn only_the_last_candidate_slot_creates() {
    // title exists under both books: greedy finds both, creates nothing
    let d = doc().with_child(
        elem("bookstore")
            .with_child(elem("book").with_child(elem("title")))
            .with_child(elem("book").with_child(elem("title")))
            .with_child(elem("book")),
    );
    let hits = resolve_greedy(&d, "/bookstore/book/title").unwrap();
    assert_eq!(hits.views().len(), 3);
    let books = d.elements()[0].elements();
    assert_eq!(books[2].elements().len(), 1);
    assert_eq!(books[0].elements().len(), 1);
}
