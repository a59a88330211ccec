use docconv_core::xml::{self, Element, Node};
use docconv_core::{ConvertError, Format, Value};

fn leaf(tag: &str, text: &str) -> Node {
    let mut element = Element::new(tag);
    element.children.push(Node::Text(text.to_string()));
    Node::Element(element)
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_nested_elements() {
    let v = xml::decode("<root><x>1</x><y><z>2</z></y></root>").unwrap();
    let expected = Value::mapping_of([(
        "root",
        Value::mapping_of([
            ("x", Value::string("1")),
            ("y", Value::mapping_of([("z", Value::string("2"))])),
        ]),
    )]);
    assert_eq!(v, expected);
}

#[test]
fn decode_text_is_always_a_string() {
    let v = xml::decode("<n>42</n>").unwrap();
    assert_eq!(v, Value::mapping_of([("n", Value::string("42"))]));
}

#[test]
fn decode_repeated_siblings_last_wins() {
    let v = xml::decode("<root><item>a</item><item>b</item></root>").unwrap();
    assert_eq!(
        v,
        Value::mapping_of([("root", Value::mapping_of([("item", Value::string("b"))]))])
    );
}

#[test]
fn decode_collapsed_key_keeps_first_position() {
    let v = xml::decode("<r><a>1</a><b>2</b><a>3</a></r>").unwrap();
    let inner = v.as_mapping().unwrap()["r"].as_mapping().unwrap().clone();
    let keys: Vec<&str> = inner.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(inner["a"], Value::string("3"));
}

#[test]
fn decode_empty_elements_are_null() {
    let v = xml::decode("<r><a/><b></b></r>").unwrap();
    assert_eq!(
        v,
        Value::mapping_of([(
            "r",
            Value::mapping_of([("a", Value::Null), ("b", Value::Null)])
        )])
    );
}

#[test]
fn decode_drops_attributes() {
    let v = xml::decode(r#"<r id="7"><a kind="x">v</a></r>"#).unwrap();
    assert_eq!(
        v,
        Value::mapping_of([("r", Value::mapping_of([("a", Value::string("v"))]))])
    );
}

#[test]
fn decode_ignores_declaration_comments_and_pis() {
    let text = "<?xml version=\"1.0\"?>\n<!-- note -->\n<?pi data?>\n<r>t</r>\n";
    assert_eq!(
        xml::decode(text).unwrap(),
        Value::mapping_of([("r", Value::string("t"))])
    );
}

#[test]
fn decode_ignores_text_beside_child_elements() {
    let v = xml::decode("<r>\n  lead\n  <a>1</a>\n  tail\n</r>").unwrap();
    assert_eq!(
        v,
        Value::mapping_of([("r", Value::mapping_of([("a", Value::string("1"))]))])
    );
}

#[test]
fn decode_leaf_text_is_not_trimmed() {
    let v = xml::decode("<r>  spaced  </r>").unwrap();
    assert_eq!(v, Value::mapping_of([("r", Value::string("  spaced  "))]));
}

#[test]
fn decode_unescapes_entities() {
    let v = xml::decode("<r>a &amp; b &lt;c&gt;</r>").unwrap();
    assert_eq!(v, Value::mapping_of([("r", Value::string("a & b <c>"))]));
}

#[test]
fn decode_mismatched_tag_fails() {
    let err = xml::decode("<a><b></a></b>").unwrap_err();
    assert!(matches!(err, ConvertError::Parse { format: Format::Xml, .. }));
}

#[test]
fn decode_unclosed_tag_fails() {
    let err = xml::decode("<a><b>text</b>").unwrap_err();
    assert!(matches!(err, ConvertError::Parse { format: Format::Xml, .. }));
}

#[test]
fn decode_second_root_fails() {
    let err = xml::decode("<a/><b/>").unwrap_err();
    assert!(err.to_string().contains("multiple root elements"));
}

#[test]
fn decode_text_outside_root_fails() {
    assert!(xml::decode("stray<a/>").is_err());
}

#[test]
fn decode_without_root_fails() {
    let err = xml::decode("<?xml version=\"1.0\"?>").unwrap_err();
    assert!(err.to_string().contains("no root element"));
}

#[test]
fn parse_element_keeps_order_and_duplicates() {
    let root = xml::parse_element("<r><i>a</i><i>b</i></r>").unwrap();
    assert_eq!(root.tag, "r");
    assert_eq!(root.children, vec![leaf("i", "a"), leaf("i", "b")]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_children_in_mapping_order() {
    let v = Value::mapping_of([(
        "root",
        Value::mapping_of([("x", Value::string("1")), ("y", Value::string("2"))]),
    )]);
    let root = xml::value_to_element(&v).unwrap();
    assert_eq!(root.tag, "root");
    assert_eq!(root.children, vec![leaf("x", "1"), leaf("y", "2")]);

    let text = xml::encode(&v).unwrap();
    let x = text.find("<x>1</x>").expect("x element");
    let y = text.find("<y>2</y>").expect("y element");
    assert!(x < y);
}

#[test]
fn encode_writes_declaration() {
    let v = Value::mapping_of([("r", Value::string("t"))]);
    let text = xml::encode(&v).unwrap();
    assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(text.contains("<r>t</r>"));
}

#[test]
fn encode_renders_scalars_as_text() {
    let v = Value::mapping_of([(
        "r",
        Value::mapping_of([
            ("b", Value::from(false)),
            ("i", Value::from(3)),
            ("f", Value::from(2.0)),
            ("n", Value::Null),
        ]),
    )]);
    let text = xml::encode(&v).unwrap();
    assert!(text.contains("<b>false</b>"));
    assert!(text.contains("<i>3</i>"));
    assert!(text.contains("<f>2.0</f>"));
    assert!(text.contains("<n/>"));
}

#[test]
fn encode_escapes_text() {
    let v = Value::mapping_of([("r", Value::string("a < b & c"))]);
    let text = xml::encode(&v).unwrap();
    assert!(text.contains("a &lt; b &amp; c"));
    assert_eq!(xml::decode(&text).unwrap(), v);
}

#[test]
fn encode_two_root_keys_fails() {
    let v = Value::mapping_of([("a", Value::from(1)), ("b", Value::from(2))]);
    let err = xml::encode(&v).unwrap_err();
    assert!(matches!(err, ConvertError::Structure(_)));
    assert!(err.to_string().contains("XML requires a single root element"));
}

#[test]
fn encode_non_mapping_roots_fail() {
    for v in [
        Value::Null,
        Value::string("x"),
        Value::Sequence(vec![]),
        Value::mapping_of(Vec::<(&str, Value)>::new()),
    ] {
        let err = xml::encode(&v).unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)), "{v:?}");
    }
}

#[test]
fn encode_sequence_content_fails() {
    let v = Value::mapping_of([(
        "r",
        Value::mapping_of([("items", Value::Sequence(vec![1.into(), 2.into()]))]),
    )]);
    let err = xml::encode(&v).unwrap_err();
    assert!(err.to_string().contains("list-valued content is unsupported"));
}

#[test]
fn encode_control_character_fails() {
    let v = Value::mapping_of([("r", Value::string("a\u{1}b"))]);
    let err = xml::encode(&v).unwrap_err();
    assert!(matches!(err, ConvertError::Encode { format: Format::Xml, .. }));
    assert!(err.to_string().contains("U+0001"));
}

#[test]
fn encode_keeps_tabs_and_newlines() {
    let v = Value::mapping_of([("r", Value::string("a\tb\nc"))]);
    assert_eq!(xml::decode(&xml::encode(&v).unwrap()).unwrap(), v);
}

#[test]
fn encode_large_float_in_exponent_form() {
    let v = Value::mapping_of([("r", Value::from(1e300))]);
    assert!(xml::encode(&v).unwrap().contains("<r>1e300</r>"));
}

#[test]
fn encode_invalid_element_name_fails() {
    let v = Value::mapping_of([("r", Value::mapping_of([("two words", Value::Null)]))]);
    assert!(matches!(xml::encode(&v), Err(ConvertError::Structure(_))));
}

#[test]
fn encode_then_decode_is_stable() {
    let v = Value::mapping_of([(
        "config",
        Value::mapping_of([
            ("name", Value::string("demo")),
            ("server", Value::mapping_of([("host", Value::string("localhost"))])),
            ("empty", Value::Null),
        ]),
    )]);
    assert_eq!(xml::decode(&xml::encode(&v).unwrap()).unwrap(), v);
}
