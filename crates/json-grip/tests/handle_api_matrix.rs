use json_grip::{Error, Json, JsonValue, ValueType};

#[test]
fn autovivification_builds_intermediate_containers() {
    let mut h = Json::new();
    h.at(1).unwrap().key("one").unwrap().set(2).unwrap();
    assert_eq!(h.dump(None), "[null,{\"one\":2}]");
}

#[test]
fn sparse_assignment_compacts_into_an_array() {
    let mut h = Json::new();
    h.at(1).unwrap().set(2).unwrap();
    h.at(2).unwrap().set("ss").unwrap();
    h.at(0).unwrap().set(1).unwrap();
    assert_eq!(h.dump(None), "[1,2,\"ss\"]");
}

#[test]
fn object_build_and_typed_reads() {
    let mut j = Json::new();
    j.key("one").unwrap().set(false).unwrap();
    j.key("two").unwrap().set(2).unwrap();
    j.key("three").unwrap().set("hello world").unwrap();

    assert!(!j.key("one").unwrap().get::<bool>().unwrap());
    assert_eq!(j.key("two").unwrap().get::<i32>().unwrap(), 2);
    assert_eq!(
        j.key("three").unwrap().get::<String>().unwrap(),
        "hello world"
    );
    assert_eq!(j.size(), 3);
    assert!(j.has_key("two"));
    assert!(!j.has_key("four"));
}

#[test]
fn missing_key_reads_as_null_without_creating_it() {
    let mut j = Json::new();
    j.key("present").unwrap().set(1).unwrap();
    assert!(j.key("absent").unwrap().is_null());
    assert!(!j.has_key("absent"));
    assert_eq!(j.size(), 1);
}

#[test]
fn typed_read_of_wrong_variant_is_a_type_error() {
    let mut j = Json::new();
    j.key("n").unwrap().set(5).unwrap();
    let err = j.key("n").unwrap().get::<bool>().unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    let err = j.key("n").unwrap().get::<String>().unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    // reading a container through a scalar accessor fails too
    let err = j.get::<i64>().unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn integer_reads_widen_through_u64_and_truncate() {
    let mut j = Json::new();
    j.at(0).unwrap().set(300u64).unwrap();
    assert_eq!(j.at(0).unwrap().get::<u64>().unwrap(), 300);
    assert_eq!(j.at(0).unwrap().get::<u8>().unwrap(), 44);
    j.at(1).unwrap().set(-5).unwrap();
    assert_eq!(j.at(1).unwrap().get::<i64>().unwrap(), -5);
    assert_eq!(j.at(1).unwrap().get::<f64>().unwrap(), -5.0);
}

#[test]
fn indexing_a_scalar_slot_is_a_type_error() {
    let mut j = Json::new();
    j.key("s").unwrap().set("text").unwrap();
    let err = j.key("s").unwrap().at(0).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    let err = j.key("s").unwrap().key("inner").unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    // and mixing selector kinds on containers fails as well
    let err = j.at(0).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn deep_copy_is_independent_of_the_source() {
    let mut a = Json::parse("[1,null,2,3,4]").unwrap();
    let b = a.copy();
    a.at(1).unwrap().set(5).unwrap();
    assert_eq!(a.at(1).unwrap().get::<i32>().unwrap(), 5);
    assert!(b.clone().at(1).unwrap().is_null());
    assert_eq!(b.dump(None), "[1,null,2,3,4]");
}

#[test]
fn assign_aliases_the_subtree() {
    let mut template = Json::new();
    template.key("cfg").unwrap().set(1).unwrap();

    let mut doc = Json::new();
    doc.key("left").unwrap().assign(&template).unwrap();
    doc.key("right").unwrap().assign(&template).unwrap();

    // mutation through the template is visible through both aliases
    template.key("cfg").unwrap().set(2).unwrap();
    let mut left = doc.key("left").unwrap();
    let mut right = doc.key("right").unwrap();
    assert_eq!(left.key("cfg").unwrap().get::<i32>().unwrap(), 2);
    assert_eq!(right.key("cfg").unwrap().get::<i32>().unwrap(), 2);

    // a deep copy breaks the link
    let detached = template.copy();
    template.key("cfg").unwrap().set(3).unwrap();
    assert_eq!(
        detached.clone().key("cfg").unwrap().get::<i32>().unwrap(),
        2
    );
}

#[test]
fn push_back_appends_and_autovivifies() {
    let mut row = Json::new();
    row.key("id").unwrap().set(7).unwrap();

    let mut list = Json::new();
    list.push_back(row.clone()).unwrap();
    list.push_back(row.clone()).unwrap();
    assert_eq!(list.size(), 2);
    assert_eq!(
        list.at(0).unwrap().key("id").unwrap().get::<i32>().unwrap(),
        7
    );

    // the rows alias the same subtree
    row.key("id").unwrap().set(8).unwrap();
    assert_eq!(
        list.at(1).unwrap().key("id").unwrap().get::<i32>().unwrap(),
        8
    );

    // scalars convert to handles
    list.push_back(42).unwrap();
    list.push_back("tail").unwrap();
    assert_eq!(list.size(), 4);

    // a nested null slot upgrades to an array
    let mut doc = Json::new();
    doc.key("items").unwrap().push_back(1).unwrap();
    doc.key("items").unwrap().push_back(2).unwrap();
    assert_eq!(doc.dump(None), "{\"items\":[1,2]}");
}

#[test]
fn push_back_on_a_scalar_is_a_type_error() {
    let mut j = Json::new();
    j.key("s").unwrap().set("x").unwrap();
    let err = j.key("s").unwrap().push_back(1).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    let mut root = Json::from(5);
    let err = root.push_back(1).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn scalar_set_reuses_matching_nodes_in_place() {
    let mut doc = Json::new();
    doc.key("n").unwrap().set(1).unwrap();
    // alias the number node itself into a second tree
    let mut other = Json::new();
    other
        .key("alias")
        .unwrap()
        .assign(&doc.key("n").unwrap())
        .unwrap();

    // same variant: the shared node is updated in place
    doc.key("n").unwrap().set(2).unwrap();
    assert_eq!(other.key("alias").unwrap().get::<i32>().unwrap(), 2);

    // different variant: the slot gets a fresh node, the alias keeps the old
    doc.key("n").unwrap().set("swapped").unwrap();
    assert_eq!(other.key("alias").unwrap().get::<i32>().unwrap(), 2);
    assert_eq!(doc.key("n").unwrap().get::<String>().unwrap(), "swapped");
}

#[test]
fn erase_by_key_and_index() {
    let mut j = Json::parse("{\"a\":1,\"b\":2}").unwrap();
    assert!(j.erase_key("a"));
    assert!(!j.erase_key("a"));
    assert!(!j.erase_index(0));
    assert_eq!(j.size(), 1);

    let mut a = Json::parse("[10,20,30]").unwrap();
    assert!(a.erase_index(1));
    assert_eq!(a.dump(None), "[10,30]");
    assert!(!a.erase_index(5));
    assert!(!a.erase_key("x"));
}

#[test]
fn queries_on_the_resolved_slot() {
    let mut j = Json::parse("{\"arr\":[1],\"s\":\"\",\"n\":null,\"b\":true}").unwrap();
    assert_eq!(j.get_type(), ValueType::Object);
    assert!(j.is_object());
    assert!(j.is_structured());
    assert!(j.key("arr").unwrap().is_array());
    assert!(j.key("arr").unwrap().is_structured());
    assert!(j.key("s").unwrap().is_string());
    assert!(j.key("s").unwrap().is_empty());
    assert!(j.key("n").unwrap().is_null());
    // null is not "empty" by this definition
    assert!(!j.key("n").unwrap().is_empty());
    assert!(j.key("b").unwrap().is_boolean());
    assert!(!j.key("b").unwrap().is_empty());
}

#[test]
fn clear_detaches_the_handle() {
    let mut j = Json::parse("[1,2,3]").unwrap();
    let kept = j.clone();
    j.clear();
    assert!(j.is_null());
    assert_eq!(j.dump(None), "{}");
    assert_eq!(kept.dump(None), "[1,2,3]");
}

#[test]
fn empty_root_dumps_as_empty_object_and_absent_slot_as_null() {
    let j = Json::new();
    assert_eq!(j.dump(None), "{}");
    let mut j = Json::new();
    let child = j.at(3).unwrap();
    assert_eq!(child.dump(None), "null");
}

#[test]
fn pretty_dump_through_the_handle() {
    let mut h = Json::new();
    h.key("list").unwrap().push_back(1).unwrap();
    h.key("list").unwrap().push_back(2).unwrap();
    assert_eq!(
        h.dump(Some(2)),
        "{\n  \"list\": [\n    1,\n    2\n  ]\n}"
    );
}

#[test]
fn iteration_yields_array_elements_in_order() {
    let j = Json::parse("[10,20,30]").unwrap();
    let values: Vec<i64> = j.iter().map(|h| h.get::<i64>().unwrap()).collect();
    assert_eq!(values, [10, 20, 30]);
}

#[test]
fn iteration_handles_write_into_the_underlying_array() {
    let j = Json::parse("[1,2,3]").unwrap();
    for mut h in &j {
        let v = h.get::<i64>().unwrap();
        h.set(v * 10).unwrap();
    }
    assert_eq!(j.dump(None), "[10,20,30]");
}

#[test]
fn iterating_a_non_array_yields_the_value_itself_once() {
    let j = Json::parse("{\"k\":1}").unwrap();
    let seen: Vec<String> = j.iter().map(|h| h.dump(None)).collect();
    assert_eq!(seen, ["{\"k\":1}"]);

    let scalar = Json::from(5);
    assert_eq!(scalar.iter().count(), 1);
}

#[test]
fn empty_and_unresolvable_values_iterate_nothing() {
    assert_eq!(Json::new().iter().count(), 0);
    assert_eq!(Json::parse("[]").unwrap().iter().count(), 0);
}

#[test]
fn exhausted_iterator_reports_invalid_iterator() {
    let j = Json::parse("[1]").unwrap();
    let mut it = j.iter();
    assert!(it.current().is_ok());
    assert!(it.next().is_some());
    assert!(matches!(
        it.current().unwrap_err(),
        Error::InvalidIterator(_)
    ));
    assert!(it.next().is_none());

    let empty = Json::new();
    assert!(matches!(
        empty.iter().current().unwrap_err(),
        Error::InvalidIterator(_)
    ));
}

#[test]
fn handles_from_vectors_and_scalars() {
    let j: Json = vec![1u64, 2, 3].into();
    assert_eq!(j.dump(None), "[1,2,3]");
    let j: Json = "text".into();
    assert_eq!(j.dump(None), "\"text\"");
    let j: Json = true.into();
    assert_eq!(j.dump(None), "true");

    let mut arr = Json::array();
    assert!(arr.is_array());
    assert_eq!(arr.dump(None), "[]");
    arr.push_back(1).unwrap();
    assert_eq!(arr.dump(None), "[1]");
    assert!(Json::object().is_object());
}

#[test]
fn objects_collect_from_key_value_pairs() {
    let mut j: Json = [
        ("one", JsonValue::Null),
        ("two", JsonValue::from(true)),
        ("three", JsonValue::from(10086u64)),
        ("str", JsonValue::from("World")),
    ]
    .into_iter()
    .collect();
    assert!(j.key("one").unwrap().is_null());
    assert!(j.key("two").unwrap().get::<bool>().unwrap());
    assert_eq!(j.key("three").unwrap().get::<i64>().unwrap(), 10086);
    assert_eq!(j.key("str").unwrap().get::<String>().unwrap(), "World");
    assert_eq!(j.size(), 4);
}

#[test]
fn structural_equality_ignores_key_order() {
    let a = Json::parse("{\"x\":1,\"y\":[true,null]}").unwrap();
    let b = Json::parse("{\"y\":[true,null],\"x\":1}").unwrap();
    assert!(a.structural_eq(&b));
    let c = Json::parse("{\"x\":1,\"y\":[true,false]}").unwrap();
    assert!(!a.structural_eq(&c));
}
