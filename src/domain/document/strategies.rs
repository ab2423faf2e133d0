//! Generated documents for property tests.

use std::ops::Range;

use proptest::prelude::*;
use serde_json::{Value, json};

use super::JsonDocument;

pub(crate) fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,6}"
}

pub(crate) fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[ -~]{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>().prop_map(|n| json!(n)), 0..3).prop_map(Value::Array),
    ]
}

fn tree(keys: BoxedStrategy<String>, children: Range<usize>) -> BoxedStrategy<Value> {
    scalar()
        .prop_recursive(4, 32, 4, move |inner| {
            prop::collection::btree_map(keys.clone(), inner, children.clone())
                .prop_map(|map| Value::Object(map.into_iter().collect()))
        })
        .boxed()
}

fn document_over(
    keys: BoxedStrategy<String>,
    children: Range<usize>,
) -> impl Strategy<Value = JsonDocument> {
    prop::collection::btree_map(keys.clone(), tree(keys, children), 0..4)
        .prop_map(|map| JsonDocument { root: map.into_iter().collect() })
}

/// Documents without empty objects and with varied keys.
pub(crate) fn document() -> impl Strategy<Value = JsonDocument> {
    document_over(segment().boxed(), 1..4)
}

/// Pairs of documents over a tiny key set, so paths collide often. Empty
/// objects and scalars sitting where the other side nests are both common.
pub(crate) fn overlapping_documents() -> impl Strategy<Value = (JsonDocument, JsonDocument)> {
    let keys = || "[a-d]".prop_map(String::from).boxed();
    (document_over(keys(), 0..3), document_over(keys(), 0..3))
}
