//! Synthetic JSON IR libraries.

use serde_json::{Value, json};

/// Library name used by every synthetic library.
pub const LIBRARY: &str = "bench.synthetic";

/// Builds a library with `count` structs and `count` flexible unions.
///
/// Every union refers to the struct declared right after it, so half of the type
/// references are forward references.
#[must_use]
pub fn synthetic_library(count: usize) -> String {
    let mut structs = Vec::with_capacity(count);
    let mut xunions = Vec::with_capacity(count);
    let mut order = Vec::with_capacity(count * 2);

    for i in 0..count {
        let union_name = format!("{LIBRARY}/Choice{i}");
        let struct_name = format!("{LIBRARY}/Record{i}");

        xunions.push(union(&union_name, &struct_name, i));
        structs.push(record(&struct_name));
        order.push(Value::String(union_name));
        order.push(Value::String(struct_name));
    }

    json!({
        "name": LIBRARY,
        "struct_declarations": structs,
        "xunion_declarations": xunions,
        "declaration_order": order,
    })
    .to_string()
}

fn record(name: &str) -> Value {
    json!({
        "name": name,
        "members": [
            {"name": "id", "type": {"kind": "primitive", "subtype": "uint64"}, "offset": 0},
            {"name": "label", "type": {"kind": "string", "maybe_element_count": 32}, "offset": 8},
            {
                "name": "samples",
                "type": {"kind": "vector", "element_type": {"kind": "primitive", "subtype": "float64"}},
                "offset": 24
            }
        ],
        "size": 40,
        "max_out_of_line": 4294967295u64
    })
}

fn union(name: &str, record: &str, index: usize) -> Value {
    let base = u32::try_from(index).unwrap_or(u32::MAX).wrapping_mul(4);
    json!({
        "name": name,
        "members": [
            {"reserved": true, "ordinal": base + 1},
            {"ordinal": base + 2, "name": "record", "type": {"kind": "identifier", "identifier": record, "nullable": true}},
            {"ordinal": base + 3, "name": "count", "type": {"kind": "primitive", "subtype": "int64"}}
        ],
        "size": 24,
        "max_out_of_line": 4294967295u64,
        "strict": index % 2 == 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_library_compiles() {
        let json = synthetic_library(8);
        let tree = fidlgen_dart::compile_from_json(&json).expect("Failed to compile");

        assert_eq!(tree.declarations.len(), 16);
        assert_eq!(tree.unions().count(), 8);
        assert_eq!(tree.unions().filter(|u| u.is_flexible()).count(), 4);
    }
}
