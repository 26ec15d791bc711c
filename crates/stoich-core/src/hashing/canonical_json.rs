//! JSON canónico para fingerprints.
//!
//! Serialización determinista: claves de objeto en orden lexicográfico, sin
//! espacios, números tal como los imprime `serde_json`. Dos `Value` iguales
//! producen siempre el mismo texto, en cualquier plataforma.

use serde_json::Value;

/// Escribe la forma canónica de `value` sobre `out` (sin asignaciones
/// intermedias por nodo).
pub fn write_canonical_json(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_escaped(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_json(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped(key, out);
                out.push(':');
                write_canonical_json(&map[key], out);
            }
            out.push('}');
        }
    }
}

/// Forma canónica como `String` nueva.
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical_json(value, &mut out);
    out
}

fn write_escaped(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_keys_are_sorted() {
        let value = json!({"b": 1, "a": {"z": true, "y": null}});
        assert_eq!(to_canonical_json(&value), r#"{"a":{"y":null,"z":true},"b":1}"#);
    }

    #[test]
    fn test_arrays_preserve_order() {
        let value = json!([3, 1, 2]);
        assert_eq!(to_canonical_json(&value), "[3,1,2]");
    }

    #[test]
    fn test_strings_are_escaped() {
        let value = json!({"k": "line\n\"quoted\"\\"});
        assert_eq!(to_canonical_json(&value), r#"{"k":"line\n\"quoted\"\\"}"#);
    }

    #[test]
    fn test_equal_values_share_canonical_form() {
        let a = json!({"x": [1.5, "s"], "y": {"n": 2}});
        let b = serde_json::from_str::<serde_json::Value>(r#"{ "y": {"n": 2}, "x": [1.5, "s"] }"#).unwrap();
        assert_eq!(to_canonical_json(&a), to_canonical_json(&b));
    }
}
