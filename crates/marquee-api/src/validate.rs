//! Structural validation of untyped JSON against a [`Schema`].

use crate::error::SchemaMismatch;
use crate::schema::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Check `value` against `schema`, then deserialize it into `T`.
///
/// Unknown fields are ignored. Missing or wrong-typed declared fields fail,
/// and one bad array element fails the whole array.
pub fn validate<T: DeserializeOwned>(schema: &Schema, value: &Value) -> Result<T, SchemaMismatch> {
    check(schema, value)?;
    // Structure already matched, so only numeric range can still fail here
    T::deserialize(value).map_err(|e| {
        tracing::debug!("Schema-conformant value failed to deserialize: {}", e);
        SchemaMismatch {
            path: "$".to_string(),
            expected: "value within range",
            received: "out-of-range value",
        }
    })
}

/// Structural check only
pub fn check(schema: &Schema, value: &Value) -> Result<(), SchemaMismatch> {
    let mut path = String::from("$");
    check_at(schema, Some(value), &mut path)
}

fn check_at(schema: &Schema, value: Option<&Value>, path: &mut String) -> Result<(), SchemaMismatch> {
    let Some(value) = value else {
        return Err(mismatch(schema, "missing", path));
    };

    match (schema, value) {
        (Schema::Nullable(_), Value::Null) => Ok(()),
        (Schema::Nullable(inner), _) => {
            let here = path.len();
            check_at(inner, Some(value), path).map_err(|mut e| {
                // Report the nullable kind when the mismatch is on this very value
                if e.path.len() == here {
                    e.expected = schema.kind();
                }
                e
            })
        }
        (Schema::String, Value::String(_)) => Ok(()),
        (Schema::Number, Value::Number(_)) => Ok(()),
        (Schema::Integer, Value::Number(n)) if n.is_u64() => Ok(()),
        (Schema::Boolean, Value::Bool(_)) => Ok(()),
        (Schema::Array(element), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", index));
                check_at(element, Some(item), path)?;
                path.truncate(len);
            }
            Ok(())
        }
        (Schema::Object(fields), Value::Object(map)) => {
            for field in fields {
                let len = path.len();
                path.push('.');
                path.push_str(field.name);
                check_at(&field.schema, map.get(field.name), path)?;
                path.truncate(len);
            }
            Ok(())
        }
        _ => Err(mismatch(schema, value_kind(value), path)),
    }
}

fn mismatch(schema: &Schema, received: &'static str, path: &str) -> SchemaMismatch {
    SchemaMismatch {
        path: path.to_string(),
        expected: schema.kind(),
        received,
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
