#![allow(dead_code)]

//! Copy-on-write mutation helpers over a JSON document.
//!
//! Every operation clones the input, mutates the clone, and returns it.
//! On any path error the clone is dropped and the input document is
//! untouched, so callers never observe a partial write.

use serde_json::Value;

use super::path::{PathAddress, PathError};

/// Returns a mutated copy with `value` assigned at `path`.
pub fn set_path(document: &Value, path: &PathAddress, value: Value) -> Result<Value, PathError> {
    let mut next = document.clone();
    path.write(&mut next, value)?;
    Ok(next)
}

/// Returns a copy of the value at `path`.
pub fn get_path(document: &Value, path: &PathAddress) -> Result<Value, PathError> {
    Ok(path.read(document)?.clone())
}

/// Appends a deep copy of `template` to the end of the sequence at
/// `array_path`, preserving the order of existing elements.
pub fn append_item(
    document: &Value,
    array_path: &PathAddress,
    template: &Value,
) -> Result<Value, PathError> {
    let mut next = document.clone();
    let arr = sequence_mut(&mut next, array_path)?;
    arr.push(template.clone());
    Ok(next)
}

/// Removes exactly the element at `index`, shifting later elements down
/// by one. Order-preserving, not swap-remove.
pub fn remove_item(
    document: &Value,
    array_path: &PathAddress,
    index: i64,
) -> Result<Value, PathError> {
    let mut next = document.clone();
    let arr = sequence_mut(&mut next, array_path)?;
    let len = arr.len();
    match usize::try_from(index) {
        Ok(i) if i < len => {
            arr.remove(i);
        }
        _ => {
            return Err(PathError::IndexOutOfRange {
                field: array_path.to_string(),
                index,
                len,
            })
        }
    }
    Ok(next)
}

fn sequence_mut<'a>(
    document: &'a mut Value,
    array_path: &PathAddress,
) -> Result<&'a mut Vec<Value>, PathError> {
    array_path
        .read_mut(document)?
        .as_array_mut()
        .ok_or_else(|| PathError::NotAnArray(array_path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> PathAddress {
        PathAddress::parse(s).unwrap()
    }

    #[test]
    fn test_set_path_leaves_input_untouched() {
        let doc = json!({"experience": [{"company": "A"}, {"company": "B"}]});
        let next = set_path(&doc, &path("experience[1].company"), json!("C")).unwrap();
        assert_eq!(
            next,
            json!({"experience": [{"company": "A"}, {"company": "C"}]})
        );
        assert_eq!(
            doc,
            json!({"experience": [{"company": "A"}, {"company": "B"}]})
        );
    }

    #[test]
    fn test_set_path_error_returns_input_unchanged() {
        let doc = json!({"experience": []});
        let err = set_path(&doc, &path("experience[0].company"), json!("C")).unwrap_err();
        assert!(matches!(err, PathError::IndexOutOfRange { .. }));
        assert_eq!(doc, json!({"experience": []}));
    }

    #[test]
    fn test_append_item_preserves_existing_order() {
        let doc = json!({"projects": [{"name": "X"}]});
        let next = append_item(&doc, &path("projects"), &json!({"name": "", "description": ""}))
            .unwrap();
        assert_eq!(
            next,
            json!({"projects": [{"name": "X"}, {"name": "", "description": ""}]})
        );
    }

    #[test]
    fn test_append_item_deep_copies_template() {
        let doc = json!({"projects": []});
        let template = json!({"tags": []});
        let first = append_item(&doc, &path("projects"), &template).unwrap();
        let second = append_item(&first, &path("projects"), &template).unwrap();
        // Mutating one appended element must not touch the other.
        let mutated = set_path(&second, &path("projects[0].tags"), json!(["a"])).unwrap();
        assert_eq!(mutated["projects"][1], json!({"tags": []}));
    }

    #[test]
    fn test_append_item_requires_a_sequence() {
        let doc = json!({"projects": {"name": "X"}});
        let err = append_item(&doc, &path("projects"), &json!({})).unwrap_err();
        assert_eq!(err, PathError::NotAnArray("projects".to_string()));
    }

    #[test]
    fn test_remove_item_shifts_later_elements() {
        let doc = json!({"tags": ["a", "b", "c"]});
        let next = remove_item(&doc, &path("tags"), 1).unwrap();
        assert_eq!(next, json!({"tags": ["a", "c"]}));
    }

    #[test]
    fn test_remove_item_preserves_relative_order() {
        let doc = json!({"tags": ["a", "b", "c", "d", "e"]});
        for index in 0..5 {
            let next = remove_item(&doc, &path("tags"), index).unwrap();
            let remaining: Vec<&str> = next["tags"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            let mut expected: Vec<&str> = vec!["a", "b", "c", "d", "e"];
            expected.remove(index as usize);
            assert_eq!(remaining, expected);
        }
    }

    #[test]
    fn test_remove_item_rejects_out_of_range() {
        let doc = json!({"tags": ["a"]});
        assert!(matches!(
            remove_item(&doc, &path("tags"), 1),
            Err(PathError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            remove_item(&doc, &path("tags"), -1),
            Err(PathError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_append_then_remove_round_trips() {
        let doc = json!({"projects": [{"name": "X"}]});
        let appended = append_item(&doc, &path("projects"), &json!({"name": ""})).unwrap();
        let restored = remove_item(&appended, &path("projects"), 1).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_nested_array_path() {
        let doc = json!({"skillsConfig": {"categories": [{"name": "Design", "skills": ["a"]}]}});
        let next =
            append_item(&doc, &path("skillsConfig.categories[0].skills"), &json!("b")).unwrap();
        assert_eq!(
            next["skillsConfig"]["categories"][0]["skills"],
            json!(["a", "b"])
        );
    }
}
