//! Resume skills come in two shapes: a flat `skills` list, or
//! `skillsConfig.categories` when the editor has category mode on.
//! Categories are the source of truth whenever `enableCategories` is
//! true; the flat list is derived by flattening at read time and is
//! never synced back on write.

use serde_json::Value;

pub fn effective_skills(document: &Value) -> Vec<String> {
    let config = document.get("skillsConfig");
    let categories_enabled = config
        .and_then(|c| c.get("enableCategories"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if categories_enabled {
        if let Some(categories) = config
            .and_then(|c| c.get("categories"))
            .and_then(Value::as_array)
        {
            return categories
                .iter()
                .filter_map(|cat| cat.get("skills").and_then(Value::as_array))
                .flatten()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect();
        }
    }

    document
        .get("skills")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
