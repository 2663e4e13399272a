#![allow(dead_code)]

//! In-memory edit buffer holding one original and one working copy.

use serde_json::Value;

use super::path::{PathAddress, PathError};
use super::store;

/// A single-writer edit buffer over one document. The original is kept
/// read-only for discard; every mutation replaces the working copy
/// wholesale, so a failed operation leaves it at its last-good value.
///
/// Two sessions over the same backing key may exist at once (two browser
/// tabs); they race at publish time and the later save wins.
pub struct EditSession {
    original: Value,
    working: Value,
}

impl EditSession {
    /// Opens a session; the working copy starts as a deep copy of `initial`.
    pub fn open(initial: Value) -> Self {
        let working = initial.clone();
        EditSession {
            original: initial,
            working,
        }
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn working(&self) -> &Value {
        &self.working
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    /// Assigns `value` at `path` in the working copy. No schema
    /// validation happens here; type mismatches surface when the
    /// document is rendered or persisted.
    pub fn set_field(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        let address = PathAddress::parse(path)?;
        self.working = store::set_path(&self.working, &address, value)?;
        Ok(())
    }

    /// Appends a deep copy of `template` to the sequence at `array_path`.
    pub fn append_item(&mut self, array_path: &str, template: &Value) -> Result<(), PathError> {
        let address = PathAddress::parse(array_path)?;
        self.working = store::append_item(&self.working, &address, template)?;
        Ok(())
    }

    /// Removes the element at `index` from the sequence at `array_path`.
    pub fn remove_item(&mut self, array_path: &str, index: i64) -> Result<(), PathError> {
        let address = PathAddress::parse(array_path)?;
        self.working = store::remove_item(&self.working, &address, index)?;
        Ok(())
    }

    /// Resets the working copy to a fresh copy of the original. No I/O
    /// happens on discard.
    pub fn discard(&mut self) {
        self.working = self.original.clone();
    }

    /// Consumes the session and hands back the working document as the
    /// new canonical value. Persisting it is the caller's job (the
    /// publish pipeline); the session never talks to storage.
    pub fn commit(self) -> Value {
        self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Ada",
            "experience": [{"company": "A"}, {"company": "B"}],
            "tags": ["a", "b", "c"]
        })
    }

    #[test]
    fn test_open_starts_clean() {
        let session = EditSession::open(sample());
        assert!(!session.is_dirty());
        assert_eq!(session.working(), session.original());
    }

    #[test]
    fn test_set_field_marks_dirty() {
        let mut session = EditSession::open(sample());
        session.set_field("experience[1].company", json!("C")).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.working()["experience"][1]["company"], json!("C"));
        // The original is never aliased into by a mutation.
        assert_eq!(session.original()["experience"][1]["company"], json!("B"));
    }

    #[test]
    fn test_failed_mutation_keeps_last_good_working() {
        let mut session = EditSession::open(sample());
        session.set_field("name", json!("Grace")).unwrap();
        let before = session.working().clone();
        assert!(session.set_field("missing.path", json!(1)).is_err());
        assert!(session.append_item("name", &json!(1)).is_err());
        assert!(session.remove_item("tags", 99).is_err());
        assert_eq!(session.working(), &before);
    }

    #[test]
    fn test_discard_restores_original_after_any_mutations() {
        let mut session = EditSession::open(sample());
        session.set_field("name", json!("Grace")).unwrap();
        session.append_item("tags", &json!("d")).unwrap();
        session.remove_item("experience", 0).unwrap();
        assert!(session.is_dirty());

        session.discard();
        assert!(!session.is_dirty());
        assert_eq!(session.working(), &sample());
    }

    #[test]
    fn test_commit_returns_working_document() {
        let mut session = EditSession::open(sample());
        session.set_field("name", json!("Grace")).unwrap();
        let committed = session.commit();
        assert_eq!(committed["name"], json!("Grace"));
    }

    #[test]
    fn test_append_then_remove_is_clean() {
        let mut session = EditSession::open(sample());
        session.append_item("tags", &json!("d")).unwrap();
        session.remove_item("tags", 3).unwrap();
        assert!(!session.is_dirty());
    }
}
