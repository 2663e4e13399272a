#![allow(dead_code)]

//! Dotted/bracket path addressing into a JSON document.
//!
//! A path like `experience[2].achievements[0]` is parsed once into a
//! sequence of steps and then replayed against a document for reads and
//! writes. Every step except the last must resolve to an existing
//! container; there is no autovivification of intermediate objects.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Plain object key, e.g. `contact`.
    Field(String),
    /// Object key holding a sequence plus an index into it, e.g. `experience[2]`.
    Index(String, i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Malformed path segment `{0}`")]
    Malformed(String),

    #[error("Missing field `{0}`")]
    MissingField(String),

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("Index {index} out of range for `{field}` (length {len})")]
    IndexOutOfRange {
        field: String,
        index: i64,
        len: usize,
    },
}

/// A parsed, replayable path address. Always holds at least one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAddress {
    steps: Vec<Step>,
}

impl PathAddress {
    /// Splits `path` on `.`; a `name[index]` segment becomes an indexed
    /// step. Unbalanced brackets and non-integer indices are rejected.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Malformed(path.to_string()));
        }
        let steps = path
            .split('.')
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PathAddress { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Walks the path from the document root, read-only.
    pub fn read<'a>(&self, document: &'a Value) -> Result<&'a Value, PathError> {
        let mut current = document;
        for step in &self.steps {
            current = resolve_step(current, step)?;
        }
        Ok(current)
    }

    /// Walks the path and returns a mutable reference to the addressed
    /// location. The caller must hand in a working copy, never the
    /// original document.
    pub fn read_mut<'a>(&self, document: &'a mut Value) -> Result<&'a mut Value, PathError> {
        let mut current = document;
        for step in &self.steps {
            current = resolve_step_mut(current, step)?;
        }
        Ok(current)
    }

    /// Resolves all but the last step, then assigns `value` at the last.
    /// A final field assignment may insert a new key; a final indexed
    /// assignment must land inside the existing sequence.
    pub fn write(&self, document: &mut Value, value: Value) -> Result<(), PathError> {
        let Some((last, prefix)) = self.steps.split_last() else {
            return Err(PathError::Malformed(String::new()));
        };
        let mut current = document;
        for step in prefix {
            current = resolve_step_mut(current, step)?;
        }
        match last {
            Step::Field(name) => {
                let map = current
                    .as_object_mut()
                    .ok_or_else(|| PathError::MissingField(name.clone()))?;
                map.insert(name.clone(), value);
            }
            Step::Index(name, index) => {
                let arr = named_array_mut(current, name)?;
                let len = arr.len();
                match usize::try_from(*index) {
                    Ok(i) if i < len => arr[i] = value,
                    _ => {
                        return Err(PathError::IndexOutOfRange {
                            field: name.clone(),
                            index: *index,
                            len,
                        })
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match step {
                Step::Field(name) => write!(f, "{name}")?,
                Step::Index(name, index) => write!(f, "{name}[{index}]")?,
            }
        }
        Ok(())
    }
}

fn parse_segment(segment: &str) -> Result<Step, PathError> {
    if segment.is_empty() {
        return Err(PathError::Malformed(segment.to_string()));
    }
    match (segment.find('['), segment.find(']')) {
        (None, None) => Ok(Step::Field(segment.to_string())),
        (Some(open), Some(close)) if open > 0 && open < close && close == segment.len() - 1 => {
            let index = segment[open + 1..close]
                .parse::<i64>()
                .map_err(|_| PathError::Malformed(segment.to_string()))?;
            Ok(Step::Index(segment[..open].to_string(), index))
        }
        _ => Err(PathError::Malformed(segment.to_string())),
    }
}

fn resolve_step<'a>(current: &'a Value, step: &Step) -> Result<&'a Value, PathError> {
    match step {
        Step::Field(name) => current
            .get(name.as_str())
            .ok_or_else(|| PathError::MissingField(name.clone())),
        Step::Index(name, index) => {
            let arr = current
                .get(name.as_str())
                .ok_or_else(|| PathError::MissingField(name.clone()))?
                .as_array()
                .ok_or_else(|| PathError::NotAnArray(name.clone()))?;
            let len = arr.len();
            match usize::try_from(*index) {
                Ok(i) if i < len => Ok(&arr[i]),
                _ => Err(PathError::IndexOutOfRange {
                    field: name.clone(),
                    index: *index,
                    len,
                }),
            }
        }
    }
}

fn resolve_step_mut<'a>(current: &'a mut Value, step: &Step) -> Result<&'a mut Value, PathError> {
    match step {
        Step::Field(name) => current
            .get_mut(name.as_str())
            .ok_or_else(|| PathError::MissingField(name.clone())),
        Step::Index(name, index) => {
            let arr = named_array_mut(current, name)?;
            let len = arr.len();
            match usize::try_from(*index) {
                Ok(i) if i < len => Ok(&mut arr[i]),
                _ => Err(PathError::IndexOutOfRange {
                    field: name.clone(),
                    index: *index,
                    len,
                }),
            }
        }
    }
}

fn named_array_mut<'a>(current: &'a mut Value, name: &str) -> Result<&'a mut Vec<Value>, PathError> {
    current
        .get_mut(name)
        .ok_or_else(|| PathError::MissingField(name.to_string()))?
        .as_array_mut()
        .ok_or_else(|| PathError::NotAnArray(name.to_string()))
}
