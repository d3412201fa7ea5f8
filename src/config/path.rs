//! Dotted-key access into a [`ConfigDocument`].
//!
//! The document layout is mirrored by a static tree of groups and leaves.
//! Each leaf carries a typed getter/setter pair, so resolving a key never
//! depends on field names or runtime introspection.

use super::error::PathError;
use super::types::{ConfigDocument, ConfigValue, ValueKind};

type Getter = fn(&ConfigDocument) -> ConfigValue;
type Setter = fn(&mut ConfigDocument, ConfigValue) -> Result<(), SetFailure>;

enum SetFailure {
    Kind(ValueKind),
    Range(i64),
}

struct Leaf {
    kind: ValueKind,
    get: Getter,
    set: Setter,
}

enum Node {
    Group(&'static [(&'static str, Node)]),
    Leaf(Leaf),
}

macro_rules! string_leaf {
    ($group:ident . $field:ident) => {
        Node::Leaf(Leaf {
            kind: ValueKind::String,
            get: |doc| ConfigValue::String(doc.$group.$field.clone()),
            set: |doc, value| match value {
                ConfigValue::String(s) => {
                    doc.$group.$field = s;
                    Ok(())
                }
                other => Err(SetFailure::Kind(other.kind())),
            },
        })
    };
}

macro_rules! int_leaf {
    ($group:ident . $field:ident) => {
        Node::Leaf(Leaf {
            kind: ValueKind::Int,
            get: |doc| ConfigValue::Int(i64::from(doc.$group.$field)),
            set: |doc, value| match value {
                ConfigValue::Int(n) => {
                    doc.$group.$field = n.try_into().map_err(|_| SetFailure::Range(n))?;
                    Ok(())
                }
                other => Err(SetFailure::Kind(other.kind())),
            },
        })
    };
}

macro_rules! bool_leaf {
    ($group:ident . $field:ident) => {
        Node::Leaf(Leaf {
            kind: ValueKind::Bool,
            get: |doc| ConfigValue::Bool(doc.$group.$field),
            set: |doc, value| match value {
                ConfigValue::Bool(b) => {
                    doc.$group.$field = b;
                    Ok(())
                }
                other => Err(SetFailure::Kind(other.kind())),
            },
        })
    };
}

static OPENAI: [(&str, Node); 3] = [
    ("api_key", string_leaf!(openai.api_key)),
    ("base_url", string_leaf!(openai.base_url)),
    ("model", string_leaf!(openai.model)),
];

static COMMIT: [(&str, Node); 3] = [
    ("language", string_leaf!(commit.language)),
    ("max_length", int_leaf!(commit.max_length)),
    ("type", string_leaf!(commit.commit_type)),
];

static PREFERENCES: [(&str, Node); 3] = [
    ("default_branch", string_leaf!(preferences.default_branch)),
    ("auto_add", bool_leaf!(preferences.auto_add)),
    ("auto_commit", bool_leaf!(preferences.auto_commit)),
];

static ROOT: [(&str, Node); 3] = [
    ("openai", Node::Group(&OPENAI)),
    ("commit", Node::Group(&COMMIT)),
    ("preferences", Node::Group(&PREFERENCES)),
];

fn resolve(key: &str) -> Result<&'static Leaf, PathError> {
    let unknown = || PathError::UnknownPath {
        key: key.to_string(),
    };

    let mut children: &'static [(&'static str, Node)] = &ROOT;
    let mut segments = key.split('.').peekable();

    while let Some(segment) = segments.next() {
        let (_, node) = children
            .iter()
            .find(|(name, _)| *name == segment)
            .ok_or_else(unknown)?;
        let is_last = segments.peek().is_none();
        match (node, is_last) {
            (Node::Group(next), false) => children = next,
            (Node::Leaf(leaf), true) => return Ok(leaf),
            _ => return Err(unknown()),
        }
    }

    Err(unknown())
}

/// Reads the leaf at `key`.
pub fn get(doc: &ConfigDocument, key: &str) -> Result<ConfigValue, PathError> {
    resolve(key).map(|leaf| (leaf.get)(doc))
}

/// Writes `value` to the leaf at `key`. The document is unchanged on error.
pub fn set(doc: &mut ConfigDocument, key: &str, value: ConfigValue) -> Result<(), PathError> {
    let leaf = resolve(key)?;
    if value.kind() != leaf.kind {
        return Err(PathError::TypeMismatch {
            key: key.to_string(),
            expected: leaf.kind,
            found: value.kind(),
        });
    }

    (leaf.set)(doc, value).map_err(|failure| match failure {
        SetFailure::Kind(found) => PathError::TypeMismatch {
            key: key.to_string(),
            expected: leaf.kind,
            found,
        },
        SetFailure::Range(value) => PathError::OutOfRange {
            key: key.to_string(),
            value,
        },
    })
}

/// Every leaf's dotted key, in tree order.
#[cfg(test)]
pub fn leaf_keys() -> Vec<String> {
    fn walk(prefix: &str, children: &[(&str, Node)], out: &mut Vec<String>) {
        for (name, node) in children {
            let key = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            match node {
                Node::Group(next) => walk(&key, next, out),
                Node::Leaf(_) => out.push(key),
            }
        }
    }

    let mut keys = Vec::new();
    walk("", &ROOT, &mut keys);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema;

    #[test]
    fn get_reads_defaults() {
        let doc = ConfigDocument::default();
        assert_eq!(
            get(&doc, "openai.base_url").unwrap(),
            ConfigValue::from("https://api.openai.com/v1")
        );
        assert_eq!(get(&doc, "commit.max_length").unwrap(), ConfigValue::Int(150));
        assert_eq!(get(&doc, "preferences.auto_add").unwrap(), ConfigValue::Bool(false));
    }

    #[test]
    fn set_then_get_returns_new_value_for_every_key() {
        let mut doc = ConfigDocument::default();
        for field in schema::fields() {
            let value = match field.field_type.value_kind() {
                ValueKind::String => ConfigValue::from(format!("value-for-{}", field.key)),
                ValueKind::Int => ConfigValue::Int(321),
                ValueKind::Bool => ConfigValue::Bool(true),
            };
            set(&mut doc, field.key, value.clone()).unwrap();
            assert_eq!(get(&doc, field.key).unwrap(), value, "{}", field.key);
        }
    }

    #[test]
    fn set_max_length_writes_through_to_document() {
        let mut doc = ConfigDocument::default();
        set(&mut doc, "commit.max_length", ConfigValue::Int(300)).unwrap();
        assert_eq!(doc.commit.max_length, 300);
        assert_eq!(get(&doc, "commit.max_length").unwrap(), ConfigValue::Int(300));
    }

    #[test]
    fn commit_type_key_maps_to_renamed_field() {
        let mut doc = ConfigDocument::default();
        set(&mut doc, "commit.type", ConfigValue::from("default")).unwrap();
        assert_eq!(doc.commit.commit_type, "default");
    }

    #[test]
    fn unknown_segments_fail() {
        let doc = ConfigDocument::default();
        for key in ["", "openai.", "nope", "openai.nope", "nope.api_key", "OpenAI.api_key"] {
            assert!(
                matches!(get(&doc, key), Err(PathError::UnknownPath { .. })),
                "{key:?} should not resolve"
            );
        }
    }

    #[test]
    fn group_is_not_a_leaf_and_leaf_is_not_a_group() {
        let mut doc = ConfigDocument::default();
        assert!(matches!(get(&doc, "openai"), Err(PathError::UnknownPath { .. })));
        assert!(matches!(
            set(&mut doc, "openai.api_key.extra", ConfigValue::from("x")),
            Err(PathError::UnknownPath { .. })
        ));
    }

    #[test]
    fn type_mismatch_leaves_document_untouched() {
        let mut doc = ConfigDocument::default();
        let err = set(&mut doc, "commit.max_length", ConfigValue::from("300")).unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                key: "commit.max_length".to_string(),
                expected: ValueKind::Int,
                found: ValueKind::String,
            }
        );
        assert_eq!(doc, ConfigDocument::default());
    }

    #[test]
    fn negative_int_is_out_of_range() {
        let mut doc = ConfigDocument::default();
        let err = set(&mut doc, "commit.max_length", ConfigValue::Int(-1)).unwrap_err();
        assert!(matches!(err, PathError::OutOfRange { value: -1, .. }));
        assert_eq!(doc.commit.max_length, 150);
    }

    #[test]
    fn leaf_keys_cover_the_tree() {
        assert_eq!(leaf_keys().len(), 9);
        assert_eq!(resolve("preferences.auto_commit").unwrap().kind, ValueKind::Bool);
    }
}
