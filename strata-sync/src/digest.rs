//! Structural digest of YAML documents.
//!
//! Two documents share a digest when they decode to the same mapping,
//! regardless of key order, quoting, indentation or comments. The decoded
//! value is converted to JSON, serialized with RFC 8785 canonicalization
//! (sorted keys, fixed number formatting) and hashed with SHA-256.

use serde::Deserialize;
use serde_json::{Map, Number, Value as Json};
use serde_yaml::Value as Yaml;
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the canonical form of `data`.
///
/// Every document of a multi-document stream contributes, in order; empty
/// documents are skipped. Returns `None` when `data` does not decode, holds
/// no mapping document, or holds a document whose top level is not a
/// mapping. Callers treat `None` as "content differs".
pub fn structural_digest(data: &[u8]) -> Option<String> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_slice(data) {
        match Yaml::deserialize(document).ok()? {
            Yaml::Null => continue,
            value @ Yaml::Mapping(_) => documents.push(to_json(value)),
            _ => return None,
        }
    }
    let value = match documents.len() {
        0 => return None,
        1 => documents.pop()?,
        _ => Json::Array(documents),
    };
    let canonical = serde_json_canonicalizer::to_vec(&value).ok()?;

    let mut h = Sha256::new();
    h.update(&canonical);
    Some(hex::encode(h.finalize()))
}

/// True when both inputs decode to equal mappings.
pub fn same_structure(a: &[u8], b: &[u8]) -> bool {
    match (structural_digest(a), structural_digest(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn to_json(value: Yaml) -> Json {
    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => number_to_json(&n),
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(seq) => Json::Array(seq.into_iter().map(to_json).collect()),
        Yaml::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(key_string(&k), to_json(v));
            }
            Json::Object(out)
        }
        Yaml::Tagged(tagged) => {
            let mut out = Map::new();
            out.insert(tagged.tag.to_string(), to_json(tagged.value));
            Json::Object(out)
        }
    }
}

fn number_to_json(n: &serde_yaml::Number) -> Json {
    if let Some(i) = n.as_i64() {
        Json::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Json::Number(u.into())
    } else {
        // NaN and infinities have no JSON number form.
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(n.to_string()))
    }
}

/// Mapping keys become strings the way a JSON round-trip would render them.
fn key_string(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_json::to_string(&to_json(other.clone())).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_and_whitespace_do_not_matter() {
        let a = b"kind: ConfigMap\nmetadata:\n  name: web\n  labels: {a: '1', b: '2'}\n";
        let b = b"metadata:\n    labels:\n        b: \"2\"\n        a: \"1\"\n    name: web\nkind:   ConfigMap\n";
        assert!(same_structure(a, b));
    }

    #[test]
    fn comments_do_not_matter() {
        let a = b"kind: ConfigMap # trailing\n";
        let b = b"# header\nkind: ConfigMap\n";
        assert!(same_structure(a, b));
    }

    #[test]
    fn value_change_matters() {
        assert!(!same_structure(b"replicas: 2\n", b"replicas: 3\n"));
    }

    #[test]
    fn string_and_number_differ() {
        assert!(!same_structure(b"port: 80\n", b"port: \"80\"\n"));
    }

    #[test]
    fn sequence_order_matters() {
        assert!(!same_structure(b"args: [a, b]\n", b"args: [b, a]\n"));
    }

    #[test]
    fn non_mapping_has_no_digest() {
        assert!(structural_digest(b"- a\n- b\n").is_none());
        assert!(structural_digest(b"just a string\n").is_none());
        assert!(structural_digest(b"").is_none());
    }

    #[test]
    fn invalid_yaml_has_no_digest() {
        assert!(structural_digest(b"a: [unclosed\n").is_none());
        assert!(!same_structure(b"a: [unclosed\n", b"a: [unclosed\n"));
    }

    #[test]
    fn every_document_contributes() {
        let a = b"kind: ConfigMap\n---\nkind: Service\nspec: {port: 80}\n";
        let b = b"kind: ConfigMap\n---\nspec:\n  port: 80\nkind: Service\n";
        let c = b"kind: ConfigMap\n---\nkind: Service\nspec: {port: 81}\n";
        assert!(same_structure(a, b));
        assert!(!same_structure(a, c));
        assert!(!same_structure(a, b"kind: ConfigMap\n"));
    }

    #[test]
    fn separators_and_empty_documents_are_ignored() {
        assert!(same_structure(b"---\nkind: ConfigMap\n---\n", b"kind: ConfigMap\n"));
    }

    #[test]
    fn non_mapping_document_in_stream_has_no_digest() {
        assert!(structural_digest(b"kind: ConfigMap\n---\n- a\n").is_none());
    }

    #[test]
    fn digest_is_hex_sha256() {
        let d = structural_digest(b"a: 1\n").unwrap();
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn non_string_keys_are_supported() {
        assert!(same_structure(b"1: a\ntrue: b\n", b"true: b\n1: a\n"));
    }
}
