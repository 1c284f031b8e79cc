//! Deterministic decision identifiers.
//!
//! Identical inputs produce identical directives, so a decision can be
//! named by hashing its canonical form:
//!
//! 1. Build the decision key (schema, url, route, outcome fields)
//! 2. Serialize via RFC 8785 (JCS): sorted keys, no whitespace
//! 3. decisionId = "d1_" || base32hex_lower(SHA256(keyBytes))
//!
//! The key uses integer basis points for the score so no float formatting
//! enters the hash.

use crate::directives::Verdict;
use crate::route::RouteDescriptor;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

pub const DECISION_ID_PREFIX: &str = "d1_";

/// Compute the decision id for a verdict bound to a URL.
pub fn decision_id(url: &str, route: &RouteDescriptor, canonical: &str, verdict: &Verdict) -> String {
    let key = decision_key(url, route, canonical, verdict);
    let hash = Sha256::digest(canonical_json(&key).as_bytes());
    format!("{DECISION_ID_PREFIX}{}", base32hex_lower(&hash))
}

fn decision_key(url: &str, route: &RouteDescriptor, canonical: &str, verdict: &Verdict) -> Value {
    json!({
        "schema": 1,
        "url": url,
        "route": serde_json::to_value(route).unwrap_or(Value::Null),
        "index": verdict.index,
        "follow": true,
        "canonical": canonical,
        "inSitemap": verdict.in_sitemap,
        "scoreBasisPoints": verdict.score.basis_points(),
        "reasonCodes": verdict.reason_codes.to_strings(),
        "gates": {
            "twoOfThree": verdict.gates.two_of_three,
            "scorePass": verdict.gates.score_pass,
            "hardFail": verdict.gates.hard_fail,
            "hardPass": verdict.gates.hard_pass,
        },
    })
}

/// RFC 8785 canonical JSON for the value shapes used in decision keys.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            out.push_str(&value.to_string());
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

/// RFC 4648 base32hex, lowercase, unpadded.
fn base32hex_lower(data: &[u8]) -> String {
    const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

    let mut encoded = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut pending: u32 = 0;
    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        pending += 8;
        while pending >= 5 {
            pending -= 5;
            encoded.push(char::from(ALPHABET[((buffer >> pending) & 0x1f) as usize]));
        }
        buffer &= (1 << pending) - 1;
    }
    if pending > 0 {
        encoded.push(char::from(ALPHABET[((buffer << (5 - pending)) & 0x1f) as usize]));
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::{ReasonCode, ReasonCodes};

    #[test]
    fn canonical_json_sorts_keys_without_whitespace() {
        let value = json!({"b": [1, {"z": null, "a": true}], "a": "x\"y"});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":"x\"y","b":[1,{"a":true,"z":null}]}"#
        );
    }

    #[test]
    fn base32hex_known_vectors() {
        // RFC 4648 §10 test vectors, lowercased and unpadded.
        assert_eq!(base32hex_lower(b""), "");
        assert_eq!(base32hex_lower(b"f"), "co");
        assert_eq!(base32hex_lower(b"fo"), "cpng");
        assert_eq!(base32hex_lower(b"foo"), "cpnmu");
        assert_eq!(base32hex_lower(b"foob"), "cpnmuog");
        assert_eq!(base32hex_lower(b"fooba"), "cpnmuoj1");
        assert_eq!(base32hex_lower(b"foobar"), "cpnmuoj1e8");
    }

    #[test]
    fn decision_ids_are_stable_and_sensitive() {
        let route = RouteDescriptor::city("austin-tx");
        let verdict = Verdict::tier1();
        let canonical = "https://www.example.com/austin-tx";
        let a = decision_id("/austin-tx", &route, canonical, &verdict);
        let b = decision_id("/austin-tx", &route, canonical, &verdict);
        assert_eq!(a, b);
        assert!(a.starts_with(DECISION_ID_PREFIX));
        assert_eq!(a.len(), DECISION_ID_PREFIX.len() + 52);

        let other = Verdict::hard_fail(ReasonCode::ManualNoindex);
        assert_ne!(a, decision_id("/austin-tx", &route, canonical, &other));

        let mut reasons = ReasonCodes::single(ReasonCode::Tier1AlwaysIndex);
        reasons.push(ReasonCode::InvariantCorrected);
        let amended = Verdict {
            reason_codes: reasons,
            ..Verdict::tier1()
        };
        assert_ne!(a, decision_id("/austin-tx", &route, canonical, &amended));
    }
}
