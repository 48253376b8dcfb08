//! Data desensitization (masking) for report text and JSON
//!
//! Masking keeps enough of a value to recognize it (first characters, last
//! digits, domain) and replaces the rest with `*`. It never fails: values
//! too short to partially reveal are masked completely.

use regex::{Captures, Regex};
use serde_json::{Map, Value};

const MASK: char = '*';

/// Kind of sensitive field, inferred from a JSON key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Phone,
    IdNumber,
    Name,
    IpAddress,
}

impl FieldKind {
    /// Classify a JSON key (`"email"`, `"contact_phone"`, `"id-card"`, ...)
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match key.as_str() {
            "email" | "mail" | "e_mail" => FieldKind::Email,
            "phone" | "mobile" | "tel" | "telephone" | "phone_number" => FieldKind::Phone,
            "id_number" | "id_card" | "idcard" | "ssn" | "national_id" => FieldKind::IdNumber,
            "name" | "real_name" | "full_name" | "username" | "user_name" | "customer_name" => {
                FieldKind::Name
            }
            "ip" | "ip_address" | "client_ip" => FieldKind::IpAddress,
            k if k.ends_with("_email") => FieldKind::Email,
            k if k.ends_with("_phone") || k.ends_with("_mobile") => FieldKind::Phone,
            _ => return None,
        };
        Some(kind)
    }

    pub fn mask(&self, value: &str) -> String {
        match self {
            FieldKind::Email => mask_email(value),
            FieldKind::Phone => mask_phone(value),
            FieldKind::IdNumber => mask_id_number(value),
            FieldKind::Name => mask_name(value),
            FieldKind::IpAddress => mask_ip(value),
        }
    }
}

/// Keep `keep_start` leading and `keep_end` trailing characters.
/// Values not longer than `keep_start + keep_end` are fully masked.
pub fn mask_middle(value: &str, keep_start: usize, keep_end: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    if len <= keep_start + keep_end {
        return MASK.to_string().repeat(len);
    }
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i < keep_start || i >= len - keep_end {
                *c
            } else {
                MASK
            }
        })
        .collect()
}

/// `alice@example.com` → `a***@example.com`
pub fn mask_email(value: &str) -> String {
    match value.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => mask_middle(value, 1, 0),
    }
}

/// `13812345678` → `138****5678`
pub fn mask_phone(value: &str) -> String {
    mask_middle(value, 3, 4)
}

/// Keep the 6-digit region prefix and the last 4 characters
pub fn mask_id_number(value: &str) -> String {
    mask_middle(value, 6, 4)
}

/// `Alice` → `A****`
pub fn mask_name(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if chars.clone().next().is_some() => {
            let rest = chars.count();
            format!("{}{}", first, MASK.to_string().repeat(rest))
        }
        Some(_) => MASK.to_string(),
        None => String::new(),
    }
}

/// `192.168.10.24` → `192.168.*.*`
pub fn mask_ip(value: &str) -> String {
    let octets: Vec<&str> = value.split('.').collect();
    if octets.len() == 4 {
        format!("{}.{}.*.*", octets[0], octets[1])
    } else {
        mask_middle(value, 0, 0)
    }
}

/// Finds sensitive values in free text and masks them
pub struct Desensitizer {
    patterns: Vec<(FieldKind, Regex)>,
}

impl Default for Desensitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Desensitizer {
    pub fn new() -> Self {
        // Emails go first so digits inside them are not taken for phones.
        let patterns = [
            (
                FieldKind::Email,
                r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            ),
            (FieldKind::IdNumber, r"\b(?:\d{17}[\dXx]|\d{15})\b"),
            (FieldKind::Phone, r"\b1[3-9]\d{9}\b"),
            (FieldKind::IpAddress, r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
        ];
        let patterns = patterns
            .into_iter()
            .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("static pattern is valid")))
            .collect();
        Self { patterns }
    }

    /// Mask every email, id number, phone number and IPv4 address in `text`
    pub fn desensitize_text(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (kind, regex) in &self.patterns {
            result = regex
                .replace_all(&result, |caps: &Captures| kind.mask(&caps[0]))
                .into_owned();
        }
        result
    }

    /// Mask a JSON document: values under sensitive keys are masked by key
    /// kind, every other string is scanned as text.
    pub fn desensitize_json(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let masked: Map<String, Value> = map
                    .iter()
                    .map(|(key, v)| {
                        let masked = match (FieldKind::from_key(key), v) {
                            (Some(kind), Value::String(s)) => Value::String(kind.mask(s)),
                            (Some(kind), Value::Number(n)) => {
                                Value::String(kind.mask(&n.to_string()))
                            }
                            _ => self.desensitize_json(v),
                        };
                        (key.clone(), masked)
                    })
                    .collect();
                Value::Object(masked)
            }
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.desensitize_json(v)).collect())
            }
            Value::String(s) => Value::String(self.desensitize_text(s)),
            other => other.clone(),
        }
    }
}
