//! Declarative request validation.
//!
//! A route declares an ordered list of [`FieldChain`]s. Every rule of every
//! chain is evaluated independently, so a single field may report several
//! stacked errors. Handlers only run when the list comes back empty.
//!
//! Values are judged the way a JSON client sees them: each predicate works on
//! the raw `serde_json::Value` (or the raw path segment) and its text form.

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Body,
}

/// One predicate and the message reported when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: fn(Option<&Value>) -> bool,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(check: fn(Option<&Value>) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// Ordered rules for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub field: &'static str,
    pub location: Location,
    pub rules: &'static [Rule],
}

impl FieldChain {
    pub const fn param(field: &'static str, rules: &'static [Rule]) -> Self {
        Self { field, location: Location::Params, rules }
    }

    pub const fn body(field: &'static str, rules: &'static [Rule]) -> Self {
        Self { field, location: Location::Body, rules }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

/// Run every chain in order and collect one error per failed rule.
pub fn validate(chains: &[FieldChain], params: &HashMap<String, String>, body: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for chain in chains {
        let value = match chain.location {
            Location::Params => params.get(chain.field).map(|p| Value::String(p.clone())),
            Location::Body => body.get(chain.field).cloned(),
        };
        for rule in chain.rules {
            if !(rule.check)(value.as_ref()) {
                errors.push(FieldError {
                    kind: "field",
                    value: value.clone(),
                    msg: rule.message.to_string(),
                    path: chain.field.to_string(),
                    location: chain.location,
                });
            }
        }
    }
    errors
}

/// Text form of a value: missing and `null` are empty.
pub fn text_form(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items.iter().map(|v| text_form(Some(v))).collect::<Vec<_>>().join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").expect("valid numeric regex"));

/// Decimal literals a JSON client's `Number("...")` accepts: `5.`, `.5`, `1e3`.
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("valid decimal regex"));

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
        .unwrap_or(f64::NAN)
}

/// String to number the way `Number("...")` does: trimmed, empty is 0,
/// decimal and exponent forms, signed `Infinity`, unsigned `0x`/`0o`/`0b`.
fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let (Some(prefix), Some(digits)) = (s.get(..2), s.get(2..)) {
        match prefix {
            "0x" | "0X" => return parse_radix(digits, 16),
            "0o" | "0O" => return parse_radix(digits, 8),
            "0b" | "0B" => return parse_radix(digits, 2),
            _ => {}
        }
    }
    if DECIMAL_RE.is_match(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Numeric coercion used by the positivity check; NaN when the value has no number.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => string_to_number(s),
        // arrays compare through their text form, `[5]` is 5 and `[]` is 0
        Some(Value::Array(_)) => string_to_number(&text_form(value)),
        Some(Value::Object(_)) => f64::NAN,
    }
}

pub fn to_bool(value: Option<&Value>) -> Option<bool> {
    match text_form(value).as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn to_i32(value: Option<&Value>) -> Option<i32> {
    match value {
        Some(Value::String(s)) => s.parse::<i32>().ok(),
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        _ => None,
    }
}

pub fn is_int(value: Option<&Value>) -> bool {
    to_i32(value).is_some()
}

pub fn not_empty(value: Option<&Value>) -> bool {
    !text_form(value).is_empty()
}

pub fn is_numeric(value: Option<&Value>) -> bool {
    NUMERIC_RE.is_match(&text_form(value))
}

/// `value > 0` after coercion; `"Infinity"` passes here and fails the type rule instead.
pub fn is_positive(value: Option<&Value>) -> bool {
    to_number(value) > 0.0
}

pub fn is_boolean(value: Option<&Value>) -> bool {
    to_bool(value).is_some()
}

/// Rules bound to a route plus how to turn a request that passed them into
/// typed handler input.
pub trait RuleSet: Send + 'static {
    type Input: Send;

    const CHAINS: &'static [FieldChain];

    /// Only called after every rule in `CHAINS` passed.
    fn decode(params: &HashMap<String, String>, body: &Value) -> Option<Self::Input>;

    fn reads_body() -> bool {
        Self::CHAINS.iter().any(|c| c.location == Location::Body)
    }
}

/// Extractor running a [`RuleSet`] before the handler.
pub struct Validated<R: RuleSet>(pub R::Input);

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn parse_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

#[async_trait]
impl<S, R> FromRequest<S> for Validated<R>
where
    S: Send + Sync,
    R: RuleSet,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        // undecodable segments count as a missing parameter
        let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await {
            Ok(Path(p)) => p,
            Err(_) => HashMap::new(),
        };

        // bodies not declared as JSON are ignored and validate as `{}`
        let body = if R::reads_body() && is_json(&parts.headers) {
            let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
                .await
                .map_err(|e| ApiError::MalformedBody(e.body_text()))?;
            parse_body(&bytes)?
        } else {
            Value::Object(Default::default())
        };

        let errors = validate(R::CHAINS, &params, &body);
        if !errors.is_empty() {
            debug!(count = errors.len(), "request_validation_failed");
            return Err(ApiError::Validation(errors));
        }

        R::decode(&params, &body)
            .map(Validated)
            .ok_or_else(|| ApiError::Internal("validated request could not be decoded".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PRICE: &[Rule] = &[
        Rule::new(is_numeric, "Valor no valido"),
        Rule::new(not_empty, "El precio del Producto no puede ir vacio"),
        Rule::new(is_positive, "Precio no valido"),
    ];

    fn body_chains() -> [FieldChain; 1] {
        [FieldChain::body("price", PRICE)]
    }

    fn messages(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.msg.as_str()).collect()
    }

    #[test]
    fn missing_price_fails_every_rule() {
        let errors = validate(&body_chains(), &HashMap::new(), &json!({}));
        assert_eq!(messages(&errors), vec!["Valor no valido", "El precio del Producto no puede ir vacio", "Precio no valido"]);
        assert!(errors.iter().all(|e| e.value.is_none() && e.location == Location::Body));
    }

    #[test]
    fn zero_price_only_fails_positivity() {
        let errors = validate(&body_chains(), &HashMap::new(), &json!({"price": 0}));
        assert_eq!(messages(&errors), vec!["Precio no valido"]);
        assert_eq!(errors[0].value, Some(json!(0)));
    }

    #[test]
    fn text_price_stacks_type_and_positivity() {
        let errors = validate(&body_chains(), &HashMap::new(), &json!({"price": "hola"}));
        assert_eq!(messages(&errors), vec!["Valor no valido", "Precio no valido"]);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        assert!(validate(&body_chains(), &HashMap::new(), &json!({"price": "49.90"})).is_empty());
        assert!(validate(&body_chains(), &HashMap::new(), &json!({"price": ".5"})).is_empty());
        assert!(!validate(&body_chains(), &HashMap::new(), &json!({"price": "5."})).is_empty());
        assert!(!validate(&body_chains(), &HashMap::new(), &json!({"price": "-5"})).is_empty());
    }

    #[test]
    fn loose_number_forms_only_fail_the_type_rule() {
        for price in ["5.", "1e3", "Infinity", "0x1F", " 7 "] {
            let errors = validate(&body_chains(), &HashMap::new(), &json!({"price": price}));
            assert_eq!(messages(&errors), vec!["Valor no valido"], "price {price:?}");
        }
    }

    #[test]
    fn string_coercion_follows_client_number_rules() {
        let n = |s: &str| to_number(Some(&Value::String(s.to_string())));
        assert_eq!(n("5."), 5.0);
        assert_eq!(n("1e3"), 1000.0);
        assert_eq!(n("-.5"), -0.5);
        assert_eq!(n("0b101"), 5.0);
        assert_eq!(n("0o17"), 15.0);
        assert_eq!(n(""), 0.0);
        assert_eq!(n("-Infinity"), f64::NEG_INFINITY);
        assert!(n("inf").is_nan());
        assert!(n("NaN").is_nan());
        assert!(n("-0x10").is_nan());
        assert!(n("0x").is_nan());
        assert!(n("12abc").is_nan());
        assert_eq!(to_number(Some(&json!([5]))), 5.0);
        assert!(to_number(Some(&json!([1, 2]))).is_nan());
    }

    #[test]
    fn only_json_content_types_are_parsed() {
        let headers = |ct: &str| {
            let mut h = HeaderMap::new();
            h.insert(CONTENT_TYPE, ct.parse().unwrap());
            h
        };
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("Application/JSON; charset=utf-8")));
        assert!(is_json(&headers("application/merge-patch+json")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn integer_ids() {
        let id = |s: &str| Value::String(s.to_string());
        assert!(is_int(Some(&id("1"))));
        assert!(is_int(Some(&id("-3"))));
        assert!(is_int(Some(&id("007"))));
        assert!(!is_int(Some(&id("not-valid-url"))));
        assert!(!is_int(Some(&id("1.5"))));
        assert!(!is_int(Some(&id("99999999999"))));
        assert!(!is_int(None));
    }

    #[test]
    fn booleans_accept_strings_and_bits() {
        assert_eq!(to_bool(Some(&json!(true))), Some(true));
        assert_eq!(to_bool(Some(&json!("false"))), Some(false));
        assert_eq!(to_bool(Some(&json!(1))), Some(true));
        assert_eq!(to_bool(Some(&json!(0))), Some(false));
        assert_eq!(to_bool(Some(&json!("yes"))), None);
        assert_eq!(to_bool(None), None);
    }

    #[test]
    fn text_form_matches_client_view() {
        assert_eq!(text_form(None), "");
        assert_eq!(text_form(Some(&Value::Null)), "");
        assert_eq!(text_form(Some(&json!(12))), "12");
        assert_eq!(text_form(Some(&json!([1, "a"]))), "1,a");
        assert!(not_empty(Some(&json!({"nested": true}))));
        assert!(!not_empty(Some(&json!(""))));
        assert!(!not_empty(Some(&json!([]))));
    }

    #[test]
    fn params_are_reported_with_their_raw_value() {
        const ID: &[Rule] = &[Rule::new(is_int, "ID no valido")];
        let mut params = HashMap::new();
        params.insert("id".to_string(), "abc".to_string());
        let errors = validate(&[FieldChain::param("id", ID)], &params, &json!({}));
        assert_eq!(errors.len(), 1);
        let v = serde_json::to_value(&errors[0]).unwrap();
        assert_eq!(v, json!({"type": "field", "value": "abc", "msg": "ID no valido", "path": "id", "location": "params"}));
    }

    #[test]
    fn empty_and_invalid_bodies() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b"  \n").unwrap(), json!({}));
        assert!(matches!(parse_body(b"{oops"), Err(ApiError::MalformedBody(_))));
    }
}
