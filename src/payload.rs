//! Request preparation: field validation, endpoint shaping and credential
//! placement.

use crate::errors::AppError;
use crate::models::{
    AuthMode, BulletForm, FormState, RoleFitForm, WeightingsInput, CREDENTIAL_FIELD,
};
use serde_json::{json, Map, Value};

/// A finalized JSON request body.
pub type Payload = Map<String, Value>;

/// Checks the mandatory text fields of a form.
///
/// Runs before any shaping so a blank form never reaches the builder.
pub fn validate(form: &FormState) -> Result<(), AppError> {
    match form {
        FormState::Profile(f) if f.profile_text.trim().is_empty() => Err(AppError::Validation(
            "profile_text is required".to_string(),
        )),
        FormState::Bullets(f) if f.profile_text.trim().is_empty() => Err(AppError::Validation(
            "profile_text is required".to_string(),
        )),
        FormState::RoleFit(f)
            if f.profile_text.trim().is_empty() || f.job_description.trim().is_empty() =>
        {
            Err(AppError::Validation(
                "profile_text and job_description are required".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// Coerces a raw form input to a finite number, defaulting to zero.
///
/// Numbers pass through, text is parsed after trimming, booleans count as
/// 1 or 0 and everything else is zero.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// JSON representation of a coerced number; whole values become integers.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn coerced(value: &Value) -> Value {
    number_value(coerce_number(value))
}

fn weightings_value(w: &WeightingsInput) -> Value {
    json!({
        "skills": coerced(&w.skills),
        "domain": coerced(&w.domain),
        "seniority": coerced(&w.seniority),
        "leadership": coerced(&w.leadership),
    })
}

fn role_fit_body(form: &RoleFitForm) -> Payload {
    let mut options = Map::new();
    options.insert("weightings".to_string(), weightings_value(&form.weightings));
    if !form.target_seniority_hint.trim().is_empty() {
        options.insert(
            "target_seniority_hint".to_string(),
            json!(form.target_seniority_hint),
        );
    }

    let mut body = Map::new();
    body.insert("profile_text".to_string(), json!(form.profile_text));
    body.insert("job_description".to_string(), json!(form.job_description));
    body.insert("locale".to_string(), json!(form.locale));
    body.insert("options".to_string(), Value::Object(options));
    body.insert(CREDENTIAL_FIELD.to_string(), json!(form.test_api_key));
    body
}

fn bullet_body(form: &BulletForm) -> Payload {
    let mut body = object_of(form);
    body.insert("max_bullets".to_string(), coerced(&form.max_bullets));
    body
}

fn object_of<T: serde::Serialize>(value: &T) -> Payload {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Endpoint-specific shaping, before any credential handling.
pub fn shape(form: &FormState) -> Payload {
    match form {
        FormState::Profile(f) => object_of(f),
        FormState::RoleFit(f) => role_fit_body(f),
        FormState::Bullets(f) => bullet_body(f),
    }
}

/// Applies the auth-mode credential rules to a shaped body.
///
/// * `header`: the shared key must be set; the credential field is removed.
/// * `body`: the form's own credential wins when non-blank, otherwise the
///   shared key; the field is set to the trimmed winner.
pub fn prepare(
    mut body: Payload,
    auth_mode: AuthMode,
    shared_api_key: &str,
) -> Result<Payload, AppError> {
    match auth_mode {
        AuthMode::Header => {
            if shared_api_key.trim().is_empty() {
                return Err(AppError::Configuration(
                    "missing API key for header auth".to_string(),
                ));
            }
            body.remove(CREDENTIAL_FIELD);
            Ok(body)
        }
        AuthMode::Body => {
            let from_form = body
                .get(CREDENTIAL_FIELD)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or("");
            let chosen = if from_form.is_empty() {
                shared_api_key.trim()
            } else {
                from_form
            };
            if chosen.is_empty() {
                return Err(AppError::Configuration(format!(
                    "{} is required when using body auth mode",
                    CREDENTIAL_FIELD
                )));
            }
            let chosen = chosen.to_string();
            body.insert(CREDENTIAL_FIELD.to_string(), Value::String(chosen));
            Ok(body)
        }
    }
}

/// Full submit-time pipeline: validate, shape, then apply auth.
pub fn build_payload(
    form: &FormState,
    auth_mode: AuthMode,
    shared_api_key: &str,
) -> Result<Payload, AppError> {
    validate(form)?;
    prepare(shape(form), auth_mode, shared_api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileForm;

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(&json!(0.3)), 0.3);
        assert_eq!(coerce_number(&json!(" 4 ")), 4.0);
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!("inf")), 0.0);
        assert_eq!(coerce_number(&json!([1])), 0.0);
    }

    #[test]
    fn test_number_value_prefers_integers() {
        assert_eq!(number_value(6.0), json!(6));
        assert_eq!(number_value(0.0), json!(0));
        assert_eq!(number_value(0.25), json!(0.25));
    }

    #[test]
    fn test_profile_shape_is_passthrough() {
        let form = ProfileForm::default();
        let body = shape(&FormState::Profile(form.clone()));
        assert_eq!(body["locale"], json!("en-US"));
        assert_eq!(body["include_risk_signals"], json!(true));
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn test_role_fit_drops_blank_seniority_hint() {
        let form = RoleFitForm {
            target_seniority_hint: "   ".to_string(),
            ..Default::default()
        };
        let body = shape(&FormState::RoleFit(form));
        assert!(body["options"].get("target_seniority_hint").is_none());
        assert_eq!(body["options"]["weightings"]["skills"], json!(0.5));
        assert!(body.get("weightings").is_none());
    }

    #[test]
    fn test_header_mode_with_whitespace_key_fails() {
        let err = prepare(Map::new(), AuthMode::Header, "   ").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
