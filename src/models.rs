use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Name of the body field carrying the credential in body-auth mode.
pub const CREDENTIAL_FIELD: &str = "test_api_key";

const SAMPLE_PROFILE_TEXT: &str = "Senior Software Engineer with 10+ years …";

// ============ Session Models ============

/// Where credentials travel on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// `Authorization: Bearer <key>` header.
    #[default]
    Header,
    /// `test_api_key` field inside the JSON payload.
    Body,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Header => write!(f, "header"),
            AuthMode::Body => write!(f, "body"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(AuthMode::Header),
            "body" => Ok(AuthMode::Body),
            other => Err(format!("unknown auth mode '{}', expected header or body", other)),
        }
    }
}

/// The three forms the console drives, one per upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "role-fit")]
    RoleFit,
    #[serde(rename = "bullets")]
    Bullets,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::Profile, FormKind::RoleFit, FormKind::Bullets];

    /// Upstream endpoint path for this form.
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::Profile => "/v1/analyze/profile",
            FormKind::RoleFit => "/v1/analyze/role-fit",
            FormKind::Bullets => "/v1/suggest/bullets",
        }
    }

    /// Canned response returned in stub mode.
    pub fn stub_response(&self) -> Value {
        match self {
            FormKind::Profile => json!({
                "summary": "Stubbed profile analysis response.",
                "leadership_signals": ["Vision setting", "Coaching"],
                "risk_signals": ["Needs clearer delivery metrics"]
            }),
            FormKind::RoleFit => json!({
                "match_score": 0.82,
                "strengths": ["Strong system design background", "Team leadership"],
                "gaps": ["Limited domain knowledge in fintech"]
            }),
            FormKind::Bullets => json!({
                "bullets": [
                    "Architected and shipped a multi-region service migration reducing latency by 30%.",
                    "Implemented engineering excellence program improving on-call MTTR by 25%.",
                    "Coached senior ICs into tech lead roles, increasing team velocity sustainably."
                ]
            }),
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Profile => write!(f, "profile"),
            FormKind::RoleFit => write!(f, "role-fit"),
            FormKind::Bullets => write!(f, "bullets"),
        }
    }
}

/// Runtime-adjustable session settings.
///
/// The shared API key is deliberately absent: it comes from deployment
/// configuration and is never user-editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub auth_mode: AuthMode,
    pub use_stub: bool,
}

/// Partial update for [`Settings`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub base_url: Option<String>,
    pub auth_mode: Option<AuthMode>,
    pub use_stub: Option<bool>,
}

/// Settings as exposed to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub base_url: String,
    pub auth_mode: AuthMode,
    pub use_stub: bool,
    /// Whether a shared API key was supplied at deploy time.
    pub api_key_configured: bool,
}

// ============ Form Models ============

/// Inputs for `POST /v1/analyze/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub profile_text: String,
    pub locale: String,
    pub include_leadership_signals: bool,
    pub include_risk_signals: bool,
    pub test_api_key: String,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            profile_text: SAMPLE_PROFILE_TEXT.to_string(),
            locale: "en-US".to_string(),
            include_leadership_signals: true,
            include_risk_signals: true,
            test_api_key: String::new(),
        }
    }
}

/// Raw weighting inputs as typed by the user.
///
/// Values stay as entered (number or text) until the payload is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingsInput {
    pub skills: Value,
    pub domain: Value,
    pub seniority: Value,
    pub leadership: Value,
}

impl Default for WeightingsInput {
    fn default() -> Self {
        Self {
            skills: json!(0.5),
            domain: json!(0.2),
            seniority: json!(0.2),
            leadership: json!(0.1),
        }
    }
}

/// Inputs for `POST /v1/analyze/role-fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleFitForm {
    pub profile_text: String,
    pub job_description: String,
    pub locale: String,
    pub target_seniority_hint: String,
    pub weightings: WeightingsInput,
    pub test_api_key: String,
}

impl Default for RoleFitForm {
    fn default() -> Self {
        Self {
            profile_text: SAMPLE_PROFILE_TEXT.to_string(),
            job_description: "We are seeking a pragmatic engineering leader who can guide distributed teams, ship reliable services, and collaborate with product.".to_string(),
            locale: "en-US".to_string(),
            target_seniority_hint: "Staff".to_string(),
            weightings: WeightingsInput::default(),
            test_api_key: String::new(),
        }
    }
}

/// Inputs for `POST /v1/suggest/bullets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletForm {
    pub profile_text: String,
    pub job_description: String,
    pub role_title: String,
    pub max_bullets: Value,
    pub test_api_key: String,
}

impl Default for BulletForm {
    fn default() -> Self {
        Self {
            profile_text: SAMPLE_PROFILE_TEXT.to_string(),
            job_description: "Led platform modernization across multiple teams.".to_string(),
            role_title: "VP of Engineering".to_string(),
            max_bullets: json!(6),
            test_api_key: String::new(),
        }
    }
}

/// Values of one form, tagged by the endpoint it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Profile(ProfileForm),
    RoleFit(RoleFitForm),
    Bullets(BulletForm),
}

impl FormState {
    /// Default values for a form.
    pub fn defaults(kind: FormKind) -> Self {
        match kind {
            FormKind::Profile => FormState::Profile(ProfileForm::default()),
            FormKind::RoleFit => FormState::RoleFit(RoleFitForm::default()),
            FormKind::Bullets => FormState::Bullets(BulletForm::default()),
        }
    }

    /// Parses user-submitted values for the given form.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(kind: FormKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            FormKind::Profile => FormState::Profile(serde_json::from_value(value)?),
            FormKind::RoleFit => FormState::RoleFit(serde_json::from_value(value)?),
            FormKind::Bullets => FormState::Bullets(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> FormKind {
        match self {
            FormState::Profile(_) => FormKind::Profile,
            FormState::RoleFit(_) => FormKind::RoleFit,
            FormState::Bullets(_) => FormKind::Bullets,
        }
    }

    pub fn to_json(&self) -> Value {
        let value = match self {
            FormState::Profile(form) => serde_json::to_value(form),
            FormState::RoleFit(form) => serde_json::to_value(form),
            FormState::Bullets(form) => serde_json::to_value(form),
        };
        // Plain structs of strings, bools and JSON values always serialize.
        value.unwrap_or(Value::Null)
    }
}

// ============ Submission Models ============

/// Outcome of one dispatch.
///
/// `status` is absent when nothing reached the upstream service
/// (validation, configuration or transport failure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
}

impl RequestResult {
    /// A result carrying only an error description.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(s) if (200..300).contains(&s))
    }
}

/// Phase of a form's submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Snapshot of a form's submission state.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub phase: SubmissionPhase,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RequestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A form's values together with its submission state.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub form: FormKind,
    pub values: Value,
    pub submission: SubmissionView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_kind_endpoints() {
        assert_eq!(FormKind::Profile.endpoint(), "/v1/analyze/profile");
        assert_eq!(FormKind::RoleFit.endpoint(), "/v1/analyze/role-fit");
        assert_eq!(FormKind::Bullets.endpoint(), "/v1/suggest/bullets");
    }

    #[test]
    fn test_form_kind_path_names() {
        let kind: FormKind = serde_json::from_value(json!("role-fit")).unwrap();
        assert_eq!(kind, FormKind::RoleFit);
        assert_eq!(FormKind::RoleFit.to_string(), "role-fit");
        assert!(serde_json::from_value::<FormKind>(json!("reference")).is_err());
    }

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!("header".parse::<AuthMode>().unwrap(), AuthMode::Header);
        assert_eq!(" BODY ".parse::<AuthMode>().unwrap(), AuthMode::Body);
        assert!("cookie".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_partial_form_takes_defaults() {
        let state = FormState::from_json(
            FormKind::Bullets,
            json!({ "profile_text": "Staff engineer", "max_bullets": "4" }),
        )
        .unwrap();

        match state {
            FormState::Bullets(form) => {
                assert_eq!(form.profile_text, "Staff engineer");
                assert_eq!(form.max_bullets, json!("4"));
                assert_eq!(form.role_title, "VP of Engineering");
            }
            other => panic!("Expected bullets form, got {:?}", other),
        }
    }

    #[test]
    fn test_request_result_serializes_camel_case() {
        let result = RequestResult {
            status: Some(200),
            duration_ms: Some(12),
            response_body: Some(json!({"ok": true})),
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["durationMs"], json!(12));
        assert_eq!(value["responseBody"], json!({"ok": true}));
        assert!(value.get("error").is_none());
        assert!(result.is_success());
    }

    #[test]
    fn test_failure_result_has_no_status() {
        let result = RequestResult::failure("profile_text is required");
        assert!(result.status.is_none());
        assert!(!result.is_success());
    }
}
