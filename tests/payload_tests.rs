/// Unit tests for payload preparation
/// Tests field validation, endpoint shaping and auth-mode credential rules
use career_signals_console::errors::AppError;
use career_signals_console::models::*;
use career_signals_console::payload::{build_payload, prepare, shape, validate};
use serde_json::json;

fn role_fit_with_weightings(skills: serde_json::Value) -> FormState {
    FormState::RoleFit(RoleFitForm {
        weightings: WeightingsInput {
            skills,
            domain: json!(0.3),
            seniority: json!(0.2),
            leadership: json!(0.1),
        },
        ..Default::default()
    })
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_blank_profile_text_rejected_for_every_form() {
        let forms = vec![
            FormState::Profile(ProfileForm {
                profile_text: "   ".to_string(),
                ..Default::default()
            }),
            FormState::RoleFit(RoleFitForm {
                profile_text: String::new(),
                ..Default::default()
            }),
            FormState::Bullets(BulletForm {
                profile_text: "\n\t".to_string(),
                ..Default::default()
            }),
        ];

        for form in forms {
            let err = validate(&form).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", form.kind());
            assert!(err.to_string().contains("profile_text"));
        }
    }

    #[test]
    fn test_role_fit_requires_job_description() {
        let form = FormState::RoleFit(RoleFitForm {
            job_description: " ".to_string(),
            ..Default::default()
        });

        let err = validate(&form).unwrap_err();
        assert!(err.to_string().contains("job_description"));
    }

    #[test]
    fn test_bullets_job_description_optional() {
        let form = FormState::Bullets(BulletForm {
            job_description: String::new(),
            ..Default::default()
        });
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_validation_runs_before_auth() {
        let form = FormState::Profile(ProfileForm {
            profile_text: String::new(),
            ..Default::default()
        });

        // No key either, but the field error wins
        let err = build_payload(&form, AuthMode::Header, "").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

#[cfg(test)]
mod auth_tests {
    use super::*;

    #[test]
    fn test_header_mode_requires_shared_key() {
        for kind in FormKind::ALL {
            let err = build_payload(&FormState::defaults(kind), AuthMode::Header, "").unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
            assert!(err.to_string().contains("missing API key for header auth"));
        }
    }

    #[test]
    fn test_header_mode_strips_credential_field() {
        let form = FormState::Profile(ProfileForm {
            test_api_key: "form-key".to_string(),
            ..Default::default()
        });

        let payload = build_payload(&form, AuthMode::Header, "shared-key").unwrap();
        assert!(payload.get(CREDENTIAL_FIELD).is_none());
        assert_eq!(payload["locale"], json!("en-US"));
        assert_eq!(payload["include_leadership_signals"], json!(true));
    }

    #[test]
    fn test_body_mode_prefers_form_key() {
        let form = FormState::Bullets(BulletForm {
            test_api_key: "  form-key  ".to_string(),
            ..Default::default()
        });

        let payload = build_payload(&form, AuthMode::Body, "shared-key").unwrap();
        assert_eq!(payload[CREDENTIAL_FIELD], json!("form-key"));
    }

    #[test]
    fn test_body_mode_falls_back_to_shared_key() {
        for kind in FormKind::ALL {
            let payload = build_payload(&FormState::defaults(kind), AuthMode::Body, "shared-key")
                .unwrap();
            assert_eq!(payload[CREDENTIAL_FIELD], json!("shared-key"));
        }
    }

    #[test]
    fn test_body_mode_blank_form_key_falls_back() {
        let form = FormState::Profile(ProfileForm {
            test_api_key: "   ".to_string(),
            ..Default::default()
        });

        let payload = build_payload(&form, AuthMode::Body, "shared-key").unwrap();
        assert_eq!(payload[CREDENTIAL_FIELD], json!("shared-key"));
    }

    #[test]
    fn test_body_mode_without_any_key_fails() {
        let err = build_payload(&FormState::defaults(FormKind::RoleFit), AuthMode::Body, "")
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("test_api_key"));
    }

    #[test]
    fn test_prepare_leaves_other_fields_untouched() {
        let body = shape(&FormState::defaults(FormKind::Profile));
        let prepared = prepare(body.clone(), AuthMode::Body, "k").unwrap();

        for (key, value) in &body {
            if key != CREDENTIAL_FIELD {
                assert_eq!(&prepared[key], value);
            }
        }
    }
}

#[cfg(test)]
mod shaping_tests {
    use super::*;

    #[test]
    fn test_role_fit_non_numeric_weighting_coerces_to_zero() {
        let payload =
            build_payload(&role_fit_with_weightings(json!("abc")), AuthMode::Body, "k").unwrap();

        let weightings = &payload["options"]["weightings"];
        assert_eq!(weightings["skills"], json!(0));
        assert_eq!(weightings["domain"], json!(0.3));
        assert_eq!(weightings["seniority"], json!(0.2));
        assert_eq!(weightings["leadership"], json!(0.1));
    }

    #[test]
    fn test_role_fit_numeric_text_weighting_parsed() {
        let payload =
            build_payload(&role_fit_with_weightings(json!("0.45")), AuthMode::Body, "k").unwrap();
        assert_eq!(payload["options"]["weightings"]["skills"], json!(0.45));
    }

    #[test]
    fn test_role_fit_payload_layout() {
        let payload =
            build_payload(&FormState::defaults(FormKind::RoleFit), AuthMode::Header, "k").unwrap();

        let mut keys: Vec<&str> = payload.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["job_description", "locale", "options", "profile_text"]);
        assert_eq!(payload["options"]["target_seniority_hint"], json!("Staff"));
    }

    #[test]
    fn test_role_fit_seniority_hint_kept_as_entered() {
        let form = FormState::RoleFit(RoleFitForm {
            target_seniority_hint: " Principal ".to_string(),
            ..Default::default()
        });
        let payload = build_payload(&form, AuthMode::Header, "k").unwrap();
        assert_eq!(payload["options"]["target_seniority_hint"], json!(" Principal "));
    }

    #[test]
    fn test_bullets_invalid_max_coerces_to_zero() {
        let form = FormState::Bullets(BulletForm {
            max_bullets: json!("lots"),
            ..Default::default()
        });

        let payload = build_payload(&form, AuthMode::Header, "k").unwrap();
        assert_eq!(payload["max_bullets"], json!(0));
    }

    #[test]
    fn test_bullets_text_max_parsed() {
        let form = FormState::Bullets(BulletForm {
            max_bullets: json!("4"),
            ..Default::default()
        });

        let payload = build_payload(&form, AuthMode::Header, "k").unwrap();
        assert_eq!(payload["max_bullets"], json!(4));
        assert_eq!(payload["role_title"], json!("VP of Engineering"));
    }
}
