//! Declarative configuration integration tests

use chrono::{TimeZone, Utc};
use std::io::Write;
use std::sync::Arc;
use warden_authz::{
    AttributeBag, AuthorizationConfig, DenyReason, FixedClock, PrincipalId, ScopeBag,
};

const POLICY: &str = r#"{
    "roles": [
        {
            "id": "role:approver",
            "name": "Invoice approver",
            "grants": [
                {
                    "permission": "invoice:approve",
                    "scope": { "tenant": "acme" },
                    "condition": "attributes.amount < 10000"
                },
                { "permission": "invoice:read" }
            ]
        },
        {
            "id": "role:contractor",
            "grants": [{ "permission": "timesheet:*" }]
        }
    ],
    "assignments": [
        { "principal": "user:42", "role": "role:approver" },
        {
            "principal": "user:99",
            "role": "role:contractor",
            "not_before": "2026-01-01T00:00:00Z",
            "not_after": "2026-07-01T00:00:00Z"
        }
    ]
}"#;

#[tokio::test]
async fn test_config_document_drives_decisions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(POLICY.as_bytes()).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    let host = AuthorizationConfig::from_file(file.path())
        .unwrap()
        .into_builder()
        .unwrap()
        .with_clock(Arc::new(FixedClock(now)))
        .build()
        .await
        .unwrap();

    let approve = |amount: i64| {
        let host = host.clone();
        async move {
            host.for_principal(PrincipalId::new("user:42"))
                .try_on("invoice:approve")
                .unwrap()
                .in_scope(ScopeBag::new().with("tenant", "acme"))
                .with_attributes(AttributeBag::new().with("amount", amount))
                .evaluate()
                .await
                .unwrap()
        }
    };

    assert!(approve(500).await.is_allowed());
    assert_eq!(
        approve(20000).await.deny_reason(),
        DenyReason::AttributeEvaluationFailed
    );

    let contractor = host
        .for_principal(PrincipalId::new("user:99"))
        .try_on("timesheet:submit")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert!(contractor.is_allowed());
}

#[tokio::test]
async fn test_config_assignment_window_expires() {
    let later = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
    let host = AuthorizationConfig::from_json_str(POLICY)
        .unwrap()
        .into_builder()
        .unwrap()
        .with_clock(Arc::new(FixedClock(later)))
        .build()
        .await
        .unwrap();

    let decision = host
        .for_principal(PrincipalId::new("user:99"))
        .try_on("timesheet:submit")
        .unwrap()
        .evaluate()
        .await
        .unwrap();
    assert_eq!(decision.deny_reason(), DenyReason::AssignmentNotActive);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = AuthorizationConfig::from_json_str(POLICY).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let reparsed = AuthorizationConfig::from_json_str(&json).unwrap();
    assert_eq!(config, reparsed);
}
