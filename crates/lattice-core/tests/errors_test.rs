use lattice_core::errors::{
    EntityKind, ErrorCode, LatticeError, PersistenceError, ValidationError,
};

#[test]
fn every_variant_maps_to_a_stable_code() {
    let cases = vec![
        (
            LatticeError::from(ValidationError::EmptyUpdate),
            "VALIDATION_ERROR",
        ),
        (
            LatticeError::AlreadyExists {
                kind: EntityKind::Edge,
                key: "a -[Knows]-> b".to_string(),
            },
            "ALREADY_EXISTS",
        ),
        (LatticeError::node_not_found("n1"), "NOT_FOUND"),
        (
            LatticeError::Forbidden {
                user_id: "u".to_string(),
                resource: "graph".to_string(),
                action: "read".to_string(),
                scope: "agent".to_string(),
            },
            "FORBIDDEN",
        ),
        (
            LatticeError::QuotaExceeded {
                agent_id: "agent".to_string(),
                kind: EntityKind::Node,
                limit: 10,
            },
            "QUOTA_EXCEEDED",
        ),
        (
            LatticeError::InvalidState {
                reason: "busy".to_string(),
            },
            "INVALID_STATE",
        ),
        (
            LatticeError::from(PersistenceError::failed("create_node", "disk full")),
            "INTERNAL_ERROR",
        ),
        (
            LatticeError::Internal {
                reason: "index".to_string(),
            },
            "INTERNAL_ERROR",
        ),
        (
            LatticeError::Config {
                reason: "bad".to_string(),
            },
            "CONFIG_ERROR",
        ),
    ];
    for (error, code) in cases {
        assert_eq!(error.code().as_str(), code, "{error}");
        assert_eq!(error.report().code.to_string(), code);
    }
}

#[test]
fn already_exists_counts_as_validation() {
    let duplicate = LatticeError::AlreadyExists {
        kind: EntityKind::Edge,
        key: "k".to_string(),
    };
    assert!(duplicate.is_validation());
    assert!(LatticeError::from(ValidationError::EmptyUpdate).is_validation());
    assert!(!LatticeError::edge_not_found("e").is_validation());
}

#[test]
fn internal_reports_hide_the_cause_in_details() {
    let error = LatticeError::from(PersistenceError::Unavailable {
        reason: "connection refused".to_string(),
    });
    let report = error.report();
    assert_eq!(report.code, ErrorCode::InternalError);
    assert!(!report.message.contains("connection refused"));
    let details = report.details.unwrap();
    assert!(details["cause"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[test]
fn report_serializes_with_screaming_code() {
    let report = LatticeError::node_not_found("n1").report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["details"]["id"], "n1");
    assert_eq!(json["details"]["kind"], "node");
    assert!(json["timestamp"].is_string());

    let bare = LatticeError::InvalidState {
        reason: "x".to_string(),
    }
    .report();
    let json = serde_json::to_value(&bare).unwrap();
    assert!(json.get("details").is_none());
}

#[test]
fn messages_name_the_offending_value() {
    let err = ValidationError::InvalidWeight { value: 1.5 };
    assert!(err.to_string().contains("1.5"));
    let err = LatticeError::node_not_found("abc");
    assert_eq!(err.to_string(), "node not found: abc");
}
