// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const AGENT_STATISTICS: &str = r#"
{
    "serverTime": 1662067531436,
    "version": "v3.4.6-6-g4eee038",
    "connectedAgents": [
        {
            "name": "smith",
            "session": "0001HH270W7TD8DZZ6STNY2ASX",
            "connectionType": "direct",
            "endpoints": [
                {
                    "name": "whoami",
                    "type": "whoami",
                    "configured": true,
                    "annotations": { "description": "demo service" }
                }
            ],
            "version": "v3.4.6-6-g4eee038",
            "hostname": "studio.local",
            "connectedAt": 1662065692965,
            "lastPing": 1662067522916,
            "agentInfo": { "annotations": { "description": "demo agent" } }
        }
    ]
}
"#;

#[test]
fn empty_body_is_protocol_error() {
    let err = parse_connected_agents(b"").err();
    assert!(matches!(err, Some(SyncError::Protocol(_))), "got {err:?}");
}

#[test]
fn connected_agents_ignores_extra_fields() -> anyhow::Result<()> {
    let sessions = parse_connected_agents(AGENT_STATISTICS.as_bytes())?;

    assert_eq!(sessions.len(), 1);
    let smith = &sessions[0];
    assert_eq!(smith.name, "smith");
    assert_eq!(smith.connected_at, 1662065692965);
    assert_eq!(smith.endpoints.len(), 1);
    assert_eq!(smith.endpoints[0].endpoint_type, "whoami");
    assert!(smith.endpoints[0].configured);
    assert_eq!(
        smith.endpoints[0].annotations.get("description").map(String::as_str),
        Some("demo service")
    );
    Ok(())
}

#[test]
fn missing_agent_list_decodes_as_empty() -> anyhow::Result<()> {
    let sessions = parse_connected_agents(br#"{"serverTime": 1}"#)?;
    assert!(sessions.is_empty());
    Ok(())
}

#[test]
fn credentials_request_uses_controller_field_names() -> anyhow::Result<()> {
    let key = ServiceKey::new("smith", "whoami", "whoami-type");
    let json = serde_json::to_value(CredentialsRequest::from(&key))?;
    assert_eq!(json["agentName"], "smith");
    assert_eq!(json["name"], "whoami");
    assert_eq!(json["type"], "whoami-type");
    Ok(())
}

#[test]
fn credentials_response_extracts_password() -> anyhow::Result<()> {
    let body = br#"{
        "agentName": "smith",
        "name": "whoami",
        "type": "whoami",
        "credentialType": "basic",
        "credential": { "username": "svc", "password": "s3cret" },
        "url": "https://smith.whoami.example:8443"
    }"#;
    let creds = parse_credentials(body)?;
    assert_eq!(creds.url, "https://smith.whoami.example:8443");
    assert_eq!(creds.credential.password, "s3cret");
    assert_eq!(creds.credential_type, "basic");
    Ok(())
}

#[test]
fn malformed_credentials_is_protocol_error() {
    let err = parse_credentials(b"{not json").err();
    assert!(matches!(err, Some(SyncError::Protocol(_))), "got {err:?}");
}

#[test]
fn null_agent_list_decodes_as_empty() -> anyhow::Result<()> {
    let sessions = parse_connected_agents(br#"{"serverTime": 1, "connectedAgents": null}"#)?;
    assert!(sessions.is_empty());
    Ok(())
}

#[test]
fn null_endpoints_decode_as_empty() -> anyhow::Result<()> {
    let sessions = parse_connected_agents(
        br#"{"connectedAgents": [{"name": "smith", "connectedAt": 5, "endpoints": null}]}"#,
    )?;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].name, "smith");
    assert!(sessions[0].endpoints.is_empty());
    Ok(())
}

#[test]
fn null_annotations_do_not_poison_other_agents() -> anyhow::Result<()> {
    let body = br#"{"connectedAgents": [
        {"name": "smith", "connectedAt": 1, "endpoints": [
            {"name": "whoami", "type": "whoami", "configured": true, "annotations": null}
        ]},
        {"name": "jones", "connectedAt": 2, "endpoints": [
            {"name": "argo", "type": "argocd", "configured": true, "annotations": {"a": "b"}}
        ]}
    ]}"#;
    let sessions = parse_connected_agents(body)?;

    assert_eq!(sessions.len(), 2);
    assert!(sessions[0].endpoints[0].annotations.is_empty());
    assert_eq!(sessions[1].endpoints[0].annotations.get("a").map(String::as_str), Some("b"));
    Ok(())
}

#[test]
fn null_scalar_fields_decode_as_defaults() -> anyhow::Result<()> {
    let sessions = parse_connected_agents(
        br#"{"connectedAgents": [{"name": null, "connectedAt": null, "endpoints": [
            {"name": null, "type": null, "configured": null, "annotations": {}}
        ]}]}"#,
    )?;
    let session = &sessions[0];
    assert_eq!(session.name, "");
    assert_eq!(session.connected_at, 0);
    assert_eq!(session.endpoints[0].endpoint_type, "");
    assert!(!session.endpoints[0].configured);

    let creds = parse_credentials(
        br#"{"url": "https://x.example", "credentialType": null, "credential": null}"#,
    )?;
    assert_eq!(creds.url, "https://x.example");
    assert_eq!(creds.credential_type, "");
    assert_eq!(creds.credential.password, "");
    Ok(())
}
