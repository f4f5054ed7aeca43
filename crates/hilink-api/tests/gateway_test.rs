//! Gateway tests against the simulated vendor SDK

mod common;

use common::{machine, machine_with_programs, TestServer};
use hilink_core::{CollectDataType, ResponseData, ResponseMessage};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn post_json(server: &TestServer, path: &str, body: Value) -> (StatusCode, Value) {
    let response = server
        .http
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn get_json(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let response = server.http.get(server.url(path)).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

// =============================================================================
// /raw
// =============================================================================

#[tokio::test]
async fn test_raw_unknown_data_type_is_rejected_before_dispatch() {
    let server = TestServer::start(true, vec![machine("M1")]).await;

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "NotARealKind", "payload": null}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["dataType"], "NotARealKind");
    assert!(server.mock.enqueued().is_empty());
}

#[tokio::test]
async fn test_raw_missing_data_type() {
    let server = TestServer::start(true, vec![]).await;

    let (status, body) = post_json(&server, "/raw", json!({"uid": "M1"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "dataType is required");
}

#[tokio::test]
async fn test_raw_control_kind_forbidden_when_control_disabled() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "ResetButton"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["dataType"], "ResetButton");
    assert!(server.mock.enqueued().is_empty());
}

#[tokio::test]
async fn test_raw_read_only_kind_allowed_when_control_disabled() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetToolLifeInfo", "timeoutMilliseconds": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["dataType"], "GetToolLifeInfo");
    assert_eq!(body["result"], 0);
    let tools = body["data"]["machineToolLife"]["toolLife"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert!(tools[0].get("use").is_some());
}

#[tokio::test]
async fn test_raw_program_list_lists_every_program() {
    let server = TestServer::start(false, vec![machine_with_programs("M1", 5)]).await;

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetProgListInfo", "payload": "0"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let info = &body["data"]["machineProgramListInfo"];
    assert_eq!(info["headType"], 0);
    let programs = info["programArray"].as_array().unwrap();
    assert_eq!(programs.len(), 5);
    assert_eq!(programs[0], json!({"no": 1001, "comment": "PART-1", "opened": true}));

    let sent = server.mock.enqueued();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data, hilink_core::RequestData::HeadType(0));
}

#[tokio::test]
async fn test_raw_vendor_failure_code_maps_to_message() {
    let server = TestServer::start(false, vec![machine("M1")]).await;
    server
        .mock
        .override_result("M1", CollectDataType::GetOPStatus, -16);

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetOPStatus"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"], -16);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("CNC communication error"));
}

#[tokio::test]
async fn test_raw_unmapped_code_uses_generic_message() {
    let server = TestServer::start(true, vec![machine("M1")]).await;
    server
        .mock
        .override_result("M1", CollectDataType::GetProductCount, 5);

    let (_, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetProductCount"}),
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Hi-Link request failed (uid=M1, type=GetProductCount, result=5)"
    );
}

#[tokio::test]
async fn test_repeated_raw_read_is_rate_limited() {
    let server = TestServer::start(false, vec![machine("M1"), machine("M2")]).await;
    let read = |uid: &str| json!({"uid": uid, "dataType": "GetOPStatus"});

    let (status, _) = post_json(&server, "/raw", read("M1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&server, "/raw", read("M1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(body["dataType"], "GetOPStatus");
    assert_eq!(body["message"], "raw read request is temporarily rate-limited.");

    let (status, _) = post_json(&server, "/raw", read("M2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.mock.enqueued().len(), 2);
}

#[tokio::test]
async fn test_raw_timeout_is_server_error() {
    let server = TestServer::start(false, vec![machine("M1")]).await;
    server.mock.silence("M1");

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetOPStatus", "timeoutMilliseconds": 50}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "timeout");
    assert_eq!(body["dataType"], "GetOPStatus");
    assert!(body["message"].as_str().unwrap().contains("uid=M1"));
}

#[tokio::test]
async fn test_raw_program_data_requires_positive_program_number() {
    let server = TestServer::start(true, vec![machine_with_programs("M1", 2)]).await;

    let (status, _) = post_json(
        &server,
        "/raw",
        json!({"uid": "M1", "dataType": "GetProgDataInfo", "payload": {"programNo": 0}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(server.mock.enqueued().is_empty());

    let (status, body) = post_json(
        &server,
        "/raw",
        json!({
            "uid": "M1",
            "dataType": "GetProgDataInfo",
            "payload": {"machineProgramData": {"headType": 0, "programNo": 1002}}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["machineProgramData"]["programNo"], 1002);
}

// =============================================================================
// Machine registry
// =============================================================================

#[tokio::test]
async fn test_add_machine_forbidden_when_control_disabled() {
    let server = TestServer::start(false, vec![]).await;

    let (status, body) = post_json(
        &server,
        "/machines",
        json!({"uid": "M1", "ip": "10.0.0.1", "port": 8193}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(server.mock.machine_count(), 0);
}

#[tokio::test]
async fn test_add_machine_succeeds_when_control_enabled() {
    let server = TestServer::start(true, vec![]).await;

    let (status, body) = post_json(
        &server,
        "/machines",
        json!({"uid": "M1", "ip": "10.0.0.1", "port": 8193}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(server.mock.machine_count(), 1);

    let (status, body) = post_json(
        &server,
        "/machines",
        json!({"uid": "M1", "ip": "10.0.0.1", "port": 8193}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["resultCode"], 88);
    assert_eq!(body["message"], "UID is already registered.");
}

#[tokio::test]
async fn test_add_machine_requires_uid_and_ip() {
    let server = TestServer::start(true, vec![]).await;

    let (status, body) = post_json(
        &server,
        "/machines",
        json!({"uid": " ", "ip": "10.0.0.1", "port": 8193}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "uid, ip are required");
}

#[tokio::test]
async fn test_list_update_and_delete_machines() {
    let server = TestServer::start(true, vec![machine("M1"), machine("M2")]).await;

    let (status, body) = get_json(&server, "/machines").await;
    assert_eq!(status, StatusCode::OK);
    let machines = body["machines"].as_array().unwrap();
    assert_eq!(machines.len(), 2);
    assert_eq!(machines[0]["uid"], "M1");
    assert_eq!(machines[0]["ipAddress"], "192.168.10.1");

    let response = server
        .http
        .put(server.url("/machines/M2"))
        .json(&json!({"ip": "192.168.10.99", "port": 8194}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let response = server
        .http
        .delete(server.url("/machines/M1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let (_, body) = get_json(&server, "/machines").await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["machines"],
        json!([{"uid": "M2", "ipAddress": "192.168.10.99", "port": 8194}])
    );
}

#[tokio::test]
async fn test_list_machines_reports_vendor_refusal() {
    let server = TestServer::start_unactivated(false, vec![machine("M1"), machine("M2")]).await;

    let (status, body) = get_json(&server, "/machines").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["resultCode"], -99);
    assert_eq!(body["message"], "Activate the Hi-Link license.");
    assert_eq!(body["machines"], json!([]));
}

#[tokio::test]
async fn test_delete_without_result_code_reports_message() {
    let server = TestServer::start(true, vec![machine("M1")]).await;
    // answered ahead of the simulated SDK's own reply
    server.mock.inject_response(ResponseMessage::new(
        "M1",
        CollectDataType::DeleteMachine,
        ResponseData::Empty,
    ));

    let response = server
        .http
        .delete(server.url("/machines/M1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body.get("resultCode").is_none());
    assert_eq!(
        body["message"],
        "Hi-Link request returned no result code (uid=M1, type=DeleteMachine)"
    );
}

#[tokio::test]
async fn test_delete_machine_forbidden_when_control_disabled() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let response = server
        .http
        .delete(server.url("/machines/M1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.mock.machine_count(), 1);
}

#[tokio::test]
async fn test_status_of_registered_machine() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let (status, body) = get_json(&server, "/machines/M1/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "Ready");
    assert_eq!(body["resultCode"], 0);
    assert_eq!(body["result"]["status"], "Ready");
}

#[tokio::test]
async fn test_status_of_unknown_machine_maps_unregistered_code() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let (status, body) = get_json(&server, "/machines/ghost/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["resultCode"], -89);
    assert_eq!(body["message"], "Machine UID is not registered.");
}

#[tokio::test]
async fn test_reset_machine() {
    let server = TestServer::start(true, vec![machine("M1")]).await;

    let (status, body) = post_json(&server, "/machines/M1/reset", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_repeated_reset_is_rate_limited() {
    let server = TestServer::start(true, vec![machine("M1"), machine("M2")]).await;

    let (status, _) = post_json(&server, "/machines/M1/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&server, "/machines/M1/reset", json!({})).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "too_many_requests");
    assert_eq!(body["message"], "Reset command is temporarily rate-limited.");

    let (status, _) = post_json(&server, "/machines/M2/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let resets = server
        .mock
        .enqueued()
        .iter()
        .filter(|r| r.data_type == CollectDataType::ResetButton)
        .count();
    assert_eq!(resets, 2);
}

#[tokio::test]
async fn test_start_and_stop_are_not_implemented() {
    let server = TestServer::start(true, vec![machine("M1")]).await;

    for path in ["/machines/M1/start", "/machines/M1/stop"] {
        let (status, body) = post_json(&server, path, json!({})).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("/raw"));
    }
    assert!(server.mock.enqueued().is_empty());
}

// =============================================================================
// Fleet
// =============================================================================

#[tokio::test]
async fn test_emergency_stop_reports_every_machine() {
    let server = TestServer::start(true, vec![machine("M1"), machine("M2"), machine("M3")]).await;
    server
        .mock
        .override_result("M2", CollectDataType::ResetButton, -16);

    let (status, body) = post_json(&server, "/emergency-stop", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    let succeeded: Vec<_> = results
        .iter()
        .filter(|r| r["success"] == true)
        .map(|r| r["uid"].as_str().unwrap())
        .collect();
    assert_eq!(succeeded, vec!["M1", "M3"]);

    let failed = &results[1];
    assert_eq!(failed["uid"], "M2");
    assert_eq!(failed["resultCode"], -16);
}

#[tokio::test]
async fn test_emergency_stop_fails_when_machine_list_is_refused() {
    let server = TestServer::start_unactivated(true, vec![machine("M1"), machine("M2")]).await;

    let (status, body) = post_json(&server, "/emergency-stop", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["resultCode"], -99);
    assert_eq!(body["message"], "Activate the Hi-Link license.");
    assert_eq!(body["results"], json!([]));

    let sent = server.mock.enqueued();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data_type, CollectDataType::GetMachineList);
}

#[tokio::test]
async fn test_emergency_stop_ignores_reset_cooldown() {
    let server = TestServer::start(true, vec![machine("M1")]).await;

    let (status, _) = post_json(&server, "/machines/M1/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&server, "/emergency-stop", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["results"][0]["uid"], "M1");
    assert_eq!(body["results"][0]["success"], true);
}

#[tokio::test]
async fn test_emergency_stop_forbidden_when_control_disabled() {
    let server = TestServer::start(false, vec![machine("M1")]).await;

    let (status, _) = post_json(&server, "/emergency-stop", json!({})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(server.mock.enqueued().is_empty());
}

#[tokio::test]
async fn test_resume_all_is_acknowledged() {
    let server = TestServer::start(false, vec![]).await;

    let (status, body) = post_json(&server, "/resume-all", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(server.mock.enqueued().is_empty());
}

// =============================================================================
// Failures and concurrency
// =============================================================================

#[tokio::test]
async fn test_transport_fault_is_server_error() {
    let server = TestServer::start(false, vec![machine("M1")]).await;
    server.mock.close();

    let (status, body) = get_json(&server, "/machines").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "exchange_failed");
    assert_eq!(body["dataType"], "GetMachineList");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_all_complete() {
    let uids: Vec<String> = (0..6).map(|i| format!("M{i}")).collect();
    let server = TestServer::start(false, uids.iter().map(|u| machine(u)).collect()).await;

    let mut handles = Vec::new();
    for uid in &uids {
        let http = server.http.clone();
        let url = server.url(&format!("/machines/{uid}/status"));
        handles.push(tokio::spawn(async move {
            let response = http.get(url).send().await.unwrap();
            let body: Value = response.json().await.unwrap();
            body["status"].as_str().unwrap().to_string()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "Ready");
    }
    assert_eq!(server.mock.enqueued().len(), uids.len());
}
