mod common;
use common::{build_app, config, ok, StubTransport};

use reqwest::Method;
use serde_json::{json, Value};
use tiktok_ads_mcp::errors::GatewayError;
use tiktok_ads_mcp::services::transport::TransportResponse;

#[tokio::test]
async fn campaign_create_reaches_the_wire_with_ambient_advertiser() {
    let transport = StubTransport::scripted(vec![ok(json!({"campaign_id": "c1"}))]);
    let app = build_app(config(), transport.clone());

    let result = app
        .dispatcher
        .dispatch(
            "campaign_create",
            json!({
                "campaign_name": "Sale",
                "objective_type": "REACH",
                "budget": 50,
                "budget_mode": "BUDGET_MODE_DAY"
            }),
        )
        .await
        .expect("dispatch succeeds");
    assert_eq!(result, json!({"campaign_id": "c1"}));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.url.as_str(),
        "https://business-api.test/open_api/v1.3/campaign/create/"
    );
    assert_eq!(request.header("Access-Token"), Some("stale-token"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    let body = request.body.as_ref().expect("POST carries a JSON body");
    assert_eq!(body["advertiser_id"], "123");
    assert_eq!(body["campaign_name"], "Sale");
    assert_eq!(body["budget"], 50);
    assert_eq!(body["operation_status"], "ENABLE");
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_network() {
    let transport = StubTransport::scripted(vec![ok(json!({}))]);
    let app = build_app(config(), transport.clone());

    let err = app
        .dispatcher
        .dispatch(
            "campaign_create",
            json!({
                "objective_type": "EVERYTHING",
                "budget": -5,
                "budget_mode": "BUDGET_MODE_DAY",
                "surprise": true
            }),
        )
        .await
        .unwrap_err();

    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
    for expected in ["campaign_name", "objective_type", "budget", "surprise"] {
        assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
    }
    assert!(matches!(err, GatewayError::Validation { ref tool, .. } if tool == "campaign_create"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn report_dates_and_page_bounds_are_checked() {
    let transport = StubTransport::scripted(vec![ok(json!({}))]);
    let app = build_app(config(), transport.clone());

    let err = app
        .dispatcher
        .dispatch(
            "report_get",
            json!({
                "dimensions": ["campaign_id"],
                "start_date": "2024/01/01",
                "page_size": 5000
            }),
        )
        .await
        .unwrap_err();

    let by_field = |field: &str| {
        err.violations()
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.clone())
    };
    assert_eq!(
        by_field("start_date").as_deref(),
        Some("must be a date in YYYY-MM-DD format")
    );
    assert!(by_field("end_date").is_some(), "ranged report needs end_date");
    assert!(by_field("page_size").is_some());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn missing_advertiser_without_default_names_the_setting() {
    let transport = StubTransport::scripted(vec![ok(json!({}))]);
    let mut config = config();
    config.advertiser_id = None;
    let app = build_app(config, transport.clone());

    let err = app
        .dispatcher
        .dispatch("campaign_get", json!({}))
        .await
        .unwrap_err();
    let violation = err
        .violations()
        .iter()
        .find(|v| v.field == "advertiser_id")
        .expect("advertiser_id violation");
    assert!(violation.message.contains("TIKTOK_ADVERTISER_ID"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unknown_tool_suggests_close_names() {
    let transport = StubTransport::scripted(vec![ok(json!({}))]);
    let app = build_app(config(), transport.clone());

    let err = app
        .dispatcher
        .dispatch("campain_get", json!({}))
        .await
        .unwrap_err();
    match err {
        GatewayError::UnknownTool { name, suggestions } => {
            assert_eq!(name, "campain_get");
            assert_eq!(suggestions.first().map(String::as_str), Some("campaign_get"));
        }
        other => panic!("expected UnknownTool, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn identical_arguments_produce_identical_payloads() {
    let transport = StubTransport::scripted(vec![ok(json!({"adgroup_id": "g1"}))]);
    let app = build_app(config(), transport.clone());
    let args = json!({
        "campaign_id": "c1",
        "adgroup_name": "night owls",
        "location_ids": ["6252001"],
        "budget": 20,
        "schedule_start_time": "2024-03-01 00:00:00",
        "optimization_goal": "CLICK",
        "billing_event": "CPC"
    });

    for _ in 0..2 {
        app.dispatcher
            .dispatch("adgroup_create", args.clone())
            .await
            .expect("dispatch succeeds");
    }

    let bodies: Vec<Value> = transport
        .requests()
        .into_iter()
        .map(|req| req.body.expect("body"))
        .collect();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["placement_type"], "PLACEMENT_TYPE_AUTOMATIC");
    assert!(bodies[0].get("placements").is_none());
}

#[tokio::test]
async fn logical_failure_under_http_200_is_upstream_error() {
    let transport = StubTransport::scripted(vec![TransportResponse::new(
        200,
        common::envelope(40100, "invalid advertiser", Value::Null),
    )]);
    let app = build_app(config(), transport.clone());

    let err = app
        .dispatcher
        .dispatch("campaign_get", json!({}))
        .await
        .unwrap_err();
    match &err {
        GatewayError::Upstream { code, message, request_id, .. } => {
            assert_eq!(*code, Some(40100));
            assert_eq!(message, "invalid advertiser");
            assert_eq!(request_id.as_deref(), Some("r1"));
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
    assert!(err.to_string().contains("invalid advertiser"));
    assert!(err.to_string().contains("campaign/get/"));
}

#[tokio::test]
async fn get_tools_send_query_parameters() {
    let transport = StubTransport::scripted(vec![ok(json!({"list": []}))]);
    let app = build_app(config(), transport.clone());

    app.dispatcher
        .dispatch(
            "campaign_get",
            json!({"filtering": {"campaign_ids": ["c1"]}, "page_size": 50}),
        )
        .await
        .expect("dispatch succeeds");

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::GET);
    assert!(request.body.is_none());
    assert_eq!(request.query_param("advertiser_id"), Some("123"));
    assert_eq!(request.query_param("page"), Some("1"));
    assert_eq!(request.query_param("page_size"), Some("50"));
    assert_eq!(
        request.query_param("filtering"),
        Some(r#"{"campaign_ids":["c1"]}"#)
    );
}

#[tokio::test]
async fn advertiser_info_defaults_to_a_one_element_list() {
    let transport = StubTransport::scripted(vec![ok(json!({"list": []}))]);
    let app = build_app(config(), transport.clone());

    app.dispatcher
        .dispatch("advertiser_info", json!({}))
        .await
        .expect("dispatch succeeds");
    assert_eq!(
        transport.requests()[0].query_param("advertiser_ids"),
        Some(r#"["123"]"#)
    );
}

#[tokio::test]
async fn upload_type_selects_the_source_field() {
    let transport = StubTransport::scripted(vec![ok(json!({"video_id": "v9"}))]);
    let app = build_app(config(), transport.clone());

    app.dispatcher
        .dispatch(
            "video_upload",
            json!({
                "upload_type": "UPLOAD_BY_VIDEO_ID",
                "video_id": "v9",
                "video_url": "https://cdn.example.com/clip.mp4"
            }),
        )
        .await
        .expect("dispatch succeeds");

    let body = transport.requests()[0].body.clone().expect("body");
    assert_eq!(body["video_id"], "v9");
    assert!(body.get("video_url").is_none());

    let err = app
        .dispatcher
        .dispatch("video_upload", json!({"upload_type": "UPLOAD_BY_URL"}))
        .await
        .unwrap_err();
    assert!(err.violations().iter().any(|v| v.field == "video_url"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn prepare_builds_the_wire_call_without_sending() {
    let transport = StubTransport::scripted(vec![ok(json!({}))]);
    let app = build_app(config(), transport.clone());

    let call = app
        .dispatcher
        .prepare(
            "lookalike_audience_create",
            &json!({
                "custom_audience_name": "lal",
                "source_audience_id": "s1",
                "location_ids": ["6252001"]
            }),
        )
        .expect("valid");
    assert_eq!(call.endpoint, "dmp/custom_audience/lookalike/create/");
    assert_eq!(call.method, Method::POST);
    assert_eq!(
        Value::Object(call.payload),
        json!({
            "advertiser_id": "123",
            "custom_audience_name": "lal",
            "source_audience_id": "s1",
            "lookalike_spec": {
                "location_ids": ["6252001"],
                "audience_size": "BALANCED",
                "mobile_os": "ALL"
            }
        })
    );
    assert!(transport.requests().is_empty());
}
