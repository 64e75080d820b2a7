#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zbxdash::dashboard::{Dashboard, ItemRangeForm, UserForm};
use zbxdash::error::{ConfigError, Error as DashError};
use zbxdash::outcome::Outcome;
use zbxdash::types::{Severity, ValueType};
use zbxdash::view::{Render, Tone};
use zbxdash::zbx_client::{HistoryQuery, ZbxClient};

fn client(server: &MockServer) -> ZbxClient {
    ZbxClient::new(
        Url::parse(&server.uri()).expect("valid mock url"),
        SecretString::from("token"),
        Duration::from_secs(2),
        Duration::from_secs(1),
        true,
    )
    .expect("client")
}

async fn respond_with(server: &MockServer, rpc_method: &str, body: Value) {
    Mock::given(method("POST"))
        .and(body_string_contains(rpc_method))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn last_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("requests");
    serde_json::from_slice(&requests.last().expect("one request").body).expect("json body")
}

#[tokio::test]
async fn history_stats_end_to_end() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({
            "jsonrpc": "2.0",
            "result": [
                {"itemid": "123", "clock": "1500", "value": "10", "ns": "0"},
                {"itemid": "123", "clock": "1600", "value": "20", "ns": "0"}
            ],
            "id": 1
        }),
    )
    .await;

    let client = client(&server);
    let query = HistoryQuery {
        item_id: "123".into(),
        value_type: ValueType::Float,
        time_from: 1000,
        time_till: 2000,
    };
    let envelope = client.history(&query).await.expect("history");
    let view = zbxdash::dashboard::HistoryView::from_outcome("123", Outcome::classify(envelope));

    assert_eq!(view.status.tone, Tone::Success);
    assert_eq!(view.sample_count, "2");
    assert_eq!(view.average, "15.00");
    assert_eq!(view.min, "10");
    assert_eq!(view.max, "20");

    let body = last_request_body(&server).await;
    insta::with_settings!({ sort_maps => true }, {
        insta::assert_json_snapshot!(body, @r#"
        {
          "auth": "token",
          "id": 1,
          "jsonrpc": "2.0",
          "method": "history.get",
          "params": {
            "history": 0,
            "itemids": [
              "123"
            ],
            "output": "extend",
            "sortfield": "clock",
            "sortorder": "DESC",
            "time_from": 1000,
            "time_till": 2000
          }
        }
        "#);
    });
}

#[tokio::test]
async fn dashboard_history_with_open_range() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({"jsonrpc": "2.0", "result": [{"clock": "1", "value": "4.5"}], "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "77".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.sample_count, "1");
    assert_eq!(view.average, "4.50");

    let body = last_request_body(&server).await;
    assert!(body["params"].get("time_from").is_none());
    assert!(body["params"].get("time_till").is_none());
    assert_eq!(body["params"]["itemids"], json!(["77"]));
}

#[tokio::test]
async fn api_error_data_takes_precedence() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({
            "jsonrpc": "2.0",
            "error": {"code": 1, "message": "m", "data": "d"},
            "id": 1
        }),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "123".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Error);
    assert!(view.status.text.contains("d"));
    assert!(view.status.text.starts_with("Error de API: d."));
    assert_eq!(view.sample_count, "---");
}

#[tokio::test]
async fn api_error_without_message_is_still_an_api_error() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({"jsonrpc": "2.0", "error": {"code": 1, "data": "d"}, "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "123".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Error);
    assert!(view.status.text.starts_with("Error de API: d."));
}

#[tokio::test]
async fn non_array_result_means_no_data() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({"jsonrpc": "2.0", "result": true, "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "123".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Warning);
    assert!(view.status.text.contains("No se encontraron datos"));
}

#[tokio::test]
async fn null_sample_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "history.get",
        json!({
            "jsonrpc": "2.0",
            "result": [
                {"clock": "1", "value": null},
                {"clock": "2", "value": "5"},
                {"clock": "3", "value": "7"}
            ],
            "id": 1
        }),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "123".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Success);
    assert_eq!(view.sample_count, "2");
    assert_eq!(view.average, "6.00");
    assert_eq!(view.min, "5");
    assert!(view.status.text.contains("Se ignoraron 1"));
}

#[tokio::test]
async fn user_create_with_unexpected_result_is_a_warning() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "user.create",
        json!({"jsonrpc": "2.0", "result": true, "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .register_user(&UserForm {
            alias: "jdoe".into(),
            password: SecretString::from("s3cret!"),
            name: String::new(),
            surname: String::new(),
            group_id: "8".into(),
            lang: "es_ES".into(),
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Warning);
    assert!(view.user_ids.is_empty());
}

#[tokio::test]
async fn empty_result_is_informational() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "trend.get",
        json!({"jsonrpc": "2.0", "result": [], "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .traffic_trends(&ItemRangeForm {
            item_id: "9".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Warning);
    assert!(view.rows.is_empty());
    assert!(view.note.is_some());
}

#[tokio::test]
async fn trend_request_asks_for_aggregates_in_ascending_order() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "trend.get",
        json!({
            "jsonrpc": "2.0",
            "result": [
                {"clock": "3600", "num": "60", "value_avg": "1.005", "value_min": "0", "value_max": "2"},
                {"clock": "7200", "num": "60", "value_avg": "3", "value_min": "1", "value_max": "5"}
            ],
            "id": 1
        }),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .traffic_trends(&ItemRangeForm {
            item_id: "9".into(),
            value_type: ValueType::Unsigned,
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[1].average, "3.00");
    assert_eq!(view.rows[1].max, "5.00");

    let body = last_request_body(&server).await;
    assert_eq!(body["method"], "trend.get");
    assert_eq!(body["params"]["sortorder"], "ASC");
    assert_eq!(body["params"]["history"], 3);
    assert_eq!(
        body["params"]["output"],
        json!(["clock", "num", "value_avg", "value_min", "value_max"])
    );
}

#[tokio::test]
async fn problems_render_unknown_severity() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "problem.get",
        json!({
            "jsonrpc": "2.0",
            "result": [
                {
                    "eventid": "1",
                    "hosts": [{"name": "web-01"}],
                    "opdata": "",
                    "name": "HTTP check failed",
                    "severity": "7",
                    "clock": "1700000000"
                },
                {
                    "eventid": "2",
                    "name": "Disk full",
                    "severity": "5",
                    "clock": "1700000100"
                }
            ],
            "id": 1
        }),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard.active_problems().await.expect("view");
    assert_eq!(view.status.tone, Tone::Alert);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].host, "web-01");
    assert_eq!(view.rows[0].description, "HTTP check failed");
    assert_eq!(view.rows[0].severity, Severity::Unknown(7));
    assert_eq!(view.rows[1].host, "Host Desconocido");
    let html = view.to_html();
    assert!(html.contains("Desconocido</span>"));
    assert!(html.contains(r#"<span class="severity-5">Desastre</span>"#));

    let body = last_request_body(&server).await;
    assert_eq!(body["params"]["recent"], true);
    assert_eq!(body["params"]["acknowledged"], false);
    assert_eq!(body["params"]["selectHosts"], json!(["name"]));
}

#[tokio::test]
async fn register_user_sends_group_and_language() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        "user.create",
        json!({"jsonrpc": "2.0", "result": {"userids": ["42"]}, "id": 1}),
    )
    .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .register_user(&UserForm {
            alias: "jdoe".into(),
            password: SecretString::from("s3cret!"),
            name: "John".into(),
            surname: "Doe".into(),
            group_id: "8".into(),
            lang: "es_ES".into(),
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Success);
    assert_eq!(view.user_ids, vec!["42".to_string()]);

    let body = last_request_body(&server).await;
    assert_eq!(body["auth"], "token");
    assert_eq!(body["params"]["passwd"], "s3cret!");
    assert_eq!(body["params"]["usrgrps"], json!([{"usrgrpid": "8"}]));
    assert_eq!(body["params"]["lang"], "es_ES");
}

#[tokio::test]
async fn server_error_becomes_connection_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard.active_problems().await.expect("view");
    assert_eq!(view.status.tone, Tone::Error);
    assert!(view.status.text.starts_with("Error de conexión: "));
    assert!(view.status.text.contains("503"));
}

#[tokio::test]
async fn invalid_json_becomes_connection_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(client(&server));
    let view = dashboard
        .history_stats(&ItemRangeForm {
            item_id: "1".into(),
            ..ItemRangeForm::default()
        })
        .await
        .expect("view");
    assert_eq!(view.status.tone, Tone::Error);
    assert!(view.status.text.contains("invalid JSON payload"));
}

#[tokio::test]
async fn overlapping_submission_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "result": [], "id": 1}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(client(&server));
    let (first, second) = tokio::join!(dashboard.active_problems(), dashboard.active_problems());

    let (done, refused) = if first.is_ok() {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(done.expect("one submission runs").status.tone, Tone::Success);
    assert!(matches!(refused, Err(DashError::Busy)));
    assert!(!dashboard.is_busy());

    // The guard is released once the first request completes.
    assert!(dashboard.active_problems().await.is_ok());
}

#[tokio::test]
async fn plain_http_requires_opt_in() {
    let err = ZbxClient::new(
        Url::parse("http://zabbix.example.com/api_jsonrpc.php").unwrap(),
        SecretString::from("token"),
        Duration::from_secs(1),
        Duration::from_secs(1),
        false,
    )
    .err()
    .expect("http rejected");
    assert!(matches!(
        err,
        DashError::Config(ConfigError::InvalidField {
            field: "zabbix.url",
            ..
        })
    ));
}
