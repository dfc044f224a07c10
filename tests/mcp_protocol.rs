//! MCP protocol integration tests.
//!
//! Drives the server through a real rmcp client, both over an in-memory
//! duplex stream and over the Streamable HTTP listener.

use std::time::Duration;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ClientInfo, ReadResourceRequestParam, ResourceContents,
};
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schooldigger_mcp::mcp::{start_listener, SchoolDiggerServer, MCP_PATH, SCHOOL_LEVELS_URI};
use schooldigger_mcp::operations::OperationKind;
use schooldigger_mcp::{ClientConfig, Credentials, SchoolDiggerClient};

#[derive(Debug, Clone, Default)]
struct DummyClient;

impl ClientHandler for DummyClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

fn server_for(api: &MockServer) -> SchoolDiggerServer {
    let config = ClientConfig {
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
    .with_base_url(&format!("{}/v2.3", api.uri()))
    .unwrap();
    let client =
        SchoolDiggerClient::new(Credentials::new("test-id", "test-key").unwrap(), config).unwrap();
    SchoolDiggerServer::new(client)
}

fn call(name: &str, arguments: Value) -> CallToolRequestParam {
    serde_json::from_value(json!({ "name": name, "arguments": arguments })).unwrap()
}

fn text_of(result: &CallToolResult) -> Value {
    let text = result.content[0]
        .raw
        .as_text()
        .map(|t| t.text.clone())
        .expect("text content");
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn lists_every_tool_and_the_levels_resource() -> anyhow::Result<()> {
    let api = MockServer::start().await;
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = server_for(&api);
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = DummyClient.serve(client_transport).await?;

    let tools = client.list_tools(None).await?;
    let mut names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    names.sort_unstable();
    let mut expected: Vec<&str> = OperationKind::ALL.iter().map(|k| k.tool_name()).collect();
    expected.sort_unstable();
    assert_eq!(names, expected);

    let resources = client.list_resources(None).await?;
    assert_eq!(resources.resources.len(), 1);
    assert_eq!(resources.resources[0].raw.uri, SCHOOL_LEVELS_URI);

    let levels = client
        .read_resource(serde_json::from_value::<ReadResourceRequestParam>(
            json!({ "uri": SCHOOL_LEVELS_URI }),
        )?)
        .await?;
    match &levels.contents[0] {
        ResourceContents::TextResourceContents { text, .. } => {
            let value: Value = serde_json::from_str(text)?;
            assert_eq!(value["levels"].as_array().map(Vec::len), Some(6));
        }
        other => panic!("expected text contents, got {other:?}"),
    }

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn tool_call_round_trip_and_errors() -> anyhow::Result<()> {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.3/schools"))
        .and(query_param("st", "TX"))
        .and(query_param("city", "Austin"))
        .and(query_param("sortBy", "rank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfSchools": 2,
            "schoolList": [
                {
                    "schoolid": "480000000002",
                    "schoolName": "Second Best",
                    "address": {"street": "2 Oak St", "city": "Austin", "state": "TX", "zip": "78701"},
                    "rankHistory": [{"year": 2024, "rank": 8, "rankOf": 4000}]
                },
                {
                    "schoolid": "480000000001",
                    "schoolName": "Best",
                    "address": {"street": "1 Elm St", "city": "Austin", "state": "TX", "zip": "78701"},
                    "rankHistory": [{"year": 2024, "rank": 2, "rankOf": 4000}]
                }
            ]
        })))
        .expect(1)
        .mount(&api)
        .await;

    let (server_transport, client_transport) = tokio::io::duplex(8192);
    let server = server_for(&api);
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });
    let client = DummyClient.serve(client_transport).await?;

    let result = client
        .call_tool(call(
            "top_ranked_schools",
            json!({ "city": "Austin", "state": "tx", "count": 5 }),
        ))
        .await?;
    assert_ne!(result.is_error, Some(true));
    let body = text_of(&result);
    assert_eq!(body["entries"][0]["school"]["name"], "Best");
    assert_eq!(body["entries"][0]["rank"], 2);
    assert_eq!(body["entries"][1]["rank"], 8);

    let result = client
        .call_tool(call("search_schools_by_zip", json!({ "zip": "123" })))
        .await?;
    assert_eq!(result.is_error, Some(true));
    let body = text_of(&result);
    assert_eq!(body["error"]["kind"], "validation_error");
    assert_eq!(body["error"]["field"], "zip");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn listener_serves_sessions_over_streamable_http() -> anyhow::Result<()> {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.3/districts/0629610"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "districtID": "0629610",
            "districtName": "Palo Alto Unified",
            "address": {"street": "25 Churchill Ave", "city": "Palo Alto", "state": "CA", "zip": "94306"}
        })))
        .expect(1)
        .mount(&api)
        .await;

    let handle = start_listener(("localhost", 0), server_for(&api)).await?;
    assert!(handle.url().ends_with(MCP_PATH));

    let transport = StreamableHttpClientTransport::from_uri(handle.url());
    let client = DummyClient.serve(transport).await?;

    let info = client.peer_info().expect("server info after initialize");
    assert_eq!(info.server_info.name, "schooldigger");

    let tools = client.list_tools(None).await?;
    assert_eq!(tools.tools.len(), OperationKind::ALL.len());

    let result = client
        .call_tool(call("get_district_details", json!({ "district_id": "0629610" })))
        .await?;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(text_of(&result)["name"], "Palo Alto Unified");

    client.cancel().await?;
    handle.shutdown().await?;
    Ok(())
}
