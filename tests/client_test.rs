mod common;

use serde_json::json;

use common::{MockTransport, client_with, param, sent_params};
use corona::component::facet::FacetField;
use corona::{
    Client, ClientConfig, CoronaError, Endpoint, EndpointRegistry, ErrorStage, Method, Query,
};

#[tokio::test]
async fn test_execute_resolves_endpoints() -> corona::Result<()> {
    let transport = MockTransport::new(200, json!({"response": {"numFound": 0, "start": 0, "docs": []}}));
    let client = client_with(transport.clone());
    let query = Query::select("*:*");

    client.execute(&query, None).await?;
    assert!(transport.last_request().uri.starts_with("http://solr-a:8983/solr/techproducts/select?"));

    client.execute(&query, Some("b")).await?;
    assert!(transport.last_request().uri.starts_with("http://solr-b:8983/solr/techproducts/select?"));

    let err = client.execute(&query, Some("c")).await.unwrap_err();
    assert!(matches!(err, CoronaError::Configuration(_)));
    // Resolution failures never reach the transport.
    assert_eq!(transport.requests().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_server_error_skips_parsing() {
    // The body is not even JSON; a parse attempt would yield a parse error.
    let transport = MockTransport::raw(500, "<html>Internal Server Error</html>");
    let client = client_with(transport.clone());

    let err = client.select(&Query::select("*:*"), None).await.unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Server);
    assert_eq!(err.status(), Some(500));
    match err {
        CoronaError::Server { message, body, .. } => {
            assert!(message.is_none());
            assert!(body.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_transport_timeout_passes_through() {
    let transport = MockTransport::failing(true);
    let client = client_with(transport.clone());

    let err = client.select(&Query::select("*:*"), None).await.unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Transport);
    assert!(err.is_timeout());
    match &err {
        CoronaError::Transport { message, .. } => assert!(message.contains("timed out")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_passes_through() {
    let transport = MockTransport::failing(false);
    let client = client_with(transport.clone());

    let err = client.ping(Some("b")).await.unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Transport);
    assert!(!err.is_timeout());
    assert!(err.to_string().contains("connection to http://solr-b:8983/"));
}

#[tokio::test]
async fn test_server_error_carries_solr_message() {
    let transport = MockTransport::new(
        400,
        json!({"responseHeader": {"status": 400}, "error": {"msg": "undefined field bogus", "code": 400}}),
    );
    let client = client_with(transport);

    let err = client.select(&Query::select("bogus:1"), None).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("undefined field bogus"));
}

#[tokio::test]
async fn test_facet_field_scenario() -> corona::Result<()> {
    let transport = MockTransport::new(
        200,
        json!({
            "responseHeader": {"status": 0, "QTime": 2},
            "response": {"numFound": 5, "start": 0, "docs": [{"id": "SP2514N"}]},
            "facet_counts": {
                "facet_queries": {},
                "facet_fields": {"cat": ["electronics", 5]}
            }
        }),
    );
    let client = client_with(transport.clone());

    let query = Query::select("*:*").with_component(FacetField::new("category").with_key("cat"))?;
    let result = client.select(&query, None).await?;

    let params = sent_params(&transport.last_request());
    assert_eq!(param(&params, "facet"), vec!["true"]);
    assert_eq!(param(&params, "facet.field"), vec!["{!key=cat}category"]);

    let cat = result.facet_field("cat").expect("cat facet parsed");
    assert_eq!(cat.counts(), vec![("electronics", 5)]);
    assert_eq!(result.num_found, 5);
    assert_eq!(result.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_basic_auth_and_post() -> corona::Result<()> {
    let registry = EndpointRegistry::new().with_endpoint(
        Endpoint::builder("secure")
            .scheme("https")
            .host("search.example.com")
            .port(443)
            .collection("products")
            .credentials("admin", "s3cret")
            .timeout(12)
            .build()?,
    );
    let transport = MockTransport::new(200, json!({"response": {"numFound": 0, "start": 0, "docs": []}}));
    let client = Client::new(registry, transport.clone());

    let query = Query::select("name:\"hard drive\"").with_method(Method::Post);
    client.select(&query, None).await?;

    let request = transport.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.uri, "https://search.example.com:443/solr/products/select");
    // "admin:s3cret"
    assert_eq!(request.header("Authorization"), Some("Basic YWRtaW46czNjcmV0"));
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert_eq!(request.timeout.as_secs(), 12);

    let params = sent_params(&request);
    assert_eq!(param(&params, "q"), vec!["name:\"hard drive\""]);
    assert_eq!(param(&params, "wt"), vec!["json"]);

    Ok(())
}

#[tokio::test]
async fn test_ping() -> corona::Result<()> {
    let transport = MockTransport::new(200, json!({"responseHeader": {"status": 0, "QTime": 0}, "status": "OK"}));
    let client = client_with(transport.clone());

    let result = client.ping(Some("b")).await?;
    assert_eq!(result.ping_status.as_deref(), Some("OK"));
    assert_eq!(result.status, Some(0));
    assert!(
        transport
            .last_request()
            .uri
            .starts_with("http://solr-b:8983/solr/techproducts/admin/ping?")
    );

    Ok(())
}

#[tokio::test]
async fn test_suggester_query() -> corona::Result<()> {
    let transport = MockTransport::new(
        200,
        json!({
            "suggest": {"mySuggester": {"elec": {
                "numFound": 1,
                "suggestions": [{"term": "electronics", "weight": 3, "payload": ""}]
            }}}
        }),
    );
    let client = client_with(transport.clone());

    let result = client.suggester(&Query::suggester("elec"), None).await?;
    let terms: Vec<&str> = result
        .suggester()
        .expect("suggest section parsed")
        .all()
        .map(|s| s.term.as_str())
        .collect();
    assert_eq!(terms, vec!["electronics"]);

    let request = transport.last_request();
    assert!(request.uri.contains("/techproducts/suggest?"));
    let params = sent_params(&request);
    assert_eq!(param(&params, "suggest.q"), vec!["elec"]);

    Ok(())
}

#[tokio::test]
async fn test_leader_affinity() -> corona::Result<()> {
    let config = ClientConfig::from_toml_str(
        r#"
        default_endpoint = "replica"

        [defaults]
        timeout = 2

        [endpoints.replica]
        host = "replica-1"
        collection = "orders"

        [endpoints.leader]
        host = "leader-1"
        collection = "orders"
        leader = true

        [endpoints.other]
        host = "leader-2"
        collection = "invoices"
        leader = true
        "#,
    )?;
    let transport = MockTransport::new(200, json!({"response": {"numFound": 0, "start": 0, "docs": []}}));
    let client = Client::from_config_with_transport(&config, transport.clone())?;

    client.select(&Query::select("*:*"), None).await?;
    assert!(transport.last_request().uri.starts_with("http://replica-1:8983/solr/orders/"));

    let query = Query::select("*:*").with_leader_affinity(true);
    client.select(&query, None).await?;
    assert!(transport.last_request().uri.starts_with("http://leader-1:8983/solr/orders/"));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_execute() -> corona::Result<()> {
    let transport = MockTransport::new(200, json!({"response": {"numFound": 1, "start": 0, "docs": [{"id": "x"}]}}));
    let client = client_with(transport.clone());

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let key = if i % 2 == 0 { "a" } else { "b" };
            client.select(&Query::select(format!("id:{i}")), Some(key)).await
        }));
    }
    for handle in handles {
        let result = handle.await.expect("task panicked")?;
        assert_eq!(result.documents[0].id(), Some("x"));
    }
    assert_eq!(transport.requests().len(), 8);

    Ok(())
}
