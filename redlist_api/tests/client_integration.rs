use redlist_api::{Client, Error, RequestKey};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_species_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("species_panthera_leo.json");

    Mock::given(method("GET"))
        .and(path("/species/leo"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-token").unwrap();
    let resp = client.get_json(&RequestKey::new("species/leo")).await.unwrap();

    assert_eq!(resp["result"][0]["scientific_name"], "Panthera leo");
    assert_eq!(resp["result"][0]["main_common_name"], "Lion");
}

#[tokio::test]
async fn token_is_last_query_parameter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/species/page/0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result": []}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "secret").unwrap();
    let key = RequestKey::new("species/page/0").with_param("region", "global");
    client.get_json(&key).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("region".to_string(), "global".to_string()),
            ("token".to_string(), "secret".to_string()),
        ]
    );
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/country/list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "69").unwrap();
    let result = client.get_json(&RequestKey::new("country/list")).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "k").unwrap();
    let result = client.get_json(&RequestKey::new("version")).await;
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[tokio::test]
async fn connection_refused_maps_to_request_failed() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = Client::with_base_url("http://127.0.0.1:9", "k").unwrap();
    let result = client.get_json(&RequestKey::new("version")).await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
