use gemini_model_check::check::{check_models, CheckOutcome};
use gemini_model_check::Credentials;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_MODELS_HINT: &str = "\n\
CRITICAL: No models are available. Please check your Google AI Studio or Google Cloud project settings.\n\
1. Make sure the 'Generative Language API' or 'Vertex AI' is enabled.\n\
2. Make sure a billing account is attached to your project.\n";

async fn serve_models(models: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .mount(&server)
        .await;
    server
}

async fn run(server: &MockServer) -> (String, CheckOutcome) {
    let credentials = Credentials::new("test-key", server.uri());
    let mut out = Vec::new();
    let outcome = check_models(&mut out, Some(credentials)).await.unwrap();
    (String::from_utf8(out).unwrap(), outcome)
}

#[tokio::test]
async fn test_prints_usable_models_in_provider_order() {
    let server = serve_models(json!([
        {"name": "models/gemini-2.5-pro", "supportedGenerationMethods": ["generateContent", "countTokens"]},
        {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
        {"name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["countTokens", "generateContent"]},
        {"name": "models/aqa"}
    ]))
    .await;

    let (output, outcome) = run(&server).await;

    assert_eq!(
        output,
        "Finding available models for your API key...\n\
         ---\n\
         Model name: models/gemini-2.5-pro\n\
         Model name: models/gemini-2.0-flash\n\
         ---\n\
         Found 2 usable models.\n"
    );
    assert_eq!(outcome, CheckOutcome::Listed { count: 2 });
}

#[tokio::test]
async fn test_no_usable_models_prints_hints() {
    let server = serve_models(json!([
        {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]}
    ]))
    .await;

    let (output, outcome) = run(&server).await;

    let expected = format!(
        "Finding available models for your API key...\n---\n---\nFound 0 usable models.\n{NO_MODELS_HINT}"
    );
    assert_eq!(output, expected);
    assert_eq!(outcome, CheckOutcome::Listed { count: 0 });
}

#[tokio::test]
async fn test_empty_model_list_prints_hints() {
    let server = serve_models(json!([])).await;

    let (output, _) = run(&server).await;

    assert!(output.contains("Found 0 usable models.\n"));
    assert!(output.ends_with(NO_MODELS_HINT));
}

#[tokio::test]
async fn test_api_error_prints_message_and_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "bad request", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let (output, outcome) = run(&server).await;

    assert_eq!(
        output,
        "Finding available models for your API key...\n\
         ---\n\
         An error occurred: bad request\n\
         This might be an authentication error. Is your API key correct?\n"
    );
    assert_eq!(
        outcome,
        CheckOutcome::Failed {
            message: "bad request".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_response_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (output, outcome) = run(&server).await;

    assert!(output.contains("\nAn error occurred: "));
    assert!(output.ends_with("This might be an authentication error. Is your API key correct?\n"));
    assert!(matches!(outcome, CheckOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_reported() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let credentials = Credentials::new("test-key", format!("http://{address}"));

    let mut out = Vec::new();
    let outcome = check_models(&mut out, Some(credentials)).await.unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("An error occurred: "));
    assert!(matches!(outcome, CheckOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_repeated_runs_print_identical_output() {
    let server = serve_models(json!([
        {"name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["generateContent"]},
        {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
    ]))
    .await;

    let (first, _) = run(&server).await;
    let (second, _) = run(&server).await;

    assert_eq!(first, second);
}
