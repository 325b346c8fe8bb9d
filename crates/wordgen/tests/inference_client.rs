use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wordgen::{
    CompletionSource, GenerateError, GenerationParams, GenerationTask, InferenceClient,
    InferenceConfig, PromptStyle, WordEntry, WordGenerator,
};

/// Serves a single HTTP response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_owned();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let read = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..read]);
            if read == 0 || request_complete(&request) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8(request).unwrap()
    });
    (endpoint, handle)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn client(endpoint: String, api_key: Option<&str>) -> InferenceClient {
    InferenceClient::new(InferenceConfig {
        endpoint,
        model_id: "meta.llama3-70b-instruct-v1:0".to_owned(),
        api_key: api_key.map(str::to_owned),
    })
    .unwrap()
}

#[tokio::test]
async fn posts_prompt_and_decoding_parameters() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"generation":"[{\"word\":\"bonjour\",\"description\":\"a greeting\"}]","prompt_token_count":80,"generation_token_count":20,"stop_reason":"stop"}"#,
    )
    .await;
    let completion = client(endpoint, Some("secret-token"))
        .complete("say hi", &GenerationParams::default())
        .await
        .unwrap();
    assert_eq!(completion, r#"[{"word":"bonjour","description":"a greeting"}]"#);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /model/meta.llama3-70b-instruct-v1:0/invoke HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer secret-token"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "prompt": "say hi",
            "max_gen_len": 512,
            "temperature": 0.5,
            "top_p": 0.9,
        })
    );
}

#[tokio::test]
async fn error_status_is_a_service_error() {
    let (endpoint, server) = serve_once("403 Forbidden", r#"{"message":"access denied"}"#).await;
    let error = client(endpoint, None)
        .complete("say hi", &GenerationParams::default())
        .await
        .unwrap_err();
    match &error {
        GenerateError::Service { model, status, body } => {
            assert_eq!(model, "meta.llama3-70b-instruct-v1:0");
            assert_eq!(*status, 403);
            assert!(body.contains("access denied"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let request = server.await.unwrap();
    assert!(!request.to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn unexpected_body_is_a_deserialize_error() {
    let (endpoint, _server) = serve_once("200 OK", r#"{"output":"nope"}"#).await;
    let error = client(endpoint, None)
        .complete("say hi", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(error, GenerateError::Deserialize { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let error = client(endpoint, None)
        .complete("say hi", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(error, GenerateError::Fetch { .. }));
    assert!(error.to_string().contains("meta.llama3-70b-instruct-v1:0"));
}

#[tokio::test]
async fn generator_recovers_words_wrapped_in_prose() {
    let (endpoint, _server) = serve_once(
        "200 OK",
        r#"{"generation":"  Here are your words: [{\"word\":\"sonrisa\",\"description\":\"the expression of a smile\"},{\"word\":\"ventana\"}] Enjoy!  "}"#,
    )
    .await;
    let generator = WordGenerator::new(Box::new(client(endpoint, None)), PromptStyle::Llama3Instruct);
    let entries = generator.generate("Spanish").await.unwrap();
    assert_eq!(
        entries,
        vec![
            WordEntry::new("sonrisa", "the expression of a smile"),
            WordEntry::new("ventana", wordgen::MISSING_DESCRIPTION),
        ]
    );
}

#[tokio::test]
async fn task_runs_through_the_http_client() {
    let (endpoint, server) = serve_once("200 OK", r#"{"generation":"[]"}"#).await;
    let task = GenerationTask::new("Japanese", "meta.llama3-70b-instruct-v1:0");
    let entries = task.run(&client(endpoint, None)).await.unwrap();
    assert!(entries.is_empty());

    let request = server.await.unwrap();
    assert!(request.contains("in Japanese language"));
    assert!(!request.contains("begin_of_text"));
}
