use ai_doctor::ai::{GroqClient, FAILURE_MARKER};
use ai_doctor::app::Advisor;
use ai_doctor::models::{Config, ImagePayload, ModelSet};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

async fn mount_for_model(server: &MockServer, model: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(format!("\"model\":\"{}\"", model)))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn advisor_for(server: &MockServer) -> Advisor {
    let client = GroqClient::new("test-key".to_string()).with_base_url(server.uri());
    Advisor::with_service(Arc::new(client), ModelSet::default())
}

fn image() -> ImagePayload {
    ImagePayload::new(&[0x89, 0x50, 0x4E, 0x47], "wound.png").unwrap()
}

#[tokio::test]
async fn test_full_workflow_against_mock_upstream() {
    let server = MockServer::start().await;
    let models = ModelSet::default();

    mount_for_model(&server, &models.analyzer, completion("A shallow abrasion.")).await;
    mount_for_model(&server, &models.exercise, completion("Avoid strain on the knee.")).await;
    mount_for_model(
        &server,
        &models.recommendation,
        completion(
            "Here you go:\n{\"medicines\": [\"Povidone iodine\", \"Paracetamol\"], \
             \"home_remedies\": [\"Keep it clean.\", \"Cover with gauze.\"]}\nStay safe!",
        ),
    )
    .await;

    let reply = advisor_for(&server).advise(&image(), "What happened to my knee?").await;

    assert_eq!(reply.llama_scout, "A shallow abrasion.");
    assert_eq!(reply.llama_maverick, "Avoid strain on the knee.");
    assert_eq!(reply.medicines, vec![json!("Povidone iodine"), json!("Paracetamol")]);
    assert_eq!(
        reply.home_remedies,
        vec![json!("Keep it clean."), json!("Cover with gauze.")]
    );
    assert_eq!(reply.buy_links.len(), 2);
    assert_eq!(
        reply.buy_links[0].netmeds,
        "https://www.netmeds.com/catalogsearch/result?q=Povidone+iodine"
    );
}

#[tokio::test]
async fn test_extraction_non_200_yields_empty_lists() {
    let server = MockServer::start().await;
    let models = ModelSet::default();

    mount_for_model(&server, &models.analyzer, completion("analysis")).await;
    mount_for_model(&server, &models.exercise, completion("exercises")).await;
    mount_for_model(
        &server,
        &models.recommendation,
        ResponseTemplate::new(500).set_body_string("internal error"),
    )
    .await;

    let reply = advisor_for(&server).advise(&image(), "q").await;

    assert_eq!(reply.llama_scout, "analysis");
    assert!(reply.medicines.is_empty());
    assert!(reply.home_remedies.is_empty());
    assert!(reply.buy_links.is_empty());
}

#[tokio::test]
async fn test_vision_error_is_inlined_and_isolated() {
    let server = MockServer::start().await;
    let models = ModelSet::default();

    mount_for_model(
        &server,
        &models.analyzer,
        ResponseTemplate::new(401).set_body_string("invalid api key"),
    )
    .await;
    mount_for_model(&server, &models.exercise, completion("Light walking.")).await;
    mount_for_model(&server, &models.recommendation, completion("no json here")).await;

    let reply = advisor_for(&server).advise(&image(), "q").await;

    assert_eq!(reply.llama_scout, "❌ API Error 401: invalid api key");
    assert!(reply.llama_scout.starts_with(FAILURE_MARKER));
    assert_eq!(reply.llama_maverick, "Light walking.");
    assert!(reply.medicines.is_empty());
}

#[tokio::test]
async fn test_advisor_from_config_uses_configured_base_url() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("{\"medicines\": \"Cetirizine\"}"))
        .expect(3)
        .mount(&server)
        .await;

    let config = Config::from_lookup(|key| match key {
        "GROQ_API_KEY" => Some("test-key".to_string()),
        "GROQ_BASE_URL" => Some(uri.clone()),
        _ => None,
    })
    .unwrap();

    let reply = Advisor::from_config(&config)
        .unwrap()
        .advise(&image(), "q")
        .await;

    assert_eq!(reply.medicines, vec![json!("Cetirizine")]);
    assert_eq!(reply.buy_links[0].name, "Cetirizine");
}
