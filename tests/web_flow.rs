/// End-to-end tests of the search page
/// Serves the router on a local port and drives it like a browser form
use credito_search::client::{CreditoApi, CreditoClient};
use credito_search::handlers::{router, AppState};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the app against `backend` and returns its base URL.
async fn spawn_app(backend: &MockServer) -> String {
    let client = CreditoClient::new(
        &format!("{}/api/creditos", backend.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let api: Arc<dyn CreditoApi> = Arc::new(client);
    let app = router(AppState::new(api));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn post_form(app: &str, route: &str, form: &[(&str, &str)]) -> String {
    // Redirects are followed, so this returns the re-rendered page.
    let response = reqwest::Client::new()
        .post(format!("{}{}", app, route))
        .form(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.text().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let backend = MockServer::start().await;
    let app = spawn_app(&backend).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", app))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_initial_page() {
    let backend = MockServer::start().await;
    let app = spawn_app(&backend).await;

    let html = reqwest::get(&app).await.unwrap().text().await.unwrap();
    assert!(html.contains("Consulta de Créditos"));
    assert!(html.contains(r#"<option value="nfse" selected>"#));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn test_search_by_nfse_renders_results() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creditos/7891011"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"numeroCredito": "123456", "numeroNfse": "7891011", "valorIssqn": 1500.75},
            {"numeroCredito": "789012", "numeroNfse": "7891011"}
        ])))
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    let html = post_form(&app, "/buscar", &[("termo", "7891011"), ("tipo", "nfse")]).await;
    assert!(html.contains("<td>123456</td>"));
    assert!(html.contains("<td>789012</td>"));
    assert!(html.contains("R$ 1500.75"));
    assert!(html.contains(r#"value="7891011""#));
    assert!(!html.contains("Buscando..."));
}

#[tokio::test]
async fn test_search_by_credit_number_and_clear() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creditos/credito/123456"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"numeroCredito": "123456", "numeroNfse": "7891011"})),
        )
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    let html = post_form(&app, "/buscar", &[("termo", "123456"), ("tipo", "credito")]).await;
    assert!(html.contains("<td>123456</td><td>7891011</td>"));
    assert!(html.contains(r#"<option value="credito" selected>"#));

    let html = post_form(&app, "/limpar", &[]).await;
    assert!(!html.contains("<table>"));
    assert!(html.contains(r#"name="termo" value="""#));
    // Mode survives a clear.
    assert!(html.contains(r#"<option value="credito" selected>"#));
}

#[tokio::test]
async fn test_blank_term_shows_validation_message() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    let html = post_form(&app, "/buscar", &[("termo", "   "), ("tipo", "nfse")]).await;
    assert!(html.contains("Digite um número para buscar"));
}

#[tokio::test]
async fn test_backend_error_message_is_rendered() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creditos/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status": 404,
            "error": "Não encontrado",
            "message": "Nenhum crédito encontrado para a NFS-e: 999"
        })))
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    let html = post_form(&app, "/buscar", &[("termo", "999"), ("tipo", "nfse")]).await;
    assert!(html.contains("Nenhum crédito encontrado para a NFS-e: 999"));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn test_unknown_mode_keeps_current_mode() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creditos/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    let html = post_form(&app, "/buscar", &[("termo", "42"), ("tipo", "cpf")]).await;
    assert!(html.contains(r#"<option value="nfse" selected>"#));
}

#[tokio::test]
async fn test_dropped_request_still_finishes_search() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creditos/7891011"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"numeroCredito": "123456", "numeroNfse": "7891011"}]))
                .set_delay(Duration::from_millis(800)),
        )
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_app(&backend).await;

    // The browser gives up long before the backend answers.
    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(150))
        .build()
        .unwrap();
    let result = impatient
        .post(format!("{}/buscar", app))
        .form(&[("termo", "7891011"), ("tipo", "nfse")])
        .send()
        .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_secs(2)).await;

    let html = reqwest::get(&app).await.unwrap().text().await.unwrap();
    assert!(!html.contains("Buscando..."));
    assert!(!html.contains("disabled"));
    assert!(html.contains("<td>123456</td>"));
}
