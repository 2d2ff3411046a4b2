use housecast::session::{SessionId, SESSION_COOKIE};
use housecast::{
    load_model, router, AnimationSet, AppState, LoadedModel, ModelArtifact, ModelStatus,
    SessionStore, Variant, VariantProfile,
};
use pretty_assertions::assert_eq;
use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use reqwest::{redirect, Client, Response, StatusCode};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

struct TestServer {
    base: String,
    client: Client,
    state: AppState,
}

impl TestServer {
    async fn start(variant: Variant, model: ModelStatus) -> Self {
        let state = AppState::new(
            VariantProfile::new(variant),
            model,
            AnimationSet::default(),
            SessionStore::new(16),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("client");
        Self {
            base: format!("http://{addr}"),
            client,
            state,
        }
    }

    async fn get(&self, path: &str, session: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}{path}", self.base));
        if let Some(session) = session {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={session}"));
        }
        request.send().await.expect("get")
    }

    async fn post(&self, path: &str, session: Option<&str>, body: &str) -> Response {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string());
        if let Some(session) = session {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={session}"));
        }
        request.send().await.expect("post")
    }
}

fn session_from(response: &Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let (pair, _) = header.split_once(';')?;
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
}

/// Walks a fresh browser through splash, entry, then returns its session id.
async fn enter_app(server: &TestServer) -> String {
    let splash = server.get("/", None).await;
    assert_eq!(splash.status(), StatusCode::OK);
    assert!(session_from(&splash).is_none());
    let html = splash.text().await.expect("body");
    assert!(html.contains("Enter App →"));
    assert!(!html.contains(r#"class="prediction-form""#));

    let entered = server.post("/enter", None, "").await;
    assert_eq!(entered.status(), StatusCode::SEE_OTHER);
    assert_eq!(entered.headers().get(LOCATION).expect("location"), "/");
    session_from(&entered).expect("entry sets session cookie")
}

#[tokio::test]
async fn splash_enter_predict_flow() {
    let model = load_model(&fixture("linear_ordinal.json"));
    assert!(model.is_loaded());
    let server = TestServer::start(Variant::Classic, model).await;

    let session = enter_app(&server).await;

    let form = server.get("/", Some(&session)).await;
    let html = form.text().await.expect("body");
    assert!(html.contains(r#"class="prediction-form""#));
    assert!(!html.contains(r#"class="prediction-result""#));
    assert!(!html.contains("Enter App →"));

    let predicted = server
        .post(
            "/predict",
            Some(&session),
            "subclass_code=60&zoning=FV&lot_area=9000&lot_config=Inside&building_type=1Fam\
             &overall_condition=5&year_built=2000&year_remodeled=2000&exterior_material=VinylSd\
             &basement_finished_area_2=0&total_basement_area=800",
        )
        .await;
    assert_eq!(predicted.status(), StatusCode::OK);
    let html = predicted.text().await.expect("body");
    assert!(html.contains("🏷️ Estimated House Price: ₹ 91,000.00"));
    assert!(html.contains(r#"<option value="FV" selected>"#));

    let id = SessionId::parse(&session).expect("session id");
    assert_eq!(server.state.sessions().transitions(&id).await, Some(1));
}

#[tokio::test]
async fn entering_twice_is_one_transition() {
    let model = load_model(&fixture("linear_ordinal.json"));
    let server = TestServer::start(Variant::Classic, model).await;
    let session = enter_app(&server).await;

    let again = server.post("/enter", Some(&session), "").await;
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    assert!(session_from(&again).is_none());

    let id = SessionId::parse(&session).expect("session id");
    assert_eq!(server.state.sessions().transitions(&id).await, Some(1));
}

#[tokio::test]
async fn predict_before_entering_returns_to_splash() {
    let model = load_model(&fixture("linear_ordinal.json"));
    let server = TestServer::start(Variant::Classic, model).await;

    let response = server.post("/predict", None, "lot_area=9000").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).expect("location"), "/");
    assert!(session_from(&response).is_none());
    assert_eq!(server.state.sessions().len().await, 0);
}

#[tokio::test]
async fn anonymous_visits_do_not_evict_entered_sessions() {
    let model = load_model(&fixture("linear_ordinal.json"));
    let server = TestServer::start(Variant::Classic, model).await;
    let session = enter_app(&server).await;

    for _ in 0..32 {
        let splash = server.get("/", None).await;
        assert_eq!(splash.status(), StatusCode::OK);
    }

    let html = server.get("/", Some(&session)).await.text().await.expect("body");
    assert!(html.contains(r#"class="prediction-form""#));
    assert!(!html.contains("Enter App →"));
}

#[tokio::test]
async fn one_hot_variant_scores_in_dollars() {
    let model = load_model(&fixture("one_hot_forest.json"));
    let server = TestServer::start(Variant::OneHot, model).await;
    let session = enter_app(&server).await;

    let html = server
        .post("/predict", Some(&session), "zoning=RL&lot_area=8000")
        .await
        .text()
        .await
        .expect("body");
    assert!(html.contains("🏷️ Estimated House Price: $175,000.00"));

    let html = server
        .post("/predict", Some(&session), "zoning=FV&lot_area=12000")
        .await
        .text()
        .await
        .expect("body");
    assert!(html.contains("🏷️ Estimated House Price: $200,000.00"));
}

#[tokio::test]
async fn missing_model_is_reported_on_submit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let model = load_model(&dir.path().join("house_price_model.json"));
    let server = TestServer::start(Variant::Extended, model).await;

    let health: Value = server
        .get("/healthz", None)
        .await
        .json()
        .await
        .expect("health json");
    assert_eq!(
        health,
        serde_json::json!({ "model_loaded": false, "variant": "extended" })
    );

    let session = enter_app(&server).await;
    let html = server
        .post("/predict", Some(&session), "lot_area=9000")
        .await
        .text()
        .await
        .expect("body");
    assert!(html.contains("Model file not found: "));
    assert!(!html.contains("Estimated House Price"));
}

#[tokio::test]
async fn schema_mismatch_shows_failure_and_form_survives() {
    let artifact = ModelArtifact::from_json(
        r#"{
            "encoding": "ordinal",
            "features": ["LotArea", "GarageCars"],
            "estimator": { "type": "linear", "intercept": 0.0, "coefficients": [1.0, 1.0] }
        }"#,
    )
    .expect("artifact");
    let model: ModelStatus = LoadedModel::from_artifact(artifact).expect("model").into();
    let server = TestServer::start(Variant::Classic, model).await;
    let session = enter_app(&server).await;

    let response = server.post("/predict", Some(&session), "lot_area=9000").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.expect("body");
    assert!(html.contains("Prediction failed. Please make sure your model and input format are correct."));
    assert!(html.contains("GarageCars"));
    assert!(html.contains(r#"class="prediction-form""#));

    let health: Value = server
        .get("/healthz", Some(&session))
        .await
        .json()
        .await
        .expect("health json");
    assert_eq!(health["model_loaded"], Value::Bool(true));
}
