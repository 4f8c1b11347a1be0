//! End-to-end tests of the reqwest client and the dashboard against an
//! in-process mock of the FoodLens services.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use foodlens::flows::auth::authenticate;
use foodlens::*;

#[derive(Default)]
struct MockService {
    logs: Vec<(String, Value)>,
    next_id: i64,
    uploads: Vec<(String, String, usize, String)>,
}

type Shared = Arc<Mutex<MockService>>;

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct UserQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn login(Json(body): Json<LoginBody>) -> (StatusCode, Json<Value>) {
    if body.username == "ada" && body.password == "secret" {
        (StatusCode::OK, Json(json!({ "userId": 7 })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })))
    }
}

async fn register(Json(body): Json<LoginBody>) -> (StatusCode, Json<Value>) {
    if body.username == "ada" {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "Username already exists" })))
    } else {
        (StatusCode::CREATED, Json(json!({ "userId": "u-8" })))
    }
}

async fn food_logs(
    State(state): State<Shared>,
    Query(query): Query<UserQuery>,
) -> (StatusCode, Json<Value>) {
    let Some(user) = query.user_id else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "userId required" })));
    };
    if user == "slow" {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    let state = state.lock().unwrap();
    let logs: Vec<Value> = state
        .logs
        .iter()
        .filter(|(owner, _)| *owner == user)
        .map(|(_, entry)| entry.clone())
        .collect();
    (StatusCode::OK, Json(Value::Array(logs)))
}

async fn recognize(State(state): State<Shared>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut image = None;
    let mut user = String::new();
    let mut weight = String::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default().to_string().as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap();
                image = Some((file_name, mime, bytes.len()));
            }
            "userId" => user = field.text().await.unwrap(),
            "weight" => weight = field.text().await.unwrap(),
            _ => {}
        }
    }

    let Some((file_name, mime, len)) = image.filter(|(_, _, len)| *len > 0) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No image provided" })));
    };

    let mut state = state.lock().unwrap();
    state.uploads.push((file_name, mime, len, weight.clone()));
    state.next_id += 1;
    let entry = json!({
        "id": state.next_id,
        "foodName": "pad_thai",
        "confidence": 0.8765,
        // Float weight and offset-less ISO timestamp, as the log service stores them
        "weight": weight.parse::<f64>().unwrap(),
        "nutrition": { "calories": 357.0, "protein": 14.2, "carbs": 45.0, "fat": 13.1 },
        "timestamp": "2024-05-02T18:45:00.123456"
    });
    state.logs.push((user, entry));

    (
        StatusCode::OK,
        Json(json!({
            "foodName": "pad_thai",
            "confidence": 0.8765,
            "nutrition": { "calories": 357.0, "protein": 14.2, "carbs": 45.0, "fat": 13.1 },
            "summary": "Pad thai is a stir-fried rice noodle dish."
        })),
    )
}

async fn remove(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> (StatusCode, Json<Value>) {
    let user = query.user_id.unwrap_or_default();
    let mut state = state.lock().unwrap();
    let before = state.logs.len();
    state
        .logs
        .retain(|(owner, entry)| !(*owner == user && entry["id"] == json!(id)));

    if state.logs.len() == before {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
    } else {
        (StatusCode::OK, Json(json!({ "message": "Deleted" })))
    }
}

async fn spawn_service() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(MockService::default()));

    let router = Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/food-logs", get(food_logs))
        .route("/api/food-logs/:id", delete(remove))
        .route("/api/recognize", post(recognize))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn client(base_url: &str) -> HttpFoodApi {
    HttpFoodApi::new(HttpFoodApiConfig {
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn photo() -> ImageUpload {
    ImageUpload::new("dinner.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00])
}

#[tokio::test]
async fn test_login_and_register() {
    let (base, _) = spawn_service().await;
    let api = client(&base);

    let grant = api.login(&credentials("ada", "secret")).await.unwrap();
    assert_eq!(grant.user_id, "7");

    let err = api.login(&credentials("ada", "nope")).await.unwrap_err();
    assert_eq!(err, ClientError::Server("Invalid credentials".into()));

    let grant = api.register(&credentials("grace", "pw")).await.unwrap();
    assert_eq!(grant.user_id, "u-8");

    let err = api.register(&credentials("ada", "pw")).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Username already exists"));
}

#[tokio::test]
async fn test_recognize_uploads_multipart() {
    let (base, state) = spawn_service().await;
    let api = client(&base);
    let session = Session::new("7").unwrap();

    let result = api.recognize(&session, &photo(), 250).await.unwrap();
    assert_eq!(result.display_name(), "pad thai");
    assert_eq!(result.confidence_label(), "87.65%");
    assert_eq!(result.summary_heading(), "What is pad thai?");

    let uploads = state.lock().unwrap().uploads.clone();
    assert_eq!(
        uploads,
        vec![("dinner.jpg".to_string(), "image/jpeg".to_string(), 5, "250".to_string())]
    );

    let logs = api.food_logs(&session).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].weight, Some(250));
    assert_eq!(
        logs[0].timestamp.map(|ts| ts.format("%Y-%m-%d %H:%M").to_string()),
        Some("2024-05-02 18:45".to_string())
    );

    let empty = ImageUpload::new("empty.jpg", "image/jpeg", Vec::new());
    let err = api.recognize(&session, &empty, 100).await.unwrap_err();
    assert_eq!(err, ClientError::Server("No image provided".into()));
}

#[tokio::test]
async fn test_food_logs_are_per_user() {
    let (base, _) = spawn_service().await;
    let api = client(&base);

    api.recognize(&Session::new("7").unwrap(), &photo(), 100).await.unwrap();

    assert_eq!(api.food_logs(&Session::new("7").unwrap()).await.unwrap().len(), 1);
    assert!(api.food_logs(&Session::new("9").unwrap()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_log() {
    let (base, _) = spawn_service().await;
    let api = client(&base);
    let session = Session::new("7").unwrap();

    api.recognize(&session, &photo(), 100).await.unwrap();
    api.delete_log(&session, 1).await.unwrap();
    assert!(api.food_logs(&session).await.unwrap().is_empty());

    let err = api.delete_log(&session, 1).await.unwrap_err();
    assert_eq!(err, ClientError::Server("Not found".into()));
}

#[tokio::test]
async fn test_stalled_request_times_out() {
    let (base, _) = spawn_service().await;
    let api = HttpFoodApi::new(HttpFoodApiConfig {
        base_url: base,
        request_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let err = api.food_logs(&Session::new("slow").unwrap()).await.unwrap_err();
    assert_eq!(err, ClientError::Timeout);
}

#[tokio::test]
async fn test_non_json_error_status_is_transport() {
    let (base, _) = spawn_service().await;
    let api = client(&format!("{}/missing", base));

    // Unrouted path: the 404 carries no JSON body
    let err = api.food_logs(&Session::new("7").unwrap()).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let (base, _) = spawn_service().await;
    let api = client(&base);
    let store = MemorySessionStore::new();

    let mut form = AuthForm::new();
    let session = authenticate(&mut form, &api, &store, "ada", "secret")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.load().unwrap(), Some(session));

    let mut dashboard = Dashboard::open(&store).unwrap().unwrap();
    assert_eq!(dashboard.load(&api).await, RefreshOutcome::Applied { visible: 0 });

    dashboard.set_weight_grams(200);
    let outcome = dashboard.analyze(&api, Some(photo())).await.unwrap();
    assert!(outcome.refreshes_logs());
    assert_eq!(dashboard.logs().visible().len(), 1);
    assert_eq!(dashboard.logs().visible()[0].weight_label(), "200g");

    let outcome = dashboard.filter_weight(&api, WeightFilter::Grams(100)).await;
    assert_eq!(outcome, Some(RefreshOutcome::Applied { visible: 0 }));

    dashboard.filter_weight(&api, WeightFilter::All).await;
    let outcome = dashboard.remove(&api, 1).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied { visible: 0 });

    assert_eq!(dashboard.logout(&store).unwrap(), Route::Auth);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_login_leaves_message() {
    let (base, _) = spawn_service().await;
    let api = client(&base);
    let store = MemorySessionStore::new();

    let mut form = AuthForm::new();
    let session = authenticate(&mut form, &api, &store, "ada", "wrong").await.unwrap();

    assert!(session.is_none());
    assert_eq!(form.error(), Some("Invalid credentials"));
    assert!(!form.is_busy());
    assert!(store.load().unwrap().is_none());
}
