use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};
use serde_json::{Value, json};

use stembus_backend::config::{ScoreWeighting, VotingConfig};
use stembus_backend::entities::{
    event_entity as events, location_entity as locations, submission_entity as submissions,
    vote_entity as votes,
};
use stembus_backend::handlers;
use stembus_backend::services::{LocationService, ResultsService, VoteService};

const KEY: &str = "test-geheim";

async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn voting(require_active_event: bool) -> VotingConfig {
    VotingConfig {
        results_key: KEY.to_string(),
        require_active_event,
        ..VotingConfig::default()
    }
}

async fn seed_event(db: &DatabaseConnection, name: &str, active: bool) -> i32 {
    events::ActiveModel {
        name: Set(name.to_string()),
        active: Set(active),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_location(db: &DatabaseConnection, id: i32, event_id: Option<i32>) -> i32 {
    locations::ActiveModel {
        id: Set(id),
        name: Set(format!("Locatie {id}")),
        artist: Set(format!("Artiest {id}")),
        weight: Set(1.0),
        event_id: Set(event_id),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

macro_rules! init_app {
    ($db:expr, $voting:expr) => {{
        let voting: VotingConfig = $voting;
        let db: DatabaseConnection = $db.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new(LocationService::new(
                    db.clone(),
                    voting.require_active_event,
                )))
                .app_data(web::Data::new(VoteService::new(
                    db.clone(),
                    voting.require_active_event,
                )))
                .app_data(web::Data::new(ResultsService::new(db.clone(), &voting)))
                .app_data(web::Data::new(voting))
                .configure(handlers::api_config),
        )
        .await
    }};
}

fn submit_request(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/api/submit").set_json(body)
}

#[actix_web::test]
async fn test_locations_scoped_to_active_event() {
    let db = setup_db().await;
    let old = seed_event(&db, "2024", false).await;
    let current = seed_event(&db, "2025", true).await;
    seed_location(&db, 1, Some(old)).await;
    seed_location(&db, 3, Some(current)).await;
    seed_location(&db, 2, Some(current)).await;

    let app = init_app!(db, voting(true));
    let req = test::TestRequest::get().uri("/api/locations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(
        body["locations"],
        json!([
            { "id": 2, "locatie": "Locatie 2", "artiest": "Artiest 2", "wegingsfactor": 1.0 },
            { "id": 3, "locatie": "Locatie 3", "artiest": "Artiest 3", "wegingsfactor": 1.0 }
        ])
    );
}

#[actix_web::test]
async fn test_locations_empty_without_active_event() {
    let db = setup_db().await;
    let old = seed_event(&db, "2024", false).await;
    seed_location(&db, 1, Some(old)).await;

    let app = init_app!(db, voting(true));
    let req = test::TestRequest::get().uri("/api/locations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "ok": true, "locations": [] }));
}

#[actix_web::test]
async fn test_locations_unscoped_lists_everything() {
    let db = setup_db().await;
    let old = seed_event(&db, "2024", false).await;
    seed_location(&db, 1, Some(old)).await;
    seed_location(&db, 2, None).await;

    let app = init_app!(db, voting(false));
    let req = test::TestRequest::get().uri("/api/locations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["locations"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_submit_three_then_results() {
    let db = setup_db().await;
    let event = seed_event(&db, "2025", true).await;
    for id in [5, 7, 9] {
        seed_location(&db, id, Some(event)).await;
    }

    let app = init_app!(db, voting(true));
    let resp = test::call_service(
        &app,
        submit_request(json!({
            "selections": [
                { "locationId": 5, "points": 3 },
                { "locationId": 7, "points": 2, "comment": "  heel mooi " },
                { "locationId": 9, "points": 1 }
            ]
        })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "ok": true }));

    let subs = submissions::Entity::find().all(&db).await.unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].event_id, Some(event));
    assert_eq!(subs[0].submission_token.len(), 32);

    let stored = votes::Entity::find()
        .order_by_asc(votes::Column::Id)
        .all(&db)
        .await
        .unwrap();
    let pairs: Vec<(i32, i32)> = stored.iter().map(|v| (v.location_id, v.points)).collect();
    assert_eq!(pairs, vec![(5, 3), (7, 2), (9, 1)]);
    assert!(stored.iter().all(|v| v.submission_id == subs[0].id));
    assert_eq!(stored[1].comment.as_deref(), Some("heel mooi"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/results?key={KEY}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], json!(true));

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["positie"], json!(1));
    assert_eq!(rows[0]["locatie_id"], json!(5));
    assert_eq!(rows[0]["aantal_3"], json!(1));
    assert_eq!(rows[1]["locatie_id"], json!(7));
    assert_eq!(rows[1]["aantal_2"], json!(1));
    assert_eq!(rows[1]["toelichting_bundel"], json!("heel mooi"));
    assert_eq!(rows[2]["locatie_id"], json!(9));
    assert_eq!(rows[2]["aantal_1"], json!(1));
    assert_eq!(rows[2]["toelichting_bundel"], Value::Null);
}

#[actix_web::test]
async fn test_validation_failures_write_nothing() {
    let db = setup_db().await;
    let event = seed_event(&db, "2025", true).await;
    for id in [1, 2, 3, 4] {
        seed_location(&db, id, Some(event)).await;
    }
    let app = init_app!(db, voting(true));

    let cases = [
        (json!({ "selections": [] }), "Select 1, 2 or 3 locations"),
        (json!({}), "Select 1, 2 or 3 locations"),
        (
            json!({ "selections": [
                { "locationId": 1, "points": 3 }, { "locationId": 2, "points": 2 },
                { "locationId": 3, "points": 1 }, { "locationId": 4, "points": 1 }
            ] }),
            "Select 1, 2 or 3 locations",
        ),
        (
            json!({ "selections": [
                { "locationId": 1, "points": 3 }, { "locationId": 1, "points": 2 }
            ] }),
            "Locations must be unique",
        ),
        (
            json!({ "selections": [
                { "locationId": 1, "points": 3 }, { "locationId": 2, "points": 1 }
            ] }),
            "Points must be 3 and 2, each used exactly once",
        ),
        (
            json!({ "selections": [ { "locationId": 1, "points": 2 } ] }),
            "Points must be 3, each used exactly once",
        ),
    ];

    for (payload, message) in cases {
        let resp = test::call_service(&app, submit_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "ok": false, "error": message }));
    }

    assert_eq!(submissions::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(votes::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let db = setup_db().await;
    let app = init_app!(db, voting(true));

    let req = test::TestRequest::post()
        .uri("/api/submit")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));
}

#[actix_web::test]
async fn test_whitespace_comment_stored_as_null() {
    let db = setup_db().await;
    let event = seed_event(&db, "2025", true).await;
    seed_location(&db, 1, Some(event)).await;
    let app = init_app!(db, voting(true));

    let resp = test::call_service(
        &app,
        submit_request(json!({
            "selections": [ { "locationId": 1, "points": 3, "comment": " \t  " } ]
        })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = votes::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.comment, None);
}

#[actix_web::test]
async fn test_submit_requires_active_event_when_scoped() {
    let db = setup_db().await;
    seed_location(&db, 1, None).await;
    let app = init_app!(db, voting(true));

    let resp = test::call_service(
        &app,
        submit_request(json!({ "selections": [ { "locationId": 1, "points": 3 } ] })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "ok": false, "error": "No active event" }));
    assert_eq!(submissions::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_submit_unscoped_without_event() {
    let db = setup_db().await;
    seed_location(&db, 1, None).await;
    seed_location(&db, 2, None).await;
    let app = init_app!(db, voting(false));

    let resp = test::call_service(
        &app,
        submit_request(json!({ "selections": [
            { "locationId": 2, "points": 3 }, { "locationId": 1, "points": 2 }
        ] })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let sub = submissions::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(sub.event_id, None);
    assert_eq!(votes::Entity::find().count(&db).await.unwrap(), 2);
}

#[actix_web::test]
async fn test_location_outside_active_event_rejected() {
    let db = setup_db().await;
    let old = seed_event(&db, "2024", false).await;
    let current = seed_event(&db, "2025", true).await;
    seed_location(&db, 1, Some(current)).await;
    seed_location(&db, 2, Some(old)).await;
    let app = init_app!(db, voting(true));

    for payload in [
        json!({ "selections": [ { "locationId": 1, "points": 3 }, { "locationId": 2, "points": 2 } ] }),
        json!({ "selections": [ { "locationId": 99, "points": 3 } ] }),
    ] {
        let resp = test::call_service(&app, submit_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(submissions::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_results_denied_without_correct_key() {
    let db = setup_db().await;
    let app = init_app!(db, voting(true));

    for uri in [
        "/api/results",
        "/api/results?key=",
        "/api/results?key=fout",
        "/api/results.csv",
        "/api/results.csv?key=TEST-GEHEIM",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "ok": false, "error": "access denied" }));
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/results?key={KEY}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "ok": true, "rows": [] }));
}

#[actix_web::test]
async fn test_results_refused_when_key_not_configured() {
    let db = setup_db().await;
    let config = VotingConfig {
        results_key: String::new(),
        ..VotingConfig::default()
    };
    let app = init_app!(db, config);

    let req = test::TestRequest::get().uri("/api/results?key=").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_results_csv_export() {
    let db = setup_db().await;
    let event = seed_event(&db, "2025", true).await;
    locations::ActiveModel {
        id: Set(1),
        name: Set("Zaal \"Noord\"".to_string()),
        artist: Set("Duo, live".to_string()),
        weight: Set(2.0),
        event_id: Set(Some(event)),
    }
    .insert(&db)
    .await
    .unwrap();
    seed_location(&db, 2, Some(event)).await;

    let config = VotingConfig {
        weighting: ScoreWeighting::Multiply,
        ..voting(true)
    };
    let app = init_app!(db, config);

    for payload in [
        json!({ "selections": [
            { "locationId": 1, "points": 2, "comment": "zeg \"wow\"" },
            { "locationId": 2, "points": 3 }
        ] }),
        json!({ "selections": [ { "locationId": 1, "points": 3, "comment": "top" } ] }),
    ] {
        let resp = test::call_service(&app, submit_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/results.csv?key={KEY}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = headers
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("uitslag.csv"));
    assert_eq!(
        headers.get("cache-control").unwrap().to_str().unwrap(),
        "no-store"
    );

    let body = test::read_body(resp).await;
    let mut reader = csv::Reader::from_reader(body.as_ref());
    assert_eq!(reader.headers().unwrap().len(), 11);
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    // 地点 1: (2 + 3) * 2.0 = 10，地点 2: 3 * 1.0 = 3
    let first = &records[0];
    assert_eq!(&first[0], "1");
    assert_eq!(&first[1], "1");
    assert_eq!(&first[2], "Zaal \"Noord\"");
    assert_eq!(&first[3], "Duo, live");
    assert_eq!(&first[4], "2");
    assert_eq!(&first[5], "2");
    assert_eq!(&first[6], "10");
    assert_eq!((&first[7], &first[8], &first[9]), ("1", "1", "0"));
    assert_eq!(&first[10], "zeg \"wow\" | top");

    let second = &records[1];
    assert_eq!(&second[1], "2");
    assert_eq!(&second[6], "3");
    assert_eq!(&second[10], "");
}
