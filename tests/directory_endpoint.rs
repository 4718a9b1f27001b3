//! End-to-end coverage for the directory wire protocol.
//!
//! Drives the real Actix handler over the memory backend and asserts the
//! response envelopes the protocol documents. State lives in the dispatcher's
//! store handles, so the app itself can be rebuilt per request.

use std::sync::Arc;

use actix_web::{App, test, web};
use serde_json::Value;

use account_directory::domain::AccountDirectoryService;
use account_directory::inbound::http::dispatch::{MethodDispatcher, directory_endpoint};
use account_directory::inbound::http::health::{HealthState, live, ready};
use account_directory::outbound::persistence::{BackendConfig, BackendRegistry};

fn memory_dispatcher() -> web::Data<MethodDispatcher> {
    let registry = BackendRegistry::builtin();
    let backend = registry
        .resolve(
            "memory",
            &BackendConfig {
                connection_string: "local".to_owned(),
                realm: "useraccounts".to_owned(),
            },
        )
        .expect("memory backend resolves");

    let directory = Arc::new(AccountDirectoryService::new(backend.accounts));
    web::Data::new(MethodDispatcher::new(directory, backend.names))
}

async fn post(dispatcher: &web::Data<MethodDispatcher>, body: impl Into<String>) -> Value {
    let app = test::init_service(
        App::new()
            .app_data(dispatcher.clone())
            .service(directory_endpoint),
    )
    .await;
    let request = test::TestRequest::post()
        .uri("/directory")
        .set_payload(body.into())
        .to_request();
    let bytes = test::call_and_read_body(&app, request).await;
    serde_json::from_slice(&bytes).expect("JSON response")
}

#[actix_web::test]
async fn create_then_lookup_by_name_returns_the_record() {
    let dispatcher = memory_dispatcher();

    let created = post(
        &dispatcher,
        "METHOD=create_user&first_name=Jane&last_name=Doe&email=jane%40example.com",
    )
    .await;
    assert_eq!(created["Result"], "Success");
    assert_eq!(created["first_name"], "Jane");

    let fetched = post(
        &dispatcher,
        "METHOD=get_user_by_name&first_name=Jane&last_name=Doe",
    )
    .await;
    assert_eq!(fetched["Result"], "Success");
    assert_eq!(fetched["first_name"], "Jane");
    assert_eq!(fetched["last_name"], "Doe");
    assert_eq!(fetched["email"], "jane@example.com");
    assert_eq!(fetched["principal_id"], created["principal_id"]);
}

#[actix_web::test]
async fn duplicate_create_reports_an_existing_user() {
    let dispatcher = memory_dispatcher();
    let body = "METHOD=create_user&first_name=Jane&last_name=Doe&email=jane%40example.com";

    let first = post(&dispatcher, body).await;
    assert_eq!(first["Result"], "Success");

    let second = post(&dispatcher, body).await;
    assert_eq!(second["Result"], "Failure");
    assert_eq!(second["Message"], "User already exists");
}

#[actix_web::test]
async fn missing_method_fails_with_the_fixed_message() {
    let dispatcher = memory_dispatcher();

    let value = post(&dispatcher, "first_name=Jane&last_name=Doe").await;
    assert_eq!(value["Result"], "Failure");
    assert_eq!(value["Message"], "Error, no method defined!");
}

#[actix_web::test]
async fn unknown_method_fails_with_the_fixed_message() {
    let dispatcher = memory_dispatcher();

    let value = post(&dispatcher, "METHOD=bogus_method").await;
    assert_eq!(value["Result"], "Failure");
    assert_eq!(value["Message"], "Unrecognized method requested!");
}

#[actix_web::test]
async fn create_without_required_parameters_short_circuits() {
    let dispatcher = memory_dispatcher();

    let value = post(&dispatcher, "METHOD=create_user&first_name=Jane").await;
    assert_eq!(value["Result"], "Failure");
    assert_eq!(value["Message"], "Some or all required parameters missing");
}

#[actix_web::test]
async fn update_of_a_missing_account_changes_nothing() {
    let dispatcher = memory_dispatcher();

    let body = format!(
        "METHOD=update_user&principal_id={}&scope_id=00000000-0000-0000-0000-000000000000&first_name=Jane&last_name=Doe&email=j%40e.com&user_flags=0&user_level=0&user_title=",
        uuid::Uuid::new_v4(),
    );
    let value = post(&dispatcher, body).await;
    assert_eq!(value["Result"], "Failure");
    assert_eq!(value["Message"], "User does not exist");

    let lookup = post(
        &dispatcher,
        "METHOD=get_user_by_name&first_name=Jane&last_name=Doe",
    )
    .await;
    assert_eq!(lookup["Result"], "Failure");
}

#[actix_web::test]
async fn update_replaces_every_field_and_lookup_reflects_it() {
    let dispatcher = memory_dispatcher();

    let created = post(
        &dispatcher,
        "METHOD=create_user&first_name=Jane&last_name=Doe&email=jane%40example.com&home_uri=http%3A%2F%2Fold.example",
    )
    .await;
    let principal_id = created["principal_id"].as_str().expect("principal id");

    let update = format!(
        "METHOD=update_user&principal_id={principal_id}&scope_id=00000000-0000-0000-0000-000000000000&first_name=Janet&last_name=Doe&email=janet%40example.com&user_flags=4&user_level=2&user_title=Admin",
    );
    let updated = post(&dispatcher, update).await;
    assert_eq!(updated["Result"], "Success");

    let fetched = post(
        &dispatcher,
        format!("METHOD=get_user_by_id&principal_id={principal_id}"),
    )
    .await;
    assert_eq!(fetched["Result"], "Success");
    assert_eq!(fetched["first_name"], "Janet");
    assert_eq!(fetched["email"], "janet@example.com");
    assert_eq!(fetched["user_flags"], 4);
    assert_eq!(fetched["user_level"], 2);
    assert_eq!(fetched["user_title"], "Admin");
    assert_eq!(fetched["created"], created["created"]);
    // Full replace: the update carried no service URLs, so the old home
    // endpoint is gone.
    assert_eq!(fetched["service_urls"]["HomeURI"], "");
}

#[actix_web::test]
async fn lookup_by_email_finds_the_account() {
    let dispatcher = memory_dispatcher();

    post(
        &dispatcher,
        "METHOD=create_user&first_name=Jane&last_name=Doe&email=jane%40example.com",
    )
    .await;

    let fetched = post(
        &dispatcher,
        "METHOD=get_user_by_email&email=jane%40example.com",
    )
    .await;
    assert_eq!(fetched["Result"], "Success");
    assert_eq!(fetched["first_name"], "Jane");
}

#[actix_web::test]
async fn scoped_accounts_are_hidden_from_other_scopes() {
    let dispatcher = memory_dispatcher();
    let scope = uuid::Uuid::new_v4();

    let created = post(
        &dispatcher,
        format!(
            "METHOD=create_user&first_name=Jane&last_name=Doe&email=j%40e.com&scope_id={scope}"
        ),
    )
    .await;
    assert_eq!(created["Result"], "Success");

    let elsewhere = post(
        &dispatcher,
        format!(
            "METHOD=get_user_by_name&first_name=Jane&last_name=Doe&scope_id={}",
            uuid::Uuid::new_v4(),
        ),
    )
    .await;
    assert_eq!(elsewhere["Result"], "Failure");

    let at_home = post(
        &dispatcher,
        format!("METHOD=get_user_by_name&first_name=Jane&last_name=Doe&scope_id={scope}"),
    )
    .await;
    assert_eq!(at_home["Result"], "Success");
}

#[actix_web::test]
async fn query_with_no_matches_is_a_failure_envelope() {
    let dispatcher = memory_dispatcher();

    let value = post(&dispatcher, "METHOD=get_users_by_query&query=nobody").await;
    assert_eq!(value["Result"], "Failure");
    assert_eq!(value["Message"], "Not found");
}

#[actix_web::test]
async fn query_returns_matches_under_the_users_array() {
    let dispatcher = memory_dispatcher();

    post(
        &dispatcher,
        "METHOD=create_user&first_name=Jane&last_name=Doe&email=jane%40example.com",
    )
    .await;
    post(
        &dispatcher,
        "METHOD=create_user&first_name=John&last_name=Adams&email=john%40example.com",
    )
    .await;

    let value = post(&dispatcher, "METHOD=get_users_by_query&query=doe").await;
    assert_eq!(value["Result"], "Success");
    let users = value["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["first_name"], "Jane");
}

#[actix_web::test]
async fn legacy_name_records_round_trip_and_overwrite() {
    let dispatcher = memory_dispatcher();

    let stored = post(
        &dispatcher,
        "METHOD=put_wxuser&first_name=Ada&last_name=Lovelace&fav_food=pie",
    )
    .await;
    assert_eq!(stored["Result"], "Success");

    post(
        &dispatcher,
        "METHOD=put_wxuser&first_name=Ada&last_name=Lovelace&fav_food=cake",
    )
    .await;

    let listed = post(&dispatcher, "METHOD=list_wxuser").await;
    assert_eq!(listed["Result"], "Success");
    assert_eq!(listed["Ada Lovelace"]["food"], "cake");
}

#[actix_web::test]
async fn testing_method_answers_with_a_greeting() {
    let dispatcher = memory_dispatcher();

    let value = post(&dispatcher, "METHOD=testing&HELLO=world").await;
    assert_eq!(value["Result"], "Success");
    assert_eq!(value["Greeting"], "Goodbye!");
    assert_eq!(value["HELLO"], "world");
}

#[actix_web::test]
async fn health_probes_reflect_readiness() {
    let health_state = web::Data::new(HealthState::new());
    let app = test::init_service(
        App::new()
            .app_data(health_state.clone())
            .service(ready)
            .service(live),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 503);

    health_state.mark_ready();
    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert!(response.status().is_success());

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert!(response.status().is_success());
}
