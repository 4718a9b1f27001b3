//! Method dispatcher for the directory wire protocol.
//!
//! One POST endpoint carries every operation; the body names the method and
//! its parameters. The dispatcher owns routing, required-parameter checks,
//! and failure shaping. No error escapes to the transport: every outcome is
//! a response envelope, and protocol failures ride in the body rather than
//! the HTTP status.

use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::ports::{AccountDirectory, NameStore};
use crate::domain::{Account, AccountUpdate, DirectoryError, GLOBAL_SCOPE, NewAccount, ServiceUrls};
use crate::inbound::http::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::inbound::http::legacy;

/// Failure messages fixed by the wire contract.
pub const MSG_NO_METHOD: &str = "Error, no method defined!";
pub const MSG_UNRECOGNIZED: &str = "Unrecognized method requested!";
pub const MSG_MISSING_PARAMS: &str = "Some or all required parameters missing";
pub const MSG_INVALID_PARAMS: &str = "Some or all parameters are invalid";
pub const MSG_INTERNAL: &str = "Internal error";
pub const MSG_NOT_FOUND: &str = "Not found";
pub const MSG_USER_EXISTS: &str = "User already exists";
pub const MSG_USER_MISSING: &str = "User does not exist";

/// Per-call failure raised inside a handler.
///
/// Every variant maps to a fixed caller-visible message; internal detail is
/// logged where the failure is first seen and never crosses the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DispatchFailure {
    Unrecognized,
    MissingParameter,
    InvalidParameter,
    Rejected(&'static str),
    Internal,
}

impl DispatchFailure {
    fn message(&self) -> &'static str {
        match self {
            Self::Unrecognized => MSG_UNRECOGNIZED,
            Self::MissingParameter => MSG_MISSING_PARAMS,
            Self::InvalidParameter => MSG_INVALID_PARAMS,
            Self::Rejected(message) => *message,
            Self::Internal => MSG_INTERNAL,
        }
    }
}

pub(crate) type HandlerResult = Result<ResponseEnvelope, DispatchFailure>;

/// Routes decoded envelopes to account operations.
///
/// Holds only `Arc` references to the driving ports. Each call is
/// independent and retains no state, so one instance is freely shared
/// across transport workers.
pub struct MethodDispatcher {
    directory: Arc<dyn AccountDirectory>,
    names: Arc<dyn NameStore>,
}

impl MethodDispatcher {
    /// Create a dispatcher over the directory and legacy name ports.
    pub fn new(directory: Arc<dyn AccountDirectory>, names: Arc<dyn NameStore>) -> Self {
        Self { directory, names }
    }

    /// Handle one request body, always producing response bytes.
    pub async fn handle(&self, path: &str, body: &[u8]) -> Vec<u8> {
        let Ok(envelope) = RequestEnvelope::decode(body) else {
            return ResponseEnvelope::failure(MSG_NO_METHOD).into_bytes();
        };
        let Some(method) = envelope.get("METHOD") else {
            return ResponseEnvelope::failure(MSG_NO_METHOD).into_bytes();
        };
        debug!(path, method, "dispatching directory request");

        let result = match method {
            "create_user" => self.create_user(&envelope).await,
            "update_user" => self.update_user(&envelope).await,
            "get_user_by_name" => self.get_user_by_name(&envelope).await,
            "get_user_by_email" => self.get_user_by_email(&envelope).await,
            "get_user_by_id" => self.get_user_by_id(&envelope).await,
            "get_users_by_query" => self.get_users_by_query(&envelope).await,
            "testing" => legacy::testing(&envelope),
            "get_user_info" => legacy::get_user_info(self.directory.as_ref(), &envelope).await,
            "put_wxuser" => legacy::put_wxuser(self.names.as_ref(), &envelope).await,
            "list_wxuser" => legacy::list_wxuser(self.names.as_ref()).await,
            _ => {
                debug!(method, "unknown directory method");
                Err(DispatchFailure::Unrecognized)
            }
        };

        match result {
            Ok(response) => response.into_bytes(),
            Err(failure) => ResponseEnvelope::failure(failure.message()).into_bytes(),
        }
    }

    async fn create_user(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let first_name = required(envelope, "first_name")?;
        let last_name = required(envelope, "last_name")?;
        let email = required(envelope, "email")?;
        let scope_id = scope_or_global(envelope)?;

        let account = self
            .directory
            .create_account(NewAccount {
                scope_id,
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email: email.to_owned(),
                user_flags: optional_i32(envelope, "user_flags")?,
                user_level: optional_i32(envelope, "user_level")?,
                user_title: envelope.get("user_title").unwrap_or_default().to_owned(),
                service_urls: service_urls_from(envelope),
            })
            .await
            .map_err(map_directory_error)?;

        info!(
            principal_id = %account.principal_id,
            first_name = %account.first_name,
            last_name = %account.last_name,
            "created account"
        );
        Ok(account_response(&account))
    }

    async fn update_user(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let principal_id = parse_uuid(required(envelope, "principal_id")?)?;
        let scope_id = parse_uuid(required(envelope, "scope_id")?)?;
        let first_name = required(envelope, "first_name")?;
        let last_name = required(envelope, "last_name")?;
        let email = required(envelope, "email")?;
        let user_flags = parse_i32(required(envelope, "user_flags")?)?;
        let user_level = parse_i32(required(envelope, "user_level")?)?;
        let user_title = required_key(envelope, "user_title")?;

        let account = self
            .directory
            .update_account(AccountUpdate {
                principal_id,
                scope_id,
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email: email.to_owned(),
                user_flags,
                user_level,
                user_title: user_title.to_owned(),
                service_urls: service_urls_from(envelope).unwrap_or_default(),
            })
            .await
            .map_err(map_directory_error)?;

        info!(principal_id = %account.principal_id, "updated account");
        Ok(account_response(&account))
    }

    async fn get_user_by_name(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let first_name = required(envelope, "first_name")?;
        let last_name = required(envelope, "last_name")?;
        let scope_id = scope_or_global(envelope)?;

        let account = self
            .directory
            .account_by_name(scope_id, first_name, last_name)
            .await
            .map_err(map_directory_error)?;
        found_or_not(account)
    }

    async fn get_user_by_email(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let email = required(envelope, "email")?;
        let scope_id = scope_or_global(envelope)?;

        let account = self
            .directory
            .account_by_email(scope_id, email)
            .await
            .map_err(map_directory_error)?;
        found_or_not(account)
    }

    async fn get_user_by_id(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let principal_id = parse_uuid(required(envelope, "principal_id")?)?;
        let scope_id = scope_or_global(envelope)?;

        let account = self
            .directory
            .account_by_id(scope_id, principal_id)
            .await
            .map_err(map_directory_error)?;
        found_or_not(account)
    }

    async fn get_users_by_query(&self, envelope: &RequestEnvelope) -> HandlerResult {
        let query = required(envelope, "query")?;
        let scope_id = scope_or_global(envelope)?;

        let matches = self
            .directory
            .search_accounts(scope_id, query)
            .await
            .map_err(map_directory_error)?;

        // Zero matches is a failure, not an empty success. Documented wire
        // contract; see DESIGN.md.
        if matches.is_empty() {
            return Err(DispatchFailure::Rejected(MSG_NOT_FOUND));
        }

        info!(count = matches.len(), "account query matched");
        let users: Vec<Value> = matches
            .iter()
            .map(|account| Value::Object(account_fields(account)))
            .collect();
        Ok(ResponseEnvelope::success().with("users", users))
    }
}

/// Single wire endpoint: every operation arrives as a POST body.
#[post("/directory")]
pub async fn directory_endpoint(
    dispatcher: web::Data<MethodDispatcher>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let bytes = dispatcher.handle(request.path(), &body).await;
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(bytes)
}

/// Require a parameter that must also be non-blank.
pub(crate) fn required<'a>(
    envelope: &'a RequestEnvelope,
    key: &str,
) -> Result<&'a str, DispatchFailure> {
    match envelope.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DispatchFailure::MissingParameter),
    }
}

/// Require a parameter key to be present; blank values are allowed.
fn required_key<'a>(envelope: &'a RequestEnvelope, key: &str) -> Result<&'a str, DispatchFailure> {
    envelope.get(key).ok_or(DispatchFailure::MissingParameter)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DispatchFailure> {
    Uuid::parse_str(value.trim()).map_err(|_| DispatchFailure::InvalidParameter)
}

fn parse_i32(value: &str) -> Result<i32, DispatchFailure> {
    value
        .trim()
        .parse()
        .map_err(|_| DispatchFailure::InvalidParameter)
}

fn optional_i32(envelope: &RequestEnvelope, key: &str) -> Result<i32, DispatchFailure> {
    match envelope.get(key) {
        Some(value) => parse_i32(value),
        None => Ok(0),
    }
}

/// Optional `scope_id`, defaulting to the global scope.
fn scope_or_global(envelope: &RequestEnvelope) -> Result<Uuid, DispatchFailure> {
    match envelope.get("scope_id") {
        Some(value) => parse_uuid(value),
        None => Ok(GLOBAL_SCOPE),
    }
}

/// Collect the optional service-URL parameters into a block, or `None` when
/// no endpoint key was supplied at all.
fn service_urls_from(envelope: &RequestEnvelope) -> Option<ServiceUrls> {
    const KEYS: [&str; 4] = ["home_uri", "gatekeeper_uri", "inventory_uri", "asset_uri"];
    if KEYS.iter().all(|key| envelope.get(key).is_none()) {
        return None;
    }

    let value = |key: &str| envelope.get(key).unwrap_or_default().to_owned();
    Some(ServiceUrls {
        home: value("home_uri"),
        gatekeeper: value("gatekeeper_uri"),
        inventory: value("inventory_uri"),
        asset: value("asset_uri"),
    })
}

pub(crate) fn map_directory_error(error: DirectoryError) -> DispatchFailure {
    match error {
        DirectoryError::AlreadyExists {
            scope_id,
            first_name,
            last_name,
        } => {
            debug!(%scope_id, %first_name, %last_name, "create collided with existing account");
            DispatchFailure::Rejected(MSG_USER_EXISTS)
        }
        DirectoryError::NotFound { principal_id } => {
            debug!(%principal_id, "update target missing");
            DispatchFailure::Rejected(MSG_USER_MISSING)
        }
        DirectoryError::Validation(source) => {
            debug!(error = %source, "request violated an account invariant");
            DispatchFailure::InvalidParameter
        }
        DirectoryError::Store(source) => {
            error!(error = %source, "account store failure");
            DispatchFailure::Internal
        }
    }
}

/// Flatten the account's fields into the envelope root.
pub(crate) fn account_response(account: &Account) -> ResponseEnvelope {
    let mut response = ResponseEnvelope::success();
    response.extend(account_fields(account));
    response
}

fn account_fields(account: &Account) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(
        "principal_id".to_owned(),
        Value::from(account.principal_id.to_string()),
    );
    fields.insert(
        "scope_id".to_owned(),
        Value::from(account.scope_id.to_string()),
    );
    fields.insert(
        "first_name".to_owned(),
        Value::from(account.first_name.clone()),
    );
    fields.insert(
        "last_name".to_owned(),
        Value::from(account.last_name.clone()),
    );
    fields.insert("email".to_owned(), Value::from(account.email.clone()));
    fields.insert("user_flags".to_owned(), Value::from(account.user_flags));
    fields.insert("user_level".to_owned(), Value::from(account.user_level));
    fields.insert(
        "user_title".to_owned(),
        Value::from(account.user_title.clone()),
    );
    fields.insert(
        "created".to_owned(),
        Value::from(account.created.to_rfc3339()),
    );
    fields.insert(
        "service_urls".to_owned(),
        serde_json::to_value(&account.service_urls).unwrap_or_default(),
    );
    fields
}

fn found_or_not(account: Option<Account>) -> HandlerResult {
    match account {
        Some(account) => {
            info!(
                principal_id = %account.principal_id,
                first_name = %account.first_name,
                last_name = %account.last_name,
                "got account info"
            );
            Ok(account_response(&account))
        }
        None => Err(DispatchFailure::Rejected(MSG_NOT_FOUND)),
    }
}
