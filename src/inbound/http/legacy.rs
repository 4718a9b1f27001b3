//! Legacy demo handlers kept off the primary directory surface.
//!
//! These back the historical sample methods (`testing`, `get_user_info`,
//! `put_wxuser`, `list_wxuser`). They share the dispatch envelope but are
//! deliberately separated from the account handlers: the name store has its
//! own consistency model and none of these methods participate in the
//! directory contracts.

use serde_json::json;
use tracing::{error, info};

use crate::domain::GLOBAL_SCOPE;
use crate::domain::ports::{AccountDirectory, NameEntry, NameStore, NameStoreError};
use crate::inbound::http::dispatch::{
    DispatchFailure, HandlerResult, account_response, map_directory_error, parse_uuid, required,
};
use crate::inbound::http::envelope::{RequestEnvelope, ResponseEnvelope};

pub(crate) const MSG_SAY_HELLO: &str = "You must say HELLO!";
pub(crate) const MSG_USER_INFO: &str = "Error getting user info";

/// Diagnostic echo: requires `HELLO`, answers with a greeting plus the
/// request parameters.
pub(crate) fn testing(envelope: &RequestEnvelope) -> HandlerResult {
    let hello = envelope
        .get("HELLO")
        .ok_or(DispatchFailure::Rejected(MSG_SAY_HELLO))?;
    info!(greeting = hello, "test method called");

    let mut response = ResponseEnvelope::success();
    for (key, value) in envelope.iter() {
        response.set(key, value);
    }
    response.set("Greeting", "Goodbye!");
    Ok(response)
}

/// Global-scope account lookup by `user_id`.
///
/// Missing or malformed ids and absent accounts all collapse into the same
/// fixed message.
pub(crate) async fn get_user_info(
    directory: &dyn AccountDirectory,
    envelope: &RequestEnvelope,
) -> HandlerResult {
    let user_id = envelope
        .get("user_id")
        .and_then(|value| parse_uuid(value).ok())
        .ok_or(DispatchFailure::Rejected(MSG_USER_INFO))?;

    let account = directory
        .account_by_id(GLOBAL_SCOPE, user_id)
        .await
        .map_err(map_directory_error)?
        .ok_or(DispatchFailure::Rejected(MSG_USER_INFO))?;

    info!(principal_id = %account.principal_id, "got legacy user info");
    Ok(account_response(&account))
}

/// Store a name/favourite-food record; repeated names overwrite.
pub(crate) async fn put_wxuser(
    names: &dyn NameStore,
    envelope: &RequestEnvelope,
) -> HandlerResult {
    let entry = NameEntry {
        first_name: required(envelope, "first_name")?.to_owned(),
        last_name: required(envelope, "last_name")?.to_owned(),
        food: required(envelope, "fav_food")?.to_owned(),
    };

    names.store(&entry).await.map_err(map_name_store_error)?;
    info!(name = %entry.full_name(), "stored legacy name entry");
    Ok(ResponseEnvelope::success())
}

/// List every stored name record, keyed by full name.
pub(crate) async fn list_wxuser(names: &dyn NameStore) -> HandlerResult {
    let entries = names.list().await.map_err(map_name_store_error)?;

    let mut response = ResponseEnvelope::success();
    for entry in &entries {
        response.set(
            entry.full_name(),
            json!({ "name": entry.full_name(), "food": entry.food }),
        );
    }
    Ok(response)
}

fn map_name_store_error(error: NameStoreError) -> DispatchFailure {
    error!(error = %error, "name store failure");
    DispatchFailure::Internal
}
