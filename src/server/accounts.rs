//! Account-facing endpoints: state inspection, action submission, and
//! allow-list management.
//!
//! This is the seam the chat transport calls into. Every account-scoped
//! request is gated on the allow-list; mutations of the allow-list itself
//! are additionally gated on the administrator.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::AccessError;
use crate::commands::Action;
use crate::dispatch::DispatchError;
use crate::engine::goals::{plan_between, MAX_DAY};
use crate::engine::{ActionOutcome, EngineError, PreconditionError};
use crate::persistence::StoreError;
use crate::types::{AccountId, AccountRecord};

use super::AppState;

/// Days listed per page of the progression plan.
const PLAN_DAYS_PER_PAGE: u32 = 15;

/// Errors surfaced by the account endpoints, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The account is not on the allow-list.
    #[error("account {account} is not authorized")]
    Forbidden { account: AccountId },

    /// No state stored for this account.
    #[error("no state for account {account}")]
    NotFound { account: AccountId },

    /// The engine rejected the action; the state is unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Allow-list mutation rejected.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Storage failed after retries; the action was not applied.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Engine(e) => ApiError::Engine(e),
            DispatchError::Store(e) => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Bad input: the caller should correct and re-submit.
            ApiError::Engine(EngineError::Validation(_)) => StatusCode::BAD_REQUEST,
            // The state does not admit the transition right now.
            ApiError::Engine(EngineError::Precondition(_)) => StatusCode::CONFLICT,
            ApiError::Access(AccessError::NotAdmin { .. }) => StatusCode::FORBIDDEN,
            ApiError::Access(AccessError::CannotRevokeAdmin) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Returns the persisted record for an allow-listed account.
pub async fn state_handler(
    State(state): State<AppState>,
    Path(account): Path<i64>,
) -> Result<Json<AccountRecord>, ApiError> {
    let account = AccountId(account);
    state.require_authorized(account).await?;

    let record = state
        .dispatcher
        .inspect(account)
        .await?
        .ok_or(ApiError::NotFound { account })?;
    Ok(Json(record))
}

/// Accepts one typed action for an allow-listed account and runs it through
/// the dispatcher.
pub async fn action_handler(
    State(state): State<AppState>,
    Path(account): Path<i64>,
    Json(action): Json<Action>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let account = AccountId(account);
    state.require_authorized(account).await?;

    let outcome = state.dispatcher.dispatch(account, action).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlanQuery {
    /// 1-based page number; 15 days per page across the 300-day curve.
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// One page of the active bank's progression plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanPage {
    pub page: u32,
    pub initial_balance: f64,
    pub current_day: u32,
    /// `(day, target bank)` pairs for this page.
    pub days: Vec<(u32, f64)>,
}

/// Lists a page of the active bank's target-bank curve.
pub async fn plan_handler(
    State(state): State<AppState>,
    Path(account): Path<i64>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanPage>, ApiError> {
    let account = AccountId(account);
    state.require_authorized(account).await?;

    let record = state
        .dispatcher
        .inspect(account)
        .await?
        .ok_or(ApiError::NotFound { account })?;
    let bank = record
        .active()
        .ok_or(EngineError::Precondition(PreconditionError::NoActiveBank))?;
    if bank.initial_balance <= 0.0 {
        return Err(EngineError::Precondition(PreconditionError::InitialBalanceNotSet).into());
    }

    let page = query.page.clamp(1, MAX_DAY / PLAN_DAYS_PER_PAGE);
    let from_day = (page - 1) * PLAN_DAYS_PER_PAGE + 1;
    let to_day = page * PLAN_DAYS_PER_PAGE;

    Ok(Json(PlanPage {
        page,
        initial_balance: bank.initial_balance,
        current_day: bank.day,
        days: plan_between(bank.initial_balance, from_day, to_day),
    }))
}

/// Body for allow-list mutations: who is asking, and about whom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessChange {
    pub actor: AccountId,
    pub account: AccountId,
}

/// Grants an account access. Admin-only.
pub async fn grant_handler(
    State(state): State<AppState>,
    Json(change): Json<AccessChange>,
) -> Result<StatusCode, ApiError> {
    {
        let mut access = state.access.write().await;
        access.grant(change.actor, change.account)?;
        access.save(&state.access_path)?;
    }
    tracing::info!(account = %change.account, "access granted");
    Ok(StatusCode::NO_CONTENT)
}

/// Revokes an account's access. Admin-only; the admin cannot be revoked.
pub async fn revoke_handler(
    State(state): State<AppState>,
    Json(change): Json<AccessChange>,
) -> Result<StatusCode, ApiError> {
    {
        let mut access = state.access.write().await;
        access.revoke(change.actor, change.account)?;
        access.save(&state.access_path)?;
    }
    tracing::info!(account = %change.account, "access revoked");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ActorQuery {
    pub actor: i64,
}

/// Lists the allow-list. Admin-only.
pub async fn access_list_handler(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<AccountId>>, ApiError> {
    let access = state.access.read().await;
    if AccountId(query.actor) != access.admin() {
        return Err(AccessError::NotAdmin {
            actor: AccountId(query.actor),
        }
        .into());
    }
    Ok(Json(access.accounts().collect()))
}
