//! RPC 端点
//!
//! `GET|POST /api?action=<name>`，请求体为 JSON。动作词汇见 [`shared::rpc`]。
//! 查询动作返回记录数组；变更动作返回 `{ "success": true }`；
//! `addAuditLog` 返回带 id 与时间戳的完整条目。

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::any,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::rpc::{DeleteRequest, DeleteUserRequest, ENDPOINT_PATH, SaveUserRequest, SuccessResponse};
use shared::{
    Bill, FacilityUsageRecord, NewAuditLog, PackageRecord, Record, RpcAction, TopUpRecord,
};

use crate::core::ServerState;
use crate::db::repository::{audit_log, bill, facility_usage, package, top_up, user};
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route(ENDPOINT_PATH, any(dispatch))
}

#[derive(Debug, Deserialize)]
pub struct RpcParams {
    #[serde(default)]
    action: Option<String>,
}

pub async fn dispatch(
    State(state): State<ServerState>,
    Query(params): Query<RpcParams>,
    body: Bytes,
) -> AppResult<Response> {
    let name = params
        .action
        .ok_or_else(|| AppError::invalid("Missing action parameter"))?;
    let action: RpcAction = name.parse()?;
    tracing::debug!(%action, "rpc");

    let pool = &state.db.pool;
    match action {
        // ========== Users ==========
        RpcAction::GetUsers => reply(user::find_all(pool).await?),
        RpcAction::SaveUser => {
            let req: SaveUserRequest = parse(&body)?;
            require_id(&req.user)?;
            if req.is_new {
                user::create(pool, &req.user).await?;
            } else {
                user::update(pool, &req.user).await?;
            }
            success()
        }
        RpcAction::DeleteUser => {
            let req: DeleteUserRequest = parse(&body)?;
            user::delete(pool, &req.username).await?;
            success()
        }

        // ========== Bills ==========
        RpcAction::GetBills => reply(bill::find_all(pool).await?),
        RpcAction::SaveBill => {
            let record: Bill = parse(&body)?;
            require_id(&record)?;
            bill::upsert(pool, &record).await?;
            success()
        }
        RpcAction::DeleteBill => {
            let req: DeleteRequest = parse(&body)?;
            bill::delete(pool, &req.id).await?;
            success()
        }

        // ========== Top-ups ==========
        RpcAction::GetTopUps => reply(top_up::find_all(pool).await?),
        RpcAction::SaveTopUp => {
            let record: TopUpRecord = parse(&body)?;
            require_id(&record)?;
            top_up::upsert(pool, &record).await?;
            success()
        }
        RpcAction::DeleteTopUp => {
            let req: DeleteRequest = parse(&body)?;
            top_up::delete(pool, &req.id).await?;
            success()
        }

        // ========== Facility usage ==========
        RpcAction::GetFacilityUsages => reply(facility_usage::find_all(pool).await?),
        RpcAction::SaveFacilityUsage => {
            let record: FacilityUsageRecord = parse(&body)?;
            require_id(&record)?;
            facility_usage::upsert(pool, &record).await?;
            success()
        }
        RpcAction::DeleteFacilityUsage => {
            let req: DeleteRequest = parse(&body)?;
            facility_usage::delete(pool, &req.id).await?;
            success()
        }

        // ========== Packages ==========
        RpcAction::GetPackages => reply(package::find_all(pool).await?),
        RpcAction::SavePackage => {
            let record: PackageRecord = parse(&body)?;
            require_id(&record)?;
            package::upsert(pool, &record).await?;
            success()
        }
        RpcAction::DeletePackage => {
            let req: DeleteRequest = parse(&body)?;
            package::delete(pool, &req.id).await?;
            success()
        }

        // ========== Audit log ==========
        RpcAction::GetAuditLogs => reply(audit_log::find_recent(pool).await?),
        RpcAction::AddAuditLog => {
            let log: NewAuditLog = parse(&body)?;
            let entry = audit_log::append(pool, log).await?;
            tracing::info!(
                target: "audit",
                module = %entry.module,
                action = %entry.action,
                actor = %entry.actor_name,
                "{}",
                entry.description
            );
            reply(entry)
        }
    }
}

fn parse<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::invalid(format!("Malformed request body: {e}")))
}

fn require_id<R: Record>(record: &R) -> AppResult<()> {
    if record.id().trim().is_empty() {
        return Err(AppError::validation("record id is required"));
    }
    Ok(())
}

fn reply<T: Serialize>(value: T) -> AppResult<Response> {
    Ok(Json(value).into_response())
}

fn success() -> AppResult<Response> {
    reply(SuccessResponse::OK)
}
