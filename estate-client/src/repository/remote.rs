// estate-client/src/repository/remote.rs
// 远程存储 - 单端点 RPC 代理

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::rpc::{
    DeleteRequest, DeleteUserRequest, ENDPOINT_PATH, ErrorBody, SaveUserRequest, SuccessResponse,
};
use shared::{
    AuditLogEntry, Bill, FacilityUsageRecord, NewAuditLog, PackageRecord, RpcAction, TopUpRecord,
    User,
};

use super::Repository;
use crate::error::{StoreError, StoreResult};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 远程 RPC 存储
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> StoreResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, action: RpcAction) -> String {
        format!("{}{}?action={}", self.base_url, ENDPOINT_PATH, action)
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(match status {
                StatusCode::NOT_FOUND => StoreError::NotFound(message),
                StatusCode::CONFLICT => StoreError::Conflict(message),
                _ => StoreError::Remote {
                    status: status.as_u16(),
                    message,
                },
            });
        }
        Ok(response.json().await?)
    }

    async fn query<T: DeserializeOwned>(&self, action: RpcAction) -> StoreResult<T> {
        tracing::debug!(%action, "rpc query");
        let response = self.client.post(self.url(action)).send().await?;
        Self::handle_response(response).await
    }

    async fn call<T, B>(&self, action: RpcAction, body: &B) -> StoreResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        tracing::debug!(%action, "rpc call");
        let response = self.client.post(self.url(action)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn mutate<B: Serialize + Sync>(&self, action: RpcAction, body: &B) -> StoreResult<()> {
        let resp: SuccessResponse = self.call(action, body).await?;
        if !resp.success {
            return Err(StoreError::Remote {
                status: StatusCode::OK.as_u16(),
                message: format!("{action} was not acknowledged"),
            });
        }
        Ok(())
    }

    async fn delete_by_id(&self, action: RpcAction, id: &str) -> StoreResult<()> {
        self.mutate(action, &DeleteRequest { id: id.to_string() }).await
    }
}

#[async_trait]
impl Repository for RemoteStore {
    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.query(RpcAction::GetBills).await
    }

    async fn save_bill(&self, bill: &Bill) -> StoreResult<()> {
        self.mutate(RpcAction::SaveBill, bill).await
    }

    async fn delete_bill(&self, id: &str) -> StoreResult<()> {
        self.delete_by_id(RpcAction::DeleteBill, id).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.query(RpcAction::GetUsers).await
    }

    async fn save_user(&self, user: &User, is_new: bool) -> StoreResult<()> {
        let body = SaveUserRequest {
            user: user.clone(),
            is_new,
        };
        self.mutate(RpcAction::SaveUser, &body).await
    }

    async fn delete_user(&self, username: &str) -> StoreResult<()> {
        let body = DeleteUserRequest {
            username: username.to_string(),
        };
        self.mutate(RpcAction::DeleteUser, &body).await
    }

    async fn list_top_ups(&self) -> StoreResult<Vec<TopUpRecord>> {
        self.query(RpcAction::GetTopUps).await
    }

    async fn save_top_up(&self, record: &TopUpRecord) -> StoreResult<()> {
        self.mutate(RpcAction::SaveTopUp, record).await
    }

    async fn delete_top_up(&self, id: &str) -> StoreResult<()> {
        self.delete_by_id(RpcAction::DeleteTopUp, id).await
    }

    async fn list_facility_usages(&self) -> StoreResult<Vec<FacilityUsageRecord>> {
        self.query(RpcAction::GetFacilityUsages).await
    }

    async fn save_facility_usage(&self, record: &FacilityUsageRecord) -> StoreResult<()> {
        self.mutate(RpcAction::SaveFacilityUsage, record).await
    }

    async fn delete_facility_usage(&self, id: &str) -> StoreResult<()> {
        self.delete_by_id(RpcAction::DeleteFacilityUsage, id).await
    }

    async fn list_packages(&self) -> StoreResult<Vec<PackageRecord>> {
        self.query(RpcAction::GetPackages).await
    }

    async fn save_package(&self, record: &PackageRecord) -> StoreResult<()> {
        self.mutate(RpcAction::SavePackage, record).await
    }

    async fn delete_package(&self, id: &str) -> StoreResult<()> {
        self.delete_by_id(RpcAction::DeletePackage, id).await
    }

    async fn list_logs(&self) -> StoreResult<Vec<AuditLogEntry>> {
        self.query(RpcAction::GetAuditLogs).await
    }

    async fn append_log(&self, log: NewAuditLog) -> StoreResult<AuditLogEntry> {
        self.call(RpcAction::AddAuditLog, &log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shape() {
        let store = RemoteStore::new("http://localhost:3000/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(
            store.url(RpcAction::DeleteFacilityUsage),
            "http://localhost:3000/api?action=deleteFacilityUsage"
        );
    }
}
