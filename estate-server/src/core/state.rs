use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// 服务器状态 - 请求处理器共享的句柄
///
/// 使用 Clone 浅拷贝 (连接池内部为 Arc)。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// 打开数据库并应用迁移
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url, config.seed_defaults).await?;
        Ok(Self {
            config: config.clone(),
            db,
        })
    }
}
