//! Estate Server - 社区管理仪表板的 RPC 后端
//!
//! 单一端点 `/api?action=<name>` 把动作翻译为参数化 SQL (SQLite)。
//!
//! ```text
//! estate-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── db/            # 连接池、迁移、各表 repository
//! ├── api/           # RPC 分发与健康检查
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use api::build_app;
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 `.env`、读取配置并初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ______      __        __
   / ____/_____/ /_____ _/ /____
  / __/ / ___/ __/ __ `/ __/ _ \
 / /___(__  ) /_/ /_/ / /_/  __/
/_____/____/\__/\__,_/\__/\___/
    "#
    );
}
