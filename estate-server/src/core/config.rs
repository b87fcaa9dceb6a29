/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite://estate.db | SQLite 连接串，`sqlite::memory:` 为内存库 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | (无) | 设置后按天滚动写入该目录 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SEED_DEFAULTS | true | 新建数据库时写入默认数据 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:///data/estate.db HTTP_PORT=8080 cargo run -p estate-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub seed_defaults: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://estate.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            seed_defaults: std::env::var("SEED_DEFAULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
