/// 审计时间戳格式（零填充，可按字典序排序）
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// 当前本地时间，格式见 [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Mint a new opaque record / log identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse an ISO `YYYY-MM-DD` date string.
pub fn parse_iso_date(date: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
