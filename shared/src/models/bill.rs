//! Electricity Bill Model

use serde::{Deserialize, Serialize};

use super::{Periodic, Record};

/// ROC 纪年与公历的年份差
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// 费用明细合计与账单金额的容差（元）
const RECONCILE_TOLERANCE: f64 = 1.0;

/// 公电账单
///
/// `(roc_year, month)` 组成自然键；唯一性由调用方检查。
/// `month` 取计费区间结束的月份。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    /// 民国年 (e.g. 113)
    pub roc_year: i32,
    /// 1-12
    pub month: i32,
    /// 用电度数 (kWh)
    pub usage: f64,
    /// 应缴金额 (TWD)
    pub amount: f64,

    /// 计费期间 e.g. "113年08月29日至113年09月26日"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_period: Option<String>,
    /// 经常契约容量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_capacity: Option<f64>,
    /// 经常最高需量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_demand: Option<f64>,
    /// 功率因数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_factor: Option<f64>,
    /// 电号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_number: Option<String>,
    /// 本期指数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_reading: Option<f64>,
    /// 上期指数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reading: Option<f64>,
    /// 用电种类 (e.g. "C5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_category: Option<String>,
    /// 缴费期限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_deadline: Option<String>,

    // Fee breakdown; missing values are filled with 0 on construction
    #[serde(default)]
    pub basic_fee: f64,
    #[serde(default)]
    pub flow_fee: f64,
    /// 功率因数调整费 (usually negative)
    #[serde(default)]
    pub payment_adjustment: f64,
    #[serde(default)]
    pub others: f64,
}

impl Bill {
    /// Create a bill with only the required fields; every optional field is
    /// absent and the fee breakdown is zero.
    pub fn new(id: impl Into<String>, roc_year: i32, month: i32, usage: f64, amount: f64) -> Self {
        Self {
            id: id.into(),
            roc_year,
            month,
            usage,
            amount,
            billing_period: None,
            contract_capacity: None,
            max_demand: None,
            power_factor: None,
            meter_number: None,
            current_reading: None,
            last_reading: None,
            usage_category: None,
            payment_deadline: None,
            basic_fee: 0.0,
            flow_fee: 0.0,
            payment_adjustment: 0.0,
            others: 0.0,
        }
    }

    pub fn gregorian_year(&self) -> i32 {
        self.roc_year + ROC_YEAR_OFFSET
    }

    /// Sort key: months since ROC year 0
    pub fn period_index(&self) -> i32 {
        self.roc_year * 12 + self.month
    }

    pub fn fee_breakdown_total(&self) -> f64 {
        self.basic_fee + self.flow_fee + self.payment_adjustment + self.others
    }

    /// Advisory check that the breakdown adds up to the billed amount.
    pub fn is_reconciled(&self) -> bool {
        (self.fee_breakdown_total() - self.amount).abs() < RECONCILE_TOLERANCE
    }
}

impl Record for Bill {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Periodic for Bill {
    fn period(&self) -> (i32, i32) {
        (self.roc_year, self.month)
    }
}

/// 账单统计（仪表板卡片）
#[derive(Debug, Clone, PartialEq)]
pub struct BillSummary {
    /// 最新一期账单
    pub latest: Option<Bill>,
    /// 累计支出
    pub total_spent: f64,
    /// 平均用电度数（四舍五入）
    pub average_usage: f64,
    pub bill_count: usize,
}

impl BillSummary {
    pub fn from_bills(bills: &[Bill]) -> Self {
        let latest = bills.iter().max_by_key(|b| b.period_index()).cloned();
        let total_spent = bills.iter().map(|b| b.amount).sum();
        let average_usage = if bills.is_empty() {
            0.0
        } else {
            (bills.iter().map(|b| b.usage).sum::<f64>() / bills.len() as f64).round()
        };
        Self {
            latest,
            total_spent,
            average_usage,
            bill_count: bills.len(),
        }
    }
}
