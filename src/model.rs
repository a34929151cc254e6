use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// User-defined label attached to records and budgets.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display("{0}")]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[derive(Debug, Display, FromStr, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyCode {
    #[display("CAD")]
    #[serde(rename = "CAD")]
    Cad,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
}
impl Default for Currency {
    fn default() -> Self {
        Self {
            code: CurrencyCode::Cad,
            name: "Canadian Dollar".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub amount: f64,
    pub currency: Currency,
}
impl Amount {
    pub fn cad(amount: f64) -> Self {
        Self {
            amount,
            currency: Currency::default(),
        }
    }
}

#[derive(Debug, Display, FromStr, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[display("EXP")]
    #[serde(rename = "EXP")]
    Expense,
    #[display("INC")]
    #[serde(rename = "INC")]
    Income,
}

/// One income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i32,
    pub amount: Amount,
    /// Unix timestamp, seconds.
    pub created_at: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub user_id: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Spending summary of one budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Budget {
    pub name: String,
    pub amount: f64,
    pub spent: f64,
    pub left: f64,
    pub average_per_day: f64,
    pub left_average_per_day: f64,
}

/// Paginated list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<M> {
    pub total: i64,
    pub results: Vec<M>,
    pub next: bool,
    pub previous: bool,
}
