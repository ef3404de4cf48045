use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;

/// Which side of the budget a category sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restricts which transaction sign counts toward a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountSign {
    Positive,
    Negative,
}

impl AmountSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn allows(&self, amount: Decimal) -> bool {
        match self {
            Self::Positive => amount > Decimal::ZERO,
            Self::Negative => amount < Decimal::ZERO,
        }
    }
}

/// A budget line for one month. The month itself is not part of the value;
/// it is the key the row is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetCategory {
    pub id: String,
    pub category_type: CategoryType,
    pub name: String,
    pub expected: Decimal,
    pub tags: Vec<String>,
    pub require_all: bool,
    pub amount_sign: Option<AmountSign>,
}

impl BudgetCategory {
    pub fn new(
        ids: &dyn IdGenerator,
        category_type: CategoryType,
        name: String,
        expected: Decimal,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            category_type,
            name,
            expected,
            tags,
            require_all: false,
            amount_sign: None,
        }
    }

    pub fn is_income(&self) -> bool {
        self.category_type == CategoryType::Income
    }

    /// Same definition under a freshly minted id.
    pub fn with_new_id(&self, ids: &dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            ..self.clone()
        }
    }

    /// Whether a transaction with `tags` and signed `amount` counts toward
    /// this category. Tag comparison ignores case; a category without tags
    /// matches nothing.
    pub fn matches(&self, tags: &[String], amount: Decimal) -> bool {
        if let Some(sign) = self.amount_sign {
            if !sign.allows(amount) {
                return false;
            }
        }
        if self.tags.is_empty() {
            return false;
        }

        let carried: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        let mut wanted = self.tags.iter().map(|t| t.to_lowercase());
        if self.require_all {
            wanted.all(|t| carried.contains(&t))
        } else {
            wanted.any(|t| carried.contains(&t))
        }
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
