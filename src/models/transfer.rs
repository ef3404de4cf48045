use rust_decimal::Decimal;

use crate::ids::IdGenerator;

/// A movement of budgeted amount between two months.
///
/// Categories are referenced by name rather than id: ids are reminted every
/// time a month is copied, names carry over.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub id: String,
    pub from_category: String,
    pub to_category: String,
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(
        ids: &dyn IdGenerator,
        from_category: String,
        to_category: String,
        amount: Decimal,
    ) -> Self {
        Self {
            id: ids.next_id(),
            from_category,
            to_category,
            amount,
        }
    }
}

/// Everything the month view needs in one read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthData {
    pub categories: Vec<super::BudgetCategory>,
    pub outgoing_rollovers: Vec<Transfer>,
    pub incoming_rollovers: Vec<Transfer>,
}

impl MonthData {
    pub fn incoming_total(&self) -> Decimal {
        self.incoming_rollovers.iter().map(|t| t.amount).sum()
    }

    pub fn outgoing_total(&self) -> Decimal {
        self.outgoing_rollovers.iter().map(|t| t.amount).sum()
    }
}
