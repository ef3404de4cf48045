mod category;
mod transfer;

pub use category::{AmountSign, BudgetCategory, CategoryType};
pub use transfer::{MonthData, Transfer};
