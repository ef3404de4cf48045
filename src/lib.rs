//! Month-scoped budget categories and the rollovers between months.
//!
//! Every month owns a complete copy of its categories; there is no template
//! shared between months. Rollovers record budgeted amounts moved from one
//! month's category into another month's, addressed by category name.

pub mod config;
pub mod db;
pub mod ids;
pub mod models;
pub mod month;

pub use config::{categories_to_config, config_to_categories, ConfigDocument};
pub use db::Database;
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use models::{AmountSign, BudgetCategory, CategoryType, MonthData, Transfer};
