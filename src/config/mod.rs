//! The pre-relational budget document.
//!
//! Older installs kept the whole budget in one nested document: `income` and
//! `expenses` objects keyed by category name, plus optional `incomeOrder` /
//! `expensesOrder` arrays. This module converts between that shape and
//! [`BudgetCategory`] rows. Nothing here touches the database.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;
use crate::models::{AmountSign, BudgetCategory, CategoryType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigCategory {
    #[serde(with = "rust_decimal::serde::float")]
    pub expected: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not", deserialize_with = "null_as_false")]
    pub require_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_sign")]
    pub amount_sign: Option<AmountSign>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub income: IndexMap<String, ConfigCategory>,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub expenses: IndexMap<String, ConfigCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses_order: Option<Vec<String>>,
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

// Key order is kept; a repeated key keeps its first position and last value.
fn null_as_empty_map<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<IndexMap<String, ConfigCategory>, D::Error> {
    Ok(Option::<IndexMap<String, ConfigCategory>>::deserialize(d)?.unwrap_or_default())
}

fn null_as_false<'de, D: serde::Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

// Unknown or empty sign strings mean "either sign".
fn lenient_sign<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<AmountSign>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.and_then(|s| AmountSign::parse(&s)))
}

impl ConfigDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse budget config document")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize budget config document")
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }
}

/// Group categories into the legacy document, keeping first-seen order in
/// `incomeOrder` / `expensesOrder`. `require_all` and `amount_sign` are only
/// written when set.
pub fn categories_to_config(categories: &[BudgetCategory]) -> ConfigDocument {
    let mut config = ConfigDocument::default();
    let mut income_order = Vec::new();
    let mut expenses_order = Vec::new();

    for cat in categories {
        let data = ConfigCategory {
            expected: cat.expected,
            tags: cat.tags.clone(),
            require_all: cat.require_all,
            amount_sign: cat.amount_sign,
        };
        match cat.category_type {
            CategoryType::Income => {
                config.income.insert(cat.name.clone(), data);
                income_order.push(cat.name.clone());
            }
            CategoryType::Expense => {
                config.expenses.insert(cat.name.clone(), data);
                expenses_order.push(cat.name.clone());
            }
        }
    }

    config.income_order = Some(income_order);
    config.expenses_order = Some(expenses_order);
    config
}

/// Expand the legacy document into categories, income first. Each category
/// gets a fresh id from `ids`.
///
/// Order comes from `incomeOrder` / `expensesOrder` when present, otherwise
/// from the key order of the maps. Names listed in an order array but missing
/// from the map are skipped.
pub fn config_to_categories(config: &ConfigDocument, ids: &dyn IdGenerator) -> Vec<BudgetCategory> {
    let mut result = Vec::with_capacity(config.income.len() + config.expenses.len());
    let sections = [
        (CategoryType::Income, &config.income, &config.income_order),
        (CategoryType::Expense, &config.expenses, &config.expenses_order),
    ];

    for (category_type, map, order) in sections {
        let names: Vec<&str> = match order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => map.keys().map(String::as_str).collect(),
        };
        for name in names {
            let Some(data) = map.get(name) else {
                tracing::warn!(category = name, "ordered category missing from config, skipping");
                continue;
            };
            result.push(BudgetCategory {
                id: ids.next_id(),
                category_type,
                name: name.to_string(),
                expected: data.expected,
                tags: data.tags.clone(),
                require_all: data.require_all,
                amount_sign: data.amount_sign,
            });
        }
    }

    result
}
