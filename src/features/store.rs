use std::collections::BTreeMap;

use super::expense::Expense;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("User '{0}' not found.")]
    NotFound(String),
}

type StoreResult<T> = anyhow::Result<T, StoreError>;

/// This keeps track of every user's expenses, in the order they were entered
#[derive(Debug, Default)]
pub struct ExpenseStore {
    pub(crate) accounts: BTreeMap<String, Vec<Expense>>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `username` with no expenses. An existing account is reset to empty.
    pub fn create_account(&mut self, username: &str) {
        self.accounts.insert(username.to_owned(), Vec::new());
    }

    pub fn add_expense(
        &mut self,
        username: &str,
        date: &str,
        category: &str,
        amount: f64,
    ) -> StoreResult<&Expense> {
        let expenses = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| StoreError::NotFound(username.to_owned()))?;

        expenses.push(Expense::new(date, category, amount));
        Ok(&expenses[expenses.len() - 1])
    }

    pub fn list_expenses(&self, username: &str) -> StoreResult<&[Expense]> {
        self.accounts
            .get(username)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::NotFound(username.to_owned()))
    }

    pub fn totals_by_category(&self, username: &str) -> StoreResult<BTreeMap<String, f64>> {
        let totals = self.list_expenses(username)?.iter().fold(
            BTreeMap::new(),
            |mut totals: BTreeMap<String, f64>, expense| {
                *totals.entry(expense.category().to_owned()).or_insert(0.0) += expense.amount();
                totals
            },
        );

        Ok(totals)
    }

    /// Appends a record read back from storage, creating the account if it is missing.
    pub(crate) fn restore(&mut self, username: String, expense: Expense) {
        self.accounts.entry(username).or_default().push(expense);
    }

    /// Every (username, expense) pair, grouped by user.
    pub(crate) fn records(&self) -> impl Iterator<Item = (&str, &Expense)> {
        self.accounts.iter().flat_map(|(username, expenses)| {
            expenses
                .iter()
                .map(move |expense| (username.as_str(), expense))
        })
    }

    pub fn record_count(&self) -> usize {
        self.accounts.values().map(Vec::len).sum()
    }
}
