use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dated, categorized expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Expected as MM/DD/YYYY but never validated
    date: String,
    category: String,
    amount: f64,
}

impl Expense {
    pub fn new(date: impl Into<String>, category: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount,
        }
    }

    /// Get the expense's date.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Get the expense's category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get the expense's amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// One table row: `date<TAB>category<TAB><TAB>$amount`
impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t\t${}",
            self.date,
            self.category,
            DisplayAmount(self.amount)
        )
    }
}

/// Formats an amount the way it is shown to the user, always with a fractional part
/// (`12.5`, `10.0`).
pub(crate) struct DisplayAmount(pub f64);

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A line of the data file: `username,date,category,amount`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct ExpenseRow {
    pub username: String,
    pub date: String,
    pub category: String,
    pub amount: f64,
}

impl ExpenseRow {
    /// Number of comma separated fields in a well formed line
    pub const FIELD_COUNT: usize = 4;

    pub fn new(username: &str, expense: &Expense) -> Self {
        Self {
            username: username.to_owned(),
            date: expense.date().to_owned(),
            category: expense.category().to_owned(),
            amount: expense.amount(),
        }
    }

    pub fn into_parts(self) -> (String, Expense) {
        (
            self.username,
            Expense {
                date: self.date,
                category: self.category,
                amount: self.amount,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn renders_as_tab_aligned_row() {
        let expense = Expense::new("01/15/2024", "Food", 12.5);
        assert_eq!(expense.to_string(), "01/15/2024\tFood\t\t$12.5");
    }

    #[test_case(12.5 => "12.5")]
    #[test_case(10.0 => "10.0")]
    #[test_case(19.75 => "19.75")]
    #[test_case(-3.0 => "-3.0")]
    fn display_amount_keeps_fraction(amount: f64) -> String {
        DisplayAmount(amount).to_string()
    }

    #[test]
    fn row_splits_back_into_username_and_expense() {
        let expense = Expense::new("02/01/2024", "Rent", 900.0);
        let (username, restored) = ExpenseRow::new("bob", &expense).into_parts();

        assert_eq!(username, "bob");
        assert_eq!(restored, expense);
    }
}
