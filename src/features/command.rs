use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::expense::{DisplayAmount, Expense};
use super::persistence::PersistenceError;
use super::store::{ExpenseStore, StoreError};
use thiserror::Error;

/// An action picked from the menu, with its arguments already parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateAccount {
        username: String,
    },
    AddExpense {
        username: String,
        date: String,
        category: String,
        amount: f64,
    },
    ViewExpenses {
        username: String,
    },
    CalculateTotals {
        username: String,
    },
    Save,
    /// Saves one last time. The caller ends the session afterwards.
    Exit,
}

/// What running a [`Command`] produced, ready to be shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    AccountCreated(String),
    ExpenseAdded(Expense),
    Expenses(Vec<Expense>),
    NoExpenses,
    Totals(BTreeMap<String, f64>),
    Saved(usize),
    Exiting,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

type CommandResult<T> = anyhow::Result<T, CommandError>;

pub fn execute(
    store: &mut ExpenseStore,
    command: Command,
    data_file: &Path,
) -> CommandResult<Outcome> {
    use Command::*;

    debug!("{command:?}");
    let outcome = match command {
        CreateAccount { username } => {
            store.create_account(&username);
            Outcome::AccountCreated(username)
        }
        AddExpense {
            username,
            date,
            category,
            amount,
        } => {
            let expense = store.add_expense(&username, &date, &category, amount)?;
            Outcome::ExpenseAdded(expense.clone())
        }
        ViewExpenses { username } => match store.list_expenses(&username)? {
            [] => Outcome::NoExpenses,
            expenses => Outcome::Expenses(expenses.to_vec()),
        },
        CalculateTotals { username } => Outcome::Totals(store.totals_by_category(&username)?),
        Save => Outcome::Saved(store.save(data_file)?),
        Exit => {
            store.save(data_file)?;
            Outcome::Exiting
        }
    };

    Ok(outcome)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Outcome::*;

        match self {
            AccountCreated(username) => write!(f, "Account '{username}' created."),
            ExpenseAdded(expense) => write!(f, "Expense added to {}.", expense.category()),
            NoExpenses => write!(f, "No expenses found."),
            Expenses(expenses) => {
                write!(f, "Date\t\tCategory\tAmount")?;
                for expense in expenses {
                    write!(f, "\n{expense}")?;
                }
                Ok(())
            }
            Totals(totals) => {
                write!(f, "Total Expenses per Category:")?;
                for (category, amount) in totals {
                    write!(f, "\n{category}: ${}", DisplayAmount(*amount))?;
                }
                Ok(())
            }
            Saved(count) => write!(f, "Data saved ({count} expenses)."),
            Exiting => write!(f, "Exiting..."),
        }
    }
}
