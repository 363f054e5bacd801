use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use super::command::{execute, Command, CommandError, Outcome};
use super::store::ExpenseStore;
use anyhow::Context;
use thiserror::Error;

const MENU: &str = "\
1. Create Account
2. Input Expense
3. View Expenses
4. Calculate Total Expenses
5. Save Data
6. Exit";

/// Problems with what the user typed. The prompt is shown again.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid choice.")]
    InvalidChoice,

    #[error("'{0}' is not a number, please enter an amount such as 12.50")]
    NotANumber(String),

    #[error("'{0}' is not a usable amount, please enter a finite number")]
    NotFinite(f64),

    #[error("A value is required")]
    Empty,

    #[error("'{0}' contains a comma, which the data file cannot store")]
    ContainsDelimiter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateAccount,
    InputExpense,
    ViewExpenses,
    CalculateTotals,
    SaveData,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use MenuChoice::*;

        match s.trim() {
            "1" => Ok(CreateAccount),
            "2" => Ok(InputExpense),
            "3" => Ok(ViewExpenses),
            "4" => Ok(CalculateTotals),
            "5" => Ok(SaveData),
            "6" => Ok(Exit),
            _ => Err(InputError::InvalidChoice),
        }
    }
}

pub fn parse_amount(input: &str) -> Result<f64, InputError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| InputError::NotANumber(input.trim().to_owned()))?;

    if !amount.is_finite() {
        return Err(InputError::NotFinite(amount));
    }
    Ok(amount)
}

/// Usernames, dates and categories end up as fields of a comma joined line.
pub fn parse_field(input: &str) -> Result<String, InputError> {
    let field = input.trim();
    if field.is_empty() {
        return Err(InputError::Empty);
    }
    if field.contains(',') {
        return Err(InputError::ContainsDelimiter(field.to_owned()));
    }
    Ok(field.to_owned())
}

/// How an interactive session came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Final save succeeded
    Exited,
    /// Final save could not be written
    SaveFailed,
}

/// Reads commands from `input` and writes prompts and results to `output`
pub struct Menu<R, W> {
    input: R,
    output: W,
    data_file: PathBuf,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, data_file: PathBuf) -> Self {
        Self {
            input,
            output,
            data_file,
        }
    }

    /// Runs until the user exits or the input is exhausted. Either way the store is
    /// saved one last time.
    pub fn run(&mut self, store: &mut ExpenseStore) -> anyhow::Result<SessionEnd> {
        loop {
            let command = match self.next_command()? {
                Some(command) => command,
                None => Command::Exit,
            };
            let exiting = command == Command::Exit;

            match execute(store, command, &self.data_file) {
                Ok(outcome) => {
                    self.say(&outcome)?;
                    if outcome == Outcome::Exiting {
                        return Ok(SessionEnd::Exited);
                    }
                }
                Err(CommandError::Persistence(e)) => {
                    warn!("{e}");
                    self.say(format_args!("Error saving data to file: {e}"))?;
                    if exiting {
                        return Ok(SessionEnd::SaveFailed);
                    }
                }
                Err(e) => self.say(&e)?,
            }
        }
    }

    /// Shows the menu and collects the arguments for the picked action.
    /// `None` means the input ran out.
    fn next_command(&mut self) -> anyhow::Result<Option<Command>> {
        loop {
            self.say(MENU)?;
            let answer = match self.ask("Enter your choice: ")? {
                Some(answer) => answer,
                None => return Ok(None),
            };

            match answer.parse::<MenuChoice>() {
                Ok(choice) => return self.collect(choice),
                Err(e) => self.say(&e)?,
            }
        }
    }

    fn collect(&mut self, choice: MenuChoice) -> anyhow::Result<Option<Command>> {
        let for_user: fn(String) -> Command = match choice {
            MenuChoice::CreateAccount => |username| Command::CreateAccount { username },
            MenuChoice::ViewExpenses => |username| Command::ViewExpenses { username },
            MenuChoice::CalculateTotals => |username| Command::CalculateTotals { username },
            MenuChoice::InputExpense => return self.collect_expense(),
            MenuChoice::SaveData => return Ok(Some(Command::Save)),
            MenuChoice::Exit => return Ok(Some(Command::Exit)),
        };

        Ok(self.ask_username()?.map(for_user))
    }

    fn collect_expense(&mut self) -> anyhow::Result<Option<Command>> {
        let Some(username) = self.ask_username()? else {
            return Ok(None);
        };
        let Some(date) = self.ask_valid("Enter date (MM/DD/YYYY): ", parse_field)? else {
            return Ok(None);
        };
        let Some(category) = self.ask_valid("Enter category: ", parse_field)? else {
            return Ok(None);
        };
        let Some(amount) = self.ask_valid("Enter amount: ", parse_amount)? else {
            return Ok(None);
        };

        Ok(Some(Command::AddExpense {
            username,
            date,
            category,
            amount,
        }))
    }

    fn ask_username(&mut self) -> anyhow::Result<Option<String>> {
        self.ask_valid("Enter username: ", parse_field)
    }

    /// Repeats `prompt` until `parse` accepts the answer.
    fn ask_valid<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> anyhow::Result<Option<T>> {
        loop {
            let answer = match self.ask(prompt)? {
                Some(answer) => answer,
                None => return Ok(None),
            };

            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.say(&e)?,
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.say(prompt)?;
        self.output.flush().context("Unable to write to output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Unable to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn say(&mut self, message: impl std::fmt::Display) -> anyhow::Result<()> {
        writeln!(self.output, "{message}").context("Unable to write to output")
    }
}
