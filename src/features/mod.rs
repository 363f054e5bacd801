mod command;
mod expense;
mod menu;
mod persistence;
mod store;

pub use self::{
    menu::{Menu, SessionEnd},
    store::ExpenseStore,
};
