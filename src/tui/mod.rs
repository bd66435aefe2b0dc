//! Terminal front end for the slot machine.

pub mod app;
pub mod controller;
pub mod ui;
