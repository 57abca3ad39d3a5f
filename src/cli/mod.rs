//! Terminal front end: the form, its rendering and the interactive session

pub mod form;
pub mod interactive;
pub mod report;
pub mod setup;
pub mod ui;
