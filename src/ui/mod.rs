//! Terminal front end: task selector and countdown timer

mod app;
pub mod model;
mod view;

pub use app::run;
