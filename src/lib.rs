pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod models;

#[cfg(test)]
mod test;
