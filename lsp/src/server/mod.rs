mod analysis;
mod cli;
mod config;
mod entry;
mod handlers;
mod semantic;
mod state;
mod text;
#[cfg(test)]
mod text_test;
mod utils;

pub use entry::run;
