pub mod client;
pub mod config;
pub mod fs;
pub mod ingest;
pub mod prelude;
pub mod problem;
pub mod profile;
pub mod util;
pub mod verdict;

#[cfg(test)]
mod test;
