mod ingest_tests;
mod poll_tests;
pub mod util;
