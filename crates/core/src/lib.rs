pub mod cache;
pub mod common;
pub mod config;
pub mod market;
pub mod trendline;

#[cfg(feature = "test-utils")]
pub mod testing;
