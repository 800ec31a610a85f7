pub mod kline;
pub mod resilient;
pub mod synthetic;
