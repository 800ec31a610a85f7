pub mod trendline;
