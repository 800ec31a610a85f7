mod logging;
mod settings;

use chartfeed_cache::file::FileStore;
use chartfeed_core::common::format::{
    format_anchor_time, format_percentage, format_price, format_timestamp, format_volume,
};
use chartfeed_core::common::{Interval, TRADING_PAIRS};
use chartfeed_core::market::port::MarketFeed;
use chartfeed_feed::binance::BinanceProvider;
use chartfeed_market::resilient::ResilientFeed;
use chartfeed_store::trendline::TrendlineStore;
use std::sync::Arc;
use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的装配层。
///
/// # Logic
/// 1. 加载配置并初始化日志。
/// 2. 实例化基础设施层（Binance 数据源、文件键值存储）。
/// 3. 实例化领域服务（ResilientFeed、TrendlineStore）。
/// 4. 解析命令行 `[SYMBOL] [INTERVAL] [LIMIT]`，缺省取配置值。
/// 5. 拉取 K 线与 24 小时统计并输出快照。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path =
        std::env::var(settings::CONFIG_PATH_ENV).unwrap_or_else(|_| "chartfeed".to_string());
    let config = settings::load(&config_path)?;
    let _guard = logging::init_logging(&config.log);
    info!("chartfeed starting...");

    let provider = Arc::new(BinanceProvider::new(&config.feed)?);
    let feed = ResilientFeed::new(provider, &config.feed);
    let trendlines = TrendlineStore::with_key(
        Arc::new(FileStore::new(&config.storage.data_dir)),
        config.storage.trendline_key.clone(),
    );

    let mut args = std::env::args().skip(1);
    let symbol = args
        .next()
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| config.chart.default_symbol.clone());
    let interval = args
        .next()
        .map(|code| Interval::parse_or_default(&code))
        .unwrap_or(config.chart.default_interval);
    let limit = args
        .next()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(config.chart.default_limit);

    let name = TRADING_PAIRS
        .iter()
        .find(|pair| pair.symbol == symbol)
        .map(|pair| pair.name)
        .unwrap_or("Custom pair");

    let candles = feed.fetch_series(&symbol, interval, limit).await;
    println!("{} ({}) · {}", symbol, name, interval.label());

    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let volume: f64 = candles.iter().map(|c| c.volume).sum();
        println!(
            "  {} candles  {} → {}",
            candles.len(),
            format_timestamp(first.time),
            format_timestamp(last.time)
        );
        println!(
            "  last close {}  range {} - {}  volume {}",
            format_price(last.close, &symbol),
            format_price(low, &symbol),
            format_price(high, &symbol),
            format_volume(volume)
        );
    }

    match feed.fetch_stats(&symbol).await {
        Some(stats) => println!(
            "  24h {} ({})  high {}  low {}  volume {}",
            format_price(stats.last_price, &symbol),
            format_percentage(stats.price_change_percent),
            format_price(stats.high_price, &symbol),
            format_price(stats.low_price, &symbol),
            format_volume(stats.volume)
        ),
        None => println!("  24h stats unavailable"),
    }

    let saved = trendlines.load().await;
    let valid = saved.iter().filter(|t| TrendlineStore::validate(t)).count();
    println!("  trendlines: {} saved, {} valid", saved.len(), valid);
    for line in saved.iter().filter(|t| TrendlineStore::validate(t)) {
        println!(
            "    {} {} → {} {}  slope {:.6}/s",
            format_anchor_time(line.start.time),
            format_price(line.start.price, &symbol),
            format_anchor_time(line.end.time),
            format_price(line.end.price, &symbol),
            line.slope()
        );
    }

    info!("Snapshot complete. Exiting...");
    Ok(())
}
