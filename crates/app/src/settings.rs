use chartfeed_core::config::AppConfig;
use std::error::Error;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "CHARTFEED_CONFIG";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 读取可选的配置文件（默认 `chartfeed.toml`，可由 `CHARTFEED_CONFIG` 指定）。
/// 2. 叠加 `CHARTFEED__SECTION__KEY` 形式的环境变量。
/// 3. 缺省字段使用 `AppConfig::default()` 中的取值，最后统一校验。
///
/// # Arguments
/// * `path`: 配置文件路径（不含扩展名亦可）。
///
/// # Returns
/// 校验通过的 `AppConfig`。
pub fn load(path: &str) -> Result<AppConfig, Box<dyn Error>> {
    load_with_env(path, None)
}

/// 与 `load` 相同，`env` 为 Some 时以给定映射代替进程环境变量。
fn load_with_env(
    path: &str,
    env: Option<config::Map<String, String>>,
) -> Result<AppConfig, Box<dyn Error>> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("CHARTFEED")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}
