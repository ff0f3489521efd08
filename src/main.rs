use clap::Parser;
use email_verifier::adapters::dns::SystemMxResolver;
use email_verifier::adapters::http::{HttpBlocklistSource, DEFAULT_FETCH_TIMEOUT};
use email_verifier::adapters::probe::DisabledProbe;
use email_verifier::adapters::storage::FileStore;
use email_verifier::utils::logger;
use email_verifier::{CliConfig, ConfigProvider, RequestHandler, VerificationPipeline};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting email-verifier CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let store = FileStore::new(&config.cache_dir, settings.cache_table());
    tracing::debug!("Using cache file {}", store.path().display());

    // 命令列沒有信箱驗證服務，SMTP 檢查一律回報失敗
    let pipeline = VerificationPipeline::from_config(
        &settings,
        Arc::new(store),
        Arc::new(HttpBlocklistSource::new(DEFAULT_FETCH_TIMEOUT)?),
        Arc::new(SystemMxResolver::from_system_conf()?),
        Arc::new(DisabledProbe),
    );
    let handler = RequestHandler::new(pipeline);

    let request = serde_json::json!({ "email": config.email }).to_string();
    let response = handler.handle(Some(&request)).await;

    println!("{}", response.body);

    let exit_code = match response.status_code {
        200 => 0,
        400 => 2,
        _ => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
