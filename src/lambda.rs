#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::config::Region;
#[cfg(feature = "lambda")]
use email_verifier::adapters::dns::SystemMxResolver;
#[cfg(feature = "lambda")]
use email_verifier::adapters::http::{HttpBlocklistSource, DEFAULT_FETCH_TIMEOUT};
#[cfg(feature = "lambda")]
use email_verifier::config::lambda::{DynamoDbStore, LambdaConfig, SesMailboxProbe};
#[cfg(feature = "lambda")]
use email_verifier::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use email_verifier::{HttpResponse, RequestHandler, VerificationPipeline, Verifier};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Deserialize;
#[cfg(feature = "lambda")]
use std::sync::Arc;

/// API Gateway proxy event; only the body is used.
#[cfg(feature = "lambda")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(feature = "lambda")]
async fn function_handler<V: Verifier>(
    handler: &RequestHandler<V>,
    event: LambdaEvent<Request>,
) -> Result<HttpResponse, Error> {
    tracing::info!("Handling verification request {}", event.context.request_id);
    Ok(handler.handle(event.payload.body.as_deref()).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // 創建AWS配置與客戶端
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &lambda_config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let aws = loader.load().await;
    let dynamodb = aws_sdk_dynamodb::Client::new(&aws);
    let ses = aws_sdk_ses::Client::new(&aws);

    // 管道在冷啟動時建立一次，封鎖名單快照跨呼叫共用
    let pipeline = VerificationPipeline::from_config(
        &lambda_config,
        Arc::new(DynamoDbStore::new(
            dynamodb,
            lambda_config.dynamodb_table.clone(),
        )),
        Arc::new(HttpBlocklistSource::new(DEFAULT_FETCH_TIMEOUT)?),
        Arc::new(SystemMxResolver::from_system_conf()?),
        Arc::new(SesMailboxProbe::new(ses)),
    );
    let handler = RequestHandler::new(pipeline);
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(handler, event).await
    }))
    .await
}

