//! Lambda entry point: S3 object-created notifications in, `{"statusCode": 200}` out.
//!
//! Clients are built once per cold start and reused across invocations.

use anyhow::Context;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use stowage_core::{BatchAck, Config, S3Notification};
use stowage_services::EventDispatcher;

async fn handle_event(
    dispatcher: &EventDispatcher,
    event: LambdaEvent<S3Notification>,
) -> Result<BatchAck, Error> {
    let (notification, context) = event.into_parts();

    tracing::info!(
        request_id = %context.request_id,
        records = notification.records.len(),
        "Received S3 notification"
    );

    Ok(dispatcher.handle(&notification).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env().context("Failed to load configuration")?;
    stowage_infra::init_telemetry(config.log_format, stowage_infra::DEFAULT_FILTER)?;

    tracing::info!(
        environment = %config.environment,
        production = config.is_production(),
        inference_provider = %config.inference_provider,
        "Starting Stowage Lambda handler"
    );

    let dispatcher = stowage_services::build_dispatcher(&config).await?;
    let dispatcher = &dispatcher;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Notification>| async move {
        handle_event(dispatcher, event).await
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context as LambdaContext;
    use std::sync::Arc;
    use stowage_services::test_helpers::{recommendation_json, MockInference, MockObjectStore};

    #[tokio::test]
    async fn handler_acknowledges_batch_with_failures() {
        let store = Arc::new(MockObjectStore::new());
        store.add_object("test-bucket", "documento.pdf", 2_048_000, Some("application/pdf"));
        let inference = Arc::new(MockInference::replying(recommendation_json(
            "STANDARD_IA",
            "document",
            "high",
        )));
        let dispatcher = EventDispatcher::new(store.clone(), inference, None);

        let payload = serde_json::json!({
            "Records": [
                {"eventName": "ObjectCreated:Put", "s3": {"bucket": {"name": "test-bucket"}, "object": {"key": "documento.pdf", "size": 2048000}}},
                {"eventName": "ObjectCreated:Put", "s3": {"bucket": {"name": "test-bucket"}, "object": {"key": "missing.txt"}}}
            ]
        });
        let notification: S3Notification = serde_json::from_value(payload).unwrap();
        let event = LambdaEvent::new(notification, LambdaContext::default());

        let ack = handle_event(&dispatcher, event).await.unwrap();

        assert_eq!(serde_json::to_value(ack).unwrap(), serde_json::json!({"statusCode": 200}));
        assert_eq!(store.copies().len(), 1);
    }
}
