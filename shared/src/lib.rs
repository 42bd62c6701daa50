use aws_sdk_apigatewaymanagement::Client as ApiGatewayClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use std::env;

pub mod sockets;
pub mod types;

/// Long-lived clients and configuration shared across the worker.
/// Built once in main and passed down behind an Arc.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    /// Present only when WS_API_ENDPOINT is configured; realtime delivery
    /// is skipped entirely without it.
    pub apigw_client: Option<ApiGatewayClient>,
    pub table_name: String,
    pub media_bucket: String,
}

impl AppState {
    pub async fn from_env() -> AppState {
        let config = aws_config::load_from_env().await;

        let apigw_client = match env::var("WS_API_ENDPOINT") {
            Ok(endpoint) if !endpoint.is_empty() => {
                let apigw_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
                    .endpoint_url(endpoint)
                    .build();
                Some(ApiGatewayClient::from_conf(apigw_config))
            }
            _ => None,
        };

        AppState {
            dynamo_client: DynamoClient::new(&config),
            s3_client: S3Client::new(&config),
            apigw_client,
            table_name: env::var("TABLE_NAME").unwrap_or_else(|_| "amity".to_string()),
            media_bucket: env::var("MEDIA_BUCKET").unwrap_or_else(|_| "amity-media".to_string()),
        }
    }
}
