use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_apigatewaymanagement::Client as ApiGatewayClient;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::messages::RealtimeEvent;

/// Push an event to every live websocket connection of one user.
/// Fire-and-forget: delivery failures are logged and never propagated.
/// A connection that came back Gone is deleted so we stop posting to it.
pub async fn emit_to_user(
    dynamo_client: &DynamoClient,
    apigw_client: &ApiGatewayClient,
    table_name: &str,
    user_id: &str,
    event: &RealtimeEvent,
) {
    let pk = format!("USER#{}", user_id);

    let result = match dynamo_client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(pk.clone()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("CONNECTION#".to_string()))
        .send()
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Connection lookup failed for user {}: {}", user_id, e);
            return;
        }
    };

    let body = match serde_json::to_vec(event) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to serialize realtime event {}: {}", event.event, e);
            return;
        }
    };

    for item in result.items() {
        let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) else {
            continue;
        };
        let Some(connection_id) = sk.strip_prefix("CONNECTION#") else {
            continue;
        };

        let send = apigw_client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(body.clone()))
            .send()
            .await;

        if let Err(e) = send {
            let service_error = e.into_service_error();
            if service_error.is_gone_exception() {
                // Stale connection row left behind by an unclean disconnect
                let _ = dynamo_client
                    .delete_item()
                    .table_name(table_name)
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S(sk.to_string()))
                    .send()
                    .await;
            } else {
                tracing::warn!(
                    "post_to_connection failed for user {} connection {}: {}",
                    user_id,
                    connection_id,
                    service_error
                );
            }
        }
    }
}
