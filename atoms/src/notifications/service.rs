use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::Notification;

/// Persist a notification for a user. The sort key embeds the type so
/// delete_notifications can clear a whole kind with one prefix query.
pub async fn create_notification(
    client: &DynamoClient,
    table_name: &str,
    recipient_id: &str,
    notification_type: &str,
    content: &serde_json::Value,
) -> Result<Notification, String> {
    let notification_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", recipient_id);
    let sk = format!("NOTIFICATION#{}#{}", notification_type, notification_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk))
        .item("SK", AttributeValue::S(sk))
        .item(
            "notification_type",
            AttributeValue::S(notification_type.to_string()),
        )
        .item("content", AttributeValue::S(content.to_string()))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Notification {
        notification_id,
        recipient_id: recipient_id.to_string(),
        notification_type: notification_type.to_string(),
        content: content.clone(),
        created_at: now,
    })
}

/// Delete every persisted notification of one type for a user, so at most
/// one live instance of each kind exists after the next create.
pub async fn delete_notifications(
    client: &DynamoClient,
    table_name: &str,
    recipient_id: &str,
    notification_type: &str,
) -> Result<(), String> {
    let pk = format!("USER#{}", recipient_id);
    let sk_prefix = format!("NOTIFICATION#{}#", notification_type);

    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(pk.clone()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S(sk_prefix))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            client
                .delete_item()
                .table_name(table_name)
                .key("PK", AttributeValue::S(pk.clone()))
                .key("SK", AttributeValue::S(sk.to_string()))
                .send()
                .await
                .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;
        }
    }

    Ok(())
}
