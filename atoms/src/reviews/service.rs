use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::ReviewRecord;

/// Load the pending-review backlog: records not yet flagged for a human,
/// oldest first, capped at `page_size`. All review records live under one
/// partition so a single query walks the whole backlog.
pub async fn list_pending_reviews(
    client: &DynamoClient,
    table_name: &str,
    page_size: usize,
) -> Result<Vec<ReviewRecord>, String> {
    let mut records: Vec<ReviewRecord> = Vec::new();
    let mut start_key: Option<HashMap<String, AttributeValue>> = None;

    loop {
        let mut builder = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk")
            .filter_expression(
                "attribute_not_exists(needs_human_review) OR needs_human_review = :no",
            )
            .expression_attribute_values(":pk", AttributeValue::S("REVIEW".to_string()))
            .expression_attribute_values(":no", AttributeValue::Bool(false));

        if let Some(key) = start_key.take() {
            builder = builder.set_exclusive_start_key(Some(key));
        }

        let result = builder
            .send()
            .await
            .map_err(|e| format!("DynamoDB query error: {}", e))?;

        for item in result.items() {
            records.push(review_from_item(item));
        }

        match result.last_evaluated_key() {
            Some(key) if records.len() < page_size => start_key = Some(key.clone()),
            _ => break,
        }
    }

    // Oldest first, like the rest of the backlog consumers expect
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    records.truncate(page_size);

    Ok(records)
}

/// Create or update the review record for a user. An existing record keeps
/// its original created_at so it does not lose its place in the backlog.
pub async fn upsert_review(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    review_type: &str,
    needs_human_review: bool,
    analysis: Option<&serde_json::Value>,
) -> Result<(), String> {
    let now = chrono::Utc::now().to_rfc3339();
    let sk = format!("REVIEW#{}", user_id);

    let mut update_expr = "SET user_id = :uid, review_type = :rt, needs_human_review = :nhr, \
         created_at = if_not_exists(created_at, :now)"
        .to_string();

    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("REVIEW".to_string()))
        .key("SK", AttributeValue::S(sk))
        .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()))
        .expression_attribute_values(":rt", AttributeValue::S(review_type.to_string()))
        .expression_attribute_values(":nhr", AttributeValue::Bool(needs_human_review))
        .expression_attribute_values(":now", AttributeValue::S(now));

    if let Some(analysis) = analysis {
        update_expr.push_str(", analysis = :analysis");
        builder = builder
            .expression_attribute_values(":analysis", AttributeValue::S(analysis.to_string()));
    }

    builder
        .update_expression(update_expr)
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

/// Remove a user's review record once the review completed cleanly.
pub async fn delete_review(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("REVIEW".to_string()))
        .key("SK", AttributeValue::S(format!("REVIEW#{}", user_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}

// PRIVATE FUNCTIONS

fn review_from_item(item: &HashMap<String, AttributeValue>) -> ReviewRecord {
    let user_id = item
        .get("user_id")
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .or_else(|| {
            // Older rows only carried the id inside the sort key
            item.get("SK")
                .and_then(|v| v.as_s().ok())
                .and_then(|sk| sk.strip_prefix("REVIEW#"))
                .map(|s| s.to_string())
        })
        .unwrap_or_default();

    ReviewRecord {
        user_id,
        review_type: item
            .get("review_type")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "full".to_string()),
        needs_human_review: item
            .get("needs_human_review")
            .and_then(|v| v.as_bool().ok())
            .copied(),
        analysis: item
            .get("analysis")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| serde_json::from_str(s).ok()),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    }
}
