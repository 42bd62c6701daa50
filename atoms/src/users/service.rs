use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::{User, UserPhoto};

/// Load a user profile (pure domain logic, no HTTP).
/// Returns Ok(None) when the user no longer exists.
pub async fn get_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Option<User>, String> {
    let pk = format!("USER#{}", user_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => Ok(Some(user_from_item(user_id, item))),
        None => Ok(None),
    }
}

/// Overwrite the user's photo array with the reviewed one.
pub async fn update_user_photos(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    photos: &[UserPhoto],
) -> Result<(), String> {
    let pk = format!("USER#{}", user_id);

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .update_expression("SET photos = :photos")
        .expression_attribute_values(":photos", photos_to_attr(photos))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

/// Suspend the account. Reinstatement is manual and out of band.
pub async fn set_suspended(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    reason: &str,
) -> Result<(), String> {
    let pk = format!("USER#{}", user_id);
    let now = chrono::Utc::now().to_rfc3339();

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .update_expression("SET suspended_at = :at, suspended_reason = :reason")
        .expression_attribute_values(":at", AttributeValue::S(now))
        .expression_attribute_values(":reason", AttributeValue::S(reason.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

/// Mark the profile as awaiting human moderation (bio flag path).
pub async fn set_under_review(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<(), String> {
    let pk = format!("USER#{}", user_id);

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .update_expression("SET is_under_review = :yes")
        .expression_attribute_values(":yes", AttributeValue::Bool(true))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

/// Write back the denormalized profile fields. Callers pass only the fields
/// that actually changed; `main_photo: Some(None)` clears the attribute.
pub async fn reconcile_profile(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    main_photo: Option<Option<String>>,
    num_of_photos: Option<i32>,
) -> Result<(), String> {
    let mut set_expr: Vec<String> = vec![];
    let mut remove_expr: Vec<String> = vec![];
    let mut expr_values: HashMap<String, AttributeValue> = HashMap::new();

    match main_photo {
        Some(Some(path)) => {
            set_expr.push("main_photo = :main_photo".to_string());
            expr_values.insert(":main_photo".to_string(), AttributeValue::S(path));
        }
        Some(None) => remove_expr.push("main_photo".to_string()),
        None => {}
    }

    if let Some(count) = num_of_photos {
        set_expr.push("num_of_photos = :num_of_photos".to_string());
        expr_values.insert(
            ":num_of_photos".to_string(),
            AttributeValue::N(count.to_string()),
        );
    }

    if set_expr.is_empty() && remove_expr.is_empty() {
        return Ok(());
    }

    let mut update_expr = String::new();
    if !set_expr.is_empty() {
        update_expr.push_str(&format!("SET {}", set_expr.join(", ")));
    }
    if !remove_expr.is_empty() {
        if !update_expr.is_empty() {
            update_expr.push(' ');
        }
        update_expr.push_str(&format!("REMOVE {}", remove_expr.join(", ")));
    }

    let pk = format!("USER#{}", user_id);
    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .update_expression(update_expr);

    for (k, v) in expr_values {
        builder = builder.expression_attribute_values(k, v);
    }

    builder
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(())
}

// PRIVATE FUNCTIONS

fn user_from_item(user_id: &str, item: &HashMap<String, AttributeValue>) -> User {
    let photos = item
        .get("photos")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_m().ok())
                .map(photo_from_attr)
                .collect()
        })
        .unwrap_or_default();

    User {
        user_id: user_id.to_string(),
        user_name: item
            .get("user_name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        user_email: item
            .get("user_email")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        bio: item
            .get("bio")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        photos,
        main_photo: item
            .get("main_photo")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        num_of_photos: item
            .get("num_of_photos")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        is_under_review: item
            .get("is_under_review")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        suspended_at: item
            .get("suspended_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        suspended_reason: item
            .get("suspended_reason")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        user_created_at: item
            .get("user_created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    }
}

pub fn photo_from_attr(map: &HashMap<String, AttributeValue>) -> UserPhoto {
    UserPhoto {
        path: map
            .get("path")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        sort_order: map
            .get("sort_order")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        is_rejected: map
            .get("is_rejected")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        messages: map.get("messages").and_then(|v| v.as_l().ok()).map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .collect()
        }),
        cropped_image_data: map
            .get("cropped_image_data")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| serde_json::from_str(s).ok()),
        uploaded_at: map
            .get("uploaded_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    }
}

pub fn photo_to_attr(photo: &UserPhoto) -> AttributeValue {
    let mut map: HashMap<String, AttributeValue> = HashMap::new();
    map.insert("path".to_string(), AttributeValue::S(photo.path.clone()));
    map.insert(
        "sort_order".to_string(),
        AttributeValue::N(photo.sort_order.to_string()),
    );
    map.insert(
        "is_rejected".to_string(),
        AttributeValue::Bool(photo.is_rejected),
    );
    if let Some(messages) = &photo.messages {
        map.insert(
            "messages".to_string(),
            AttributeValue::L(
                messages
                    .iter()
                    .map(|m| AttributeValue::S(m.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(cropped) = &photo.cropped_image_data {
        map.insert(
            "cropped_image_data".to_string(),
            AttributeValue::S(cropped.to_string()),
        );
    }
    map.insert(
        "uploaded_at".to_string(),
        AttributeValue::S(photo.uploaded_at.clone()),
    );
    AttributeValue::M(map)
}

fn photos_to_attr(photos: &[UserPhoto]) -> AttributeValue {
    AttributeValue::L(photos.iter().map(photo_to_attr).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(path: &str, sort_order: i32) -> UserPhoto {
        UserPhoto {
            path: path.to_string(),
            sort_order,
            is_rejected: false,
            messages: None,
            cropped_image_data: None,
            uploaded_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn photo_attr_marshalling_preserves_rejection_state() {
        let mut p = photo("media/u1/a.jpg", 2);
        p.is_rejected = true;
        p.messages = Some(vec!["Photo contains weapons".to_string()]);

        let attr = photo_to_attr(&p);
        let map = attr.as_m().expect("map attribute");
        let back = photo_from_attr(map);

        assert_eq!(back, p);
    }

    #[test]
    fn photo_attr_marshalling_omits_absent_messages() {
        let attr = photo_to_attr(&photo("media/u1/a.jpg", 0));
        let map = attr.as_m().expect("map attribute");

        assert!(!map.contains_key("messages"));
        assert_eq!(photo_from_attr(map).messages, None);
    }
}
