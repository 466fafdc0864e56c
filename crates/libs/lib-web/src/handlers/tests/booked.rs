use super::*;
use lib_core::error::BOOKING_LIMIT_MESSAGE;

async fn book(app: &Router, booking: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/booked", Some(booking)).await
}

// ========== Booking Cap Tests ==========

#[tokio::test]
async fn test_third_booking_is_rejected() {
    // Arrange
    let (app, _) = test_app();

    // Act
    let (first, _) = book(&app, json!({ "bookerId": "u-1", "houseId": "h-1" })).await;
    let (second, _) = book(&app, json!({ "bookerId": "u-1", "houseId": "h-2" })).await;
    let (third, body) = book(&app, json!({ "bookerId": "u-1", "houseId": "h-3" })).await;
    let (other, _) = book(&app, json!({ "bookerId": "u-2", "houseId": "h-3" })).await;

    // Assert
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(third, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": BOOKING_LIMIT_MESSAGE }));
    assert_eq!(other, StatusCode::OK);

    let (_, all) = send(&app, Method::GET, "/booked", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_booking_without_booker_id_is_rejected() {
    let (app, _) = test_app();

    let (status, _) = book(&app, json!({ "houseId": "h-1" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ========== Read Tests ==========

#[tokio::test]
async fn test_get_booking_keeps_submission() {
    // Arrange
    let (app, _) = test_app();
    let (_, created) = book(
        &app,
        json!({
            "bookerId": "u-1",
            "houseId": "h-1",
            "bookedAt": "1999-01-01T00:00:00Z",
            "guests": 3,
        }),
    )
    .await;
    let id = inserted_id(&created);

    // Act
    let (status, booking) = send(&app, Method::GET, &format!("/booked/{id}"), None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["_id"], json!(id));
    assert_eq!(booking["bookerId"], json!("u-1"));
    assert_eq!(booking["houseId"], json!("h-1"));
    assert_eq!(booking["guests"], json!(3));
    let booked_at = booking["bookedAt"].as_str().expect("bookedAt is a string");
    assert!(!booked_at.starts_with("1999"));
}

#[tokio::test]
async fn test_get_missing_booking_is_null() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/booked/65f0a1b2c3d4e5f601234567", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

// ========== Delete Tests ==========

#[tokio::test]
async fn test_delete_by_booking_id_matches_nothing() {
    // Arrange
    let (app, _) = test_app();
    let (_, created) = book(&app, json!({ "bookerId": "u-1" })).await;
    let id = inserted_id(&created);

    // Act
    let (status, result) = send(&app, Method::DELETE, &format!("/booked/{id}"), None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({ "acknowledged": true, "deletedCount": 0 }));
    let (_, all) = send(&app, Method::GET, "/booked", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_by_bookmark() {
    // Arrange
    let (app, _) = test_app();
    book(&app, json!({ "bookerId": "u-1", "bookmark": "summer" })).await;

    // Act
    let (_, result) = send(&app, Method::DELETE, "/booked/summer", None).await;

    // Assert
    assert_eq!(result["deletedCount"], json!(1));
    let (_, all) = send(&app, Method::GET, "/booked", None).await;
    assert_eq!(all, json!([]));
}
