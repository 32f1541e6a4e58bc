mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestContext;

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn create_ticket_defaults_to_open_status() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;

    let (status, body) = ctx.post("/api/tickets", json!({"user_id": user_id})).await?;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Ticket created successfully"));
    assert_eq!(body["body"]["user"], json!("clienteone"));
    assert_eq!(body["body"]["status"], json!("Abierto"));
    assert!(body["body"]["created_at"].is_string());
    assert!(body["body"]["updated_at"].is_string());

    let id = body["body"]["id"].as_i64().unwrap();
    let (status_id,): (i64,) = sqlx::query_as("SELECT ticket_status_id FROM tickets WHERE id = $1")
        .bind(id)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(status_id, 1);

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn create_ticket_stores_free_fields() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;

    let id = ctx
        .create_ticket(json!({
            "user_id": user_id.to_string(),
            "ticket_status_id": 2,
            "vendor_id": "V-10",
            "client_id": 44,
            "influencer": "ana",
            "campaign_name": "Promo otoño",
            "live_date": "2023-11-01",
            "id": 999
        }))
        .await?;
    assert_ne!(id, 999, "id must never be settable");

    let row: (i64, i64, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>) =
        sqlx::query_as(
            "SELECT user_id, ticket_status_id, vendor_id, client_id, influencer, campaign_name, live_date FROM tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(row.0, user_id);
    assert_eq!(row.1, 2);
    assert_eq!(row.2.as_deref(), Some("V-10"));
    assert_eq!(row.3.as_deref(), Some("44"));
    assert_eq!(row.4.as_deref(), Some("ana"));
    assert_eq!(row.5.as_deref(), Some("Promo otoño"));
    assert_eq!(row.6.as_deref(), Some("2023-11-01"));

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn create_ticket_requires_user() -> Result<()> {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx.post("/api/tickets", json!({})).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "message": "The user id field is required.",
            "errors": {"user_id": ["The user id field is required."]}
        })
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets").fetch_one(&ctx.pool).await?;
    assert_eq!(count, 0);

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn create_ticket_rejects_unknown_references() -> Result<()> {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx
        .post("/api/tickets", json!({"user_id": 9999, "ticket_status_id": 7}))
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("The selected user id is invalid. (and 1 more error)"));
    assert_eq!(body["errors"]["user_id"], json!(["The selected user id is invalid."]));
    assert_eq!(body["errors"]["ticket_status_id"], json!(["The selected ticket status id is invalid."]));

    let (status, body) = ctx.post("/api/tickets", json!({"user_id": "abc"})).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["user_id"], json!(["The user id field must be an integer."]));

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn show_ticket() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;
    let id = ctx.create_ticket(json!({"user_id": user_id})).await?;

    let (status, body) = ctx.get(&format!("/api/tickets/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("OK"));
    assert_eq!(body["body"]["id"], json!(id));

    let (status, body) = ctx.get("/api/tickets/4242").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "No query results for tickets 4242", "body": null}));

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn update_ticket_changes_only_supplied_fields() -> Result<()> {
    let ctx = TestContext::new().await?;
    let first = ctx.create_user("clienteone").await?;
    let second = ctx.create_user("clientetwo").await?;
    let id = ctx.create_ticket(json!({"user_id": first, "influencer": "ana", "vendor_id": "V-1"})).await?;

    let (status, body) = ctx
        .put(
            &format!("/api/tickets/{}", id),
            json!({"user_id": second, "ticket_status_id": 2, "campaign_name": "Promo", "vendor_id": null}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);
    assert_eq!(body["message"], json!("Ticket updated successfully"));
    assert_eq!(body["body"]["user"], json!("clientetwo"));
    assert_eq!(body["body"]["status"], json!("Cerrado"));

    let row: (i64, i64, Option<String>, Option<String>, Option<String>) = sqlx::query_as(
        "SELECT user_id, ticket_status_id, influencer, campaign_name, vendor_id FROM tickets WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(row, (second, 2, Some("ana".to_string()), Some("Promo".to_string()), None));

    // PATCH is routed to the same update
    let (status, _) = ctx
        .patch(&format!("/api/tickets/{}", id), json!({"user_id": first, "ticket_status_id": 1}))
        .await?;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn update_ticket_requires_owner_and_status() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;
    let id = ctx.create_ticket(json!({"user_id": user_id})).await?;

    let (status, body) = ctx.put(&format!("/api/tickets/{}", id), json!({"influencer": "ana"})).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("The user id field is required. (and 1 more error)"));
    assert_eq!(body["errors"]["ticket_status_id"], json!(["The ticket status id field is required."]));

    let (influencer,): (Option<String>,) = sqlx::query_as("SELECT influencer FROM tickets WHERE id = $1")
        .bind(id)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(influencer, None, "a rejected update must not write");

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn update_unknown_ticket_is_rejected() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;

    let (status, body) = ctx
        .put("/api/tickets/777", json!({"user_id": user_id, "ticket_status_id": 1}))
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["id"], json!(["The selected id is invalid."]));

    let (status, body) = ctx.delete("/api/tickets/abc").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["id"], json!(["The id field must be an integer."]));

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn delete_ticket_is_soft() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;
    let id = ctx.create_ticket(json!({"user_id": user_id})).await?;

    let (status, body) = ctx.delete(&format!("/api/tickets/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "OK", "body": null}));

    let (deleted_at,): (Option<chrono::NaiveDateTime>,) =
        sqlx::query_as("SELECT deleted_at FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_one(&ctx.pool)
            .await?;
    assert!(deleted_at.is_some(), "row must remain with deleted_at set");

    let (_, listing) = ctx.get("/api/tickets").await?;
    assert_eq!(listing["body"]["meta"]["total"], json!(0));

    let (status, _) = ctx.get(&format!("/api/tickets/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.delete(&format!("/api/tickets/{}", id)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["id"], json!(["The selected id is invalid."]));

    ctx.cleanup().await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run with --ignored"]
async fn ticket_of_deleted_user_keeps_owner_name() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user_id = ctx.create_user("clienteone").await?;
    let id = ctx.create_ticket(json!({"user_id": user_id})).await?;

    let (status, _) = ctx.delete(&format!("/api/users/{}", user_id)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get(&format!("/api/tickets/{}", id)).await?;
    assert_eq!(body["body"]["user"], json!("clienteone"));

    // A deleted owner can still be assigned
    let (status, body) = ctx.post("/api/tickets", json!({"user_id": user_id})).await?;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);

    ctx.cleanup().await
}
