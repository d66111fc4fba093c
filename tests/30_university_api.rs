mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_requires_auth_and_lowercases_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let body = json!({ "name": "MIT", "country": "USA" });

    let res = client.post(server.url("/university")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = common::auth_token(server, &client).await?;
    let res = client
        .post(server.url("/university"))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Value = res.json().await?;
    assert_eq!(created["name"], "mit");
    assert_eq!(created["country"], "USA");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["isBookmark"], false);
    assert_eq!(created["deletedAt"], Value::Null);
    assert_eq!(created["webpages"], json!([]));
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    // Same name in another case collides
    let res = client
        .post(server.url("/university"))
        .bearer_auth(&token)
        .json(&json!({ "name": "mit", "country": "USA" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: Value = res.json().await?;
    assert_eq!(err, json!({ "success": false, "error": "University name already exists" }));
    Ok(())
}

#[tokio::test]
async fn create_validates_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token(server, &client).await?;

    for body in [
        json!({ "country": "USA" }),
        json!({ "name": common::unique("No Country") }),
        json!({ "name": common::unique("Bad Url"), "country": "USA", "webpages": ["not a url"] }),
        json!({ "name": common::unique("Bad Type"), "country": "USA", "isActive": "yes" }),
    ] {
        let res = client
            .post(server.url("/university"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        let err: Value = res.json().await?;
        assert_eq!(err["success"], false);
    }
    Ok(())
}

#[tokio::test]
async fn full_lifecycle_over_http() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token(server, &client).await?;

    let name = common::unique("Lifecycle University");
    let created = common::create_university(
        server,
        &client,
        &token,
        json!({ "name": name, "country": "Norway", "webpages": ["https://lifecycle.example.no"] }),
    )
    .await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    let record_url = server.url(&format!("/university/{}", id));

    // Read
    let res = client.get(&record_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched["name"], name.to_lowercase());

    // Update ignores deletedAt
    let res = client
        .put(&record_url)
        .bearer_auth(&token)
        .json(&json!({ "country": "Sweden", "deletedAt": "2024-01-01T00:00:00Z" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["country"], "Sweden");
    assert_eq!(updated["deletedAt"], Value::Null);

    // Bookmark toggles and answers 201
    let bookmark_url = server.url(&format!("/university/bookmark/{}", id));
    let res = client.post(&bookmark_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let toggled: Value = res.json().await?;
    assert_eq!(toggled["isBookmark"], true);

    // Soft delete keeps the record readable
    let res = client.delete(&record_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = res.json().await?;
    assert_eq!(deleted["isActive"], false);
    assert!(deleted["deletedAt"].is_string());
    assert_eq!(deleted["isBookmark"], true);

    let still_there: Value = client.get(&record_url).send().await?.json().await?;
    assert!(still_there["deletedAt"].is_string());

    // Restore
    let res = client
        .post(server.url(&format!("/university/restore/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let restored: Value = res.json().await?;
    assert_eq!(restored["isActive"], true);
    assert_eq!(restored["deletedAt"], Value::Null);
    assert_eq!(restored["createdAt"], created["createdAt"]);
    Ok(())
}

#[tokio::test]
async fn bad_and_unknown_ids() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token(server, &client).await?;

    let res = client.get(server.url("/university/invalid-id")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "Invalid university ID format");

    let res = client
        .delete(server.url("/university/invalid-id"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let res = client.get(server.url(&format!("/university/{}", missing))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "University not found");

    let res = client
        .post(server.url(&format!("/university/bookmark/{}", missing)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(server.url(&format!("/university/{}", missing)))
        .bearer_auth(&token)
        .json(&json!({ "country": "Nowhere" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_to_taken_name_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token(server, &client).await?;

    let taken = common::unique("Taken Name");
    common::create_university(server, &client, &token, json!({ "name": taken, "country": "Italy" })).await?;
    let other = common::create_university(
        server,
        &client,
        &token,
        json!({ "name": common::unique("Other Name"), "country": "Italy" }),
    )
    .await?;

    let res = client
        .put(server.url(&format!("/university/{}", other["id"].as_str().unwrap_or_default())))
        .bearer_auth(&token)
        .json(&json!({ "name": taken.to_uppercase() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "University name already exists");
    Ok(())
}
