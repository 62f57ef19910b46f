use crate::test_context::{PASSWORD, TestContext, read, unique};
use color_eyre::Result;
use serde_json::json;

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn health_reports_ok() -> Result<()> {
    let ctx = TestContext::new().await?;
    let (status, body) = read(ctx.get("/health").send().await?).await?;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn register_login_and_profile() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user = ctx.register("trip_owner").await?;

    let (status, error) = read(
        ctx.post("/auth/register")
            .json(&json!({
                "name": "Again",
                "email": user.email,
                "password": PASSWORD,
                "role": "visitor",
            }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 409);
    assert_eq!(error["error"], "conflict");

    let (status, _) = read(
        ctx.post("/auth/login")
            .json(&json!({ "email": user.email, "password": "wrong-password" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 401);

    let (status, login) = read(
        ctx.post("/auth/login")
            .json(&json!({ "email": user.email, "password": PASSWORD }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(login["data"]["user"]["role"], "trip_owner");
    let token = login["data"]["token"].as_str().unwrap_or_default().to_owned();

    let (status, profile) = read(ctx.get("/auth/profile").bearer_auth(&token).send().await?).await?;
    assert_eq!(status, 200);
    assert_eq!(profile["data"]["email"], user.email.as_str());
    assert!(profile["data"].get("password").is_none());

    let (status, unchanged) = read(
        ctx.put("/auth/profile")
            .bearer_auth(&token)
            .json(&json!({ "name": "  " }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(unchanged["data"]["name"], "Test User");

    let (status, renamed) = read(
        ctx.put("/auth/profile")
            .bearer_auth(&token)
            .json(&json!({ "name": "Renamed" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(renamed["data"]["name"], "Renamed");
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn admins_cannot_self_register() -> Result<()> {
    let ctx = TestContext::new().await?;
    let (status, error) = read(
        ctx.post("/auth/register")
            .json(&json!({
                "name": "Sneaky",
                "email": format!("{}@example.com", unique("sneaky")),
                "password": PASSWORD,
                "role": "admin",
            }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(error["field"], "role");
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn role_changes_are_admin_only() -> Result<()> {
    let ctx = TestContext::new().await?;
    let visitor = ctx.register("visitor").await?;
    let admin = ctx.admin().await?;
    let path = format!("/users/{}", visitor.id);

    let (status, _) = read(
        ctx.put(&path)
            .bearer_auth(&visitor.token)
            .json(&json!({ "role": "trip_owner" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 403);

    let (status, promoted) = read(
        ctx.put(&path)
            .bearer_auth(&admin.token)
            .json(&json!({ "role": "trip_owner" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(promoted["data"]["role"], "trip_owner");

    // The token still carries the old role; access follows the stored one.
    let (status, _) = read(ctx.get("/trips/my-trips").bearer_auth(&visitor.token).send().await?).await?;
    assert_eq!(status, 200);

    let (status, _) = read(ctx.get("/users").bearer_auth(&visitor.token).send().await?).await?;
    assert_eq!(status, 403);
    let (status, users) = read(ctx.get("/users").bearer_auth(&admin.token).send().await?).await?;
    assert_eq!(status, 200);
    assert!(users["count"].as_u64().unwrap_or_default() >= 2);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn admins_create_users_with_any_role() -> Result<()> {
    let ctx = TestContext::new().await?;
    let admin = ctx.admin().await?;
    let visitor = ctx.register("visitor").await?;
    let email = format!("{}@example.com", unique("staff"));
    let body = json!({
        "name": "Staff",
        "email": email,
        "password": PASSWORD,
        "role": "admin",
    });

    let (status, _) = read(ctx.post("/users").json(&body).send().await?).await?;
    assert_eq!(status, 401);
    let (status, _) = read(
        ctx.post("/users")
            .bearer_auth(&visitor.token)
            .json(&body)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 403);

    let (status, created) = read(
        ctx.post("/users")
            .bearer_auth(&admin.token)
            .json(&body)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 201, "{created}");
    assert_eq!(created["data"]["role"], "admin");
    assert_eq!(created["data"]["email"], email.as_str());
    assert!(created["data"].get("password").is_none());

    let (status, login) = read(
        ctx.post("/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200, "{login}");

    let (status, duplicate) = read(
        ctx.post("/users")
            .bearer_auth(&admin.token)
            .json(&body)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 409);
    assert_eq!(duplicate["error"], "conflict");

    let (status, invalid) = read(
        ctx.post("/users")
            .bearer_auth(&admin.token)
            .json(&json!({ "name": "X", "email": "not-an-email", "password": PASSWORD, "role": "visitor" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(invalid["field"], "email");
    Ok(())
}
