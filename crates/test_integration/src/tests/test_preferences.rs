use crate::test_context::{TestContext, id_of, read, unique};
use color_eyre::Result;
use common_services::database::preference_store::PreferenceStore;
use serde_json::json;

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_assignments_share_one_new_preference() -> Result<()> {
    let ctx = TestContext::new().await?;
    let first = ctx.register("visitor").await?;
    let second = ctx.register("visitor").await?;
    let name = unique("Waterfall");
    let body = json!([{ "name": name }]);

    let (a, b) = tokio::join!(
        ctx.post("/preferences/assign")
            .bearer_auth(&first.token)
            .json(&body)
            .send(),
        ctx.post("/preferences/assign")
            .bearer_auth(&second.token)
            .json(&body)
            .send(),
    );
    let (status_a, body_a) = read(a?).await?;
    let (status_b, body_b) = read(b?).await?;
    assert_eq!(status_a, 201, "{body_a}");
    assert_eq!(status_b, 201, "{body_b}");
    assert_eq!(
        body_a["data"]["assigned"][0]["id"],
        body_b["data"]["assigned"][0]["id"]
    );

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM preference WHERE name = $1")
        .bind(&name)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(rows, 1);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn reassigning_keeps_a_single_link() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user = ctx.register("visitor").await?;
    let existing = ctx.preference("culture").await?;
    let body = json!([{ "id": existing }, { "id": existing }]);

    for _ in 0..2 {
        let response = ctx
            .post("/preferences/assign")
            .bearer_auth(&user.token)
            .json(&body)
            .send()
            .await?;
        let (status, assigned) = read(response).await?;
        assert_eq!(status, 201, "{assigned}");
        assert_eq!(assigned["data"]["preferences"].as_array().map(Vec::len), Some(1));
    }

    let links = PreferenceStore::count_user_links(&ctx.pool, user.id, existing).await?;
    assert_eq!(links, 1);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn assigning_an_unknown_id_links_nothing() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user = ctx.register("visitor").await?;
    let name = unique("Temple");

    let response = ctx
        .post("/preferences/assign")
        .bearer_auth(&user.token)
        .json(&json!([{ "name": name }, { "id": i32::MAX }]))
        .send()
        .await?;
    let (status, error) = read(response).await?;
    assert_eq!(status, 400, "{error}");
    assert_eq!(error["error"], "validation_error");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_preference WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(rows, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn catalog_changes_are_admin_only() -> Result<()> {
    let ctx = TestContext::new().await?;
    let owner = ctx.register("trip_owner").await?;
    let admin = ctx.admin().await?;
    let name = unique("Snorkeling");

    let (status, error) = read(
        ctx.post("/preferences")
            .bearer_auth(&owner.token)
            .json(&json!({ "name": name }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 403);
    assert_eq!(error["error"], "forbidden");

    let (status, created) = read(
        ctx.post("/preferences")
            .bearer_auth(&admin.token)
            .json(&json!({ "name": name }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 201, "{created}");
    let id = id_of(&created["data"])?;

    let (status, error) = read(
        ctx.post("/preferences")
            .bearer_auth(&admin.token)
            .json(&json!({ "name": name }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 409);
    assert_eq!(error["error"], "conflict");

    let (status, fetched) = read(ctx.get(&format!("/preferences/{id}")).send().await?).await?;
    assert_eq!(status, 200);
    assert_eq!(fetched["data"]["name"], name.as_str());

    let renamed = unique("Diving");
    let (status, updated) = read(
        ctx.put(&format!("/preferences/{id}"))
            .bearer_auth(&admin.token)
            .json(&json!({ "name": renamed }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["name"], renamed.as_str());

    let (status, _) = read(
        ctx.delete(&format!("/preferences/{id}"))
            .bearer_auth(&admin.token)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, 200);

    let (status, _) = read(ctx.get(&format!("/preferences/{id}")).send().await?).await?;
    assert_eq!(status, 404);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn assigning_an_existing_name_leaves_the_row_untouched() -> Result<()> {
    let ctx = TestContext::new().await?;
    let user = ctx.register("visitor").await?;
    let existing = ctx.preference("heritage").await?;
    let name: String = sqlx::query_scalar("SELECT name FROM preference WHERE id = $1")
        .bind(existing)
        .fetch_one(&ctx.pool)
        .await?;
    let row_version = || {
        sqlx::query_scalar::<_, String>("SELECT xmin::text FROM preference WHERE id = $1")
            .bind(existing)
            .fetch_one(&ctx.pool)
    };
    let before = row_version().await?;

    let response = ctx
        .post("/preferences/assign")
        .bearer_auth(&user.token)
        .json(&json!([{ "name": name }]))
        .send()
        .await?;
    let (status, assigned) = read(response).await?;
    assert_eq!(status, 201, "{assigned}");
    assert_eq!(assigned["data"]["assigned"][0]["id"], existing);

    assert_eq!(row_version().await?, before);
    Ok(())
}
