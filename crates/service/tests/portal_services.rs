mod common;

use common::{portal, MockApi};
use models::{ComplaintStatus, Role};
use serde_json::{json, Value};
use service::board::{BoardView, ListFilter};
use service::complaints::NewComplaint;

async fn signed_in(api: &MockApi, role: &str) -> anyhow::Result<service::Portal> {
    let (portal, _) = portal(&api.base_url(), 2_000, false)?;
    let session = models::Session {
        access_token: format!("{role}-token"),
        user: models::UserRecord { role: Some(role.into()), ..Default::default() },
    };
    portal.sessions.save(&session).await?;
    Ok(portal)
}

#[tokio::test]
async fn student_lists_and_creates_complaints() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints", 200, json!({"data": [
            {"id": "a1", "title": "Wifi", "status": "pending"},
            {"id": "a2", "title": "Mess food", "status": "resolved"}
        ]}))
        .reply("POST", "/complaints", 201, json!({"data": {"id": "a3", "title": "Lights", "status": "pending"}}));
    let portal = signed_in(&api, "student").await?;

    let mine = portal.complaints.my_complaints().await?;
    assert_eq!(mine.len(), 2);
    assert_eq!(api.trail(), vec!["GET /complaints/my", "GET /complaints"]);

    let err = portal.complaints.create(NewComplaint::default()).await.unwrap_err();
    assert_eq!(err.user_message(), "Title and description are required.");

    let created = portal
        .complaints
        .create(NewComplaint { title: " Lights ".into(), description: "Corridor dark".into(), department_id: None })
        .await?;
    assert_eq!(created.id, "a3");
    let last = api.hits().pop().map(|h| h.body).unwrap_or_default();
    assert_eq!(last, json!({"title": "Lights", "description": "Corridor dark"}));
    Ok(())
}

#[tokio::test]
async fn null_list_payload_is_empty() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints/my", 200, json!({"data": null}));
    let portal = signed_in(&api, "student").await?;
    assert!(portal.complaints.my_complaints().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn admin_board_assigns_and_changes_status() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints", 200, json!([
            {"id": "c1", "title": "Wifi", "status": "pending"},
            {"id": "c2", "title": "Fan", "status": "escalated", "department_id": "d1"}
        ]))
        .reply("GET", "/departments", 200, json!([{"id": "d1", "name": "Maintenance"}]))
        .reply("PATCH", "/complaints/c1/assign", 200, json!({"id": "c1", "status": "assigned", "department_id": "d1"}))
        .reply("PATCH", "/complaints/c2/status", 200, json!({"data": {"id": "c2", "status": "resolved"}}));
    let portal = signed_in(&api, "admin").await?;
    assert!(portal.guard.require_auth(&[Role::Admin]).await?.is_allowed());

    let mut queue = portal.board(BoardView::AdminQueue);
    queue.refresh().await?;
    assert_eq!(queue.rows(&ListFilter::default()).len(), 1);
    queue.assign("c1", "d1").await?;
    assert_eq!(api.hits().last().map(|h| h.body.clone()), Some(json!({"department_id": "d1"})));

    let mut all = portal.board(BoardView::AdminAll);
    all.refresh().await?;
    assert!(all.change_status("c2", "pending").await.is_err());
    let updated = all.change_status("c2", "resolved").await?.map(|c| c.status.clone());
    assert_eq!(updated.as_deref(), Some("resolved"));
    assert_eq!(api.hits().last().map(|h| h.body.clone()), Some(json!({"status": "resolved"})));
    assert_eq!(all.stats().resolved, 1);
    Ok(())
}

#[tokio::test]
async fn department_queue_applies_staged_updates() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints/my", 200, json!([
            {"id": "q1", "title": "Projector", "status": "assigned"},
            {"id": "q2", "title": "Desk", "status": "assigned"}
        ]))
        .reply("PATCH", "/complaints/q2/status", 200, json!({"id": "q2", "status": "in_progress"}));
    let portal = signed_in(&api, "department").await?;

    let mut board = portal.board(BoardView::DepartmentQueue);
    board.refresh().await?;
    board.stage("q2", "In Progress")?;
    assert_eq!(board.pending_updates().get("q2"), Some(&ComplaintStatus::InProgress));
    assert_eq!(board.apply_staged().await?, 1);
    assert_eq!(
        api.trail(),
        vec!["GET /complaints/my", "PATCH /complaints/q2/status", "GET /complaints/my"]
    );
    Ok(())
}

#[tokio::test]
async fn bare_acknowledgements_apply_the_requested_change() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints", 200, json!([
            {"id": "c1", "title": "Wifi", "status": "pending"},
            {"id": "c2", "title": "Fan", "status": "in_progress"}
        ]))
        .reply("GET", "/departments", 200, json!([{"id": "d1", "name": "Maintenance"}]))
        .reply("PATCH", "/complaints/c1/assign", 204, Value::Null)
        .reply("PATCH", "/complaints/c2/status", 200, json!({"message": "Status updated"}));
    let portal = signed_in(&api, "admin").await?;

    let mut all = portal.board(BoardView::AdminAll);
    all.refresh().await?;
    let updated = all.change_status("c2", "resolved").await?.map(|c| c.status.clone());
    assert_eq!(updated.as_deref(), Some("resolved"));
    assert_eq!(all.stats().resolved, 1);

    let assigned = all.assign("c1", "d1").await?;
    assert_eq!(assigned.department_id.as_deref(), Some("d1"));
    assert_eq!(assigned.department_name.as_deref(), Some("Maintenance"));
    assert_eq!(assigned.title, "Wifi");
    Ok(())
}

#[tokio::test]
async fn staged_updates_accept_empty_replies() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("GET", "/complaints/my", 200, json!([{"id": "q1", "title": "Projector", "status": "assigned"}]))
        .reply("PATCH", "/complaints/q1/status", 204, Value::Null)
        .reply("PATCH", "/users/me", 200, json!({"message": "ok"}));
    let portal = signed_in(&api, "department").await?;

    let mut board = portal.board(BoardView::DepartmentQueue);
    board.refresh().await?;
    board.stage("q1", "resolved")?;
    assert_eq!(board.apply_staged().await?, 1);
    assert!(board.pending_updates().is_empty());

    let profile = portal.users.update_me(" Ravi ").await?;
    assert_eq!(profile.name.as_deref(), Some("Ravi"));
    Ok(())
}

#[tokio::test]
async fn profile_update_requires_name() -> anyhow::Result<()> {
    let api = MockApi::start().await?;
    api.reply("PATCH", "/users/me", 200, json!({"id": 3, "name": "Asha K"}));
    let portal = signed_in(&api, "student").await?;

    assert_eq!(portal.users.update_me("  ").await.unwrap_err().user_message(), "Name is required.");
    let profile = portal.users.update_me("Asha K").await?;
    assert_eq!(profile.name.as_deref(), Some("Asha K"));
    assert_eq!(api.hits()[0].body, json!({"name": "Asha K"}));
    Ok(())
}
