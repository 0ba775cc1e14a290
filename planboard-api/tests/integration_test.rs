/// Integration tests for the Planboard API
///
/// These tests drive the full router end-to-end against an in-memory
/// database:
/// - Sign-up, sign-in and log-out
/// - Session enforcement on owner routes
/// - Project and task lifecycle through form posts
/// - Ownership isolation between users

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{json_body, location, TestContext};

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_sign_up_created() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.sign_up("a@x.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_sign_up_duplicate_email_conflict() {
    let ctx = TestContext::new().await.unwrap();
    assert_eq!(ctx.sign_up("a@x.com").await.status(), StatusCode::CREATED);

    let response = ctx.sign_up("a@x.com").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response).await;
    assert_eq!(body["email"], "a@x.com");
    assert!(body["message"].as_str().unwrap().contains("already exists"));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_sign_up_validation_keeps_values() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post_form(
            "/signUp",
            &[
                ("first_name", "Ada"),
                ("last_name", ""),
                ("email", "not-an-email"),
                ("password", "short"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["email"], "not-an-email");
    assert!(body.get("password").is_none());

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "last_name", "password"]);
}

#[tokio::test]
async fn test_sign_in_failures_share_one_message() {
    let ctx = TestContext::new().await.unwrap();
    ctx.sign_up("a@x.com").await;

    let wrong_password = ctx
        .post_form("/signIn", &[("email", "a@x.com"), ("password", "nope-nope")], None)
        .await;
    let unknown_email = ctx
        .post_form("/signIn", &[("email", "b@x.com"), ("password", common::PASSWORD)], None)
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());

    let a = json_body(wrong_password).await;
    let b = json_body(unknown_email).await;
    assert_eq!(a["message"], "Wrong email address or password!");
    assert_eq!(a["message"], b["message"]);
    assert_eq!(a["email"], "a@x.com");
    assert_eq!(b["email"], "b@x.com");
    assert!(!a.to_string().contains("nope-nope"));
}

#[tokio::test]
async fn test_malformed_sign_in_is_re_rendered() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post_form("/signIn", &[("email", "not-an-email"), ("password", "hunter2hunter2")], None)
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["email"], "not-an-email");
    assert_eq!(body["errors"][0]["field"], "email");
    assert!(!body.to_string().contains("hunter2hunter2"));

    let response = ctx.post_form("/signIn", &[("email", "a@x.com")], None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["errors"][0]["field"], "password");
}

#[tokio::test]
async fn test_sign_in_sets_session_cookie() {
    let ctx = TestContext::new().await.unwrap();
    ctx.sign_up("a@x.com").await;

    let response = ctx
        .post_form("/signIn", &[("email", "a@x.com"), ("password", common::PASSWORD)], None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/projectHome");

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn test_anonymous_is_redirected_to_sign_in() {
    let ctx = TestContext::new().await.unwrap();

    for cookie in [None, Some("session="), Some("session=garbage.token.here")] {
        let response = ctx.get("/projectHome", cookie).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signIn");
    }

    let response = ctx
        .post_form("/addProject", &[("name", "x"), ("description", "y"), ("deadline", "2025-01-01T00:00")], None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signIn");
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;
    let token = cookie.trim_start_matches("session=");

    let request = Request::builder()
        .method("GET")
        .uri("/projectHome")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_log_out_clears_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/logOut", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signIn");

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

/// Sign up, sign in, create, list, edit, delete
#[tokio::test]
async fn test_project_end_to_end() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;
    let cookie = Some(cookie.as_str());

    // Create
    let response = ctx
        .post_form(
            "/addProject",
            &[
                ("id", "0"),
                ("name", "Launch"),
                ("description", "Ship it"),
                ("deadline", "2025-01-01T00:00"),
            ],
            cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/projectHome");

    // List
    let home = json_body(ctx.get("/projectHome", cookie).await).await;
    let projects = home["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Launch");
    assert_eq!(projects[0]["deadline"], "2025-01-01T00:00");
    assert_eq!(projects[0]["status"], "Not Started");
    let id = projects[0]["project_id"].as_i64().unwrap();
    let id_str = id.to_string();

    // Edit-form prefill
    let response = ctx.post_form("/editProject", &[("id", id_str.as_str())], cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let prefill = json_body(response).await;
    assert_eq!(prefill["id"], id);
    assert_eq!(prefill["name"], "Launch");
    assert_eq!(prefill["deadline"], "2025-01-01T00:00");

    // Update the deadline
    let response = ctx
        .post_form(
            "/addProject",
            &[
                ("id", id_str.as_str()),
                ("name", "Launch"),
                ("description", "Ship it"),
                ("deadline", "2025-02-01T00:00"),
            ],
            cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let home = json_body(ctx.get("/projectHome", cookie).await).await;
    let projects = home["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["project_id"], id);
    assert_eq!(projects[0]["deadline"], "2025-02-01T00:00");

    // Delete
    let response = ctx.post_form("/removeProject", &[("id", id_str.as_str())], cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/projectHome");

    let home = json_body(ctx.get("/projectHome", cookie).await).await;
    assert!(home["projects"].as_array().unwrap().is_empty());

    // Deleting again lands back home instead of failing
    let response = ctx.post_form("/removeProject", &[("id", id_str.as_str())], cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/projectHome");
}

#[tokio::test]
async fn test_invalid_project_form_is_re_rendered() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;

    let response = ctx
        .post_form(
            "/addProject",
            &[("name", "Launch"), ("description", ""), ("deadline", "soon")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["name"], "Launch");
    assert_eq!(body["deadline"], "soon");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let home = json_body(ctx.get("/projectHome", Some(&cookie)).await).await;
    assert!(home["projects"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_project_form_is_re_rendered() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;

    // No deadline field at all
    let response = ctx
        .post_form("/addProject", &[("name", "Launch"), ("description", "Ship it")], Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Launch");
    assert_eq!(body["errors"][0]["field"], "deadline");
    assert_eq!(body["errors"][0]["message"], "Deadline is required");

    // Empty select and blank-only text
    let response = ctx
        .post_form(
            "/addProject",
            &[
                ("id", ""),
                ("name", "   "),
                ("description", "Ship it"),
                ("deadline", "2025-01-01T00:00"),
                ("status_id", ""),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["id"], 0);
    assert!(body["status_id"].is_null());
    assert_eq!(body["errors"][0]["field"], "name");

    let response = ctx
        .post_form(
            "/addProject",
            &[("name", "Launch"), ("description", "Ship it"), ("deadline", "2025-01-01T00:00"), ("status_id", "")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let home = json_body(ctx.get("/projectHome", Some(&cookie)).await).await;
    assert_eq!(home["projects"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_task_form_without_priority_is_re_rendered() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;

    ctx.post_form(
        "/addProject",
        &[("name", "Launch"), ("description", "Ship it"), ("deadline", "2025-01-01T00:00")],
        Some(&cookie),
    )
    .await;
    let home = json_body(ctx.get("/projectHome", Some(&cookie)).await).await;
    let project_id = home["projects"][0]["project_id"].as_i64().unwrap().to_string();

    let response = ctx
        .post_form(
            "/addTask",
            &[
                ("project_id", project_id.as_str()),
                ("description", "Write docs"),
                ("deadline", "2025-01-10T09:00"),
                ("priority_id", ""),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["description"], "Write docs");
    assert!(body["priority_id"].is_null());
    assert_eq!(body["errors"][0]["field"], "priority_id");
}

#[tokio::test]
async fn test_task_lifecycle_through_project_page() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.signed_in("a@x.com").await;
    let cookie = Some(cookie.as_str());

    ctx.post_form(
        "/addProject",
        &[("name", "Launch"), ("description", "Ship it"), ("deadline", "2025-01-01T00:00")],
        cookie,
    )
    .await;
    let home = json_body(ctx.get("/projectHome", cookie).await).await;
    let project_id = home["projects"][0]["project_id"].as_i64().unwrap().to_string();
    let project_page = format!("/projects/{}", project_id);

    let response = ctx
        .post_form(
            "/addTask",
            &[
                ("project_id", project_id.as_str()),
                ("description", "Write docs"),
                ("deadline", "2025-01-10T09:00"),
                ("priority_id", "1"),
            ],
            cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), project_page);

    let detail = json_body(ctx.get(&project_page, cookie).await).await;
    let tasks = detail["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["description"], "Write docs");
    assert_eq!(tasks[0]["priority_class"], "danger");
    assert_eq!(tasks[0]["css_class"], "text-danger");
    assert_eq!(detail["priorities"].as_array().unwrap().len(), 4);
    assert_eq!(detail["statuses"].as_array().unwrap().len(), 3);
    let task_id = tasks[0]["task_id"].as_i64().unwrap().to_string();

    // Too long for a task description
    let response = ctx
        .post_form(
            "/addTask",
            &[
                ("project_id", project_id.as_str()),
                ("description", "This description is far too long"),
                ("deadline", "2025-01-10T09:00"),
                ("priority_id", "2"),
            ],
            cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["description"], "This description is far too long");

    let response = ctx.post_form("/removeTask", &[("id", task_id.as_str())], cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), project_page);

    let detail = json_body(ctx.get(&project_page, cookie).await).await;
    assert!(detail["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_projects_are_out_of_reach() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signed_in("alice@x.com").await;
    let bob = ctx.signed_in("bob@x.com").await;

    ctx.post_form(
        "/addProject",
        &[("name", "Secret"), ("description", "Alice only"), ("deadline", "2025-01-01T00:00")],
        Some(&alice),
    )
    .await;
    let home = json_body(ctx.get("/projectHome", Some(&alice)).await).await;
    let id = home["projects"][0]["project_id"].as_i64().unwrap().to_string();

    let bob_home = json_body(ctx.get("/projectHome", Some(&bob)).await).await;
    assert!(bob_home["projects"].as_array().unwrap().is_empty());

    for (uri, form) in [
        ("/removeProject", vec![("id", id.as_str())]),
        ("/editProject", vec![("id", id.as_str())]),
        (
            "/addProject",
            vec![
                ("id", id.as_str()),
                ("name", "Hijacked"),
                ("description", "x"),
                ("deadline", "2025-01-01T00:00"),
            ],
        ),
    ] {
        let response = ctx.post_form(uri, &form, Some(&bob)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/projectHome", "{}", uri);
    }

    let response = ctx.get(&format!("/projects/{}", id), Some(&bob)).await;
    assert_eq!(location(&response), "/projectHome");

    let home = json_body(ctx.get("/projectHome", Some(&alice)).await).await;
    assert_eq!(home["projects"][0]["name"], "Secret");
}
