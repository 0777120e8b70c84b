//! HTTP integration tests against an in-process server.

mod common;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use common::test_server::TestServer;

const SESSION_HEADER: &str = "x-session-id";

fn pdf_part(filename: &str, bytes: Vec<u8>) -> Part {
    Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str("application/pdf")
        .expect("mime")
}

fn fake_pdf(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(len, b'0');
    bytes
}

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("parse json")
}

async fn upload_papers(server: &TestServer, session: &str, files: Vec<(&str, Vec<u8>)>) -> Value {
    let mut form = Form::new()
        .text("regulation", "R20")
        .text("year", "2nd Year")
        .text("semester", "1 Semester")
        .text("paper_type", "Regular")
        .text("branch", "CSE")
        .text("branch", "IT");
    for (name, bytes) in files {
        form = form.part("file", pdf_part(name, bytes));
    }

    let resp = server
        .client
        .post(server.url("/api/v1/admin/papers"))
        .header(SESSION_HEADER, session)
        .multipart(form)
        .send()
        .await
        .expect("upload papers");
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
}

fn paper_listing_url(branch: &str) -> String {
    format!(
        "/api/v1/papers?branch={branch}&regulation=R20&year=2nd%20Year&semester=1%20Semester&paper_type=Regular"
    )
}

#[tokio::test]
async fn test_health_and_catalog() {
    let server = TestServer::start().await;
    assert!(server.data_dir().join("exambuddy.db").exists());

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/catalog"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["unset"], "--");
    assert_eq!(body["data"]["regulations"], json!(["R19", "R20", "R23"]));
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_session_navigation_and_login() {
    let server = TestServer::start().await;
    let id = server.new_session().await;

    let navigate = |page: &'static str| {
        server
            .client
            .put(server.url(&format!("/api/v1/sessions/{id}/page")))
            .json(&json!({ "page": page }))
            .send()
    };

    let body = json_body(navigate("Admin Dashboard").await.unwrap()).await;
    assert_eq!(body["data"]["view"], "login_required");

    let resp = server
        .client
        .post(server.url(&format!("/api/v1/sessions/{id}/login")))
        .json(&json!({ "username": "admin", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .post(server.url(&format!("/api/v1/sessions/{id}/login")))
        .json(&json!({ "username": "admin", "password": common::test_server::ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    let body = json_body(resp).await;
    assert_eq!(body["data"]["logged_in"], true);
    assert_eq!(body["data"]["view"], "admin_dashboard");

    let body = json_body(navigate("Admin Login").await.unwrap()).await;
    assert_eq!(body["data"]["view"], "admin_panel");

    let body = json_body(
        server
            .client
            .post(server.url(&format!("/api/v1/sessions/{id}/logout")))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["logged_in"], false);
    assert_eq!(body["data"]["view"], "login_form");

    let resp = navigate("Settings").await.unwrap();
    assert!(resp.status().is_client_error());

    let resp = server
        .client
        .get(server.url("/api/v1/sessions/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_are_gated() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/api/v1/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .get(server.url("/api/v1/admin/dashboard"))
        .header(SESSION_HEADER, "unknown")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let anonymous = server.new_session().await;
    let resp = server
        .client
        .get(server.url("/api/v1/admin/dashboard"))
        .header(SESSION_HEADER, &anonymous)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Admin login required");
}

#[tokio::test]
async fn test_paper_upload_listing_and_download() {
    let server = TestServer::start().await;
    let admin = server.admin_session().await;

    let small = fake_pdf(3 * 1024 * 1024);
    let large = fake_pdf(6 * 1024 * 1024);
    let body = upload_papers(
        &server,
        &admin,
        vec![("small.pdf", small.clone()), ("large.pdf", large.clone())],
    )
    .await;
    assert_eq!(body["data"]["uploaded"], 2);
    assert_eq!(body["data"]["items"][0]["compressed"], false);
    assert_eq!(body["data"]["items"][1]["compressed"], true);

    let body = upload_papers(&server, &admin, vec![("small.pdf", small.clone())]).await;
    assert_eq!(body["data"]["duplicates"], 1);
    assert_eq!(body["data"]["items"][0]["status"], "duplicate");

    let body = json_body(
        server
            .client
            .get(server.url(&paper_listing_url("IT")))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["complete"], true);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["paper_type"], "regular");

    let body = json_body(
        server
            .client
            .get(server.url(&paper_listing_url("Civil")))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let download_url = items[1]["download_url"].as_str().unwrap().to_string();
    let resp = server.client.get(server.url(&download_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/pdf");
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"large.pdf\"")
    );
    assert!(resp.headers().contains_key("etag"));
    let bytes = resp.bytes().await.unwrap();
    assert_eq!(bytes.len(), large.len());
    assert_eq!(&bytes[..], &large[..]);

    let resp = server
        .client
        .get(server.url(&format!("{download_url}?inline=true")))
        .send()
        .await
        .unwrap();
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("inline;")
    );

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/admin/dashboard"))
            .header(SESSION_HEADER, &admin)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["exam_papers"], 2);
    assert_eq!(body["data"]["downloads"], 2);
    assert_eq!(body["data"]["activity"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_incomplete_selection_prompts() {
    let server = TestServer::start().await;

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/notes?regulation=R20&year=--"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["complete"], false);
    assert_eq!(body["data"]["missing"], json!(["year"]));
    assert_eq!(
        body["data"]["prompt"],
        "Please select all fields to continue."
    );
}

#[tokio::test]
async fn test_notes_and_assignments() {
    let server = TestServer::start().await;
    let admin = server.admin_session().await;

    let form = Form::new()
        .text("subject", "  engineering physics ")
        .text("regulation", "R23")
        .text("year", "1st Year")
        .part("file", pdf_part("optics.pdf", fake_pdf(1024)))
        .part("file", pdf_part("waves.pdf", fake_pdf(1024)));
    let resp = server
        .client
        .post(server.url("/api/v1/admin/notes"))
        .header(SESSION_HEADER, &admin)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["data"]["uploaded"], 2);

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/notes?regulation=R23&year=1st%20Year&search=PHYSICS"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["subject"], "Engineering Physics");

    let form = Form::new()
        .text("branch", "CSE")
        .text("year", "3rd Year")
        .text("semester", "2 Semester")
        .text("subject", "Compiler Design")
        .text("unit", "2nd Unit")
        .part("file", pdf_part("lexing.pdf", fake_pdf(512)));
    let resp = server
        .client
        .post(server.url("/api/v1/admin/assignments"))
        .header(SESSION_HEADER, &admin)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["data"]["uploaded"], 1);

    let base = "/api/v1/assignments?branch=CSE&year=3rd%20Year&semester=2%20Semester";
    let body = json_body(
        server
            .client
            .get(server.url(&format!("{base}&unit=--&subject=compiler")))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let body = json_body(
        server
            .client
            .get(server.url(&format!("{base}&unit=1st%20Unit")))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_validation() {
    let server = TestServer::start().await;
    let admin = server.admin_session().await;

    let form = Form::new()
        .text("regulation", "R20")
        .text("year", "2nd Year")
        .text("semester", "1 Semester")
        .text("paper_type", "Regular")
        .part("file", pdf_part("a.pdf", fake_pdf(64)));
    let resp = server
        .client
        .post(server.url("/api/v1/admin/papers"))
        .header(SESSION_HEADER, &admin)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "Select at least one branch");
}

#[tokio::test]
async fn test_admin_search_and_delete() {
    let server = TestServer::start().await;
    let admin = server.admin_session().await;
    upload_papers(
        &server,
        &admin,
        vec![("maths-1.pdf", fake_pdf(64)), ("physics.pdf", fake_pdf(64))],
    )
    .await;

    let search = |term: &'static str| {
        server
            .client
            .get(server.url(&format!("/api/v1/admin/documents/papers?search={term}")))
            .header(SESSION_HEADER, &admin)
            .send()
    };

    let body = json_body(search("").await.unwrap()).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let body = json_body(search("MATHS").await.unwrap()).await;
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    let id = found[0]["id"].as_i64().unwrap();

    let delete_url = server.url(&format!("/api/v1/admin/documents/papers/{id}"));
    let resp = server
        .client
        .delete(&delete_url)
        .header(SESSION_HEADER, &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .delete(format!("{delete_url}?confirm=true"))
        .header(SESSION_HEADER, &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server
        .client
        .get(server.url(&format!("/api/v1/papers/{id}/download")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_announcements() {
    let server = TestServer::start().await;
    let admin = server.admin_session().await;

    let resp = server
        .client
        .post(server.url("/api/v1/admin/aptitude-tests"))
        .header(SESSION_HEADER, &admin)
        .json(&json!({
            "year": "2nd Year",
            "title": "Mock Test 1",
            "description": "Quantitative aptitude",
            "topics": "Percentages, Ratios , Time & Work",
            "duration": "45 minutes",
            "total_questions": 30,
            "form_link": "https://forms.example/mock-1",
            "expiry_hours": 12
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/aptitude-tests?year=2nd%20Year"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Mock Test 1");
    assert_eq!(
        items[0]["topic_list"],
        json!(["Percentages", "Ratios", "Time & Work"])
    );

    let resp = server
        .client
        .post(server.url("/api/v1/admin/weekly-quizzes"))
        .header(SESSION_HEADER, &admin)
        .json(&json!({
            "year": "2nd Year",
            "semester": "1 Semester",
            "branch": "ECE",
            "title": "Week 3",
            "description": "Signals",
            "topics": "Fourier",
            "duration": "20 minutes",
            "total_questions": 0,
            "form_link": "https://forms.example/w3"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/weekly-quizzes?year=2nd%20Year&branch=ECE"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["complete"], false);
    assert_eq!(body["data"]["missing"], json!(["semester"]));

    let resp = server
        .client
        .delete(server.url(&format!("/api/v1/admin/announcements/aptitude-tests/{id}")))
        .header(SESSION_HEADER, &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = json_body(
        server
            .client
            .get(server.url("/api/v1/aptitude-tests?year=2nd%20Year"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}
