mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::{ADMIN, TestApp, USER, assert_error_body, json_request, request};

#[tokio::test]
async fn admin_crud_round() {
    let app = TestApp::new();
    let admin = app.token(ADMIN).await;

    let res = app
        .send(json_request(
            "POST",
            "/api/v1/boats",
            Some(&admin),
            &json!({ "name": "Aurora", "description": "Sloop" }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_i64().unwrap();
    assert_eq!(res.headers[header::LOCATION], format!("/api/v1/boats/{id}").as_str());

    let res = app
        .send(json_request(
            "PUT",
            &format!("/api/v1/boats/{id}"),
            Some(&admin),
            &json!({ "id": id, "name": "Aurora II" }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Aurora II");

    let user = app.token(USER).await;
    let res = app
        .send(request("GET", &format!("/api/v1/boats/{id}"), Some(&user)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "id": id, "name": "Aurora II" }));

    let res = app
        .send(request("DELETE", &format!("/api/v1/boats/{id}"), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .send(request("GET", &format!("/api/v1/boats/{id}"), Some(&user)))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_error_body(&res, "Resource not found", "Boat not found");

    // Deleting twice is fine.
    let res = app
        .send(request("DELETE", &format!("/api/v1/boats/{id}"), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn create_rejects_client_ids_and_bad_names() {
    let app = TestApp::new();
    let admin = app.token(ADMIN).await;

    let res = app
        .send(json_request(
            "POST",
            "/api/v1/boats",
            Some(&admin),
            &json!({ "id": 5, "name": "Aurora" }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_error_body(&res, "Invalid data", "Id must be blank");

    let res = app
        .send(json_request("POST", "/api/v1/boats", Some(&admin), &json!({ "name": "A" })))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_error_body(&res, "Invalid data", "Invalid 'name'");
}

#[tokio::test]
async fn update_checks_ids_and_existence() {
    let app = TestApp::new();
    let admin = app.token(ADMIN).await;

    let res = app
        .send(json_request(
            "PUT",
            "/api/v1/boats/1",
            Some(&admin),
            &json!({ "id": 2, "name": "Aurora" }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_error_body(&res, "Invalid data", "Inconsistent ids");

    let res = app
        .send(json_request("PUT", "/api/v1/boats/1", Some(&admin), &json!({ "name": "Aurora" })))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_error_body(&res, "Resource not found", "Boat not found");
}

#[tokio::test]
async fn list_pages_and_rejects_oversized_pages() {
    let app = TestApp::new();
    let admin = app.token(ADMIN).await;

    for name in ["Aurora", "Belle", "Corsair"] {
        let res = app
            .send(json_request("POST", "/api/v1/boats", Some(&admin), &json!({ "name": name })))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = app
        .send(request("GET", "/api/v1/boats?page=1&size=2", Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body[0]["name"], "Corsair");
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let res = app
        .send(request("GET", "/api/v1/boats?size=500", Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_error_body(&res, "Invalid data", "Invalid 'size'");
}

#[tokio::test]
async fn non_numeric_id_is_invalid_data() {
    let app = TestApp::new();
    let user = app.token(USER).await;

    let res = app
        .send(request("GET", "/api/v1/boats/abc", Some(&user)))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_error_body(&res, "Invalid data", "Invalid path");
}

#[tokio::test]
async fn unsupported_method_is_a_structured_405() {
    let app = TestApp::new();
    let admin = app.token(ADMIN).await;

    for (method, uri) in [("POST", "/api/v1/boats/1"), ("PUT", "/api/v1/boats")] {
        let res = app.send(request(method, uri, Some(&admin))).await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_error_body(&res, "Method not allowed", "Method not allowed");
    }
}
