//! Department-counter integrity across every employee mutation, plus
//! department CRUD rules.

use mockhr_core::{TestApp, TestResponse};
use serde_json::Value;

/// Fetch departments and employees and assert every counter equals the
/// number of employees pointing at it.
async fn assert_counters_consistent(app: &TestApp, token: &str) {
    let departments = app
        .client
        .get_with_auth(&app.url("/departments"), token)
        .await
        .json();
    let employees = app
        .client
        .get_with_auth(&app.url("/employees"), token)
        .await
        .json();

    for dept in departments.as_array().unwrap() {
        let expected = employees
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["departmentId"] == dept["id"])
            .count() as u64;
        assert_eq!(
            dept["employeeCount"].as_u64().unwrap(),
            expected,
            "department {} counter out of sync",
            dept["id"]
        );
    }
}

fn count_of(departments: &Value, id: u64) -> u64 {
    departments
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == id)
        .unwrap()["employeeCount"]
        .as_u64()
        .unwrap()
}

async fn departments(app: &TestApp, token: &str) -> Value {
    app.client
        .get_with_auth(&app.url("/departments"), token)
        .await
        .json()
}

#[tokio::test]
async fn create_employee_increments_target_department() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees"),
            &admin,
            r#"{"employeeId":"EMP003","userId":1,"position":"QA","departmentId":1,"hireDate":"2025-03-01"}"#,
        )
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.json()["id"], 3);
    assert_eq!(res.json()["employeeId"], "EMP003");
    assert_eq!(res.json()["status"], "Active");

    let depts = departments(&app, &admin).await;
    assert_eq!(count_of(&depts, 1), 2);
    assert_counters_consistent(&app, &admin).await;
}

#[tokio::test]
async fn create_employee_rejects_missing_department_before_mutating() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees"),
            &admin,
            r#"{"employeeId":"EMP003","userId":1,"position":"QA","departmentId":99,"hireDate":"2025-03-01"}"#,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Target department not found");

    let employees = app.client.get_with_auth(&app.url("/employees"), &admin).await;
    assert_eq!(employees.json().as_array().unwrap().len(), 2);
    assert_counters_consistent(&app, &admin).await;
}

#[tokio::test]
async fn update_moves_counters_between_departments() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .put_with_auth(&app.url("/employees/2"), &admin, r#"{"departmentId":1}"#)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["departmentId"], 1);

    let depts = departments(&app, &admin).await;
    assert_eq!(count_of(&depts, 1), 2);
    assert_eq!(count_of(&depts, 2), 0);
    assert_counters_consistent(&app, &admin).await;
}

#[tokio::test]
async fn update_to_missing_department_mutates_nothing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .put_with_auth(&app.url("/employees/2"), &admin, r#"{"departmentId":99}"#)
        .await;
    assert_eq!(res.status, 400);

    let employee = app.client.get_with_auth(&app.url("/employees/2"), &admin).await;
    assert_eq!(employee.json()["departmentId"], 2);
    assert_counters_consistent(&app, &admin).await;
}

#[tokio::test]
async fn delete_employee_decrements_its_department() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app.client.delete_with_auth(&app.url("/employees/2"), &admin).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.message(), "Employee deleted");

    let depts = departments(&app, &admin).await;
    assert_eq!(count_of(&depts, 2), 0);
    assert_counters_consistent(&app, &admin).await;
}

#[tokio::test]
async fn transfer_moves_counters_and_appends_a_pending_workflow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees/2/transfer"),
            &admin,
            r#"{"departmentId":1,"reason":"Team change"}"#,
        )
        .await;
    assert_eq!(res.status, 200);
    let json = res.json();
    assert_eq!(json["message"], "Employee transferred successfully");
    assert_eq!(json["employee"]["departmentId"], 1);

    let depts = departments(&app, &admin).await;
    assert_eq!(count_of(&depts, 1), 2);
    assert_eq!(count_of(&depts, 2), 0);
    assert_counters_consistent(&app, &admin).await;

    let workflows = app.client.get_with_auth(&app.url("/workflows"), &admin).await;
    let workflows = workflows.json();
    let transfer = workflows
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["type"] == "Transfer")
        .expect("transfer workflow missing");
    assert_eq!(transfer["employeeId"], 2);
    assert_eq!(transfer["status"], "Pending");
    assert_eq!(transfer["details"]["departmentId"], 1);
    assert_eq!(transfer["details"]["reason"], "Team change");
}

#[tokio::test]
async fn transfer_to_current_department_still_records_the_workflow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees/2/transfer"),
            &admin,
            r#"{"departmentId":2}"#,
        )
        .await;
    assert_eq!(res.status, 200);

    let depts = departments(&app, &admin).await;
    assert_eq!(count_of(&depts, 2), 1);

    let workflows = app.client.get_with_auth(&app.url("/workflows"), &admin).await;
    assert!(workflows
        .json()
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w["type"] == "Transfer" && w["employeeId"] == 2));
}

#[tokio::test]
async fn transfer_rejects_missing_target_before_mutating() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees/2/transfer"),
            &admin,
            r#"{"departmentId":99}"#,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Target department not found");

    let employee = app.client.get_with_auth(&app.url("/employees/2"), &admin).await;
    assert_eq!(employee.json()["departmentId"], 2);
    assert_counters_consistent(&app, &admin).await;

    let workflows = app.client.get_with_auth(&app.url("/workflows"), &admin).await;
    assert!(!workflows.body.contains("Transfer"));
}

#[tokio::test]
async fn transfer_of_unknown_employee_is_404() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees/99/transfer"),
            &admin,
            r#"{"departmentId":1}"#,
        )
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.message(), "Employee not found");
}

#[tokio::test]
async fn employee_mutations_require_admin() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    // Reads are open to any authenticated caller.
    let res = app.client.get_with_auth(&app.url("/employees"), &user).await;
    assert_eq!(res.status, 200);

    let res: TestResponse = app
        .client
        .post_with_auth(
            &app.url("/employees"),
            &user,
            r#"{"employeeId":"EMP003","userId":2,"position":"QA","departmentId":1,"hireDate":"2025-03-01"}"#,
        )
        .await;
    assert_eq!(res.status, 403);

    let res = app
        .client
        .post_with_auth(
            &app.url("/employees/2/transfer"),
            &user,
            r#"{"departmentId":1}"#,
        )
        .await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn new_department_starts_empty_with_a_fresh_id() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(&app.url("/departments"), &admin, r#"{"name":"Ops"}"#)
        .await;
    assert_eq!(res.status, 201);
    let json = res.json();
    assert_eq!(json["name"], "Ops");
    assert_eq!(json["employeeCount"], 0);
    assert_eq!(json["id"], 3);

    // Empty departments can be deleted.
    let res = app.client.delete_with_auth(&app.url("/departments/3"), &admin).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.message(), "Department deleted");
}

#[tokio::test]
async fn department_with_employees_cannot_be_deleted() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app.client.delete_with_auth(&app.url("/departments/1"), &admin).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Cannot delete a department with assigned employees");
}

#[tokio::test]
async fn department_update_preserves_the_counter() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .put_with_auth(
            &app.url("/departments/1"),
            &admin,
            r#"{"name":"Platform","description":"Renamed","employeeCount":42}"#,
        )
        .await;
    assert_eq!(res.status, 200);
    let json = res.json();
    assert_eq!(json["name"], "Platform");
    // Counter stays derived, whatever the client sends.
    assert_eq!(json["employeeCount"], 1);
}
