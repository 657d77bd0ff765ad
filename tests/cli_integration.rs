use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
    server: MockServer,
}

impl TestEnv {
    async fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
            server: MockServer::start().await,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.env("TASKFLOW_STATE_DIR", self.dir.path())
            .env("TASKFLOW_API_URL", self.server.uri());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    /// Seed stored credentials directly, skipping the login round trip.
    fn sign_in_as(&self, user_id: &str) {
        let creds = json!({
            "access_token": "tok-1",
            "user": {
                "id": user_id,
                "email": "user@example.com",
                "created_at": "2024-01-01T00:00:00"
            }
        });
        fs::write(
            self.dir.path().join("credentials.json"),
            serde_json::to_string_pretty(&creds).unwrap(),
        )
        .expect("write credentials");
    }

    fn select_workspace(&self, workspace_id: &str) {
        fs::write(self.dir.path().join("current_workspace"), workspace_id)
            .expect("write workspace selection");
    }

    fn current_workspace(&self) -> Option<String> {
        fs::read_to_string(self.dir.path().join("current_workspace")).ok()
    }

    fn cached_statuses(&self) -> Value {
        let raw = fs::read_to_string(self.dir.path().join("kanban-statuses.json"))
            .unwrap_or_else(|_| "{}".into());
        serde_json::from_str(&raw).unwrap()
    }
}

fn task_body(id: &str, title: &str, status: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "is_completed": completed,
        "status": status,
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00",
        "user_id": "u1"
    })
}

// ─── auth ──────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_stores_credentials_used_by_later_commands() {
    let env = TestEnv::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .and(body_json(json!({"email": "user@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer",
            "user": {
                "id": "u1",
                "email": "user@example.com",
                "created_at": "2024-01-01T00:00:00"
            }
        })))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "user@example.com",
            "created_at": "2024-01-01T00:00:00"
        })))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["login", "user@example.com", "pw"]);
    assert_eq!(v["data"]["user"]["id"], "u1");

    let v = env.run_ok(&["whoami"]);
    assert_eq!(v["data"]["user"]["email"], "user@example.com");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commands_without_credentials_fail_with_not_authenticated() {
    let env = TestEnv::new().await;

    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "NOT_AUTHENTICATED");

    env.cmd()
        .args(["task", "list"])
        .assert()
        .failure()
        .code(1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logout_forgets_the_stored_token() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    env.run_ok(&["logout"]);
    let v = env.run_err(&["whoami"]);
    assert_eq!(v["error"]["code"], "NOT_AUTHENTICATED");
}

// ─── tasks (personal scope) ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_add_returns_the_server_assigned_id() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("POST"))
        .and(path("/api/u1/tasks"))
        .and(body_json(json!({"title": "Write docs"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(task_body("t1", "Write docs", "TO_DO", false)),
        )
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["task", "add", "Write docs"]);
    assert_eq!(v["data"]["task"]["id"], "t1");
    assert_eq!(v["data"]["task"]["status"], "TO_DO");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_list_shows_the_personal_collection() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_body("t1", "A", "TO_DO", false),
            task_body("t2", "B", "DONE", true),
        ])))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["task", "list"]);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1]["status"], "DONE");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_list_text_output_marks_completed_tasks() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_body("t1", "Ship the release", "DONE", true),
        ])))
        .mount(&env.server)
        .await;

    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Ship the release"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_list_fails_open_with_a_warning_when_the_fetch_fails() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["task", "list"]);
    assert_eq!(v["data"]["tasks"].as_array().unwrap().len(), 0);
    assert!(v["data"]["warning"].is_string(), "warning missing: {v}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_done_toggles_and_persists_the_status_cache() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([task_body("t1", "A", "TO_DO", false)])))
        .mount(&env.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/u1/tasks/t1/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "A", "DONE", true)))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["task", "done", "t1"]);
    assert_eq!(v["data"]["task"]["status"], "DONE");
    assert_eq!(v["data"]["task"]["is_completed"], true);
    assert_eq!(env.cached_statuses()["t1"], "DONE");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_rm_surfaces_a_server_rejection() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([task_body("t1", "A", "TO_DO", false)])))
        .mount(&env.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/u1/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})),
        )
        .mount(&env.server)
        .await;

    let v = env.run_err(&["task", "rm", "t1"]);
    assert_eq!(v["error"]["code"], "NOT_FOUND");
    assert_eq!(v["error"]["message"], "Task not found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_references_resolve_by_unique_prefix() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("GET"))
        .and(path("/api/u1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_body("abc123", "A", "TO_DO", false),
            task_body("xyz789", "B", "TO_DO", false),
        ])))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["task", "show", "abc"]);
    assert_eq!(v["data"]["task"]["id"], "abc123");

    let v = env.run_err(&["task", "show", "nope"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND_LOCALLY");
}

// ─── kanban board (workspace scope) ────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn board_groups_workspace_tasks_into_columns() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");

    Mock::given(method("GET"))
        .and(path("/api/workspaces/ws1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_body("t1", "A", "TO_DO", false),
            task_body("t2", "B", "REVIEW", false),
            task_body("t3", "C", "DONE", true),
        ])))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["board"]);
    let columns = v["data"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0]["status"], "TO_DO");
    assert_eq!(columns[2]["tasks"][0]["id"], "t2");
    assert_eq!(columns[3]["tasks"][0]["id"], "t3");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn board_move_updates_the_server_and_the_status_cache() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");

    Mock::given(method("GET"))
        .and(path("/api/workspaces/ws1/tasks"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([task_body("t1", "A", "TO_DO", false)])))
        .mount(&env.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/workspaces/ws1/tasks/t1/status"))
        .and(body_json(json!({"status": "REVIEW"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_body("t1", "A", "REVIEW", false)),
        )
        .expect(1)
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["board", "move", "t1", "review"]);
    assert_eq!(v["data"]["task"]["status"], "REVIEW");
    assert_eq!(env.cached_statuses()["t1"], "REVIEW");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn board_move_requires_a_selected_workspace() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    let v = env.run_err(&["board", "move", "t1", "DONE"]);
    assert_eq!(v["error"]["code"], "NO_WORKSPACE");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cached_statuses_override_the_listing_on_the_board() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");
    fs::write(
        env.dir.path().join("kanban-statuses.json"),
        json!({"t1": "IN_PROGRESS"}).to_string(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/workspaces/ws1/tasks"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([task_body("t1", "A", "TO_DO", false)])))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["board"]);
    let columns = v["data"]["columns"].as_array().unwrap();
    assert_eq!(columns[1]["status"], "IN_PROGRESS");
    assert_eq!(columns[1]["tasks"][0]["id"], "t1");
}

// ─── workspaces ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn workspace_create_becomes_the_selection() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");

    Mock::given(method("POST"))
        .and(path("/api/workspaces"))
        .and(body_json(json!({"name": "Roadmap"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ws9",
            "name": "Roadmap",
            "description": null,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        })))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["workspace", "create", "Roadmap"]);
    assert_eq!(v["data"]["workspace"]["id"], "ws9");
    assert_eq!(env.current_workspace().as_deref(), Some("ws9"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn workspace_switch_to_unknown_id_leaves_selection_unchanged() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");

    Mock::given(method("GET"))
        .and(path("/api/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "ws1",
            "name": "Existing",
            "description": null,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }])))
        .mount(&env.server)
        .await;

    let v = env.run_err(&["workspace", "switch", "nope"]);
    assert_eq!(v["error"]["code"], "NOT_FOUND");
    assert_eq!(env.current_workspace().as_deref(), Some("ws1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleting_the_selected_workspace_clears_the_selection() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");

    Mock::given(method("DELETE"))
        .and(path("/api/workspaces/ws1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&env.server)
        .await;

    env.run_ok(&["workspace", "delete", "ws1"]);
    assert!(env.current_workspace().is_none());
}

// ─── analytics ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stats_renders_the_workspace_analytics_summary() {
    let env = TestEnv::new().await;
    env.sign_in_as("u1");
    env.select_workspace("ws1");

    Mock::given(method("GET"))
        .and(path("/api/workspaces/ws1/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspace_id": "ws1",
            "summary": {
                "total_tasks": 10,
                "completed_tasks": 4,
                "pending_tasks": 6,
                "completion_rate": 40.0
            },
            "status_distribution": [
                {"status": "TO_DO", "count": 5, "percentage": 50.0},
                {"status": "DONE", "count": 4, "percentage": 40.0},
                {"status": "REVIEW", "count": 1, "percentage": 10.0}
            ],
            "priority_breakdown": [
                {"priority": "HIGH", "count": 3, "completed": 1, "pending": 2}
            ],
            "completion_trend": [
                {"date": "2024-01-01", "completed": 2, "created": 3}
            ],
            "generated_at": "2024-01-02T00:00:00"
        })))
        .mount(&env.server)
        .await;

    let v = env.run_ok(&["stats"]);
    assert_eq!(v["data"]["summary"]["total_tasks"], 10);
    assert_eq!(v["data"]["status_distribution"][0]["status"], "TO_DO");

    // Without a selection there is nothing to report on.
    fs::remove_file(env.dir.path().join("current_workspace")).unwrap();
    let v = env.run_err(&["stats"]);
    assert_eq!(v["error"]["code"], "NO_WORKSPACE");
}
