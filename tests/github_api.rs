use ci_annotator::context::Repo;
use ci_annotator::github::GithubClient;
use ci_annotator::models::Conclusion;
use ci_annotator::platform::Platform;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo() -> Repo {
    Repo { owner: "acme".into(), name: "widgets".into() }
}

fn client(server: &MockServer) -> GithubClient {
    GithubClient::new(&server.uri(), "ghp_test").unwrap()
}

#[tokio::test]
async fn file_exists_maps_404_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/pnpm-lock.yaml"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "pnpm-lock.yaml"})))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.file_exists(&repo(), "pnpm-lock.yaml").await.unwrap());
    // wiremock answers unmatched requests with 404
    assert!(!client.file_exists(&repo(), "yarn.lock").await.unwrap());
}

#[tokio::test]
async fn file_exists_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/bun.lock"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client(&server).file_exists(&repo(), "bun.lock").await.is_err());
}

#[tokio::test]
async fn list_jobs_keeps_platform_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/actions/runs/4242/jobs"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "jobs": [
                {"id": 1, "name": "test", "status": "completed", "conclusion": "failure"},
                {"id": 2, "name": "build", "status": "completed", "conclusion": "success"},
                {"id": 3, "name": "annotate", "status": "in_progress", "conclusion": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client(&server).list_jobs(&repo(), 4242).await.unwrap();
    let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["test", "build", "annotate"]);
    assert_eq!(jobs[0].conclusion, Some(Conclusion::Failure));
    assert_eq!(jobs[2].conclusion, None);
}

#[tokio::test]
async fn list_jobs_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/actions/runs/1/jobs"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(client(&server).list_jobs(&repo(), 1).await.is_err());
}

#[tokio::test]
async fn create_comment_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/issues/7/comments"))
        .and(body_json(json!({"body": "- [ ] lint\n"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 555, "body": "- [ ] lint\n"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server).create_comment(&repo(), 7, "- [ ] lint\n").await.unwrap();
    assert_eq!(id, 555);
}

#[tokio::test]
async fn labels_are_added_and_removed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/issues/7/labels"))
        .and(body_json(json!({"labels": ["CI: Failed"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "CI: Failed"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/acme/widgets/issues/7/labels/CI:%20Passed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.add_labels(&repo(), 7, &["CI: Failed"]).await.unwrap();
    assert!(client.remove_label(&repo(), 7, "CI: Passed").await.unwrap());
}

#[tokio::test]
async fn removing_absent_label_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/acme/widgets/issues/7/labels/CI:%20Failed"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Label does not exist"})))
        .mount(&server)
        .await;

    assert!(!client(&server).remove_label(&repo(), 7, "CI: Failed").await.unwrap());
}

#[tokio::test]
async fn dispatch_posts_ref() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/actions/workflows/rebuild.yml/dispatches"))
        .and(body_json(json!({"ref": "refs/heads/feature"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .dispatch_workflow(&repo(), "rebuild.yml", "refs/heads/feature")
        .await
        .unwrap();
}

#[tokio::test]
async fn dispatch_error_includes_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/actions/workflows/missing.yml/dispatches"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Workflow does not have 'workflow_dispatch' trigger"))
        .mount(&server)
        .await;

    let err = client(&server)
        .dispatch_workflow(&repo(), "missing.yml", "refs/heads/feature")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("422"));
}
