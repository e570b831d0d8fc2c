//! Tests of the upload protocol: status handling, error messages, pacing.

mod helpers;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use gzfuel_pipeline::{ModelOutcome, PayloadBuilder, ThumbnailGenerator, UploadResult};

use helpers::{FakeFuelServer, FakeRenderer, driver, model_config, write_model};

async fn box_payload(root: &std::path::Path) -> gzfuel_pipeline::UploadPayload {
    let config = model_config("Box", &[("1.5", "model.sdf")]);
    let model_dir = write_model(
        root,
        "Box",
        &[("model.config", config.as_str()), ("model.sdf", "<sdf/>")],
    );
    let metadata = gzfuel_pipeline::DescriptorReader::read(&model_dir)
        .await
        .expect("descriptor");
    PayloadBuilder::new(root, "OpenRobotics")
        .build(&metadata, &model_dir)
        .await
        .expect("payload")
}

#[tokio::test]
async fn test_status_200_is_success() {
    let root = tempfile::tempdir().expect("tempdir");
    let payload = box_payload(root.path()).await;
    let server = FakeFuelServer::accepting().await;

    let result = server.uploader().upload(&payload).await;

    assert_eq!(result, UploadResult::Success);
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].content_length.is_some_and(|len| len > 0));
    assert_eq!(
        requests[0].file_names(),
        vec!["Box/model.config", "Box/model.sdf"]
    );
}

#[tokio::test]
async fn test_rejection_message_is_extracted() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Box", &[("1.5", "model.sdf")]);
    write_model(
        root.path(),
        "Box",
        &[("model.config", config.as_str()), ("model.sdf", "<sdf/>")],
    );
    let server = FakeFuelServer::start(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"errcode":100011,"msg":"duplicate model","extra":null}"#,
    )
    .await;

    let report = driver(root.path(), &server, FakeRenderer::succeeding())
        .run()
        .await
        .expect("run");

    assert_eq!(
        report.models[0].outcome,
        ModelOutcome::Failed {
            message: "duplicate model".to_string()
        }
    );
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn test_non_json_error_body_gives_empty_message() {
    let root = tempfile::tempdir().expect("tempdir");
    let payload = box_payload(root.path()).await;
    let server =
        FakeFuelServer::start(StatusCode::INTERNAL_SERVER_ERROR, "<h1>Server Error</h1>").await;

    let result = server.uploader().upload(&payload).await;

    assert_eq!(result, UploadResult::Failure(String::new()));
}

#[tokio::test]
async fn test_only_status_200_counts_as_success() {
    let root = tempfile::tempdir().expect("tempdir");
    let payload = box_payload(root.path()).await;
    let server = FakeFuelServer::start(StatusCode::CREATED, r#"{"msg":"created"}"#).await;

    let result = server.uploader().upload(&payload).await;

    assert_eq!(result, UploadResult::Failure("created".to_string()));
    assert_eq!(server.requests().len(), 1);
}

/// Run two models against a server answering `status`, returning the report
/// and the elapsed time.
async fn run_two_models(
    status: StatusCode,
    body: &str,
    delay: Duration,
) -> (gzfuel_pipeline::BatchReport, Duration, FakeFuelServer) {
    let root = tempfile::tempdir().expect("tempdir");
    for name in ["First", "Second"] {
        let config = model_config(name, &[("1.5", "model.sdf")]);
        write_model(
            root.path(),
            name,
            &[("model.config", config.as_str()), ("model.sdf", "<sdf/>")],
        );
    }
    let server = FakeFuelServer::start(status, body).await;
    let uploader = server.uploader().with_delay(delay);
    let thumbnails = ThumbnailGenerator::new(FakeRenderer::succeeding()).expect("scene");
    let driver =
        gzfuel_pipeline::PipelineDriver::new(root.path(), "OpenRobotics", thumbnails, uploader);

    let start = Instant::now();
    let report = driver.run().await.expect("run");
    (report, start.elapsed(), server)
}

#[tokio::test]
async fn test_pause_follows_every_rejected_attempt() {
    let delay = Duration::from_millis(300);
    let (report, elapsed, server) =
        run_two_models(StatusCode::CONFLICT, r#"{"msg":"exists"}"#, delay).await;

    assert_eq!(report.failed(), 2);
    assert_eq!(server.requests().len(), 2);
    assert!(elapsed >= delay * 2, "elapsed {elapsed:?}");
    assert!(elapsed < delay * 3, "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_pause_follows_every_successful_attempt() {
    let delay = Duration::from_millis(300);
    let (report, elapsed, server) = run_two_models(StatusCode::OK, "{}", delay).await;

    assert_eq!(report.uploaded(), 2);
    assert_eq!(server.requests().len(), 2);
    assert!(elapsed >= delay * 2, "elapsed {elapsed:?}");
    assert!(elapsed < delay * 3, "elapsed {elapsed:?}");
}
