//! End-to-end tests of the per-model pipeline against a fake Fuel server.

mod helpers;

use gzfuel_pipeline::{ModelOutcome, ThumbnailStatus};

use helpers::{FakeFuelServer, FakeRenderer, TEST_TOKEN, driver, model_config, write_model};

#[tokio::test]
async fn test_valid_model_is_rendered_and_uploaded() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Box", &[("1.5", "model.sdf")]);
    let model_dir = write_model(
        root.path(),
        "Box",
        &[
            ("model.config", config.as_str()),
            ("model.sdf", "<sdf version='1.5'/>"),
            ("meshes/box.dae", "<COLLADA/>"),
        ],
    );
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(report.models.len(), 1);
    assert_eq!(report.models[0].thumbnails, ThumbnailStatus::Created);
    assert_eq!(report.models[0].outcome, ModelOutcome::Uploaded);
    assert_eq!(renderer.rendered_models(), vec![model_dir.join("model.sdf")]);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
    assert_eq!(request.field("multipart"), Some("true"));
    assert_eq!(request.field("name"), Some("Box"));
    assert_eq!(request.field("URLName"), Some("Box"));
    assert_eq!(request.field("description"), Some("Box model"));
    assert_eq!(request.field("tags"), Some(""));
    assert_eq!(request.field("license"), Some("1"));
    assert_eq!(request.field("owner"), Some("OpenRobotics"));
    assert_eq!(request.field("permission"), Some("0"));
    assert_eq!(request.field("private"), Some("0"));
    assert_eq!(
        request.file_names(),
        vec![
            "Box/meshes/box.dae",
            "Box/model.config",
            "Box/model.sdf",
            "Box/thumbnails/1.png",
        ]
    );
}

#[tokio::test]
async fn test_model_without_name_never_reaches_renderer_or_server() {
    let root = tempfile::tempdir().expect("tempdir");
    write_model(
        root.path(),
        "Nameless",
        &[
            (
                "model.config",
                r#"<model><sdf version="1.5">model.sdf</sdf><description>x</description></model>"#,
            ),
            ("model.sdf", "<sdf/>"),
        ],
    );
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.models[0].thumbnails, ThumbnailStatus::NotAttempted);
    match &report.models[0].outcome {
        ModelOutcome::Skipped { reason } => assert!(reason.contains("<name>")),
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(renderer.rendered_models().is_empty());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_highest_sdf_version_is_rendered() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Ambulance", &[("1.0", "model-1_0.sdf"), ("1.6", "model.sdf")]);
    let model_dir = write_model(
        root.path(),
        "Ambulance",
        &[
            ("model.config", config.as_str()),
            ("model-1_0.sdf", "<sdf version='1.0'/>"),
            ("model.sdf", "<sdf version='1.6'/>"),
        ],
    );
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(report.uploaded(), 1);
    assert_eq!(renderer.rendered_models(), vec![model_dir.join("model.sdf")]);

    let files = server.requests()[0].file_names();
    assert!(files.contains(&"Ambulance/model.sdf".to_string()));
    assert!(files.contains(&"Ambulance/model-1_0.sdf".to_string()));
}

#[tokio::test]
async fn test_missing_sdf_file_skips_before_rendering() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Ghost", &[("1.6", "model.sdf")]);
    write_model(root.path(), "Ghost", &[("model.config", config.as_str())]);
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(
        report.models[0].outcome,
        ModelOutcome::Skipped {
            reason: "model.sdf file does not exist".to_string()
        }
    );
    assert!(renderer.rendered_models().is_empty());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_thumbnail_failure_does_not_block_upload() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Box", &[("1.5", "model.sdf")]);
    write_model(
        root.path(),
        "Box",
        &[("model.config", config.as_str()), ("model.sdf", "<sdf/>")],
    );
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::failing();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(report.models[0].thumbnails, ThumbnailStatus::Failed);
    assert_eq!(report.models[0].outcome, ModelOutcome::Uploaded);
    assert_eq!(renderer.rendered_models().len(), 1);
    assert_eq!(
        server.requests()[0].file_names(),
        vec!["Box/model.config", "Box/model.sdf"]
    );
}

#[tokio::test]
async fn test_bad_models_do_not_stop_the_batch() {
    let root = tempfile::tempdir().expect("tempdir");
    let good = model_config("Good Model", &[("1.5", "model.sdf")]);
    write_model(root.path(), "a_broken", &[("model.config", "<model><name>")]);
    write_model(root.path(), "b_empty", &[("notes.txt", "no descriptor")]);
    write_model(
        root.path(),
        "c_good",
        &[("model.config", good.as_str()), ("model.sdf", "<sdf/>")],
    );
    write_model(
        root.path(),
        ".hidden_model",
        &[("model.config", good.as_str()), ("model.sdf", "<sdf/>")],
    );
    std::fs::write(root.path().join("README.md"), "not a model").expect("write");

    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    let report = driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    let dirs: Vec<_> = report
        .models
        .iter()
        .map(|r| r.model_dir.file_name().expect("name").to_string_lossy().into_owned())
        .collect();
    assert_eq!(dirs, vec!["a_broken", "b_empty", "c_good"]);
    assert_eq!(report.skipped(), 2);
    assert_eq!(report.uploaded(), 1);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].field("name"), Some("Good Model"));
    assert_eq!(requests[0].field("URLName"), Some("Good_Model"));
}

#[tokio::test]
async fn test_every_file_is_uploaded_once_and_hidden_dirs_are_not_walked() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = model_config("Box", &[("1.5", "model.sdf")]);
    write_model(
        root.path(),
        "Box",
        &[
            ("model.config", config.as_str()),
            ("model.sdf", "<sdf/>"),
            (".gitignore", "*.bak"),
            ("materials/scripts/box.material", "material Box {}"),
            ("materials/textures/box.png", "png"),
            (".svn/entries", "svn"),
        ],
    );
    let server = FakeFuelServer::accepting().await;

    driver(root.path(), &server, FakeRenderer::succeeding())
        .run()
        .await
        .expect("run");

    let request = &server.requests()[0];
    assert_eq!(
        request.file_names(),
        vec![
            "Box/.gitignore",
            "Box/materials/scripts/box.material",
            "Box/materials/textures/box.png",
            "Box/model.config",
            "Box/model.sdf",
            "Box/thumbnails/1.png",
        ]
    );
    let material = request
        .files
        .iter()
        .find(|(name, _)| name == "Box/materials/scripts/box.material")
        .expect("material part");
    assert_eq!(material.1, b"material Box {}");
}

#[tokio::test]
async fn test_scene_template_is_shared_across_models() {
    let root = tempfile::tempdir().expect("tempdir");
    for name in ["One", "Two"] {
        let config = model_config(name, &[("1.5", "model.sdf")]);
        write_model(
            root.path(),
            name,
            &[("model.config", config.as_str()), ("model.sdf", "<sdf/>")],
        );
    }
    let server = FakeFuelServer::accepting().await;
    let renderer = FakeRenderer::succeeding();

    driver(root.path(), &server, renderer.clone())
        .run()
        .await
        .expect("run");

    let scenes = renderer.scenes();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0], scenes[1]);
    assert_eq!(server.requests().len(), 2);
}
