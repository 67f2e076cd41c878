use std::path::{Path, PathBuf};

use serde_json::json;
use strata_core::Config;
use strata_renderer::{RenderError, Renderer, TemplateContext, TemplateEngine};
use tempfile::TempDir;

const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ ConfigName }}
  namespace: {{ Namespace }}
  labels:
    {% include "labels.tpl" %}
spec:
  replicas: {{ Values.replicas }}
  template:
    spec:
      containers:
        - name: {{ AppName }}
          image: {{ Values.image | quote }}
"#;

fn resolved(cluster: &str) -> Config {
    Config {
        name: "web".into(),
        namespace: "frontend".into(),
        clusters: vec![cluster.to_string()],
        env: Some("prod".into()),
        values: serde_json::from_value(json!({
            "replicas": 3,
            "image": "registry.local/web:1.4"
        }))
        .unwrap(),
    }
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, content).expect("write");
    path
}

fn renderer_with_helpers(dir: &TempDir) -> Renderer {
    write(
        dir.path(),
        "helpers/labels.tpl",
        "app: {{ AppName }}\n    cluster: {{ Cluster }}\n    env: {{ Env }}",
    );
    let mut engine = TemplateEngine::new();
    engine
        .add_helpers(&format!("{}/helpers/*.tpl", dir.path().display()))
        .expect("helpers");
    Renderer::new(engine)
}

#[test]
fn deployment_renders_with_helpers_and_values() {
    let dir = TempDir::new().expect("tempdir");
    let renderer = renderer_with_helpers(&dir);
    let template = write(dir.path(), "shop/deploy.yaml", DEPLOYMENT);

    let file = renderer
        .render_one("shop", &resolved("east"), &template)
        .expect("render");

    assert_eq!(file.path, PathBuf::from("east/frontend/shop/deploy.yaml"));
    let doc: serde_yaml::Value = serde_yaml::from_str(&file.content).expect("valid yaml");
    assert_eq!(doc["spec"]["replicas"].as_i64(), Some(3));
    assert_eq!(doc["metadata"]["labels"]["cluster"].as_str(), Some("east"));
    assert_eq!(doc["metadata"]["labels"]["env"].as_str(), Some("prod"));
    assert!(file.content.contains(r#"image: "registry.local/web:1.4""#));
}

#[test]
fn each_cluster_gets_its_own_path_and_content() {
    let dir = TempDir::new().expect("tempdir");
    let renderer = renderer_with_helpers(&dir);
    let template = write(dir.path(), "shop/deploy.yaml", DEPLOYMENT);

    let east = renderer.render_one("shop", &resolved("east"), &template).expect("east");
    let west = renderer.render_one("shop", &resolved("west"), &template).expect("west");
    assert_ne!(east.path, west.path);
    assert!(east.content.contains("cluster: east"));
    assert!(west.content.contains("cluster: west"));
}

#[test]
fn missing_value_is_execution_error_not_empty_output() {
    let dir = TempDir::new().expect("tempdir");
    let template = write(
        dir.path(),
        "shop/cm.yaml",
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: x\ndata:\n  port: \"{{ Values.missingKey }}\"\n",
    );
    let err = Renderer::default()
        .render_one("shop", &resolved("east"), &template)
        .unwrap_err();
    assert!(matches!(err, RenderError::Execution { .. }), "got: {err}");
}

#[test]
fn missing_helper_is_execution_error() {
    let dir = TempDir::new().expect("tempdir");
    let template = write(dir.path(), "shop/deploy.yaml", DEPLOYMENT);
    let err = Renderer::default()
        .render_one("shop", &resolved("east"), &template)
        .unwrap_err();
    assert!(matches!(err, RenderError::Execution { .. }), "got: {err}");
}

#[test]
fn output_without_kind_is_validation_error() {
    let dir = TempDir::new().expect("tempdir");
    let template = write(
        dir.path(),
        "shop/cm.yaml",
        "apiVersion: v1\nmetadata:\n  name: {{ ConfigName }}\n",
    );
    let err = Renderer::default()
        .render_one("shop", &resolved("east"), &template)
        .unwrap_err();
    assert!(
        matches!(err, RenderError::Validation { field: "kind", .. }),
        "got: {err}"
    );
}

#[test]
fn template_parse_does_not_pollute_helpers() {
    let dir = TempDir::new().expect("tempdir");
    let renderer = renderer_with_helpers(&dir);
    let overriding = write(
        dir.path(),
        "shop/labels.tpl",
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: shadow\n",
    );
    renderer
        .render_one("shop", &resolved("east"), &overriding)
        .expect("template named like a helper renders");

    let template = write(dir.path(), "shop/deploy.yaml", DEPLOYMENT);
    let file = renderer
        .render_one("shop", &resolved("east"), &template)
        .expect("render after shadowing");
    assert!(file.content.contains("app: shop"), "helper was replaced:\n{}", file.content);
}

#[test]
fn rendering_handles_many_string_shapes() {
    let samples = [
        "simple",
        "quotes-'\"`",
        "braces-{}[]()",
        "japanese-日本語",
        "math-<= >= !=",
    ];
    let engine = TemplateEngine::new();
    for sample in samples {
        let mut config = resolved("east");
        config.values.insert("s".into(), json!(sample));
        let ctx = TemplateContext::from_config("shop", &config, "east");
        let out = engine
            .render_str("t.yaml", "v: {{ Values.s | quote }}", &ctx)
            .expect("render");
        let doc: serde_yaml::Value = serde_yaml::from_str(&out).expect("quoted output is yaml");
        assert_eq!(doc["v"].as_str(), Some(sample));
    }
}
