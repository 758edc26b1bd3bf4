use assert_cmd::Command;
use cucumber::gherkin::Step;
use cucumber::{given, then, when, World};
use importfix_bdd::ScratchWorkspace;
use importfix_types::schema::IMPORTFIX_REPORT_V1;

#[derive(Debug, Default, World)]
pub struct ImportfixWorld {
    workspace: Option<ScratchWorkspace>,
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn workspace(world: &ImportfixWorld) -> &ScratchWorkspace {
    world.workspace.as_ref().expect("workspace set")
}

/// Docstring body with the trailing newline a source file would have.
fn docstring(step: &Step) -> String {
    let raw = step.docstring.as_deref().expect("step has a docstring");
    let body = raw.strip_prefix('\n').unwrap_or(raw).trim_end_matches('\n');
    format!("{body}\n")
}

// ============================================================================
// Given
// ============================================================================

#[given("an empty workspace")]
async fn empty_workspace(world: &mut ImportfixWorld) {
    world.workspace = Some(ScratchWorkspace::new().expect("scratch workspace"));
}

#[given(expr = "pod {string} has header {string}")]
async fn pod_has_header(world: &mut ImportfixWorld, pod: String, header: String) {
    workspace(world)
        .write(&format!("Pods/{pod}/{header}"), "")
        .unwrap();
}

#[given(expr = "file {string} contains:")]
async fn file_contains(world: &mut ImportfixWorld, step: &Step, path: String) {
    workspace(world).write(&path, &docstring(step)).unwrap();
}

#[given(expr = "a patch file assigning {string} to {string}")]
async fn patch_file(world: &mut ImportfixWorld, header: String, pod: String) {
    let doc = serde_json::json!([{ "name": header, "pod": pod }]);
    workspace(world)
        .write("importfix.patch.json", &doc.to_string())
        .unwrap();
}

#[given("an importfix.toml containing:")]
async fn config_file(world: &mut ImportfixWorld, step: &Step) {
    workspace(world)
        .write("importfix.toml", &docstring(step))
        .unwrap();
}

// ============================================================================
// When
// ============================================================================

fn run_importfix(world: &mut ImportfixWorld, mode: &str, extra: &str) {
    let ws = workspace(world);
    let mut cmd = Command::cargo_bin("importfix").expect("importfix binary");
    cmd.current_dir(ws.root().as_str())
        .arg(ws.manifest().as_str())
        .args(["--mode", mode])
        .args(extra.split_whitespace());
    let output = cmd.output().expect("run importfix");
    world.exit_code = output.status.code();
    world.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    world.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
}

#[when(expr = "I run importfix in {word} mode")]
async fn run_mode(world: &mut ImportfixWorld, mode: String) {
    run_importfix(world, &mode, "");
}

#[when(expr = "I run importfix in {word} mode with {string}")]
async fn run_mode_with(world: &mut ImportfixWorld, mode: String, extra: String) {
    run_importfix(world, &mode, &extra);
}

// ============================================================================
// Then
// ============================================================================

#[then("the run succeeds")]
async fn run_succeeds(world: &mut ImportfixWorld) {
    assert_eq!(
        world.exit_code,
        Some(0),
        "expected success\nstdout:\n{}\nstderr:\n{}",
        world.stdout,
        world.stderr
    );
}

#[then(expr = "the run exits with code {int}")]
async fn run_exits_with(world: &mut ImportfixWorld, code: i32) {
    assert_eq!(world.exit_code, Some(code), "stderr:\n{}", world.stderr);
}

#[then(expr = "stderr mentions {string}")]
async fn stderr_mentions(world: &mut ImportfixWorld, needle: String) {
    assert!(
        world.stderr.contains(&needle),
        "stderr does not mention {needle:?}:\n{}",
        world.stderr
    );
}

#[then(expr = "file {string} now contains:")]
async fn file_now_contains(world: &mut ImportfixWorld, step: &Step, path: String) {
    let actual = workspace(world).read(&path).unwrap();
    assert_eq!(actual, docstring(step), "content mismatch for {path}");
}

#[then(expr = "file {string} is unchanged")]
async fn file_unchanged(world: &mut ImportfixWorld, path: String) {
    let ws = workspace(world);
    let report = ws.report().unwrap();
    let files = report["files"].as_array().expect("files array");
    let entry = files.iter().find(|f| f["path"] == path.as_str());
    if let Some(entry) = entry {
        assert_eq!(entry["written"], false, "{path} was written");
    }
}

#[then(expr = "the report status is {string}")]
async fn report_status(world: &mut ImportfixWorld, status: String) {
    let report = workspace(world).report().unwrap();
    assert_eq!(report["schema"], IMPORTFIX_REPORT_V1);
    assert_eq!(report["verdict"]["status"], status.as_str());
}

#[then(expr = "the report counts {int} rewrite(s) and {int} ambiguous import(s)")]
async fn report_counts(world: &mut ImportfixWorld, rewrites: u64, ambiguous: u64) {
    let report = workspace(world).report().unwrap();
    assert_eq!(report["summary"]["rewrites"], rewrites);
    assert_eq!(report["summary"]["ambiguous"], ambiguous);
}

#[then(expr = "the report lists {string} as a duplicate header")]
async fn report_duplicate(world: &mut ImportfixWorld, header: String) {
    let report = workspace(world).report().unwrap();
    let dups = report["index"]["duplicates"].as_array().expect("duplicates");
    assert!(
        dups.iter().any(|d| d["header"] == header.as_str()),
        "{header} not in {dups:?}"
    );
}

#[then(expr = "the patch preview adds {string}")]
async fn patch_adds(world: &mut ImportfixWorld, line: String) {
    let patch = workspace(world).read("artifacts/importfix/patch.diff").unwrap();
    assert!(
        patch.contains(&format!("+{line}\n")),
        "patch.diff does not add {line:?}:\n{patch}"
    );
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    ImportfixWorld::cucumber().run(features_path).await;
}
