mod common;

use common::SPEC;
use common::SPEC_REWRITTEN;
use common::SPEC_WITHOUT_SETUP;
use predicates::prelude::*;
use rstest::rstest;
use serde_json::Value;
use unconst_core::AnyEmptyResult;

#[test]
fn check_passes_when_nothing_to_move() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC_REWRITTEN)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 1 file(s) have no shared fixtures.",
		));

	Ok(())
}

#[test]
fn check_fails_on_shared_fixtures() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC)?;
	std::fs::write(tmp.path().join("bar.spec.ts"), SPEC_WITHOUT_SETUP)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.arg("bar.spec.ts")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Check failed."))
		.stderr(predicates::str::contains("Files with shared fixtures:"))
		.stderr(predicates::str::contains("foo.spec.ts (2 to move)"))
		.stderr(predicates::str::contains(
			"bar.spec.ts (1 to move, adds beforeEach)",
		))
		.stderr(predicates::str::contains("2 file(s) need rewriting"));

	// check never writes
	assert_eq!(std::fs::read_to_string(tmp.path().join("foo.spec.ts"))?, SPEC);

	Ok(())
}

#[test]
fn check_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-  const fooService"))
		.stderr(predicates::str::contains("+  let fooService;"))
		.stderr(predicates::str::contains("+    fooService = jasmine"));

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("bar.spec.ts"), SPEC_WITHOUT_SETUP)?;
	std::fs::write(tmp.path().join("broken.spec.ts"), "const lonely = 1;\n")?;

	let mut cmd = common::unconst_cmd();
	let output = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.arg("bar.spec.ts")
		.arg("broken.spec.ts")
		.assert()
		.code(2)
		.get_output()
		.stdout
		.clone();

	let report: Value = serde_json::from_slice(&output)?;
	assert_eq!(report["ok"], Value::Bool(false));
	assert_eq!(report["changed"][0]["file"], "bar.spec.ts");
	assert_eq!(report["changed"][0]["relocated"], 1);
	assert_eq!(report["changed"][0]["synthesized_setup"], true);
	assert_eq!(report["errors"][0]["file"], "broken.spec.ts");
	assert!(
		report["errors"][0]["message"]
			.as_str()
			.is_some_and(|message| message.contains("missing `beforeEach` block"))
	);

	Ok(())
}

#[test]
fn check_json_output_when_clean() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC_REWRITTEN)?;

	let mut cmd = common::unconst_cmd();
	let output = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let report: Value = serde_json::from_slice(&output)?;
	assert_eq!(report["ok"], Value::Bool(true));
	assert_eq!(report["changed"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn check_github_annotations() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--format")
		.arg("github")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"::warning file=foo.spec.ts::2 shared fixture(s) should move into beforeEach",
		));

	Ok(())
}

#[test]
fn check_discovers_spec_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("src/app"))?;
	std::fs::create_dir_all(tmp.path().join("node_modules/lib"))?;
	std::fs::write(tmp.path().join("src/app/foo.spec.ts"), SPEC)?;
	std::fs::write(tmp.path().join("src/app/foo.ts"), SPEC)?;
	std::fs::write(tmp.path().join("node_modules/lib/lib.spec.ts"), SPEC)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--discover")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("foo.spec.ts (2 to move)"))
		.stderr(predicates::str::contains("lib.spec.ts").not())
		.stderr(predicates::str::contains("1 file(s) need rewriting"));

	Ok(())
}

#[test]
fn check_discover_uses_configured_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("unconst.toml"),
		"[files]\npatterns = [\"**/*.test.ts\"]\n",
	)?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC)?;
	std::fs::write(tmp.path().join("foo.test.ts"), SPEC)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--discover")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("foo.test.ts (2 to move)"))
		.stderr(predicates::str::contains("foo.spec.ts").not());

	Ok(())
}

#[rstest]
#[case::invalid_toml("indent = [\n")]
#[case::zero_indent("indent = 0\n")]
fn check_rejects_invalid_config(#[case] config: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("unconst.toml"), config)?;
	std::fs::write(tmp.path().join("foo.spec.ts"), SPEC)?;

	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.arg("foo.spec.ts")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn discover_conflicts_with_files() -> AnyEmptyResult {
	let mut cmd = common::unconst_cmd();
	cmd.arg("check")
		.arg("--discover")
		.arg("foo.spec.ts")
		.assert()
		.failure();

	Ok(())
}
