// ABOUTME: End-to-end scenarios driving the compiled `nyx` binary and asserting on stdout

use std::io::Write;
use std::process::{Command, Output};

/// Writes `source` to a fresh temp `.nyx` file and runs the compiled binary
/// against it, returning (stdout, stderr, exit code). Exercises the whole
/// pipeline exactly the way a real invocation of `nyx script.nyx` does.
fn run_script(source: &str) -> (String, String, i32) {
    run_script_with_args(source, &[])
}

fn run_script_with_args(source: &str, script_args: &[&str]) -> (String, String, i32) {
    let mut path = std::env::temp_dir();
    path.push(format!("nyx_test_{}.nyx", unique_suffix()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(source.as_bytes())
        .unwrap();

    let output: Output = Command::new(env!("CARGO_BIN_EXE_nyx"))
        .arg(&path)
        .args(script_args)
        .output()
        .expect("failed to run nyx binary");

    let _ = std::fs::remove_file(&path);

    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

fn unique_suffix() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    format!("{}_{}", std::process::id(), COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[test]
fn closure_counter_prints_ascending_values() {
    let (stdout, _stderr, code) = run_script(
        r#"
        func make() = {
          auto n = 0;
          func inc() = { n = n + 1; return n; }
          return inc;
        }
        auto c = make();
        output(c()); output(c()); output(c());
        "#,
    );
    assert_eq!(stdout, "1\n2\n3\n");
    assert_eq!(code, 0);
}

#[test]
fn string_interpolation_substitutes_expressions() {
    let (stdout, _stderr, code) = run_script(r#"auto x = 2; output("v=#{x*5}");"#);
    assert_eq!(stdout, "v=10\n");
    assert_eq!(code, 0);
}

#[test]
fn logical_or_short_circuits_and_never_calls_boom() {
    let (stdout, _stderr, code) = run_script(
        r#"
        func boom() = { output("B"); return true; }
        auto r = true or boom();
        output(r);
        "#,
    );
    assert_eq!(stdout, "true\n");
    assert_eq!(code, 0);
}

#[test]
fn list_repetition_and_concatenation() {
    let (stdout, _stderr, code) = run_script("output([1,2] * 3 + [9]);");
    assert_eq!(stdout, "[1, 2, 1, 2, 1, 2, 9]\n");
    assert_eq!(code, 0);
}

#[test]
fn negative_string_indexing_wraps_from_the_end() {
    let (stdout, _stderr, code) = run_script(r#"auto s = "abcd"; output(s[-1]); output(s[-4]);"#);
    assert_eq!(stdout, "d\na\n");
    assert_eq!(code, 0);
}

#[test]
fn module_cache_shares_mutation_across_two_imports() {
    let tmp = std::env::temp_dir().join(format!("nyx_mod_{}", unique_suffix()));
    std::fs::create_dir_all(&tmp).unwrap();
    let lib_path = tmp.join("lib.nyx");
    std::fs::write(&lib_path, "auto counter = 0;\n").unwrap();

    let main_src = format!(
        r#"
        import "{lib}" as first;
        import "{lib}" as second;
        first.counter = 99;
        output(second.counter);
        "#,
        lib = lib_path.to_string_lossy().replace('\\', "\\\\"),
    );
    let main_path = tmp.join("main.nyx");
    std::fs::write(&main_path, &main_src).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_nyx"))
        .arg(&main_path)
        .output()
        .expect("failed to run nyx binary");

    let _ = std::fs::remove_dir_all(&tmp);

    assert_eq!(String::from_utf8_lossy(&output.stdout), "99\n");
    assert!(output.status.success());
}

#[test]
fn division_by_zero_is_a_runtime_error_with_exit_code_one() {
    let (_stdout, stderr, code) = run_script("auto x = 1 / 0;");
    assert_eq!(code, 1);
    assert!(stderr.contains("Division by zero."));
}

#[test]
fn indexing_an_empty_list_is_a_runtime_error() {
    let (_stdout, stderr, code) = run_script("auto x = [][0];");
    assert_eq!(code, 1);
    assert!(stderr.contains("out of bounds"));
}

#[test]
fn non_nyx_extension_is_rejected_before_any_execution() {
    let mut path = std::env::temp_dir();
    path.push(format!("nyx_test_{}.txt", unique_suffix()));
    std::fs::write(&path, "output(1);").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_nyx")).arg(&path).output().unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".nyx extension"));
}

#[test]
fn missing_script_argument_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_nyx")).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn version_flag_prints_version_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_nyx")).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Nyx Interpreter version"));
}

#[test]
fn about_flag_prints_about_text_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_nyx")).arg("--about").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Nyx Language"));
}

#[test]
fn script_args_are_exposed_as_the_script_args_list() {
    let (stdout, _stderr, code) = run_script_with_args(
        r#"output(len(SCRIPT_ARGS)); output(SCRIPT_ARGS[0]);"#,
        &["first", "second"],
    );
    assert_eq!(stdout, "2\nfirst\n");
    assert_eq!(code, 0);
}

#[test]
fn escaped_break_at_top_level_is_logged_but_does_not_abort_the_script() {
    let (stdout, stderr, code) = run_script("break; output(1);");
    assert_eq!(stdout, "1\n");
    assert!(stderr.contains("'break' signal used outside of a loop"));
    assert_eq!(code, 0);
}

#[test]
fn unknown_native_module_import_is_a_runtime_error() {
    let (_stdout, stderr, code) = run_script(r#"import "std:nope" as n;"#);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown native module"));
}

#[test]
fn output_only_resolves_escapes_for_a_top_level_string_not_nested_list_elements() {
    let (stdout, _stderr, code) = run_script(
        r#"
        output("a\nb");
        output([1, "a\nb"]);
        "#,
    );
    assert_eq!(stdout, "a\nb\n[1, \"a\\nb\"]\n");
    assert_eq!(code, 0);
}

#[test]
fn typedef_prints_the_uppercase_type_name_of_its_argument() {
    let (stdout, _stderr, code) = run_script(
        r#"
        @Typedef(1);
        @Typedef("x");
        @Typedef([1, 2]);
        @Typedef(true);
        "#,
    );
    assert_eq!(stdout, "NUMBER\nSTRING\nLIST\nBOOL\n");
    assert_eq!(code, 0);
}

#[test]
fn std_math_module_is_usable_end_to_end() {
    let (stdout, _stderr, code) = run_script(
        r#"
        import "std:math" as math;
        output(math.sqrt(16));
        output(math.abs(-3));
        "#,
    );
    assert_eq!(stdout, "4\n3\n");
    assert_eq!(code, 0);
}
