//! Tests for the command-line bridge.

use super::*;
use crate::document::{Element, tag};
use crate::param::{ItemSpec, ParamType, ToolInfo, Value};
use crate::time::FixedClock;
use chrono::{DateTime, TimeZone, Utc};
use clap::error::ErrorKind;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn tool() -> ToolDescriptor {
    let mut tool = ToolDescriptor::new(ToolInfo::new("testTool", "0.0.2"));
    let root = tool.root_mut();
    root.add(
        "positive_number",
        ItemSpec::new(ParamType::Int).default(5).min(0),
    )
    .unwrap();
    root.add("boolean_flag", ItemSpec::new(ParamType::Bool)).unwrap();
    root.add(
        "input_files",
        ItemSpec::new(ParamType::Str).list().required(),
    )
    .unwrap();
    root.add_group("subparams", "")
        .unwrap()
        .add("param_1", ItemSpec::new(ParamType::Float).default(5.5))
        .unwrap();
    tool
}

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn bridge() -> CommandLineBridge {
    CommandLineBridge::new(tool()).with_clock(FixedClock(instant()))
}

fn invoked(result: Result<Outcome, BridgeError>) -> Invocation {
    match result.unwrap() {
        Outcome::Invoked(invocation) => invocation,
        Outcome::ToolDescribed(path) => panic!("unexpected describe to {}", path.display()),
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn log_of(path: &Path) -> Element {
    let document = Element::parse(&std::fs::read_to_string(path).unwrap()).unwrap();
    document.find(tag::LOGS).unwrap().find(tag::LOG).unwrap().clone()
}

mod parsing {
    use super::*;

    #[test]
    fn missing_required_fails() {
        let error = bridge().run(Vec::<String>::new()).unwrap_err();

        assert!(matches!(
            error,
            BridgeError::Parse(ref e) if e.kind() == ErrorKind::MissingRequiredArgument
        ));
    }

    #[test]
    fn defaults_fill_unsupplied_parameters() {
        let invocation = invoked(bridge().run(["-input_files", "a.txt"]));

        assert_eq!(invocation.int("positive_number"), Some(5));
        assert!(!invocation.flag("boolean_flag"));
        assert_eq!(invocation.float("subparams:param_1"), Some(5.5));
        assert_eq!(invocation.list("input_files"), Some(&[Value::from("a.txt")][..]));
        assert!(invocation.written_path().is_none());
        assert!(invocation.log_path().is_none());
    }

    #[test]
    fn call_values_are_stored() {
        let invocation = invoked(bridge().run([
            "-input_files",
            "a",
            "b",
            "-boolean_flag",
            "-subparams:param_1",
            "-1.5",
        ]));

        assert!(invocation.flag("boolean_flag"));
        assert_eq!(invocation.float("-subparams:param_1"), Some(-1.5));
        assert_eq!(
            invocation.item("positive_number").unwrap().call_value(),
            None
        );
    }

    #[test]
    fn out_of_range_value_is_kept_by_default() {
        let invocation = invoked(bridge().run(["-input_files", "a", "-positive_number", "-5"]));

        assert_eq!(invocation.int("positive_number"), Some(-5));
    }

    #[test]
    fn reject_policy_fails_out_of_range_value() {
        let error = bridge()
            .with_policy(RestrictionPolicy::Reject)
            .run(["-input_files", "a", "-positive_number", "-5"])
            .unwrap_err();

        assert!(matches!(
            error,
            BridgeError::Parse(ref e) if e.kind() == ErrorKind::ValueValidation
        ));
    }

    #[test]
    fn settings_policy_applies_without_override() {
        let settings = Settings::parse("[restrictions]\npolicy = \"reject\"\n").unwrap();
        let result = bridge()
            .with_settings(settings)
            .run(["-input_files", "a", "-positive_number", "-5"]);

        assert!(result.is_err());
    }

    #[test]
    fn help_is_reported_as_help() {
        let error = bridge().run(["--help"]).unwrap_err();

        assert!(error.is_help());
        assert!(error.to_string().contains("--positive_number"));
    }

    #[test]
    fn nested_parameter_named_help_is_a_normal_option() {
        let mut tool = tool();
        tool.root_mut()
            .add_group("opts", "")
            .unwrap()
            .add("help", ItemSpec::new(ParamType::Int).default(1))
            .unwrap();

        let invocation = invoked(
            CommandLineBridge::new(tool).run(["-input_files", "a", "-opts:help", "3"]),
        );

        assert_eq!(invocation.int("opts:help"), Some(3));
    }

    #[test]
    fn directive_without_filename_fails() {
        let error = bridge().run(["--input_ctd"]).unwrap_err();

        assert!(matches!(error, BridgeError::MissingDirectiveValue { .. }));
        assert!(!error.is_help());
    }
}

mod documents {
    use super::*;

    #[test]
    fn describe_tool_writes_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool.ctd");

        let outcome = bridge()
            .run(["--write_tool_ctd", path_arg(&path).as_str(), "-positive_number", "x"])
            .unwrap();

        assert!(matches!(outcome, Outcome::ToolDescribed(ref p) if *p == path));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<tool version=\"0.0.2\" name=\"testTool\""));
        assert!(content.contains("restrictions=\"0:\""));
    }

    #[test]
    fn param_document_is_written_after_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.ctd");

        let invocation = invoked(bridge().run([
            "--write_param_ctd",
            path_arg(&path).as_str(),
            "-input_files",
            "x.txt",
            "-positive_number",
            "8",
        ]));

        assert_eq!(invocation.written_path(), Some(path.as_path()));
        let loaded = document::load(&path).unwrap();
        assert_eq!(
            loaded.get("-positive_number"),
            Some(&document::LoadedEntry::Values(vec!["8".into()]))
        );
    }

    #[test]
    fn loaded_document_is_overridden_by_command_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.ctd");
        invoked(bridge().run([
            "--write_param_ctd",
            path_arg(&path).as_str(),
            "-input_files",
            "x.txt",
            "-positive_number",
            "1",
        ]));

        let invocation = invoked(bridge().run(["--input_ctd", path_arg(&path).as_str(), "-positive_number", "2"]));

        assert_eq!(invocation.int("positive_number"), Some(2));
        assert_eq!(invocation.list("input_files"), Some(&[Value::from("x.txt")][..]));
    }

    #[test]
    fn empty_required_list_in_document_does_not_block_command_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool.ctd");
        bridge().run(["--write_tool_ctd", path_arg(&path).as_str()]).unwrap();

        let invocation = invoked(bridge().run(["--input_ctd", path_arg(&path).as_str(), "-input_files", "late.txt"]));

        assert_eq!(invocation.list("input_files"), Some(&[Value::from("late.txt")][..]));
        assert_eq!(invocation.int("positive_number"), Some(5));
    }

    #[test]
    fn unknown_parameters_in_document_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.ctd");
        std::fs::write(
            &path,
            r#"<PARAMETERS><NODE name="testTool"><NODE name="1">
                <ITEM name="retired" value="3" type="int"/>
                <ITEMLIST name="input_files" type="string"><LISTITEM value="f"/></ITEMLIST>
            </NODE></NODE></PARAMETERS>"#,
        )
        .unwrap();

        let invocation = invoked(bridge().run(["--input_ctd", path_arg(&path).as_str()]));

        assert_eq!(invocation.list("input_files"), Some(&[Value::from("f")][..]));
    }

    #[test]
    fn missing_input_document_fails() {
        let dir = TempDir::new().unwrap();
        let error = bridge()
            .run(["--input_ctd", path_arg(&dir.path().join("absent.ctd")).as_str()])
            .unwrap_err();

        assert!(matches!(error, BridgeError::Document(_)));
    }
}

mod logging {
    use super::*;

    fn logged(dir: &TempDir, capture: bool) -> (Invocation, std::path::PathBuf) {
        let path = dir.path().join("log.ctd");
        let mut args = vec![
            "--write_param_ctd".to_string(),
            path_arg(&path),
            "--log_output".to_string(),
            "-input_files".to_string(),
            "a".to_string(),
        ];
        if capture {
            args.push("--log_std_streams".to_string());
        }
        (invoked(bridge().run(args)), path)
    }

    #[test]
    fn manual_log_is_written_on_finalize_only() {
        let dir = TempDir::new().unwrap();
        let (mut invocation, path) = logged(&dir, false);

        assert!(!path.exists());
        assert_eq!(invocation.log_path(), Some(path.as_path()));

        let written = invocation
            .finalize_log(LogOutcome::status(3).with_stdout("out").with_stderr("err"))
            .unwrap();

        assert_eq!(written, Some(path.clone()));
        let log = log_of(&path);
        assert_eq!(log.attribute("executionStatus"), Some("3"));
        assert!(log.attribute("executionTimeStart").unwrap().starts_with("2024-03-01T12:00:00"));
        assert_eq!(log.find("executionMessage").and_then(Element::text), Some("out"));
        assert_eq!(log.find("executionErrors").and_then(Element::text), Some("err"));
    }

    #[test]
    fn finalize_runs_once() {
        let dir = TempDir::new().unwrap();
        let (mut invocation, path) = logged(&dir, false);

        invocation.finalize_log(LogOutcome::status(0)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(invocation.finalize_log(LogOutcome::status(1)).unwrap(), None);
        assert!(invocation.is_finalized());
        assert!(!path.exists());
    }

    #[test]
    fn finalize_without_log_does_nothing() {
        let mut invocation = invoked(bridge().run(["-input_files", "a"]));

        assert_eq!(invocation.finalize_log(LogOutcome::status(0)).unwrap(), None);
    }

    #[test]
    fn captured_streams_fill_missing_text() {
        let dir = TempDir::new().unwrap();
        let (mut invocation, path) = logged(&dir, true);

        write!(invocation.stdout(), "captured out").unwrap();
        write!(invocation.stderr(), "captured err").unwrap();
        invocation.finalize_log(LogOutcome::status(0)).unwrap();

        let log = log_of(&path);
        assert_eq!(log.find("executionMessage").and_then(Element::text), Some("captured out"));
        assert_eq!(log.find("executionErrors").and_then(Element::text), Some("captured err"));
    }

    #[test]
    fn drop_finalizes_captured_run() {
        let dir = TempDir::new().unwrap();
        let (invocation, path) = logged(&dir, true);

        write!(invocation.stdout(), "bye").unwrap();
        drop(invocation);

        let log = log_of(&path);
        assert_eq!(log.attribute("executionStatus"), None);
        assert_eq!(log.find("executionMessage").and_then(Element::text), Some("bye"));
    }

    #[test]
    fn drop_without_capture_leaves_manual_log_alone() {
        let dir = TempDir::new().unwrap();
        let (invocation, path) = logged(&dir, false);

        drop(invocation);

        assert!(!path.exists());
    }

    #[test]
    fn scoped_finalizes_with_success_status() {
        let dir = TempDir::new().unwrap();
        let (mut invocation, path) = logged(&dir, true);

        let status = invocation
            .scoped(|inv| writeln!(inv.stdout(), "n = {:?}", inv.int("positive_number")))
            .unwrap();

        assert_eq!(status, 0);
        let log = log_of(&path);
        assert_eq!(log.attribute("executionStatus"), Some("0"));
        assert_eq!(
            log.find("executionMessage").and_then(Element::text),
            Some("n = Some(5)")
        );
    }

    #[test]
    fn scoped_records_failure() {
        let dir = TempDir::new().unwrap();
        let (mut invocation, path) = logged(&dir, true);

        let status = invocation
            .scoped(|_| Err::<(), _>("input unreadable"))
            .unwrap();

        assert_eq!(status, 1);
        let log = log_of(&path);
        assert_eq!(log.attribute("executionStatus"), Some("1"));
        assert_eq!(
            log.find("executionErrors").and_then(Element::text),
            Some("Error: input unreadable")
        );
    }
}
