//! Tests for settings parsing.

use super::settings::Settings;
use super::{SettingsError, defaults};
use crate::restriction::RestrictionPolicy;

mod parsing {
    use super::*;

    #[test]
    fn empty_settings_use_defaults() {
        let settings = Settings::parse("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.policy(), RestrictionPolicy::Warn);
        assert_eq!(settings.indent(), defaults::INDENT);
        assert_eq!(settings.tool_descriptor_suffix(), ".ctd");
    }

    #[test]
    fn parse_full_settings() {
        let toml = r#"
            [restrictions]
            policy = "reject"

            [documents]
            indent = 4
            tool_descriptor_suffix = ".xml"
        "#;

        let settings = Settings::parse(toml).unwrap();
        assert_eq!(settings.policy(), RestrictionPolicy::Reject);
        assert_eq!(settings.indent(), 4);
        assert_eq!(settings.tool_descriptor_suffix(), ".xml");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings = Settings::parse("[documents]\nindent = 0\n").unwrap();

        assert_eq!(settings.indent(), 0);
        assert_eq!(settings.policy(), defaults::POLICY);
        assert_eq!(settings.tool_descriptor_suffix(), defaults::TOOL_DESCRIPTOR_SUFFIX);
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_field_is_rejected() {
        let result = Settings::parse("[documents]\nwidth = 3\n");

        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Settings::parse("[restrictions]\npolicy = \"strict\"\n");

        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn oversized_indent_is_rejected() {
        let result = Settings::parse("[documents]\nindent = 40\n");

        assert!(matches!(
            result,
            Err(SettingsError::InvalidIndent { value: 40, max: 16 })
        ));
    }

    #[test]
    fn suffix_with_separator_is_rejected() {
        let result = Settings::parse("[documents]\ntool_descriptor_suffix = \"/x.ctd\"\n");

        assert!(matches!(result, Err(SettingsError::InvalidSuffix(s)) if s == "/x.ctd"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::FileRead { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[restrictions]\npolicy = \"reject\"\n").unwrap();

        assert_eq!(Settings::load(&path).unwrap().policy(), RestrictionPolicy::Reject);
    }
}
