//! Tests for advisory restrictions.

use super::*;

fn positive_range() -> NumericRange {
    NumericRange::new("positive_number", Some(Value::Int(0)), None)
}

fn fastq_formats() -> FileFormats {
    FileFormats::new("input_files", ["fastq", "fastq.gz"])
}

mod numeric_range {
    use super::*;

    #[test]
    fn value_inside_range_passes() {
        let range = NumericRange::new("n", Some(Value::Int(0)), Some(Value::Int(10)));

        assert!(range.check(&Value::Int(0)).is_none());
        assert!(range.check(&Value::Int(10)).is_none());
        assert!(range.check(&Value::Int(5)).is_none());
    }

    #[test]
    fn below_minimum_reports_value_and_bound() {
        let range = NumericRange::new("n", Some(Value::Int(0)), Some(Value::Int(10)));

        let violation = range.check(&Value::Int(-5)).unwrap();

        assert_eq!(
            violation.kind,
            ViolationKind::BelowMinimum {
                value: Value::Int(-5),
                min: Value::Int(0),
            }
        );
        let message = violation.to_string();
        assert!(message.contains('n'));
        assert!(message.contains("-5"));
        assert!(message.contains('0'));
    }

    #[test]
    fn above_maximum_is_reported() {
        let range = NumericRange::new("ratio", None, Some(Value::Float(1.0)));

        let violation = range.check(&Value::Float(1.5)).unwrap();

        assert_eq!(
            violation.to_string(),
            "Parameter ratio value 1.5 is above maximum 1.0"
        );
    }

    #[test]
    fn open_bounds_never_report() {
        let range = NumericRange::new("n", None, None);

        assert!(range.check(&Value::Int(i64::MIN)).is_none());
        assert!(range.check(&Value::Int(i64::MAX)).is_none());
    }

    #[test]
    fn non_numeric_values_are_ignored() {
        assert!(positive_range().check(&Value::from("abc")).is_none());
    }

    #[test]
    fn ctd_string_leaves_open_bounds_empty() {
        assert_eq!(positive_range().ctd_string(), "0:");
        assert_eq!(
            NumericRange::new("x", None, Some(Value::Float(2.5))).ctd_string(),
            ":2.5"
        );
        assert_eq!(
            NumericRange::new("x", Some(Value::Int(1)), Some(Value::Int(9))).ctd_string(),
            "1:9"
        );
    }
}

mod file_formats {
    use super::*;

    #[test]
    fn single_extension_matches() {
        assert!(fastq_formats().check("reads.fastq").is_none());
    }

    #[test]
    fn multi_part_extension_matches() {
        assert!(fastq_formats().check("reads.fastq.gz").is_none());
    }

    #[test]
    fn unknown_extension_is_reported() {
        let violation = fastq_formats().check("reads.bam").unwrap();

        assert_eq!(
            violation.to_string(),
            "Parameter input_files's file extension not in allowed list. \
             Allowed: fastq/fastq.gz. Actual: reads.bam"
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(fastq_formats().check("reads.FASTQ").is_some());
    }

    #[test]
    fn extension_must_follow_a_dot() {
        assert!(fastq_formats().check("readsfastq").is_some());
    }

    #[test]
    fn ctd_string_is_glob_prefixed() {
        assert_eq!(fastq_formats().ctd_string(), "*.fastq,*.fastq.gz");
    }
}

mod restriction {
    use super::*;

    #[test]
    fn formats_only_check_text() {
        let restriction = Restriction::Formats(fastq_formats());

        assert!(restriction.check(&Value::Int(3)).is_none());
        assert!(restriction.check(&Value::from("x.txt")).is_some());
    }

    #[test]
    fn ctd_attribute_names() {
        assert_eq!(
            Restriction::Range(positive_range()).ctd_attribute(),
            ("restrictions", "0:".to_string())
        );
        assert_eq!(
            Restriction::Formats(fastq_formats()).ctd_attribute(),
            ("supported_formats", "*.fastq,*.fastq.gz".to_string())
        );
    }
}

mod coercion {
    use super::*;

    fn ranged(policy: RestrictionPolicy) -> Coercion {
        Coercion::new(
            "positive_number".to_string(),
            ParamType::Int,
            None,
            Some(Restriction::Range(NumericRange::new(
                "positive_number",
                Some(Value::Int(0)),
                Some(Value::Int(10)),
            ))),
            policy,
        )
    }

    #[test]
    fn warn_policy_accepts_out_of_range_value_unchanged() {
        assert_eq!(ranged(RestrictionPolicy::Warn).parse("-5"), Ok(Value::Int(-5)));
    }

    #[test]
    fn reject_policy_fails_out_of_range_value() {
        let error = ranged(RestrictionPolicy::Reject).parse("-5").unwrap_err();

        assert!(error.contains("below minimum 0"));
    }

    #[test]
    fn wrong_type_fails_regardless_of_policy() {
        assert!(ranged(RestrictionPolicy::Warn).parse("five").is_err());
    }

    #[test]
    fn choices_are_enforced() {
        let coercion = Coercion::new(
            "this_or_that".to_string(),
            ParamType::Str,
            Some(vec![Value::from("this"), Value::from("that")]),
            None,
            RestrictionPolicy::Warn,
        );

        assert_eq!(coercion.parse("that"), Ok(Value::from("that")));
        let error = coercion.parse("other").unwrap_err();
        assert!(error.contains("this, that"));
    }

    #[test]
    fn policy_deserializes_from_lowercase() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            policy: RestrictionPolicy,
        }

        let wrapper: Wrapper = toml::from_str(r#"policy = "reject""#).unwrap();
        assert_eq!(wrapper.policy, RestrictionPolicy::Reject);
        assert_eq!(RestrictionPolicy::default(), RestrictionPolicy::Warn);
    }
}
