//! Default values for settings.

use crate::restriction::RestrictionPolicy;

/// Default handling of restriction violations.
pub const POLICY: RestrictionPolicy = RestrictionPolicy::Warn;

/// Default indentation of written documents, in spaces.
pub const INDENT: usize = 2;

/// Largest accepted indentation.
pub const MAX_INDENT: usize = 16;

/// Suffix appended to the tool name when `--write_tool_ctd` has no filename.
pub const TOOL_DESCRIPTOR_SUFFIX: &str = ".ctd";

/// Environment variable naming a settings file.
pub const SETTINGS_ENV: &str = "CTDOPTS_SETTINGS";
