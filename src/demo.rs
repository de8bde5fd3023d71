//! The demo tool: a dummy program showing the parameter surfaces.

use std::io::{self, Write};

use ctdopts::param::DeclarationError;
use ctdopts::{Invocation, ItemSpec, ParamType, ToolDescriptor, ToolInfo};

/// Declares `testTool` and its parameters.
pub fn declare_tool() -> Result<ToolDescriptor, DeclarationError> {
    let mut tool = ToolDescriptor::new(
        ToolInfo::new("testTool", "0.0.2")
            .description("This is a dummy test tool presenting CTDopts usage")
            .manual("manual")
            .docurl("http://dummy.url/docurl.html")
            .category("testing"),
    );
    let root = tool.root_mut();

    root.add(
        "positive_number",
        ItemSpec::new(ParamType::Int)
            .min(0)
            .default(5)
            .description("A positive integer parameter"),
    )?;
    root.add(
        "boolean_flag",
        ItemSpec::new(ParamType::Bool).description(
            "A flag parameter. If -boolean_flag provided in command line: true, if not: false",
        ),
    )?;
    root.add(
        "input_files",
        ItemSpec::new(ParamType::Str)
            .list()
            .required()
            .file_formats(["fastq", "fastq.gz"])
            .tags(["input file", "required"])
            .description("A list of filenames you want to feed this dummy program with"),
    )?;
    root.add(
        "this_or_that",
        ItemSpec::new(ParamType::Str)
            .choices(["this", "that"])
            .default("this")
            .tags(["advanced"])
            .description("A controlled vocabulary parameter. Allowed values: `this` or `that`"),
    )?;

    let subparams = root.add_group("subparams", "Further minor settings of some algorithm")?;
    subparams.add(
        "param_1",
        ItemSpec::new(ParamType::Float)
            .default(5.5)
            .tags(["advanced"])
            .description("Some minor floating point setting"),
    )?;
    subparams.add(
        "param_2",
        ItemSpec::new(ParamType::Float)
            .list()
            .default_list([0.0, 2.5, 5.0])
            .tags(["advanced"])
            .description("A list of floating point settings for, say, multiple runs of analysis"),
    )?;
    subparams
        .add_group("subsubsetting", "A group of sub-subsettings")?
        .add(
            "param_3",
            ItemSpec::new(ParamType::Int)
                .default(2)
                .tags(["advanced"])
                .description("A subsetting's subsetting"),
        )?;

    Ok(tool)
}

/// Prints the resolved parameters, the way a real tool would start working.
pub fn report(invocation: &Invocation) -> io::Result<()> {
    let mut out = invocation.stdout();
    let join = |name: &str, separator: &str| {
        invocation
            .list(name)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    };

    writeln!(out, "Parameters resolved:")?;
    for item in invocation.tool().root().items() {
        let value = item.value().map(ToString::to_string).unwrap_or_default();
        writeln!(out, "  {} = {value}", item.lineage())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Positive number: {}",
        invocation.int("positive_number").unwrap_or_default()
    )?;
    writeln!(
        out,
        "This or that: {}",
        invocation.string("this_or_that").unwrap_or_default()
    )?;
    writeln!(
        out,
        "Subparameter 1: {}",
        invocation.float("subparams:param_1").unwrap_or_default()
    )?;
    writeln!(out, "Input files: {}", join("input_files", ", "))?;
    writeln!(out, "Boolean flag: {}", invocation.flag("boolean_flag"))?;
    writeln!(out)?;
    writeln!(out, "Doing stuff...")?;
    writeln!(out, "Finished.")?;
    out.flush()
}
