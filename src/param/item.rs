//! Leaf parameters.

use crate::bridge::{ArgDeclaration, ArgSink, Arity};
use crate::document::{Element, Emission, tag};
use crate::restriction::{Coercion, FileFormats, NumericRange, Restriction, RestrictionPolicy};
use crate::table::FlatTable;

use super::lineage::Lineage;
use super::{DeclarationError, ParamType, ParamValue, Value};

/// Declaration of a leaf parameter, consumed by [`ArgumentGroup::add`].
///
/// [`ArgumentGroup::add`]: super::ArgumentGroup::add
///
/// # Examples
///
/// ```
/// use ctdopts::{ItemSpec, ParamType};
///
/// let spec = ItemSpec::new(ParamType::Int)
///     .default(5)
///     .min(0)
///     .description("A positive integer parameter");
/// # let _ = spec;
/// ```
#[derive(Debug, Clone)]
pub struct ItemSpec {
    param_type: ParamType,
    is_list: bool,
    required: bool,
    default: Option<ParamValue>,
    choices: Option<Vec<Value>>,
    min: Option<Value>,
    max: Option<Value>,
    formats: Option<Vec<String>>,
    tags: Vec<String>,
    description: String,
}

impl ItemSpec {
    /// Starts a declaration of the given type.
    #[must_use]
    pub const fn new(param_type: ParamType) -> Self {
        Self {
            param_type,
            is_list: false,
            required: false,
            default: None,
            choices: None,
            min: None,
            max: None,
            formats: None,
            tags: Vec::new(),
            description: String::new(),
        }
    }

    /// Accepts one or more values.
    #[must_use]
    pub const fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Must be supplied on every invocation; required parameters have no default.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default of a scalar parameter.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ParamValue::Scalar(value.into()));
        self
    }

    /// Sets the default of a list parameter.
    #[must_use]
    pub fn default_list<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.default = Some(ParamValue::List(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Restricts values to an enumerated set.
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Sets an inclusive numeric range.
    #[must_use]
    pub fn range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.min(min).max(max)
    }

    /// Sets the lower bound of the numeric range.
    #[must_use]
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Sets the upper bound of the numeric range.
    #[must_use]
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Restricts file names to the given extensions (without leading dot).
    #[must_use]
    pub fn file_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches free-form labels.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A declared leaf parameter.
///
/// The default is fixed at declaration. The call value is recorded once the
/// command line has been parsed.
#[derive(Debug, Clone)]
pub struct ArgumentItem {
    lineage: Lineage,
    param_type: ParamType,
    is_list: bool,
    required: bool,
    default: Option<ParamValue>,
    choices: Option<Vec<Value>>,
    restriction: Option<Restriction>,
    tags: Vec<String>,
    description: String,
    call_value: Option<ParamValue>,
}

impl ArgumentItem {
    pub(crate) fn new(lineage: Lineage, spec: ItemSpec) -> Result<Self, DeclarationError> {
        let name = lineage.flag_name();
        let ItemSpec {
            param_type,
            is_list,
            mut required,
            mut default,
            choices,
            min,
            max,
            formats,
            tags,
            description,
        } = spec;

        if param_type == ParamType::Bool {
            if is_list {
                return Err(DeclarationError::BooleanList { name });
            }
            if required {
                return Err(DeclarationError::BooleanRequired { name });
            }
            if default.as_ref().is_some_and(|d| *d != ParamValue::Scalar(Value::Bool(false))) {
                tracing::debug!(parameter = %name, "Boolean parameters always default to false");
            }
            required = false;
            default = Some(ParamValue::Scalar(Value::Bool(false)));
        }

        match (required, &default) {
            (true, Some(_)) => return Err(DeclarationError::RequiredWithDefault { name }),
            (false, None) => return Err(DeclarationError::OptionalWithoutDefault { name }),
            _ => {}
        }

        let default = default
            .map(|d| cast_default(&name, d, param_type, is_list))
            .transpose()?;

        let choices = choices
            .map(|choices| {
                cast_all(&choices, param_type).map_err(|reason| DeclarationError::InvalidChoice {
                    name: name.clone(),
                    reason,
                })
            })
            .transpose()?;

        let restriction = build_restriction(&name, param_type, min, max, formats)?;

        Ok(Self {
            lineage,
            param_type,
            is_list,
            required,
            default,
            choices,
            restriction,
            tags,
            description,
            call_value: None,
        })
    }

    /// Returns the parameter's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.lineage.name().unwrap_or_default()
    }

    /// Returns the path from the root to this parameter.
    #[must_use]
    pub const fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// Returns `true` for list parameters.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.is_list
    }

    /// Returns `true` for required parameters.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared default (absent for required parameters).
    #[must_use]
    pub const fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// Returns the enumerated choices.
    #[must_use]
    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    /// Returns the restriction.
    #[must_use]
    pub const fn restriction(&self) -> Option<&Restriction> {
        self.restriction.as_ref()
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the help text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the value this run was invoked with, if one was parsed.
    #[must_use]
    pub const fn call_value(&self) -> Option<&ParamValue> {
        self.call_value.as_ref()
    }

    /// Returns the call value, falling back to the default.
    #[must_use]
    pub fn value(&self) -> Option<&ParamValue> {
        self.call_value.as_ref().or(self.default.as_ref())
    }

    /// Registers this parameter with the command-line parser.
    pub fn declare(&self, sink: &mut dyn ArgSink, heading: Option<&str>, policy: RestrictionPolicy) {
        let flag = self.lineage.flag_name();
        let arity = match (self.param_type, self.is_list) {
            (ParamType::Bool, _) => Arity::Flag,
            (_, true) => Arity::List,
            (_, false) => Arity::Single,
        };

        sink.add_argument(ArgDeclaration {
            coercion: Coercion::new(
                flag.clone(),
                self.param_type,
                self.choices.clone(),
                self.restriction.clone(),
                policy,
            ),
            flag,
            heading: heading.map(str::to_string),
            help: self.help_text(),
            value_name: self.name().to_uppercase(),
            arity,
            required: self.required,
        });
    }

    /// Renders this parameter as an `ITEM` or `ITEMLIST` node.
    #[must_use]
    pub fn serialize(&self, emission: Emission) -> Element {
        let value = match emission {
            Emission::ToolDescriptor => self.default.as_ref(),
            Emission::ParameterValues => self.value(),
        };

        let mut element = Element::new(if self.is_list { tag::ITEMLIST } else { tag::ITEM })
            .with_attr("name", self.name());
        if !self.is_list {
            let text = value.map(ToString::to_string).unwrap_or_default();
            element.set_attr("value", text);
        }
        element.set_attr("type", self.param_type.ctd_name());
        element.set_attr("description", &self.description);
        element.set_attr("tags", self.tags.join(","));

        if let Some(choices) = &self.choices {
            let joined: Vec<String> = choices.iter().map(ToString::to_string).collect();
            element.set_attr("restrictions", joined.join(","));
        } else if let Some(restriction) = &self.restriction {
            let (attribute, text) = restriction.ctd_attribute();
            element.set_attr(attribute, text);
        }

        if self.is_list {
            for item in value.map(ParamValue::values).unwrap_or_default() {
                element.push(Element::new(tag::LISTITEM).with_attr("value", item.to_string()));
            }
        }
        element
    }

    /// Records the parsed value for this parameter, if the table has one.
    pub fn store(&mut self, values: &FlatTable<ParamValue>) {
        if let Some(value) = values.get(&self.lineage.flag_name()) {
            self.call_value = Some(value.clone());
        }
    }

    fn help_text(&self) -> String {
        let mut help = self.description.clone();
        if let Some(choices) = &self.choices {
            let joined: Vec<String> = choices.iter().map(ToString::to_string).collect();
            help.push_str(&format!(" [possible values: {}]", joined.join(", ")));
        }
        if self.param_type != ParamType::Bool {
            if let Some(default) = &self.default {
                let joined: Vec<String> = default.values().iter().map(ToString::to_string).collect();
                help.push_str(&format!(" [default: {}]", joined.join(" ")));
            }
        }
        help.trim_start().to_string()
    }
}

fn cast_all(values: &[Value], param_type: ParamType) -> Result<Vec<Value>, String> {
    values.iter().map(|v| v.cast_to(param_type)).collect()
}

fn cast_default(
    name: &str,
    default: ParamValue,
    param_type: ParamType,
    is_list: bool,
) -> Result<ParamValue, DeclarationError> {
    let invalid = |reason| DeclarationError::InvalidDefault {
        name: name.to_string(),
        reason,
    };
    match (default, is_list) {
        (ParamValue::List(values), true) => {
            cast_all(&values, param_type).map(ParamValue::List).map_err(invalid)
        }
        (ParamValue::Scalar(value), false) => {
            value.cast_to(param_type).map(ParamValue::Scalar).map_err(invalid)
        }
        (_, is_list) => Err(DeclarationError::DefaultShape {
            name: name.to_string(),
            expected: if is_list { "a list" } else { "a single value" },
        }),
    }
}

fn build_restriction(
    name: &str,
    param_type: ParamType,
    min: Option<Value>,
    max: Option<Value>,
    formats: Option<Vec<String>>,
) -> Result<Option<Restriction>, DeclarationError> {
    let has_range = min.is_some() || max.is_some();
    match (has_range, formats) {
        (true, Some(_)) => Err(DeclarationError::ConflictingRestrictions {
            name: name.to_string(),
        }),
        (true, None) => {
            if !param_type.is_numeric() {
                return Err(DeclarationError::RangeOnNonNumeric {
                    name: name.to_string(),
                    param_type,
                });
            }
            let cast = |bound: Option<Value>| {
                bound
                    .map(|b| b.cast_to(param_type))
                    .transpose()
                    .map_err(|reason| DeclarationError::InvalidRange {
                        name: name.to_string(),
                        reason,
                    })
            };
            Ok(Some(Restriction::Range(NumericRange::new(
                name,
                cast(min)?,
                cast(max)?,
            ))))
        }
        (false, Some(formats)) => {
            if param_type != ParamType::Str {
                return Err(DeclarationError::FormatsOnNonString {
                    name: name.to_string(),
                    param_type,
                });
            }
            Ok(Some(Restriction::Formats(FileFormats::new(name, formats))))
        }
        (false, None) => Ok(None),
    }
}
