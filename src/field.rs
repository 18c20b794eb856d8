//! Lazy binding of a single key: default value, validation rules and conversion.

use std::{
    any::{type_name, Any},
    fmt::{self, Debug, Formatter},
};

use regex::Regex;
use tracing::{debug, trace};

use crate::{
    document::NodeRef,
    error::{Error, Result},
    path::LogicalPath,
    traits::FromNode,
};


type Rule<'a, T> = Box<dyn Fn(&Field<'a, T>) -> Result<()> + 'a>;


/// Binding handle for one (possibly absent) node, created by
/// [`Simple::bound`](crate::Simple::bound) or [`Simple::bound_or`](crate::Simple::bound_or).
///
/// Nothing is read from the document until [`Field::get`] consumes the handle:
///
/// 1. an absent node without a default is a [`Error::MissingNode`],
/// 2. every rule runs in registration order, the first failing one wins,
/// 3. an absent node yields the default, anything else is converted to `T`.
///
/// Rules see the default value when the node is absent, so defaults are validated too.
pub struct Field<'a, T> {
    node: NodeRef<'a>,
    path: LogicalPath,
    default: Option<T>,
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T> Field<'a, T> {
    pub fn new(node: NodeRef<'a>, path: LogicalPath, default: Option<T>) -> Self {
        Self {
            node,
            path,
            default,
            rules: Vec::new(),
        }
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    /// Whether the node exists in the document.
    pub fn is_defined(&self) -> bool {
        self.node.is_defined()
    }

    fn missing_node(&self) -> Error {
        Error::missing_node(
            format!("Missing node {}", self.path),
            &self.path,
            self.node.mark(),
        )
    }
}

impl<'a, T: FromNode> Field<'a, T> {
    /// Runs the rules and converts the node (or hands out the default).
    pub fn get(self) -> Result<T> {
        trace!("Binding field {}.", self.path);

        if !self.is_defined() && self.default.is_none() {
            return Err(self.missing_node());
        }

        for rule in &self.rules {
            rule(&self)?;
        }

        if !self.rules.is_empty() {
            trace!(
                "Field {} passed {} validation rule(s).",
                self.path,
                self.rules.len()
            );
        }

        match self.default {
            Some(default) if !self.is_defined() => {
                debug!("Field {} is absent, using its default value.", self.path);
                Ok(default)
            }
            _ => T::from_node(self.node, &self.path),
        }
    }
}

impl<'a, T: FromNode + 'static> Field<'a, T> {
    /// Converts the field to `R`, which need not be the field's own type.
    ///
    /// An absent node resolves to the default, which then has to be an `R`;
    /// otherwise this is an [`Error::InvalidDefaultValue`].
    pub fn convert_to<R: FromNode + Clone + 'static>(&self) -> Result<R> {
        self.inspect(|value: &R| value.clone())
    }

    fn inspect<R, O, F>(&self, inspector: F) -> Result<O>
    where
        R: FromNode + 'static,
        F: FnOnce(&R) -> O,
    {
        if self.is_defined() {
            return R::from_node(self.node, &self.path).map(|value| inspector(&value));
        }

        let Some(default) = &self.default else {
            return Err(self.missing_node());
        };

        (default as &dyn Any)
            .downcast_ref::<R>()
            .map(inspector)
            .ok_or_else(|| {
                Error::invalid_default_value(
                    format!(
                        "Invalid default value type for {}. It has to be '{}'",
                        self.path,
                        type_name::<R>()
                    ),
                    &self.path,
                    self.node.mark(),
                )
            })
    }


    /// Adds a rule that converts the field to `R` and checks it with `predicate`.
    ///
    /// An empty `message` is replaced by one naming the field's path.
    pub fn add_rule<R, P>(mut self, predicate: P, message: impl Into<String>) -> Self
    where
        R: FromNode + 'static,
        P: Fn(&R) -> bool + 'a,
    {
        let message = message.into();

        self.rules.push(Box::new(move |field: &Field<'a, T>| {
            if field.inspect(|value: &R| predicate(value))? {
                return Ok(());
            }

            let message = if message.is_empty() {
                format!("Validation failed for {}", field.path)
            } else {
                message.clone()
            };

            Err(Error::validator_failed(message, &field.path, field.node.mark()))
        }));

        self
    }

    /// Requires the whole text of the field to match `pattern`.
    ///
    /// A pattern that does not compile fails the field with [`Error::InvalidPattern`].
    pub fn add_rule_regex(self, pattern: &str, message: impl Into<String>) -> Self {
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => self.add_rule(move |value: &String| regex.is_match(value), message),
            Err(source) => {
                let pattern = pattern.to_string();

                let mut field = self;
                field.rules.push(Box::new(move |field: &Field<'a, T>| {
                    Err(Error::invalid_pattern(
                        &pattern,
                        source.clone(),
                        &field.path,
                        field.node.mark(),
                    ))
                }));

                field
            }
        }
    }

    /// Requires `minimum <= value <= maximum`.
    pub fn add_rule_range<R>(self, minimum: R, maximum: R, message: impl Into<String>) -> Self
    where
        R: FromNode + PartialOrd + 'static,
    {
        self.add_rule(
            move |value: &R| minimum <= *value && *value <= maximum,
            message,
        )
    }

    pub fn add_rule_minimum<R>(self, minimum: R, message: impl Into<String>) -> Self
    where
        R: FromNode + PartialOrd + 'static,
    {
        self.add_rule(move |value: &R| minimum <= *value, message)
    }

    pub fn add_rule_maximum<R>(self, maximum: R, message: impl Into<String>) -> Self
    where
        R: FromNode + PartialOrd + 'static,
    {
        self.add_rule(move |value: &R| *value <= maximum, message)
    }

    /// Requires the text to have between `minimum` and `maximum` characters (inclusive).
    pub fn add_rule_length(self, minimum: usize, maximum: usize, message: impl Into<String>) -> Self {
        self.add_rule(
            move |value: &String| (minimum..=maximum).contains(&value.chars().count()),
            message,
        )
    }

    pub fn add_rule_length_minimum(self, minimum: usize, message: impl Into<String>) -> Self {
        self.add_rule_length(minimum, usize::MAX, message)
    }

    pub fn add_rule_length_maximum(self, maximum: usize, message: impl Into<String>) -> Self {
        self.add_rule_length(0, maximum, message)
    }
}

impl<'a, T: Debug> Debug for Field<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("mark", &self.node.mark())
            .field("defined", &self.node.is_defined())
            .field("default", &self.default)
            .field("rules", &self.rules.len())
            .finish()
    }
}
