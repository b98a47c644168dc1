//! In-memory form model.
//!
//! Mirrors the subset of the HTML form API the extractor relies on: attributes, input
//! values and select options.

use std::collections::HashMap;

use super::{Form, FormControl};

/// An `<input>` element.
#[derive(Debug, Clone, Default)]
pub struct InputElement {
    attributes: HashMap<String, String>,
    value: String,
}

impl InputElement {
    /// Creates an input with the given current value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { attributes: HashMap::new(), value: value.into() }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replaces the current value, as typing into the field would.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl FormControl for InputElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn value(&self) -> Option<&str> {
        Some(&self.value)
    }
}

/// An `<option>` inside a [`SelectElement`].
#[derive(Debug, Clone, Default)]
pub struct OptionElement {
    value: String,
    selected: bool,
}

impl OptionElement {
    /// Creates an unselected option.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), selected: false }
    }

    /// Marks the option as selected.
    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// A `<select>` element.
///
/// Its value is the first selected option, or the first option when none is selected.
#[derive(Debug, Clone, Default)]
pub struct SelectElement {
    attributes: HashMap<String, String>,
    options: Vec<OptionElement>,
}

impl SelectElement {
    /// Creates an empty select.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends an option.
    #[must_use]
    pub fn with_option(mut self, option: OptionElement) -> Self {
        self.options.push(option);
        self
    }

    /// Selects the option with the given value and deselects all others.
    ///
    /// Returns false if no option has that value.
    pub fn select(&mut self, value: &str) -> bool {
        let found = self.options.iter().any(|o| o.value == value);
        if found {
            for option in &mut self.options {
                option.selected = option.value == value;
            }
        }
        found
    }
}

impl FormControl for SelectElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn value(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .or_else(|| self.options.first())
            .map(|o| o.value.as_str())
    }
}

/// A form holding inputs and selects.
#[derive(Debug, Clone, Default)]
pub struct HtmlForm {
    inputs: Vec<InputElement>,
    selects: Vec<SelectElement>,
}

impl HtmlForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input control.
    #[must_use]
    pub fn with_input(mut self, input: InputElement) -> Self {
        self.inputs.push(input);
        self
    }

    /// Appends a select control.
    #[must_use]
    pub fn with_select(mut self, select: SelectElement) -> Self {
        self.selects.push(select);
        self
    }
}

impl Form for HtmlForm {
    fn inputs(&self) -> Vec<&dyn FormControl> {
        self.inputs.iter().map(|i| i as &dyn FormControl).collect()
    }

    fn selects(&self) -> Vec<&dyn FormControl> {
        self.selects.iter().map(|s| s as &dyn FormControl).collect()
    }
}
