//! Form field extraction.
//!
//! A form is any container that can enumerate its `input` and `select` controls. Controls
//! carrying the marker attribute (`data-rebilly` by default) are read into a payment
//! instrument or a billing address, depending on the field name the attribute declares.
//!
//! ```text
//! <input data-rebilly="pan" value="4111 1111 1111 1111">   -> paymentInstrument.pan
//! <input data-rebilly="firstName" value="Ada">             -> billingAddress.firstName
//! <select data-rebilly="country"><option selected>CA ...   -> billingAddress.country
//! ```

pub mod html;

use serde_json::{Map, Value};
use tracing::debug;

pub use html::{HtmlForm, InputElement, OptionElement, SelectElement};

use crate::model::{BILLING_ADDRESS_KEY, FieldMap, PAYMENT_INSTRUMENT_KEY, is_instrument_field};

/// Default marker attribute naming the target field of a control.
pub const DEFAULT_ATTRIBUTE: &str = "data-rebilly";

/// A single form control.
pub trait FormControl {
    /// Returns the value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns the current value of the control.
    ///
    /// For selection controls this is the value of the selected option.
    fn value(&self) -> Option<&str>;
}

/// A DOM-like form that exposes its controls.
pub trait Form: Send + Sync {
    /// Returns the text-like input controls, in document order.
    fn inputs(&self) -> Vec<&dyn FormControl>;

    /// Returns the selection controls, in document order.
    fn selects(&self) -> Vec<&dyn FormControl>;
}

/// Fields extracted from a form.
///
/// Each side is `None` when no field was extracted for it, never an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    /// Fields from the instrument vocabulary.
    pub payment_instrument: Option<FieldMap>,
    /// All other marked fields.
    pub billing_address: Option<FieldMap>,
}

impl ExtractedFields {
    /// Converts into the top-level payload object, with `null` for empty sides.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            PAYMENT_INSTRUMENT_KEY.to_owned(),
            self.payment_instrument.map_or(Value::Null, Value::Object),
        );
        data.insert(
            BILLING_ADDRESS_KEY.to_owned(),
            self.billing_address.map_or(Value::Null, Value::Object),
        );
        data
    }
}

/// Reads marked controls from a [`Form`].
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    attribute: String,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ATTRIBUTE)
    }
}

impl FieldExtractor {
    /// Creates an extractor keyed on the given marker attribute.
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self { attribute: attribute.into() }
    }

    /// Returns the marker attribute name.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Extracts instrument and billing fields from the form.
    ///
    /// Controls without the marker attribute, with an empty attribute value, or with an
    /// empty current value are skipped. When two controls declare the same field, the later
    /// one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebilly_token::form::{FieldExtractor, HtmlForm, InputElement};
    ///
    /// let form = HtmlForm::new()
    ///     .with_input(InputElement::new("4111111111111111").with_attribute("data-rebilly", "pan"))
    ///     .with_input(InputElement::new("Ada").with_attribute("data-rebilly", "firstName"));
    ///
    /// let fields = FieldExtractor::default().extract(&form);
    /// assert_eq!(fields.payment_instrument.unwrap()["pan"], "4111111111111111");
    /// assert_eq!(fields.billing_address.unwrap()["firstName"], "Ada");
    /// ```
    #[must_use]
    pub fn extract(&self, form: &dyn Form) -> ExtractedFields {
        let mut payment_instrument = FieldMap::new();
        let mut billing_address = FieldMap::new();

        for control in form.inputs().into_iter().chain(form.selects()) {
            let Some(name) = control.attribute(&self.attribute).filter(|n| !n.is_empty()) else {
                continue;
            };
            let Some(value) = control.value().filter(|v| !v.is_empty()) else {
                continue;
            };

            let target = if is_instrument_field(name) {
                &mut payment_instrument
            } else {
                &mut billing_address
            };
            target.insert(name.to_owned(), Value::String(value.to_owned()));
        }

        debug!(
            instrument_fields = payment_instrument.len(),
            billing_fields = billing_address.len(),
            "extracted form fields"
        );

        ExtractedFields {
            payment_instrument: (!payment_instrument.is_empty()).then_some(payment_instrument),
            billing_address: (!billing_address.is_empty()).then_some(billing_address),
        }
    }
}
