pub mod arrays;
pub mod components;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod form;
pub mod id;
pub mod parser;
pub mod pattern;
pub mod schema;
pub mod value;
pub mod view;

pub use components::{ComponentRef, Components};
pub use config::FormOptions;
pub use descriptor::{Descriptor, DescriptorBuilder, DescriptorOverrides};
pub use error::{FormError, Result};
pub use field::{Attrs, Field, FieldId, FieldKind, InputType, Message, Numeric, Severity};
pub use form::{Form, InputEvent};
pub use schema::JsonSchema;
pub use view::FieldView;

/// Parse a JSON Schema string and an optional JSON model into a form
pub fn parse_form(json_schema: &str, model: Option<&str>) -> Result<Form> {
    parse_form_with_options(json_schema, model, FormOptions::default())
}

/// Parse a JSON Schema string and an optional JSON model with host options
pub fn parse_form_with_options(
    json_schema: &str,
    model: Option<&str>,
    options: FormOptions,
) -> Result<Form> {
    let schema: JsonSchema =
        serde_json::from_str(json_schema).map_err(|e| FormError::ParseError(e.to_string()))?;
    let model: Option<serde_json::Value> = model
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| FormError::ModelError(e.to_string()))?;

    Ok(Form::with_options(schema, model, options))
}
