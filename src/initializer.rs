use crate::context::{Context, MissingFieldPolicy};
use crate::errors::{ConfigError, Result};
use crate::fields::{FieldDefault, FieldValue, DEFAULT_FIELDS};
use crate::form::Form;
use tracing::{debug, warn};

/// Outcome of a binding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Element writes that landed.
    pub assigned: usize,
    /// Ids with no element in the form (only filled under `Skip`).
    pub missing: Vec<String>,
}

impl BindReport {
    pub fn is_complete(&self) -> bool { self.missing.is_empty() }
}

/// Pre-fill the configuration page with the placeholder table, skipping
/// fields the page does not carry.
pub fn initialize_form<F: Form + ?Sized>(form: &mut F) -> Result<BindReport> {
    initialize_form_with(form, &Context::default())
}

pub fn initialize_form_with<F: Form + ?Sized>(form: &mut F, ctx: &Context) -> Result<BindReport> {
    apply_fields(form, DEFAULT_FIELDS, ctx)
}

/// Bind an explicit id -> value mapping into `form`.
pub fn apply_fields<F: Form + ?Sized>(
    form: &mut F,
    fields: &[FieldDefault],
    ctx: &Context,
) -> Result<BindReport> {
    let mut report = BindReport::default();
    for field in fields {
        let written = apply_one(form, field);
        if written > 0 {
            report.assigned += written;
            continue;
        }
        match ctx.missing {
            MissingFieldPolicy::FailFast => {
                return Err(ConfigError::MissingField(field.id.to_string()));
            }
            MissingFieldPolicy::Skip => {
                warn!(id = field.id, "form has no such field, skipping");
                report.missing.push(field.id.to_string());
            }
        }
    }
    Ok(report)
}

// Returns the number of writes that landed; 0 means the element is absent.
fn apply_one<F: Form + ?Sized>(form: &mut F, field: &FieldDefault) -> usize {
    debug!(id = field.id, value = ?field.value, "set field");
    match &field.value {
        FieldValue::Text(s) => form.set_value(field.id, s) as usize,
        FieldValue::Checked(c) => form.set_checked(field.id, *c) as usize,
        FieldValue::CheckedWithValue(c) => {
            if !form.set_checked(field.id, *c) {
                return 0;
            }
            let value = if *c { "true" } else { "false" };
            1 + form.set_value(field.id, value) as usize
        }
    }
}
