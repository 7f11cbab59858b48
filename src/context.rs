/// What the initializer does when the form lacks one of the target fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Set every field that exists, report the rest.
    #[default]
    Skip,
    /// Stop at the first missing field. Fields already set stay set.
    FailFast,
}

/// Binding options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub missing: MissingFieldPolicy,
}

impl Context {
    pub fn fail_fast() -> Self {
        Self { missing: MissingFieldPolicy::FailFast }
    }
}
