//! Build configuration: option set -> validated -> defaulted -> plan

pub mod build;
pub mod defaults;
pub mod kinds;
pub mod options;
pub mod validate;

pub use build::{BuildPlan, Distro, InertOptions, Selinux};
pub use defaults::{apply_defaults, DefaultedOptions};
pub use options::OptionSet;
pub use validate::{validate, ValidatedOptions, ValidationError};

/// Run the whole pipeline. No partial plan is returned on failure.
pub fn resolve(options: &OptionSet) -> Result<BuildPlan, ValidationError> {
    let validated = validate(options)?;
    Ok(BuildPlan::build(apply_defaults(validated)))
}
