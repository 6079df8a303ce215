pub(crate) mod runner;
mod types;

pub use runner::run;
pub use types::{ClassSchoolsInput, ClassSchoolsResponse, School};
