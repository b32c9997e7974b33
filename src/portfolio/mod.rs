pub mod form;
pub mod writer;

pub use form::{NewImage, ProjectDraft, ProjectForm};
