mod consultation;
mod project;
mod user;

pub use consultation::Consultation;
pub use project::{Project, ProjectImage, ProjectStatus, ProjectWithImages};
pub use user::User;
