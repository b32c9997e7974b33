pub mod consultations;
pub mod project_images;
pub mod projects;
pub mod users;
