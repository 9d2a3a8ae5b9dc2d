pub mod admin_user;
pub mod applicant;
pub mod reference;
