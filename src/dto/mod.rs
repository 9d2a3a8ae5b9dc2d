pub mod applicant_dto;
pub mod auth_dto;
