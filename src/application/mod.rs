pub mod app_error;
pub mod ref_code;
pub mod use_cases;
pub mod validators;
