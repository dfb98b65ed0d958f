pub mod comment_validator;
