use crate::{models::comment::MAX_COMMENT_LENGTH, Error};

pub struct CommentValidator;

impl CommentValidator {
    /// Returns the trimmed content, or the reason it was refused.
    pub fn validate_content(content: &str) -> Result<String, Error> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Comment cannot be empty".to_string(),
            });
        }

        if trimmed.chars().count() > MAX_COMMENT_LENGTH {
            return Err(Error::InvalidInput {
                reason: format!("Comment cannot exceed {MAX_COMMENT_LENGTH} characters"),
            });
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_trimmed() {
        let content = CommentValidator::validate_content("  that drop at 2:14  \n").unwrap();
        assert_eq!(content, "that drop at 2:14");
    }

    #[test]
    fn test_blank_content_is_refused() {
        assert!(matches!(
            CommentValidator::validate_content(""),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            CommentValidator::validate_content(" \t\n "),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let at_limit = "é".repeat(MAX_COMMENT_LENGTH);
        assert!(CommentValidator::validate_content(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(matches!(
            CommentValidator::validate_content(&over_limit),
            Err(Error::InvalidInput { .. })
        ));
    }
}
