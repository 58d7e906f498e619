use thiserror::Error;

/// Returned by checked access on an [`Optional`](crate::optional::Optional) that holds no value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("Bad optional access")]
pub struct BadOptionalAccess;

#[cfg(test)]
pub mod tests {
    use super::BadOptionalAccess;
    use std::error::Error;
    type TestReturn = Result<(), Box<dyn Error>>;

    #[test]
    pub fn error_message() -> TestReturn {
        assert_eq!(BadOptionalAccess.to_string(), "Bad optional access", "Message doesn't match");
        Ok(())
    }

    #[test]
    pub fn error_boxes_as_std_error() -> TestReturn {
        let boxed: Box<dyn Error> = Box::new(BadOptionalAccess);
        assert!(boxed.source().is_none(), "BadOptionalAccess has no underlying cause");
        assert!(boxed.downcast_ref::<BadOptionalAccess>().is_some(), "Should downcast back to BadOptionalAccess");
        Ok(())
    }
}
