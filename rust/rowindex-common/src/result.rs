pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns a validation error from the enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! verify_request {
    ($cond:expr, $message:expr) => {
        if !$cond {
            return Err($crate::result::rejected($message));
        }
    };
}

#[cold]
pub fn rejected(message: impl Into<String>) -> crate::error::Error {
    crate::error::Error::validation(message)
}
