//! Small assertion helpers used as the validation primitive of the engine

use crate::error::{ErrorKind, OrderError, Result};

/// Fails with the given kind and message unless `condition` holds
pub fn check_that(
    condition: bool,
    kind: ErrorKind,
    message: impl FnOnce() -> String,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(OrderError::new(kind, message()).into())
    }
}

/// Returns the only element of the given iterable
///
/// Fails unless there is exactly one element. The `what` describes the element
/// (e.g. `"borrow"`) in the error message.
pub fn get_single_element<I>(elements: I, what: &str) -> Result<I::Item>
where
    I: IntoIterator,
{
    let mut iter = elements.into_iter();
    let Some(first) = iter.next() else {
        return Err(OrderError::new(
            ErrorKind::Shape,
            format!("expected a single {what}, got none"),
        )
        .into());
    };
    let extra = iter.count();
    check_that(extra == 0, ErrorKind::Shape, || {
        format!("expected a single {what}, got {}", extra + 1)
    })?;
    Ok(first)
}
