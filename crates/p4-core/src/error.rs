use thiserror::Error;

/// Core error types for the P4 tooling.
///
/// Classification and indexing never fail; these errors cover the
/// surrounding data that the core loads, such as the instruction and register
/// documentation tables.
///
/// # Examples
///
/// ```
/// use p4_core::error::{P4Error, Result};
///
/// fn check_row(fields: &[&str]) -> Result<()> {
///     if fields.len() < 3 {
///         return Err(P4Error::Catalog {
///             source_name: "registers.csv".into(),
///             line: 1,
///             reason: "expected 3 fields".into(),
///         });
///     }
///     Ok(())
/// }
///
/// assert!(check_row(&["R1"]).is_err());
/// ```
#[derive(Error, Debug)]
pub enum P4Error {
    #[error("invalid documentation row in {source_name} at line {line}: {reason}")]
    Catalog {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("unknown assignment operator: {0}")]
    UnknownOperator(String),
}

/// Convenience type alias for `Result<T, P4Error>`.
pub type Result<T> = std::result::Result<T, P4Error>;
