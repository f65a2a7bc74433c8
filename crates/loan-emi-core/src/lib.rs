pub mod error;
pub mod loan;
pub mod time_value;
pub mod types;

pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan-emi operations
pub type LoanEmiResult<T> = Result<T, LoanError>;
