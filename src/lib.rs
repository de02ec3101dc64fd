pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod oracle;
pub mod platform;
pub mod queries;
pub mod registry;
pub mod types;

// re-export key types
pub use config::PlatformConfig;
pub use decimal::{Amount, PriceUsd, Rate, UsdAmount};
pub use errors::{LendingError, Result};
pub use events::{Event, EventStore};
pub use interest::{amount_due, DueCalculation, SECONDS_PER_YEAR};
pub use oracle::{FixedPriceOracle, PriceController, PriceOracle, PriceQuote, UnavailableOracle};
pub use platform::LendingPlatform;
pub use queries::{LoanView, PlatformView, QueryService, RequestView, RoleView};
pub use registry::{Loan, LoanRecord, LoanRegistry, LoanRequest};
pub use types::{
    AccountId, LoanId, LoanStatus, Receipt, ReceiptKind, TransferDirection, TransferIntent,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
