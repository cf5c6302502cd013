//! The ledger's value types.

pub mod amount;
pub mod currency;
pub mod seed;
pub mod uint;

pub use amount::{Amount, AmountError, AmountValue};
pub use currency::Currency;
pub use seed::Seed;
pub use uint::{AccountId, Hash128, Hash160, Hash256};
