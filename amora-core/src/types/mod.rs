//! Domain types for the Amora protocol.

mod amount;
mod announcement;
mod keys;
mod meta;
mod payment;

pub use amount::{felt_to_u128, TokenAmount};
pub use announcement::Announcement;
pub use keys::{KeyPair, StealthKeys, ViewingKey};
pub use meta::{ChainTag, MetaAddress};
pub use payment::{StealthPayment, WatchOnlyPayment};
