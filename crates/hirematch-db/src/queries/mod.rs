//! Query methods on [`Database`](crate::Database), grouped by the part of the system
//! that owns the tables.

mod ledger;
mod matching;
mod profiles;
mod users;
