//! Connection abstraction shared by the repository stores.
//!
//! A store is generic over where its statements run: the pooled
//! `DatabaseConnection` for plain reads, or a borrowed
//! `DatabaseTransaction` inside a unit of work.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

/// Something a store can run statements on
pub trait Executor: Send + Sync {
    type Conn: ConnectionTrait + Sync;

    fn conn(&self) -> &Self::Conn;
}

impl Executor for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

impl<'a> Executor for &'a DatabaseTransaction {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &Self::Conn {
        self
    }
}
