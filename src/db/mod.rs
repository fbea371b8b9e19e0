// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Store credential gate

pub mod connection;
pub mod migrations;

pub use connection::{
    check_store_credentials, create_connection_pool, create_memory_pool, create_test_connection,
    get_connection, ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};
