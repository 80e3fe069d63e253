//! Fluent client for docstore.
//!
//! The builder assembles statement descriptors (database, table, index,
//! bounds, limit, record) without performing any I/O; statements run against
//! a [`Conn`], which is either in-process ([`LocalConn`]) or a remote
//! transport implementing the same trait.
//!
//! ```ignore
//! use client::{db, Conn, LocalConn};
//!
//! let conn = LocalConn::new();
//! conn.create_db("app", "memory", &Default::default()).await?;
//!
//! let rev = db("app")
//!     .table("users")
//!     .insert("alice", serde_json::json!({"role": "admin"}))
//!     .by("role", "admin")
//!     .run(&conn)
//!     .await?;
//!
//! let user = db("app").table("users").get("alice").run(&conn).await?;
//! ```

mod builder;
mod conn;

pub use builder::{
    db, DatabaseRef, ExecStmt, MultiStmt, PutStmt, QueryRef, SingleStmt, StatementSpec, TableRef,
    DEFAULT_LIMIT,
};
pub use conn::{Conn, LocalConn};
