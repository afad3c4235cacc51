//! Operation dispatch for hashledger.
//!
//! Turns a raw invocation (an operation name and positional byte arguments)
//! into a typed [`Request`], runs it against the record repositories and
//! reports the outcome as a [`Response`].
//!
//! # Architecture
//!
//! ```text
//!   (function, args)
//!          │
//!          ▼
//!   Request::parse ──── UnknownOperation / MissingArgument / Decode
//!          │
//!          ▼
//!   Dispatcher::execute ── one invocation at a time
//!          │
//!          ▼
//!   LedgerStorage<S> ──── HashRepository │ SettingRepository │ ...
//!          │
//!          ▼
//!   Response { 200, payload } │ { 500, message }
//! ```
//!
//! # Payloads
//!
//! | Operation | Success payload |
//! |---|---|
//! | `upload_*`, `update_temp`, `delete_temp` | empty |
//! | `query_hash`, `query_setting` | JSON record, or `null` |
//! | `query_user_hash`, `query_all_setting`, `query_temp` | JSON array, `[]` when empty |
//! | `query_selected_temp` | JSON record, or empty |

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod operation;
pub mod response;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use operation::{Operation, Request};
pub use response::Response;
