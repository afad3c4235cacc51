//! # hashledger types
//!
//! Records stored by the hashledger repositories.
//!
//! All records share one wire convention: a JSON object with named, optional
//! string fields. A missing field, an explicit `null` and an empty string all
//! decode to `""`, and empty strings are left out when encoding. Unknown fields
//! are ignored.

#![deny(unsafe_code)]

pub mod hash;
pub mod setting;
pub mod template;

mod nullable;

pub use hash::HashRecord;
pub use setting::SettingRecord;
pub use template::TemplateRecord;
