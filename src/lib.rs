//! # Contact Keeper
//!
//! A local-first contact store with interaction history and CSV export.
//!
//! Contacts carry required identity fields, optional nested groupings
//! (professional context, personal journey, preferences, significant dates,
//! relationship notes, ...) and a newest-first list of interactions. The
//! [`store::ContactStore`] owns the collection and snapshots it to durable
//! storage after every mutation; [`export`] flattens it into CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   add/update/delete   ┌──────────────┐   save/load   ┌───────────┐
//! │ CLI (ck) │──────────────────────▶│ ContactStore │──────────────▶│  Storage  │
//! └────┬─────┘                       └──────┬───────┘               │ file/mem  │
//!      │ export                             │                       └───────────┘
//!      ▼                                    ▼
//! ┌──────────────────┐             ┌──────────────┐
//! │ contacts_*.csv   │◀────────────│ CSV exporter │
//! └──────────────────┘             └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ck add --first-name Ann --last-name Lee --email a@x.com --dietary vegan
//! ck list --search lee
//! ck log <id> "Coffee at the offsite" --type meeting --follow-up "Send deck"
//! ck export
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Contact schema and store payloads |
//! | [`storage`] | Durable key-value storage backends |
//! | [`store`] | The contact store |
//! | [`export`] | CSV flattening and export |
//! | [`stats`] | Collection statistics |
//! | [`contact_cmd`] | CLI command handlers |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod contact_cmd;
pub mod export;
pub mod logging;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;

pub use models::{Contact, ContactPatch, NewContact, NewInteraction};
pub use store::ContactStore;
