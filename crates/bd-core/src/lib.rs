//! Bundle Deal Finder Core Library
//!
//! This crate holds the browser-independent logic of the Bundle Deal Finder
//! extension: recognising bundle-deal links on AliExpress, pulling product
//! identifiers out of them, and deciding how links are highlighted and
//! where clicks are sent.
//!
//! # Architecture
//!
//! Nothing here touches the DOM or extension APIs. The highlight engine works
//! through the [`highlight::LinkDocument`] trait and settings persistence goes
//! through [`store::SettingsStore`]; the `bd-wasm` crate provides the browser
//! implementations.
//!
//! # Modules
//!
//! - `url`: `decodeURIComponent`-compatible decoding and canonical product URLs
//! - `matcher`: bundle-deal link classification
//! - `extract`: ordered product identifier extraction
//! - `style`: declarative highlight style table
//! - `highlight`: highlight engine over an abstract document
//! - `redirect`: click redirection decisions
//! - `menu`: context menu item
//! - `settings`: settings record, backfill and change notifications
//! - `store`: settings persistence and broadcast
//! - `options`: options page model
//! - `types`: shared type definitions

pub mod types;
pub mod url;
pub mod matcher;
pub mod extract;
pub mod style;
pub mod highlight;
pub mod redirect;
pub mod menu;
pub mod settings;
pub mod store;
pub mod options;

// Re-export commonly used types
pub use extract::{extract_ali_id, product_url_for};
pub use highlight::{Highlighter, LinkDocument, LinkElement};
pub use matcher::is_bundle_deal_url;
pub use menu::menu_action;
pub use redirect::decide_click;
pub use settings::{Settings, SettingsChanges, StoredSettings};
pub use store::{SettingsHub, SettingsStore, StoreError};
pub use types::{ClickAction, HighlightStyle, MenuAction, ScanReport};
pub use url::canonical_product_url;
