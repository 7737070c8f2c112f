//! Language codes, alias normalization and the supported-language registry.
//!
//! # Architecture
//!
//! - `code`: the `LanguageCode` type, the `auto` sentinel and [`normalize`]
//! - `registry`: the provider-backed table every alias is validated against
//!
//! # Example
//!
//! ```rust,ignore
//! use guild_translator::languages::CodeRegistry;
//!
//! let registry = CodeRegistry::from_supported(&provider.supported_languages().await?);
//! let target = registry.resolve("zh_tw"); // Some("zh-TW")
//! let auto = registry.resolve("AUTO");    // Some("auto")
//! ```

mod code;
mod registry;

pub use code::{normalize, LanguageCode, AUTO};
pub use registry::{CodeRegistry, LanguageEntry};
