//! 类型系统模块：定义档案、文档种类与消息等核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of everything a generation request carries.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ProfileInput`] | The person a document is written for |
//! | [`DocumentKind`] | Which document to generate |
//! | [`Tone`] | Writing register requested by the caller |
//! | [`Industry`] | Target industry, drives template selection |
//! | [`ExperienceLevel`] | Seniority band derived from years of experience |
//! | [`Message`] | Chat message sent to the model provider |
//!
//! ## Example
//!
//! ```rust
//! use docgen_core::types::{ExperienceLevel, ProfileInput};
//!
//! let profile = ProfileInput::new(
//!     "Staff Engineer",
//!     12,
//!     "BSc Computer Science",
//!     vec!["Rust".into(), " rust ".into(), "Kubernetes".into()],
//!     "Built and ran the billing platform for six years",
//! )
//! .validated()
//! .unwrap();
//!
//! assert_eq!(profile.skills, vec!["Rust", "Kubernetes"]);
//! assert_eq!(profile.experience_level(), ExperienceLevel::Executive);
//! ```

pub mod message;
pub mod profile;

pub use message::{Message, MessageRole};
pub use profile::{DocumentKind, ExperienceLevel, Industry, ProfileInput, Tone};
