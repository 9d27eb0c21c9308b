//! Khata App Library
//!
//! Screen logic for the Khata expense tracker: the PIN gate (setup and lock),
//! login, profile and bank-account bookkeeping. Rendering is left to the host;
//! every flow here takes an injected [`khata_core::KeyValueStore`] and answers
//! with [`notice::Notice`]s and [`app::Navigation`] requests.

pub mod accounts;
pub mod app;
pub mod auth;
pub mod notice;
pub mod profile;

pub use app::{AppConfig, Navigation, Route, Router};
pub use notice::{Notice, NoticeAction, NoticeEffect, NoticeLevel};
