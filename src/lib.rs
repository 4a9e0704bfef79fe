//! PRAKTIK-AI admin console: the URL navigation model, the view router and the
//! three-step course-authoring workflow, driven against the PRAKTIK-AI REST API.

pub mod api;
pub mod catalog;
pub mod config;
pub mod drafts;
pub mod editor;
pub mod navigation;
pub mod storage;
pub mod workflow;
