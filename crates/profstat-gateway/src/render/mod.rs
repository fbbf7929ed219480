//! SVG rendering.

pub mod badge;

pub use badge::{render, render_diagnostic, BadgeStep, RequestInfo};
