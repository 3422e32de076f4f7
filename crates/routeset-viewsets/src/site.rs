//! Composite router presets.
//!
//! An application is a menu-capable composite that answers its bare prefix
//! with an index redirect; a site is the tree root aggregating applications.
//! Both are ordinary definitions with the relevant flags preset, so the full
//! [`ViewsetDefBuilder`] surface stays available and subclassing through
//! [`extends`](ViewsetDefBuilder::extends) keeps the preset unless a nearer
//! definition turns it off.

use crate::builder::{ViewsetDef, ViewsetDefBuilder};

/// Starts an application definition.
///
/// Applications contribute an entry to the enclosing menu and mount an
/// automatic index redirect at their bare prefix.
///
/// # Examples
///
/// ```
/// use routeset_viewsets::application;
///
/// # fn main() -> routeset_viewsets::ConfigResult<()> {
/// let reports = application("ReportsApplication")
///     .app_name("reports")
///     .title("Reports")
///     .icon("chart")
///     .build()?;
/// assert!(reports.is_menu_enabled());
/// assert!(reports.has_index_redirect());
/// # Ok(())
/// # }
/// ```
pub fn application(name: impl Into<String>) -> ViewsetDefBuilder {
	ViewsetDef::builder(name).menu(true).index_redirect(true)
}

/// Starts a site definition.
///
/// Sites are composed, never composed into: they redirect their bare prefix
/// like applications but carry no menu entry of their own.
pub fn site(name: impl Into<String>) -> ViewsetDefBuilder {
	ViewsetDef::builder(name).index_redirect(true)
}
