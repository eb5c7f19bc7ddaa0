use anyhow::{
  Context,
  bail
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  warn
};

use crate::capture::{
  CaptureSettings,
  DEFAULT_FOCUS_DELAY_MS
};
use crate::drawer::{
  DEFAULT_BREAKPOINT,
  Drawer
};
use crate::keys::KeyChord;
use crate::nav::{
  DEFAULT_EXACT_PATHS,
  NavMatcher
};

/// Element id of the optional JSON block a
/// page can embed to override defaults.
pub const CONFIG_ELEMENT_ID: &str =
  "gtd-behavior-config";

/// Identifiers, selectors and tunables the
/// page behaviors depend on. Every field has
/// a default matching the stock layout.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct BehaviorConfig {
  pub modal_id:              String,
  pub form_id:               String,
  pub result_id:             String,
  pub submit_id:             String,
  pub title_field:           String,
  pub capture_hotkey:        String,
  pub submit_hotkey:         String,
  pub focus_delay_ms:        u32,
  pub reset_only_on_success: bool,
  pub swap_event:            String,

  pub sidebar_selector:      String,
  pub header_selector:       String,
  pub toggle_id:             String,
  pub toggle_class:          String,
  pub drawer_class:          String,
  pub open_class:            String,
  pub overlay_class:         String,
  pub drawer_breakpoint:     f64,

  pub menu_link_selector:    String,
  pub active_class:          String,
  pub exact_match_paths:     Vec<String>,
  pub rehighlight_on_swap:   bool
}

impl Default for BehaviorConfig {
  fn default() -> Self {
    Self {
      modal_id:              "quick-capture-modal"
        .to_string(),
      form_id:               "quick-capture-form"
        .to_string(),
      result_id:             "quick-capture-result"
        .to_string(),
      submit_id:             "quick-capture-submit"
        .to_string(),
      title_field:           "title".to_string(),
      capture_hotkey:        "Alt+N".to_string(),
      submit_hotkey:         "Ctrl+Enter"
        .to_string(),
      focus_delay_ms:        DEFAULT_FOCUS_DELAY_MS,
      reset_only_on_success: false,
      swap_event:            "htmx:afterRequest"
        .to_string(),

      sidebar_selector:      "aside".to_string(),
      header_selector:       "header .flex"
        .to_string(),
      toggle_id:             "sidebar-toggle"
        .to_string(),
      toggle_class:          "btn btn-ghost \
                              btn-circle \
                              lg:hidden"
        .to_string(),
      drawer_class:          "sidebar".to_string(),
      open_class:            "open".to_string(),
      overlay_class:         "sidebar-overlay"
        .to_string(),
      drawer_breakpoint:     DEFAULT_BREAKPOINT,

      menu_link_selector:    "aside .menu a"
        .to_string(),
      active_class:          "active".to_string(),
      exact_match_paths:     DEFAULT_EXACT_PATHS
        .iter()
        .map(|p| p.to_string())
        .collect(),
      rehighlight_on_swap:   false
    }
  }
}

impl BehaviorConfig {
  /// Parses and validates an override
  /// block. Absent fields keep defaults.
  pub fn from_json(
    raw: &str
  ) -> anyhow::Result<Self> {
    let cfg: Self = serde_json::from_str(raw)
      .context(
        "failed to parse behavior config"
      )?;
    cfg.validate()?;
    debug!(?cfg, "loaded behavior config");
    Ok(cfg)
  }

  /// Like [`Self::from_json`], but falls
  /// back to defaults on any error.
  pub fn from_json_or_default(
    raw: Option<&str>
  ) -> Self {
    let Some(raw) = raw else {
      return Self::default();
    };
    match Self::from_json(raw) {
      | Ok(cfg) => cfg,
      | Err(error) => {
        warn!(
          error = %format!("{error:#}"),
          "invalid behavior config; using \
           defaults"
        );
        Self::default()
      }
    }
  }

  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    self.open_chord()?;
    self.submit_chord()?;
    if self.drawer_breakpoint <= 0.0 {
      bail!(
        "drawer_breakpoint must be \
         positive, got {}",
        self.drawer_breakpoint
      );
    }
    Ok(())
  }

  pub fn open_chord(
    &self
  ) -> anyhow::Result<KeyChord> {
    KeyChord::parse(&self.capture_hotkey)
      .context("invalid capture_hotkey")
  }

  pub fn submit_chord(
    &self
  ) -> anyhow::Result<KeyChord> {
    KeyChord::parse(&self.submit_hotkey)
      .context("invalid submit_hotkey")
  }

  pub fn capture_settings(
    &self
  ) -> anyhow::Result<CaptureSettings> {
    Ok(CaptureSettings {
      result_id:             self
        .result_id
        .clone(),
      focus_delay_ms:        self
        .focus_delay_ms,
      reset_only_on_success: self
        .reset_only_on_success,
      open_chord:            self
        .open_chord()?,
      submit_chord:          self
        .submit_chord()?
    })
  }

  pub fn drawer(&self) -> Drawer {
    Drawer::new(self.drawer_breakpoint)
  }

  pub fn nav_matcher(&self) -> NavMatcher {
    NavMatcher::new(
      self.exact_match_paths.iter().cloned()
    )
  }

  /// Selector for the title input inside
  /// the capture form.
  pub fn title_selector(&self) -> String {
    format!(
      "#{} input[name=\"{}\"]",
      self.form_id, self.title_field
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_stock_layout() {
    let cfg = BehaviorConfig::default();
    assert_eq!(cfg.focus_delay_ms, 100);
    assert_eq!(cfg.drawer_breakpoint, 768.0);
    assert_eq!(
      cfg.exact_match_paths,
      vec!["/", "/tasks"]
    );
    assert_eq!(
      cfg.title_selector(),
      "#quick-capture-form \
       input[name=\"title\"]"
    );
    assert_eq!(
      cfg.toggle_class,
      "btn btn-ghost btn-circle lg:hidden"
    );
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn partial_json_keeps_defaults() {
    let cfg = BehaviorConfig::from_json(
      r#"{"capture_hotkey":"Ctrl+K","rehighlight_on_swap":true}"#
    )
    .unwrap();
    assert_eq!(cfg.capture_hotkey, "Ctrl+K");
    assert!(cfg.rehighlight_on_swap);
    assert_eq!(
      cfg.modal_id,
      "quick-capture-modal"
    );
  }

  #[test]
  fn invalid_overrides_are_rejected() {
    assert!(
      BehaviorConfig::from_json(
        r#"{"capture_hotkey":"Alt+"}"#
      )
      .is_err()
    );
    assert!(
      BehaviorConfig::from_json(
        r#"{"drawer_breakpoint":0}"#
      )
      .is_err()
    );
    assert!(
      BehaviorConfig::from_json("not json")
        .is_err()
    );
  }

  #[test]
  fn fallback_on_error() {
    assert_eq!(
      BehaviorConfig::from_json_or_default(
        Some("{")
      ),
      BehaviorConfig::default()
    );
    assert_eq!(
      BehaviorConfig::from_json_or_default(
        None
      ),
      BehaviorConfig::default()
    );
  }
}
