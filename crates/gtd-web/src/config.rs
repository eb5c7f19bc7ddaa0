use gtd_core::BehaviorConfig;
use gtd_core::config::CONFIG_ELEMENT_ID;
use web_sys::Document;

/// Reads the page's embedded override block,
/// falling back to defaults.
pub fn load(
  document: &Document
) -> BehaviorConfig {
  let raw = document
    .get_element_by_id(CONFIG_ELEMENT_ID)
    .and_then(|element| {
      element.text_content()
    });

  if raw.is_none() {
    tracing::debug!(
      "no behavior config block; using \
       defaults"
    );
  }

  BehaviorConfig::from_json_or_default(
    raw.as_deref()
  )
}
