use std::fmt;

use anyhow::{
  anyhow,
  bail
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub enum Modifier {
  Alt,
  Ctrl,
  Meta,
  Shift
}

impl Modifier {
  fn parse(
    raw: &str
  ) -> Option<Self> {
    match raw
      .to_ascii_lowercase()
      .as_str()
    {
      | "alt" | "option" => {
        Some(Self::Alt)
      }
      | "ctrl" | "control" => {
        Some(Self::Ctrl)
      }
      | "meta" | "cmd" | "super" => {
        Some(Self::Meta)
      }
      | "shift" => Some(Self::Shift),
      | _ => None
    }
  }

  fn label(self) -> &'static str {
    match self {
      | Self::Alt => "Alt",
      | Self::Ctrl => "Ctrl",
      | Self::Meta => "Meta",
      | Self::Shift => "Shift"
    }
  }
}

/// Snapshot of a keyboard event, detached
/// from any browser type.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct KeyPress {
  pub key:   String,
  pub code:  String,
  pub alt:   bool,
  pub ctrl:  bool,
  pub meta:  bool,
  pub shift: bool
}

impl KeyPress {
  pub fn new(
    key: impl Into<String>
  ) -> Self {
    Self {
      key: key.into(),
      ..Self::default()
    }
  }

  pub fn with(
    mut self,
    modifier: Modifier
  ) -> Self {
    match modifier {
      | Modifier::Alt => {
        self.alt = true
      }
      | Modifier::Ctrl => {
        self.ctrl = true
      }
      | Modifier::Meta => {
        self.meta = true
      }
      | Modifier::Shift => {
        self.shift = true
      }
    }
    self
  }

  pub fn with_code(
    mut self,
    code: impl Into<String>
  ) -> Self {
    self.code = code.into();
    self
  }

  pub fn is_escape(&self) -> bool {
    self.key == "Escape"
  }

  fn holds(
    &self,
    modifier: Modifier
  ) -> bool {
    match modifier {
      | Modifier::Alt => self.alt,
      | Modifier::Ctrl => self.ctrl,
      | Modifier::Meta => self.meta,
      | Modifier::Shift => self.shift
    }
  }
}

/// A modifier+key combination such as
/// `Alt+N`.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct KeyChord {
  modifiers: Vec<Modifier>,
  key:       String
}

impl KeyChord {
  pub fn parse(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut modifiers = Vec::new();
    let mut key: Option<String> = None;

    for segment in raw.split('+') {
      let segment = segment.trim();
      if segment.is_empty() {
        bail!(
          "empty segment in key chord \
           '{raw}'"
        );
      }
      if let Some(modifier) =
        Modifier::parse(segment)
      {
        if !modifiers.contains(&modifier)
        {
          modifiers.push(modifier);
        }
        continue;
      }
      if let Some(existing) = &key {
        bail!(
          "key chord '{raw}' names two \
           keys: '{existing}' and \
           '{segment}'"
        );
      }
      key = Some(segment.to_string());
    }

    let key = key.ok_or_else(|| {
      anyhow!(
        "key chord '{raw}' has no key"
      )
    })?;
    modifiers.sort();

    Ok(Self {
      modifiers,
      key
    })
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn modifiers(
    &self
  ) -> &[Modifier] {
    &self.modifiers
  }

  /// Every modifier must be held exactly as
  /// the chord names it. Letters compare
  /// case-sensitively: `N` without Shift
  /// expects the key `n`.
  pub fn matches(
    &self,
    press: &KeyPress
  ) -> bool {
    let modifiers_ok = [
      Modifier::Alt,
      Modifier::Ctrl,
      Modifier::Meta,
      Modifier::Shift
    ]
    .into_iter()
    .all(|modifier| {
      press.holds(modifier)
        == self
          .modifiers
          .contains(&modifier)
    });

    modifiers_ok && self.key_matches(press)
  }

  fn letter(&self) -> Option<char> {
    let mut chars = self.key.chars();
    match (chars.next(), chars.next()) {
      | (Some(letter), None)
        if letter.is_ascii_alphabetic() =>
      {
        Some(letter)
      }
      | _ => None
    }
  }

  fn key_matches(
    &self,
    press: &KeyPress
  ) -> bool {
    let Some(letter) = self.letter() else {
      return press
        .key
        .eq_ignore_ascii_case(&self.key);
    };

    let expected = if self
      .modifiers
      .contains(&Modifier::Shift)
    {
      letter.to_ascii_uppercase()
    } else {
      letter.to_ascii_lowercase()
    };
    if press.key.len() == 1
      && press.key.starts_with(expected)
    {
      return true;
    }

    // Option on macOS composes `key` into a
    // non-ASCII glyph; the physical code is
    // still the letter's.
    !press.key.is_ascii()
      && press.code
        == format!(
          "Key{}",
          letter.to_ascii_uppercase()
        )
  }
}

impl fmt::Display for KeyChord {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    for modifier in &self.modifiers {
      write!(f, "{}+", modifier.label())?;
    }
    f.write_str(&self.key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_modifiers_case_insensitively()
  {
    let chord =
      KeyChord::parse("ctrl+Shift+k")
        .unwrap();
    assert_eq!(chord.key(), "k");
    assert_eq!(
      chord.modifiers(),
      &[Modifier::Ctrl, Modifier::Shift]
    );
    assert_eq!(
      chord.to_string(),
      "Ctrl+Shift+k"
    );
  }

  #[test]
  fn rejects_malformed_chords() {
    assert!(KeyChord::parse("").is_err());
    assert!(
      KeyChord::parse("Alt+").is_err()
    );
    assert!(
      KeyChord::parse("Alt").is_err()
    );
    assert!(
      KeyChord::parse("A+B").is_err()
    );
  }

  #[test]
  fn alt_n_matches_key_or_physical_code()
  {
    let chord =
      KeyChord::parse("Alt+N").unwrap();

    assert!(chord.matches(
      &KeyPress::new("n")
        .with(Modifier::Alt)
    ));
    assert!(chord.matches(
      &KeyPress::new("\u{2dc}")
        .with_code("KeyN")
        .with(Modifier::Alt)
    ));
    assert!(
      !chord.matches(&KeyPress::new("n"))
    );
    assert!(!chord.matches(
      &KeyPress::new("n")
        .with(Modifier::Alt)
        .with(Modifier::Ctrl)
    ));
    assert!(!chord.matches(
      &KeyPress::new("m")
        .with(Modifier::Alt)
    ));
  }

  #[test]
  fn named_keys_do_not_fall_back_to_code()
  {
    let chord =
      KeyChord::parse("Ctrl+Enter")
        .unwrap();
    assert!(chord.matches(
      &KeyPress::new("Enter")
        .with(Modifier::Ctrl)
    ));
    assert!(!chord.matches(
      &KeyPress::new("x")
        .with_code("Enter")
        .with(Modifier::Ctrl)
    ));
  }

  #[test]
  fn escape_detection() {
    assert!(
      KeyPress::new("Escape").is_escape()
    );
    assert!(
      !KeyPress::new("Esc").is_escape()
    );
  }

  #[test]
  fn letter_fallback_needs_a_composed_glyph()
  {
    let chord =
      KeyChord::parse("Alt+N").unwrap();

    // Dvorak puts `b` on the KeyN position.
    assert!(!chord.matches(
      &KeyPress::new("b")
        .with_code("KeyN")
        .with(Modifier::Alt)
    ));
    assert!(!chord.matches(
      &KeyPress::new("N")
        .with_code("KeyN")
        .with(Modifier::Alt)
        .with(Modifier::Shift)
    ));
    assert!(!chord.matches(
      &KeyPress::new("N")
        .with(Modifier::Alt)
    ));
  }

  #[test]
  fn shift_chords_expect_uppercase() {
    let chord =
      KeyChord::parse("Alt+Shift+n")
        .unwrap();
    assert!(chord.matches(
      &KeyPress::new("N")
        .with(Modifier::Alt)
        .with(Modifier::Shift)
    ));
    assert!(!chord.matches(
      &KeyPress::new("n")
        .with(Modifier::Alt)
    ));
  }
}
