//! # Options
//!
//! [`Options`] is always fully populated. Updates travel as an
//! [`OptionsPatch`], where every field is a [`Field`]:
//!
//! - `Field::Keep` leaves the current value alone,
//! - `Field::Reset` restores the default,
//! - `Field::Set(v)` replaces it (the cursor glyph group merges per glyph).
//!
//! ```rust
//! use typewrite_core::{ms, Field, Options, OptionsPatch};
//!
//! let current = Options::default().merge(&OptionsPatch::new().typing_delay(ms(5)));
//! let next = current.merge(&OptionsPatch::new().show_cursor(false));
//! assert_eq!(next.typing_delay, ms(5));
//! assert!(!next.show_cursor);
//!
//! let reset = next.merge(&OptionsPatch { typing_delay: Field::Reset, ..OptionsPatch::new() });
//! assert_eq!(reset.typing_delay, Options::default().typing_delay);
//! ```
//!
//! Patches can also come from JSON, where a missing key keeps, `null` resets
//! and a value sets:
//!
//! ```rust
//! use typewrite_core::OptionsPatch;
//!
//! let patch = OptionsPatch::from_json(r#"{ "typingDelay": 20, "cursor": { "blinking": "_" } }"#).unwrap();
//! assert!(OptionsPatch::from_json("[1, 2]").is_err());
//! assert!(OptionsPatch::from_json(r#"{ "cursor": ["_"] }"#).is_err());
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::ms;

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("malformed options: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Arrays would otherwise fill fields by position.
    #[error("`{0}` must be a JSON object")]
    NotAnObject(&'static str),
}

/// Parse `json`, requiring the top level and a non-null `cursor` to be objects.
fn parse_object(json: &str) -> Result<serde_json::Value, OptionsError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let Some(map) = value.as_object() else {
        return Err(OptionsError::NotAnObject("options"));
    };
    match map.get("cursor") {
        None | Some(serde_json::Value::Null | serde_json::Value::Object(_)) => Ok(value),
        Some(_) => Err(OptionsError::NotAnObject("cursor")),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorGlyphs {
    pub typing: String,
    pub untyping: String,
    pub blinking: String,
}

impl Default for CursorGlyphs {
    fn default() -> Self {
        Self {
            typing: "|".into(),
            untyping: "|".into(),
            blinking: "|".into(),
        }
    }
}

/// Effect configuration. Durations serialize as whole milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Base delay between typed graphemes.
    #[serde(with = "millis")]
    pub typing_delay: Duration,
    #[serde(with = "millis")]
    pub untyping_delay: Duration,
    #[serde(with = "millis")]
    pub delay_before_typing: Duration,
    #[serde(with = "millis")]
    pub delay_after_typing: Duration,
    /// Rewind each string after typing it.
    pub untype_string: bool,
    /// Ceiling of the random extra delay added to each typed grapheme.
    #[serde(with = "millis")]
    pub typing_variation: Duration,
    pub show_cursor: bool,
    pub cursor: CursorGlyphs,
    #[serde(with = "millis")]
    pub cursor_blink_rate: Duration,
    /// Start over after the last string.
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            typing_delay: ms(100),
            untyping_delay: ms(30),
            delay_before_typing: ms(1600),
            delay_after_typing: ms(3000),
            untype_string: true,
            typing_variation: ms(100),
            show_cursor: true,
            cursor: CursorGlyphs::default(),
            cursor_blink_rate: ms(500),
            looping: true,
        }
    }
}

impl Options {
    /// Parse a full configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_value(parse_object(json)?)?)
    }

    /// Apply `patch` on top of `self`, resetting fields to the built-in
    /// defaults where asked.
    pub fn merge(&self, patch: &OptionsPatch) -> Self {
        merge(self, patch, &Options::default())
    }
}

/// Tri-state field update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<T> {
    Keep,
    Reset,
    Set(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Keep
    }
}

impl<T: Clone> Field<T> {
    fn resolve(&self, current: &T, default: &T) -> T {
        match self {
            Field::Keep => current.clone(),
            Field::Reset => default.clone(),
            Field::Set(v) => v.clone(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(d)? {
            None => Field::Reset,
            Some(v) => Field::Set(v),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CursorPatch {
    pub typing: Field<String>,
    pub untyping: Field<String>,
    pub blinking: Field<String>,
}

/// Partial update for [`Options`]. `Default` keeps everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OptionsPatch {
    #[serde(deserialize_with = "millis_field")]
    pub typing_delay: Field<Duration>,
    #[serde(deserialize_with = "millis_field")]
    pub untyping_delay: Field<Duration>,
    #[serde(deserialize_with = "millis_field")]
    pub delay_before_typing: Field<Duration>,
    #[serde(deserialize_with = "millis_field")]
    pub delay_after_typing: Field<Duration>,
    pub untype_string: Field<bool>,
    #[serde(deserialize_with = "millis_field")]
    pub typing_variation: Field<Duration>,
    pub show_cursor: Field<bool>,
    pub cursor: Field<CursorPatch>,
    #[serde(deserialize_with = "millis_field")]
    pub cursor_blink_rate: Field<Duration>,
    #[serde(rename = "loop")]
    pub looping: Field<bool>,
}

macro_rules! patch_setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(mut self, value: $ty) -> Self {
                self.$name = Field::Set(value);
                self
            }
        )*
    };
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object. Anything else, or an unknown key, is rejected.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_value(parse_object(json)?)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    patch_setters! {
        typing_delay: Duration,
        untyping_delay: Duration,
        delay_before_typing: Duration,
        delay_after_typing: Duration,
        untype_string: bool,
        typing_variation: Duration,
        show_cursor: bool,
        cursor_blink_rate: Duration,
        looping: bool,
    }

    /// Replace individual cursor glyphs; `None` keeps the current one.
    pub fn cursor_glyphs(
        mut self,
        typing: Option<&str>,
        untyping: Option<&str>,
        blinking: Option<&str>,
    ) -> Self {
        let set = |g: Option<&str>| g.map_or(Field::Keep, |g| Field::Set(g.to_string()));
        self.cursor = Field::Set(CursorPatch {
            typing: set(typing),
            untyping: set(untyping),
            blinking: set(blinking),
        });
        self
    }
}

/// Defaults-aware merge: `Keep` takes `current`, `Reset` takes `defaults`,
/// `Set` takes the new value, recursing into the cursor glyph group.
pub fn merge(current: &Options, update: &OptionsPatch, defaults: &Options) -> Options {
    let cursor = match &update.cursor {
        Field::Keep => current.cursor.clone(),
        Field::Reset => defaults.cursor.clone(),
        Field::Set(glyphs) => CursorGlyphs {
            typing: glyphs
                .typing
                .resolve(&current.cursor.typing, &defaults.cursor.typing),
            untyping: glyphs
                .untyping
                .resolve(&current.cursor.untyping, &defaults.cursor.untyping),
            blinking: glyphs
                .blinking
                .resolve(&current.cursor.blinking, &defaults.cursor.blinking),
        },
    };

    Options {
        typing_delay: update
            .typing_delay
            .resolve(&current.typing_delay, &defaults.typing_delay),
        untyping_delay: update
            .untyping_delay
            .resolve(&current.untyping_delay, &defaults.untyping_delay),
        delay_before_typing: update
            .delay_before_typing
            .resolve(&current.delay_before_typing, &defaults.delay_before_typing),
        delay_after_typing: update
            .delay_after_typing
            .resolve(&current.delay_after_typing, &defaults.delay_after_typing),
        untype_string: update
            .untype_string
            .resolve(&current.untype_string, &defaults.untype_string),
        typing_variation: update
            .typing_variation
            .resolve(&current.typing_variation, &defaults.typing_variation),
        show_cursor: update
            .show_cursor
            .resolve(&current.show_cursor, &defaults.show_cursor),
        cursor,
        cursor_blink_rate: update
            .cursor_blink_rate
            .resolve(&current.cursor_blink_rate, &defaults.cursor_blink_rate),
        looping: update.looping.resolve(&current.looping, &defaults.looping),
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

fn millis_field<'de, D: Deserializer<'de>>(d: D) -> Result<Field<Duration>, D::Error> {
    Ok(match Option::<u64>::deserialize(d)? {
        None => Field::Reset,
        Some(v) => Field::Set(Duration::from_millis(v)),
    })
}
