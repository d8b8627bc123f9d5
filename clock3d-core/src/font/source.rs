use futures::future::{FutureExt, LocalBoxFuture};

use super::Font;
use crate::error::FontLoadError;

/// Identifier of the typeface compiled into the crate.
pub const BUILTIN_FONT: &str = "builtin:clock-sans";

const BUILTIN_TYPEFACE: &[u8] = include_bytes!("../../assets/clock_sans.typeface.json");

/// Asynchronous font fetcher.
///
/// Every failure must surface as a [`FontLoadError`] from the returned
/// future; implementations never panic on bad input.
pub trait FontSource {
    fn load(&self, id: &str) -> LocalBoxFuture<'static, Result<Font, FontLoadError>>;
}

/// Serves [`BUILTIN_FONT`] from memory and treats any other identifier as a
/// path to a typeface JSON file.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFontSource;

impl FontSource for StdFontSource {
    fn load(&self, id: &str) -> LocalBoxFuture<'static, Result<Font, FontLoadError>> {
        let id = id.to_string();
        async move {
            if id == BUILTIN_FONT {
                return Font::from_typeface_json(&id, BUILTIN_TYPEFACE);
            }
            let data = std::fs::read(&id).map_err(|e| FontLoadError::Io {
                id: id.clone(),
                message: e.to_string(),
            })?;
            Font::from_typeface_json(&id, &data)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{label_set, LabelMode};
    use futures::executor::block_on;

    #[test]
    fn test_builtin_font_covers_every_label() {
        let font = block_on(StdFontSource.load(BUILTIN_FONT)).unwrap();
        for mode in [LabelMode::Numeric, LabelMode::Roman] {
            for label in label_set(mode) {
                for character in label.chars() {
                    assert!(font.glyph(character).is_some(), "missing glyph {character:?}");
                }
            }
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = block_on(StdFontSource.load("/nonexistent/font.typeface.json")).unwrap_err();
        assert!(matches!(err, FontLoadError::Io { .. }));
    }
}
