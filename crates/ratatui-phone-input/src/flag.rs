//! Flag glyph loading with a one-way fallback latch.

use crate::country::Country;
use crate::country::Flag;
use crate::error::FlagError;
use std::collections::HashMap;
use std::fs;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_FALLBACK_FLAG: &str = "⚑";

/// Resolves a [`Flag`] into the glyph drawn in the terminal.
pub trait FlagLoader {
    fn load(&self, flag: &Flag) -> Result<String, FlagError>;
}

/// Emoji flags are used verbatim; asset flags are read from disk on first use.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsFlagLoader;

impl FlagLoader for FsFlagLoader {
    fn load(&self, flag: &Flag) -> Result<String, FlagError> {
        match flag {
            Flag::Emoji(glyph) => non_empty_glyph(glyph),
            Flag::Asset(path) => {
                let contents = fs::read_to_string(path).map_err(|source| FlagError::Read {
                    path: path.clone(),
                    source,
                })?;
                let line = contents
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("");
                non_empty_glyph(line)
            }
            Flag::Missing => Err(FlagError::Missing),
        }
    }
}

fn non_empty_glyph(glyph: &str) -> Result<String, FlagError> {
    let glyph = glyph.trim();
    if UnicodeWidthStr::width(glyph) == 0 {
        return Err(FlagError::EmptyGlyph);
    }
    Ok(glyph.to_string())
}

/// One rendered flag.
///
/// The first failed load latches the instance onto the fallback glyph for the rest of its
/// lifetime. Create a new instance to try again.
#[derive(Clone, Debug, Default)]
pub struct FlagImage {
    glyph: Option<String>,
    failed: bool,
}

impl FlagImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn glyph<'a>(
        &'a mut self,
        country: &Country,
        loader: &dyn FlagLoader,
        fallback: &'a str,
    ) -> &'a str {
        if self.failed {
            return fallback;
        }
        if self.glyph.is_none() {
            match loader.load(&country.flag) {
                Ok(glyph) => self.glyph = Some(glyph),
                Err(err) => {
                    tracing::warn!(country = %country.name, error = %err, "flag failed to load");
                    self.failed = true;
                    return fallback;
                }
            }
        }
        self.glyph.as_deref().unwrap_or(fallback)
    }
}

/// Flag instances for a list, keyed by [`Country::key`].
#[derive(Clone, Debug, Default)]
pub struct FlagCache {
    images: HashMap<String, FlagImage>,
}

impl FlagCache {
    pub fn glyph<'a>(
        &'a mut self,
        country: &Country,
        loader: &dyn FlagLoader,
        fallback: &'a str,
    ) -> &'a str {
        self.images
            .entry(country.key())
            .or_default()
            .glyph(country, loader, fallback)
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    struct CountingLoader {
        calls: Cell<usize>,
    }

    impl FlagLoader for CountingLoader {
        fn load(&self, flag: &Flag) -> Result<String, FlagError> {
            self.calls.set(self.calls.get() + 1);
            FsFlagLoader.load(flag)
        }
    }

    #[test]
    fn emoji_flag_is_used_verbatim() {
        let c = Country::with_iso("Vietnam", "VN", "84");
        let mut img = FlagImage::new();
        assert_eq!(img.glyph(&c, &FsFlagLoader, "?"), "🇻🇳");
        assert!(!img.has_failed());
    }

    #[test]
    fn failure_latches_without_retry() {
        let c = Country::new("Zzz", "999", Flag::Missing);
        let loader = CountingLoader {
            calls: Cell::new(0),
        };
        let mut img = FlagImage::new();
        assert_eq!(img.glyph(&c, &loader, DEFAULT_FALLBACK_FLAG), DEFAULT_FALLBACK_FLAG);
        assert_eq!(img.glyph(&c, &loader, DEFAULT_FALLBACK_FLAG), DEFAULT_FALLBACK_FLAG);
        assert!(img.has_failed());
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn success_is_cached() {
        let c = Country::with_iso("Japan", "JP", "81");
        let loader = CountingLoader {
            calls: Cell::new(0),
        };
        let mut img = FlagImage::new();
        img.glyph(&c, &loader, "?");
        img.glyph(&c, &loader, "?");
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn unreadable_asset_and_blank_emoji_fail() {
        let missing = Flag::Asset(PathBuf::from("/definitely/not/here/zzz.flag"));
        assert!(matches!(
            FsFlagLoader.load(&missing),
            Err(FlagError::Read { .. })
        ));
        assert!(matches!(
            FsFlagLoader.load(&Flag::Emoji("  ".to_string())),
            Err(FlagError::EmptyGlyph)
        ));
    }

    #[test]
    fn asset_uses_first_non_empty_line() {
        let path = std::env::temp_dir().join(format!("phone-input-flag-{}.txt", std::process::id()));
        fs::write(&path, "\n  [VN]  \nignored\n").unwrap();
        let glyph = FsFlagLoader.load(&Flag::Asset(path.clone()));
        let _ = fs::remove_file(&path);
        assert_eq!(glyph.unwrap(), "[VN]");
    }

    #[test]
    fn cache_recreates_instances_after_clear() {
        let c = Country::new("Zzz", "999", Flag::Missing);
        let loader = CountingLoader {
            calls: Cell::new(0),
        };
        let mut cache = FlagCache::default();
        cache.glyph(&c, &loader, "?");
        cache.glyph(&c, &loader, "?");
        assert_eq!(loader.calls.get(), 1);
        cache.clear();
        assert!(cache.is_empty());
        cache.glyph(&c, &loader, "?");
        assert_eq!(loader.calls.get(), 2);
    }
}
