// i18n.rs
//
// Runtime UI strings:
// - Catalogs live in assets/i18n/<lang>.json, searched in <exe_dir>/assets then ./assets
// - English is compiled in and always used as the fallback
// - Lookup: tr("key") / tr_with("key", &[("name", ...)]) with {name} placeholders

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";

/// Languages offered in the UI: (code, native name).
pub const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];

const BUILTIN_EN: &str = include_str!("../assets/i18n/en.json");

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

impl I18n {
    fn lookup(&self, key: &str) -> String {
        self.map
            .get(key)
            .or_else(|| self.fallback_map.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn parse_map(text: &str) -> Option<HashMap<String, String>> {
    serde_json::from_str(text).ok()
}

fn builtin_en() -> HashMap<String, String> {
    parse_map(BUILTIN_EN).unwrap_or_default()
}

fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{lang}.json");

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("i18n").join(&file);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join("i18n").join(&file);
    p.exists().then_some(p)
}

fn load_file(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    let map = parse_map(&text);
    if map.is_none() {
        log::warn!("Ignoring malformed string catalog {}", path.display());
    }
    map
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    match find_lang_file(lang).and_then(|p| load_file(&p)) {
        Some(m) => m,
        None if lang == FALLBACK_LANG => builtin_en(),
        None => {
            log::warn!("No string catalog for '{lang}', falling back to {FALLBACK_LANG}");
            HashMap::new()
        }
    }
}

fn build(lang: String) -> I18n {
    let map = load_lang(&lang);
    I18n {
        lang,
        map,
        fallback_map: builtin_en(),
    }
}

/// Initialize or switch the global catalog.
pub fn init(lang: impl Into<String>) {
    let i = build(lang.into());

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

/// Localized text for `key`; the key itself if no catalog has it.
pub fn tr(key: &str) -> String {
    match I18N.get().and_then(|l| l.read().ok()) {
        Some(i) => i.lookup(key),
        None => builtin_en()
            .remove(key)
            .unwrap_or_else(|| key.to_string()),
    }
}

/// Like `tr`, substituting `{name}` placeholders. Unknown placeholders stay as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(tr(key), args)
}

fn substitute(mut s: String, args: &[(&str, String)]) -> String {
    for (k, v) in args {
        s = s.replace(&format!("{{{k}}}"), v);
    }
    s
}
