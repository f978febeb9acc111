//! Response-message translation.
//!
//! Catalogs are JSON files under the locale directory, one per language
//! tag (`locale/zh-cn.json`), each an array of `{text, local}` pairs.
//! Lookup falls back from region-qualified tag to bare language to the
//! untranslated message, so a missing catalog never fails a request.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Deserialize)]
struct Message {
    text: String,
    #[serde(default)]
    local: String,
}

pub struct Catalog {
    dir: PathBuf,
    // lang tag -> (original -> translated); an empty table marks a
    // missing catalog so the file is only tried once.
    loaded: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Translate a message for a language tag, returning the message
    /// itself when no translation is available.
    pub fn text(&self, lang: &str, msg: &str) -> String {
        let lang = normalize_tag(lang);

        let mut loaded = self.loaded.lock().unwrap();
        if !loaded.contains_key(&lang) {
            let table = self.load_language(&lang);
            loaded.insert(lang.clone(), table);
        }

        loaded
            .get(&lang)
            .and_then(|table| table.get(msg))
            .cloned()
            .unwrap_or_else(|| msg.to_string())
    }

    fn load_language(&self, lang: &str) -> HashMap<String, String> {
        let mut table = HashMap::new();

        // The region-qualified file wins over the bare-language file.
        let mut names = vec![format!("{}.json", lang)];
        if let Some(bare) = lang.split('-').next() {
            if bare != lang {
                names.push(format!("{}.json", bare));
            }
        }

        for name in names {
            if let Ok(bytes) = std::fs::read(self.dir.join(&name)) {
                if let Ok(messages) = serde_json::from_slice::<Vec<Message>>(&bytes) {
                    for m in messages {
                        if !m.local.is_empty() {
                            table.entry(m.text).or_insert(m.local);
                        }
                    }
                }
            }
        }
        table
    }
}

/// Browser-style tag to catalog file name: "zh-CN" -> "zh-cn".
fn normalize_tag(lang: &str) -> String {
    lang.trim().to_ascii_lowercase()
}
