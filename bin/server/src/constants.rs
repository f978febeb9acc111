/// Default document archive root.
pub const DEFAULT_DATA_DIR: &str = "_data";
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: &str = "8080";
/// Default user-interface language for response messages.
pub const DEFAULT_UI_LANG: &str = "en";
/// Directory holding translation catalogs.
pub const LOCALE_DIR: &str = "locale";

/// Largest accepted document payload: 2GB plus headroom for one piece.
pub const MAX_FILE_SIZE: usize = (2 << 30) + (200 << 20);
/// Largest accepted metadata document.
pub const MAX_META_SIZE: usize = 10 << 20;
