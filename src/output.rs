use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `APPDB_QUIET=1` silences human-readable progress lines; errors and
/// requested data (table names, JSON) are still printed.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("APPDB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
