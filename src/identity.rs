//! Identity resolution for commands that act on someone's behalf.
//!
//! Accepting coverage needs to know who is covering. Rather than requiring
//! `--as` on every invocation, the person is resolved through a chain:
//!
//! 1. `--as <person>`: explicit per-command override
//! 2. `SHIFTCOVER_USER` env var: process or session level
//! 3. `default-user` in `~/.shiftcover/config.toml`
//!
//! A resolved person is a user id, or an email address when it contains `@`.

use std::env;

/// Error message shown when the acting person cannot be resolved.
pub const PERSON_REQUIRED: &str = "person required: pass --as <user>, \
    set SHIFTCOVER_USER, or add `default-user = \"...\"` to ~/.shiftcover/config.toml";

/// Resolve the acting person from the tiered resolution chain.
///
/// Checks in order: explicit `--as` value, `SHIFTCOVER_USER`, then
/// `configured`. Returns an error with [`PERSON_REQUIRED`] when none of
/// the sources yield a value.
pub fn resolve_person(explicit: Option<&str>, configured: Option<&str>) -> Result<String, String> {
    resolve_from(explicit, env::var("SHIFTCOVER_USER").ok().as_deref(), configured)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    configured: Option<&str>,
) -> Result<String, String> {
    [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| PERSON_REQUIRED.to_string())
}
