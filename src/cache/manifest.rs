//! Offline asset manifest

/// Cache bucket for the current asset set; bump to force a refresh
pub const CACHE_NAME: &str = "brainsort-v1";

/// Assets installed for offline play, relative to the worker scope
pub const ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "./src/number.html",
    "./src/alphabet.html",
    "./src/words.html",
    "./src/shapes.html",
    "./src/privacy.html",
    "./js/shared.js",
    "./sounds/click.wav",
    "./sounds/success.wav",
    "./sounds/fail.wav",
];

/// Versioned list of assets to pre-cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub cache_name: String,
    pub assets: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(CACHE_NAME, ASSETS.iter().copied())
    }
}

impl Manifest {
    pub fn new<I, S>(cache_name: &str, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cache_name: cache_name.to_string(),
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }

    /// Absolute asset URLs under `scope`
    pub fn resolve(&self, scope: &str) -> Vec<String> {
        self.assets.iter().map(|a| resolve_url(scope, a)).collect()
    }
}

/// Join a relative asset path onto a scope URL.
///
/// Only handles the `./`-prefixed and bare relative paths the manifest uses;
/// absolute URLs pass through.
pub fn resolve_url(scope: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    let base = scope.trim_end_matches('/');
    if let Some(rest) = path.strip_prefix('/') {
        // Root-relative: keep only scheme and host of the scope
        let origin_end = base
            .find("://")
            .and_then(|i| base[i + 3..].find('/').map(|j| i + 3 + j))
            .unwrap_or(base.len());
        return format!("{}/{}", &base[..origin_end], rest);
    }
    let rest = path.strip_prefix("./").unwrap_or(path);
    format!("{}/{}", base, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = Manifest::default();
        assert_eq!(manifest.cache_name, "brainsort-v1");
        assert_eq!(manifest.assets.len(), 12);
        assert_eq!(manifest.assets[0], "./");
    }

    #[test]
    fn test_resolve_url() {
        let scope = "https://games.example/brainsort/";
        assert_eq!(resolve_url(scope, "./"), "https://games.example/brainsort/");
        assert_eq!(
            resolve_url(scope, "./src/number.html"),
            "https://games.example/brainsort/src/number.html"
        );
        assert_eq!(resolve_url(scope, "js/shared.js"), "https://games.example/brainsort/js/shared.js");
        assert_eq!(resolve_url(scope, "/favicon.ico"), "https://games.example/favicon.ico");
        assert_eq!(resolve_url(scope, "https://cdn.example/a.css"), "https://cdn.example/a.css");
    }
}
