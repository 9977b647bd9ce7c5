//! Path rewrite rule
//!
//! A request path matching the prefix has the prefix removed and is appended
//! to the upstream origin. Matching is a plain string prefix test, so with
//! prefix `/api` the path `/apix` also matches and forwards as `/x`.

use reqwest::Url;

use crate::error::RuleError;

/// Forwarding rule: prefix to strip, origin to forward to
#[derive(Debug, Clone)]
pub struct ProxyRule {
    prefix: String,
    origin: String,
}

impl ProxyRule {
    /// Validate and build a rule
    ///
    /// `prefix` must be empty or start with `/`. `upstream_origin` must be
    /// an absolute `http` or `https` URL; a trailing `/` is dropped.
    pub fn new(prefix: &str, upstream_origin: &str) -> Result<Self, RuleError> {
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(RuleError::Prefix(prefix.to_string()));
        }

        let url = Url::parse(upstream_origin)
            .map_err(|e| RuleError::Upstream(format!("{}: {}", upstream_origin, e)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RuleError::Upstream(format!(
                "{}: expected an http(s) origin",
                upstream_origin
            )));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            origin: upstream_origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path with the prefix stripped, or `None` when the rule does not apply
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(&self.prefix)?;
        Some(if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        })
    }

    /// Full upstream URL for a request, query string carried over as-is
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Option<String> {
        let rewritten = self.rewrite_path(path)?;
        Some(match query {
            Some(q) => format!("{}{}?{}", self.origin, rewritten, q),
            None => format!("{}{}", self.origin, rewritten),
        })
    }
}
