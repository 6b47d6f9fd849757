//! Link destinations.
//!
//! Destinations keep the text the author wrote, modulo this parser's one
//! normalization: spaces (legal only in angle-bracketed destinations)
//! are percent-encoded at parse time. Absolute URIs (those with a
//! scheme) are additionally validated through [`url::Url`], while
//! scheme-less references (`/path`, `#fragment`, query-relative forms)
//! are checked lexically. Rendering emits the parsed text, so `href` is
//! what the document said apart from that encoding.

use std::fmt;

use url::Url;

/// A validated link or image destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    text: String,
}

impl Uri {
    /// Validate and wrap a destination.
    ///
    /// Spaces percent-encode as part of parsing; any other whitespace or
    /// control character is rejected.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.replace(' ', "%20");
        if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err("whitespace in URI".to_string());
        }
        if scheme_of(&text).is_some() {
            // A scheme makes it absolute; let the URL parser judge it.
            Url::parse(&text).map_err(|e| e.to_string())?;
        }
        Ok(Self { text })
    }

    /// The destination as written, with spaces percent-encoded.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn scheme(&self) -> Option<&str> {
        scheme_of(&self.text)
    }

    /// True for a scheme-less single-component destination shaped like an
    /// email address, as used by autolink `mailto:` promotion.
    pub fn is_bare_email(&self) -> bool {
        self.scheme().is_none() && !self.text.contains('/') && is_email(&self.text)
    }

    /// Prefix the destination with `mailto:`.
    pub fn into_mailto(self) -> Self {
        Self {
            text: format!("mailto:{}", self.text),
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extract the scheme prefix, if any: an ASCII letter followed by
/// letters, digits, `+`, `-`, or `.`, terminated by `:`.
fn scheme_of(text: &str) -> Option<&str> {
    let colon = text.find(':')?;
    let candidate = &text[..colon];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

/// Address validation in the HTML5 `input[type=email]` shape: a dot-atom
/// local part, an `@`, and hyphen-safe domain labels.
fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c))
    {
        return false;
    }
    if domain.is_empty() {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
