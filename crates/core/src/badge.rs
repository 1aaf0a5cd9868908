//! The rank badge shown next to a publication entry.

use serde::Serialize;

use crate::ranking::RankLevel;

/// Attribute identifying a badge element, used to find and replace it.
pub const BADGE_MARKER_ATTR: &str = "data-jufo-badge";

/// Attribute listing the identifier candidates considered.
pub const BADGE_CANDIDATES_ATTR: &str = "data-jufo-issn-candidates";

/// Text shown when no level is available.
pub const UNAVAILABLE_TEXT: &str = "NA";

/// A renderable badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub level: Option<RankLevel>,
    /// Visible text: the level, or "NA".
    pub text: String,
    /// Tooltip describing source and level.
    pub title: String,
    pub css_classes: Vec<String>,
    /// Identifier candidates considered; empty on placeholders.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl Badge {
    pub fn new(level: Option<RankLevel>) -> Self {
        let (text, level_class) = match level {
            Some(level) => (level.to_string(), format!("JUFO_{}", level)),
            None => (UNAVAILABLE_TEXT.to_string(), "JUFO_na".to_string()),
        };
        Self {
            level,
            title: format!("JUFO: {}", text),
            text,
            css_classes: vec!["ccf-rank".to_string(), level_class],
            candidates: Vec::new(),
        }
    }

    /// The "NA" badge placed while resolution is in flight.
    pub fn placeholder() -> Self {
        Self::new(None)
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Render as an HTML `<span>` element.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<span class="{}" {}="1" title="{}""#,
            escape_html(&self.css_classes.join(" ")),
            BADGE_MARKER_ATTR,
            escape_html(&self.title),
        );
        if !self.candidates.is_empty() {
            html.push_str(&format!(
                r#" {}="{}""#,
                BADGE_CANDIDATES_ATTR,
                escape_html(&self.candidates.join(","))
            ));
        }
        html.push('>');
        html.push_str(&escape_html(&self.text));
        html.push_str("</span>");
        html
    }
}

/// Where badges get attached.
///
/// A target holds at most one badge: placing a badge replaces any badge
/// already there.
pub trait BadgeTarget: Send + Sync {
    fn place(&self, badge: Badge);
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_badge() {
        let badge = Badge::new(RankLevel::new(2));
        assert_eq!(badge.text, "2");
        assert_eq!(badge.title, "JUFO: 2");
        assert_eq!(badge.css_classes, vec!["ccf-rank", "JUFO_2"]);
    }

    #[test]
    fn test_unavailable_badge() {
        let badge = Badge::placeholder();
        assert_eq!(badge.text, "NA");
        assert_eq!(badge.title, "JUFO: NA");
        assert_eq!(badge.css_classes, vec!["ccf-rank", "JUFO_na"]);
    }

    #[test]
    fn test_to_html() {
        let html = Badge::new(RankLevel::new(3))
            .with_candidates(vec!["2573-0142".to_string(), "1758-4078".to_string()])
            .to_html();
        assert_eq!(
            html,
            r#"<span class="ccf-rank JUFO_3" data-jufo-badge="1" title="JUFO: 3" data-jufo-issn-candidates="2573-0142,1758-4078">3</span>"#
        );
    }

    #[test]
    fn test_to_html_escapes() {
        let badge = Badge::placeholder().with_candidates(vec!["\"><script>".to_string()]);
        let html = badge.to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
