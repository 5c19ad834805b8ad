//! Readable-text extraction from HTML.
//!
//! Two passes over the parsed document:
//!
//! 1. **Readability scoring.** Every substantial `<p>`/`<pre>` outside
//!    boilerplate credits its parent (full score) and grandparent (half).
//!    The best-scoring container's text is the article.
//! 2. **Heuristic fallback.** When no container scores, the first of a
//!    list of common content selectors with non-empty text wins, ending
//!    with the whole `<body>`.
//!
//! Boilerplate (scripts, navigation, footers, ads, cookie banners...) is
//! skipped by tag and by whole `class`/`id` tokens. Structural containers
//! (`html`, `body`, `main`, `article`) are never boilerplate, whatever
//! classes a theme puts on them, and the final `<body>` fallback skips by
//! tag only.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use sleuth_domain::ToolError;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::LazyLock;
use tracing::debug;

const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "template", "nav", "header", "footer",
    "aside", "form", "button",
];

const STRUCTURAL_TAGS: &[&str] = &["html", "body", "main", "article"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li",
    "ul", "ol", "pre", "blockquote", "table", "tr", "figure", "figcaption", "dl", "dt", "dd",
];

const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    "#content",
    ".content",
    ".post",
    ".entry-content",
];

/// Paragraphs shorter than this do not vote for a container.
const MIN_PARAGRAPH_CHARS: usize = 25;

/// Matches one whole `class` or `id` token.
static BOILERPLATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:nav|navbar|navigation|menu|footer|site-footer|sidebar|widget|comments?|advert\w*|ads?|ad-\w+|banner|cookies?|cookie-\w+|consent|popup|modal|social|social-share|share|sharing|share-\w+|related|related-\w+|breadcrumbs?|subscribe|newsletter)$",
    )
    .expect("boilerplate token pattern is valid")
});

/// Which elements [`collect_element_text`] drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    TagsAndClasses,
    TagsOnly,
}

/// Title and main text of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: Option<String>,
    pub content: String,
}

pub(super) fn selector(css: &str) -> Result<Selector, ToolError> {
    Selector::parse(css).map_err(|e| ToolError::Extraction(format!("bad selector {css}: {e:?}")))
}

/// Extract the readable article from `html`.
pub fn extract_article(html: &str) -> Result<Article, ToolError> {
    let document = Html::parse_document(html);
    let title = page_title(&document)?;

    let content = match readable_text(&document)? {
        Some(text) => text,
        None => {
            debug!("No scored container, using selector fallback");
            fallback_text(&document)?
                .ok_or_else(|| ToolError::Extraction("no readable content found".into()))?
        }
    };

    Ok(Article { title, content })
}

fn page_title(document: &Html) -> Result<Option<String>, ToolError> {
    for css in ["title", "meta[property=\"og:title\"]", "h1"] {
        let sel = selector(css)?;
        for el in document.select(&sel) {
            let text = match el.value().attr("content") {
                Some(content) => content.to_string(),
                None => el.text().collect::<String>(),
            };
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

fn is_boilerplate(element: &ElementRef, skip: Skip) -> bool {
    let el = element.value();
    if SKIP_TAGS.contains(&el.name()) {
        return true;
    }
    if skip == Skip::TagsOnly || STRUCTURAL_TAGS.contains(&el.name()) {
        return false;
    }
    el.attr("class")
        .into_iter()
        .flat_map(str::split_whitespace)
        .chain(el.id())
        .any(|token| BOILERPLATE_TOKEN.is_match(token))
}

fn inside_boilerplate(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_boilerplate(&ancestor, Skip::TagsAndClasses))
}

fn paragraph_score(text: &str) -> f64 {
    let chars = text.chars().count();
    let commas = text.matches(',').count();
    1.0 + commas as f64 + (chars / 100).min(3) as f64
}

fn credit<K: Copy + Eq + Hash>(
    scores: &mut HashMap<K, f64>,
    candidates: &mut Vec<K>,
    id: K,
    amount: f64,
) {
    let entry = scores.entry(id).or_insert_with(|| {
        candidates.push(id);
        0.0
    });
    *entry += amount;
}

fn readable_text(document: &Html) -> Result<Option<String>, ToolError> {
    let paragraphs = selector("p, pre")?;
    let mut scores: HashMap<_, f64> = HashMap::new();
    // Document order, so ties go to the first container
    let mut candidates = Vec::new();

    for paragraph in document.select(&paragraphs) {
        if is_boilerplate(&paragraph, Skip::TagsAndClasses) || inside_boilerplate(&paragraph) {
            continue;
        }
        let text = paragraph.text().collect::<String>();
        let text = text.trim();
        if text.chars().count() < MIN_PARAGRAPH_CHARS {
            continue;
        }
        let score = paragraph_score(text);

        let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        credit(&mut scores, &mut candidates, parent.id(), score);
        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            credit(&mut scores, &mut candidates, grandparent.id(), score / 2.0);
        }
    }

    let mut best: Option<(_, f64)> = None;
    for id in candidates {
        let score = scores.get(&id).copied().unwrap_or_default();
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }

    let Some(container) = best
        .and_then(|(id, _)| document.tree.get(id))
        .and_then(ElementRef::wrap)
    else {
        return Ok(None);
    };

    let text = block_text(container, Skip::TagsAndClasses);
    Ok((!text.is_empty()).then_some(text))
}

fn fallback_text(document: &Html) -> Result<Option<String>, ToolError> {
    for css in CONTENT_SELECTORS {
        let sel = selector(css)?;
        for el in document.select(&sel) {
            if inside_boilerplate(&el) {
                continue;
            }
            let text = block_text(el, Skip::TagsAndClasses);
            if !text.is_empty() {
                debug!(selector = css, "Fallback extraction matched");
                return Ok(Some(text));
            }
        }
    }

    let body = selector("body")?;
    let text = document
        .select(&body)
        .next()
        .map(|el| block_text(el, Skip::TagsOnly))
        .filter(|text| !text.is_empty());
    if text.is_some() {
        debug!("Fallback extraction used the full body");
    }
    Ok(text)
}

/// Text of `element` with one line per block, boilerplate removed.
fn block_text(element: ElementRef, skip: Skip) -> String {
    let mut raw = String::new();
    collect_element_text(element, skip, &mut raw);
    clean_whitespace(&raw)
}

fn collect_element_text(element: ElementRef, skip: Skip, out: &mut String) {
    if is_boilerplate(&element, skip) {
        return;
    }

    let block = BLOCK_TAGS.contains(&element.value().name());
    if block {
        out.push('\n');
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_element_text(child_el, skip, out);
                }
            }
            _ => {}
        }
    }

    if block {
        out.push('\n');
    }
}

/// Collapse runs of whitespace and separate non-empty lines by a blank line.
fn clean_whitespace(text: &str) -> String {
    text.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
<html>
<head><title>  Rust turns ten </title></head>
<body>
  <nav class="top"><p>Home, Blog, About, Contact, Careers, and many other links here</p></nav>
  <div class="cookie-banner"><p>We use cookies, trackers, pixels, and other things to follow you.</p></div>
  <div id="main">
    <article>
      <h1>Rust turns ten</h1>
      <p>Rust 1.0 shipped in May 2015, after years of design work, RFCs, and community input.</p>
      <p>The language is known for memory safety, zero-cost abstractions, and fearless concurrency.</p>
      <script>track("pageview");</script>
    </article>
  </div>
  <footer><p>Copyright 2025, Example Media, all rights reserved worldwide.</p></footer>
</body>
</html>"#;

    #[test]
    fn test_readability_picks_article() {
        let article = extract_article(ARTICLE).unwrap();
        assert_eq!(article.title.as_deref(), Some("Rust turns ten"));
        assert!(article.content.starts_with("Rust turns ten\n\nRust 1.0 shipped"));
        assert!(article.content.contains("fearless concurrency"));
        assert!(!article.content.contains("Careers"));
        assert!(!article.content.contains("cookies"));
        assert!(!article.content.contains("Copyright"));
        assert!(!article.content.contains("pageview"));
    }

    #[test]
    fn test_fallback_without_paragraphs() {
        let html = r#"<html><body>
            <div class="sidebar">Trending now</div>
            <main><div>Short note</div><div>Second line</div></main>
        </body></html>"#;
        let article = extract_article(html).unwrap();
        assert_eq!(article.content, "Short note\n\nSecond line");
        assert!(article.title.is_none());
    }

    #[test]
    fn test_nothing_readable_is_an_error() {
        let html = "<html><body><nav>Menu</nav><script>var x = 1;</script></body></html>";
        let err = extract_article(html).unwrap_err();
        assert_eq!(err.code(), "EXTRACTION");
    }

    #[test]
    fn test_og_title_when_title_missing() {
        let html = r#"<html><head><meta property="og:title" content="Shared title"></head>
            <body><p>Body text</p></body></html>"#;
        let article = extract_article(html).unwrap();
        assert_eq!(article.title.as_deref(), Some("Shared title"));
        assert_eq!(article.content, "Body text");
    }

    #[test]
    fn test_theme_classes_on_body_and_article() {
        let html = r#"<html><body class="post-template has-sidebar">
            <article class="post tag-social-media">
              <p>Real article text about ownership, borrowing, and lifetimes in Rust programs.</p>
              <p>A second paragraph, with enough words, commas, and detail to score well.</p>
            </article>
            <div class="widget"><p>Subscribe now, get our newsletter, and never miss a post again.</p></div>
        </body></html>"#;
        let article = extract_article(html).unwrap();
        assert!(article.content.starts_with("Real article text"));
        assert!(article.content.contains("second paragraph"));
        assert!(!article.content.contains("Subscribe now"));
    }

    #[test]
    fn test_compound_tokens_are_not_boilerplate() {
        let html = r#"<html><body>
            <div class="entry share-count-hidden" id="navigation-free">
              <p>Ownership rules, borrowing rules, and lifetimes keep memory safe.</p>
            </div>
            <div class="share"><p>Share this on every network, feed, and chat you know of.</p></div>
        </body></html>"#;
        let article = extract_article(html).unwrap();
        assert_eq!(
            article.content,
            "Ownership rules, borrowing rules, and lifetimes keep memory safe."
        );
    }

    #[test]
    fn test_body_fallback_ignores_classes() {
        let html = r#"<html><body class="sidebar">
            <div class="menu">Short page</div>
            <script>var x = 1;</script>
        </body></html>"#;
        let article = extract_article(html).unwrap();
        assert_eq!(article.content, "Short page");
    }

    #[test]
    fn test_boilerplate_token_matching() {
        for token in ["nav", "Sidebar", "cookie-banner", "comments", "advertisement", "widget"] {
            assert!(BOILERPLATE_TOKEN.is_match(token), "{token}");
        }
        for token in ["has-sidebar", "tag-social-media", "post-template", "navigation-free"] {
            assert!(!BOILERPLATE_TOKEN.is_match(token), "{token}");
        }
    }

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  hello   world  "), "hello world");
        assert_eq!(clean_whitespace("a\n\n\n\n b \n"), "a\n\nb");
    }
}
