//! Headline extraction from listing pages.
//!
//! The extractor knows nothing about any particular site; everything it
//! needs is in the [`SourceSpec`] data: the ordered container selectors and
//! one [`FieldRule`] per headline field.

use crate::config::{FieldRule, SourceSpec};
use crate::models::Headline;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Extract at most `max_items` headlines from `document`, in document order.
///
/// The first container selector that matches anything is used; later ones
/// are never merged in. Missing fields fall back to the rule's placeholder.
///
/// # Arguments
///
/// * `document` - The parsed listing page
/// * `spec` - Container selectors and field rules of the source
/// * `max_items` - Upper bound on returned headlines
///
/// # Returns
///
/// Up to `max_items` headlines. A page where no selector matches yields an
/// empty vector, never an error.
///
/// # Examples
///
/// ```ignore
/// let document = Html::parse_document(r#"<a class="gs-c-promo-heading" href="/news/1">Hi</a>"#);
/// let headlines = extract(&document, &SourceSpec::bbc_world(), 5);
/// assert_eq!(headlines[0].detail, "https://www.bbc.com/news/1");
/// ```
pub fn extract(document: &Html, spec: &SourceSpec, max_items: usize) -> Vec<Headline> {
    let matched = spec.containers.iter().find_map(|raw| {
        let selector = parse_selector(raw)?;
        let containers: Vec<ElementRef<'_>> =
            document.select(&selector).take(max_items).collect();
        (!containers.is_empty()).then_some((raw, containers))
    });

    let Some((selector, containers)) = matched else {
        debug!(source = %spec.name, "No container selector matched");
        return Vec::new();
    };
    debug!(source = %spec.name, %selector, count = containers.len(), "Matched containers");

    containers
        .into_iter()
        .map(|container| {
            Headline::new(
                read_field(container, &spec.title),
                read_field(container, &spec.detail),
            )
        })
        .collect()
}

fn read_field(container: ElementRef<'_>, rule: &FieldRule) -> String {
    match rule {
        FieldRule::OwnText => element_text(container),
        FieldRule::NestedText {
            candidates,
            placeholder,
        } => candidates
            .iter()
            .filter_map(|raw| parse_selector(raw))
            .find_map(|selector| container.select(&selector).next().map(element_text))
            .unwrap_or_else(|| placeholder.clone()),
        FieldRule::Attribute {
            name,
            base,
            placeholder,
        } => match container.value().attr(name) {
            Some(value) => resolve_link(value, base.as_deref()),
            None => placeholder.clone(),
        },
    }
}

/// Concatenate the element's text nodes, each trimmed, skipping blank ones.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Root-relative links are joined onto `base` with URL semantics; anything
/// else is kept as is. A protocol-relative `//host/path` keeps its own host
/// and takes the scheme of `base`.
fn resolve_link(value: &str, base: Option<&str>) -> String {
    match base {
        Some(base) if value.starts_with('/') => Url::parse(base)
            .and_then(|b| b.join(value))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{base}{value}")),
        _ => value.to_string(),
    }
}

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = raw, error = %e, "Skipping invalid selector");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bing_card(title: &str, snippet: &str) -> String {
        format!(
            r#"<div class="news-card"><a class="title" href="/x">{title}</a><div class="snippet">{snippet}</div></div>"#
        )
    }

    #[test]
    fn test_extracts_bing_cards() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            bing_card("Vote count begins", "Polls closed at 8pm."),
            bing_card("Turnout record", "Highest in decades.")
        );
        let document = Html::parse_document(&html);
        let headlines = extract(&document, &SourceSpec::bing_news(), 5);
        assert_eq!(
            headlines,
            vec![
                Headline::new("Vote count begins", "Polls closed at 8pm."),
                Headline::new("Turnout record", "Highest in decades."),
            ]
        );
    }

    #[test]
    fn test_caps_at_max_items() {
        let cards: String = (0..12)
            .map(|i| bing_card(&format!("Story {i}"), "text"))
            .collect();
        let document = Html::parse_document(&format!("<html><body>{cards}</body></html>"));
        let headlines = extract(&document, &SourceSpec::bing_news(), 5);
        assert_eq!(headlines.len(), 5);
        assert_eq!(headlines[0].title, "Story 0");
        assert_eq!(headlines[4].title, "Story 4");
    }

    #[test]
    fn test_no_matching_container_is_empty() {
        let document =
            Html::parse_document("<html><body><p>Nothing to see</p></body></html>");
        assert!(extract(&document, &SourceSpec::bing_news(), 5).is_empty());
        assert!(extract(&document, &SourceSpec::bbc_world(), 5).is_empty());
    }

    #[test]
    fn test_first_matching_selector_wins() {
        let html = r#"<html><body>
            <div class="t_s"><a>From t_s</a></div>
            <div class="news-card-newsitem"><a>From newsitem</a></div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let headlines = extract(&document, &SourceSpec::bing_news(), 5);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "From t_s");
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let html = r#"<html><body><div class="news-card"><span>bare</span></div></body></html>"#;
        let document = Html::parse_document(html);
        let headlines = extract(&document, &SourceSpec::bing_news(), 5);
        assert_eq!(headlines, vec![Headline::new("No Title", "No Description")]);
    }

    #[test]
    fn test_title_falls_back_to_any_anchor() {
        let html = r#"<html><body><div class="news-card">
            <a href="/y">  Plain   <b>anchor</b> </a>
            <div class="sn_snip">Alt snippet</div>
        </div></body></html>"#;
        let document = Html::parse_document(html);
        let headlines = extract(&document, &SourceSpec::bing_news(), 5);
        assert_eq!(headlines, vec![Headline::new("Plainanchor", "Alt snippet")]);
    }

    #[test]
    fn test_bbc_links_resolved() {
        let html = r#"<html><body>
            <a class="gs-c-promo-heading" href="/news/123">World leaders react</a>
            <a class="gs-c-promo-heading" href="https://example.com/story">Elsewhere</a>
            <a class="gs-c-promo-heading">No href here</a>
        </body></html>"#;
        let document = Html::parse_document(html);
        let headlines = extract(&document, &SourceSpec::bbc_world(), 5);
        assert_eq!(
            headlines,
            vec![
                Headline::new("World leaders react", "https://www.bbc.com/news/123"),
                Headline::new("Elsewhere", "https://example.com/story"),
                Headline::new("No href here", "No Link"),
            ]
        );
    }

    #[test]
    fn test_resolve_link_cases() {
        let base = Some("https://www.bbc.com");
        assert_eq!(resolve_link("/news/123", base), "https://www.bbc.com/news/123");
        assert_eq!(resolve_link("//cdn.example/x", base), "https://cdn.example/x");
        assert_eq!(resolve_link("news/123", base), "news/123");
        assert_eq!(resolve_link("/news/123", None), "/news/123");
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let mut spec = SourceSpec::bing_news();
        spec.containers.insert(0, "div[".to_string());
        let document = Html::parse_document(&format!(
            "<html><body>{}</body></html>",
            bing_card("Still found", "ok")
        ));
        let headlines = extract(&document, &spec, 5);
        assert_eq!(headlines, vec![Headline::new("Still found", "ok")]);
    }
}
