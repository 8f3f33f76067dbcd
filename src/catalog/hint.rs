//! Write-time hint scraped from the catalog's admin markup.
//!
//! The admin page has no documented contract. Everything here is best effort and
//! a missing hint is a normal outcome.

use scraper::{Html, Selector};

/// Value of the `selected` option of the first `<select>` matching `selector`,
/// or of its first option when nothing is selected.
pub fn parse_hint(html: &str, selector: &str) -> Option<String> {
    let select_selector = match Selector::parse(selector) {
        Ok(s) => s,
        Err(err) => {
            log::warn!("invalid hint selector {selector:?}: {err:?}");
            return None;
        }
    };
    let option_selector = Selector::parse("option").ok()?;

    let document = Html::parse_document(html);
    let select = document.select(&select_selector).next()?;

    let options: Vec<_> = select.select(&option_selector).collect();
    let chosen = options
        .iter()
        .find(|opt| opt.value().attr("selected").is_some())
        .or_else(|| options.first())?;

    let value = chosen
        .value()
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| chosen.text().collect::<String>());

    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
