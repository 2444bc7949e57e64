//! Document collaborator: parsing and querying rendered pages.
//!
//! The session owns a parsed document handle between dispatches and reads
//! it only through `DocumentEngine`. `HtmlEngine` is the default engine,
//! backed by the `scraper` crate.

use crate::inputs::FieldValue;
use crate::result::{NavegarError, NavegarResult};
use scraper::{ElementRef, Html, Selector};

/// Parsing and query operations over rendered HTML
pub trait DocumentEngine {
    /// Parsed document handle owned by the session
    type Document;

    /// Parse a rendered page body.
    ///
    /// # Errors
    ///
    /// Returns an error when the body cannot be turned into a document.
    fn parse(&self, html: &str) -> NavegarResult<Self::Document>;

    /// Whether the rendered text contains `needle`
    fn contains_text(&self, doc: &Self::Document, needle: &str) -> bool;

    /// Whether any element matches the CSS selector
    ///
    /// # Errors
    ///
    /// Returns `Selector` for a malformed selector.
    fn has_element(&self, doc: &Self::Document, selector: &str) -> NavegarResult<bool>;

    /// Text content of the first element matching the CSS selector
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when nothing matches.
    fn element_text(&self, doc: &Self::Document, selector: &str) -> NavegarResult<String>;

    /// Destination of a link, located by CSS selector or by link text
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when no link matches.
    fn link_href(&self, doc: &Self::Document, link: &str) -> NavegarResult<String>;

    /// Whether the page has a submit control labelled `label`
    ///
    /// # Errors
    ///
    /// Returns `Selector` when the control query cannot be built.
    fn has_submit(&self, doc: &Self::Document, label: &str) -> NavegarResult<bool>;

    /// Scrape the current field values of the first form matching `form`
    ///
    /// # Errors
    ///
    /// Returns `FormNotFound` when no form matches.
    fn form_fields(
        &self,
        doc: &Self::Document,
        form: &str,
    ) -> NavegarResult<Vec<(String, FieldValue)>>;

    /// `action` attribute of the first form matching `form`
    ///
    /// # Errors
    ///
    /// Returns `FormNotFound` when no form matches.
    fn form_action(&self, doc: &Self::Document, form: &str) -> NavegarResult<Option<String>>;

    /// `method` attribute of the first form matching `form`
    ///
    /// # Errors
    ///
    /// Returns `FormNotFound` when no form matches.
    fn form_method(&self, doc: &Self::Document, form: &str) -> NavegarResult<Option<String>>;

    /// Current value of the named field, scraped from the document
    ///
    /// # Errors
    ///
    /// Returns `Selector` when the field query cannot be built.
    fn field_value(&self, doc: &Self::Document, name: &str) -> NavegarResult<Option<FieldValue>>;
}

/// Default document engine backed by the `scraper` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEngine;

impl HtmlEngine {
    /// Create the engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn selector(raw: &str) -> NavegarResult<Selector> {
        Selector::parse(raw).map_err(|e| NavegarError::Selector {
            message: format!("invalid selector '{raw}': {e}"),
        })
    }

    fn form_element<'a>(doc: &'a Html, raw: &str) -> NavegarResult<ElementRef<'a>> {
        let selector = Self::selector(raw)?;
        doc.select(&selector)
            .find(|el| el.value().name() == "form")
            .ok_or_else(|| NavegarError::FormNotFound {
                selector: raw.to_string(),
            })
    }

    fn scrape_control(el: ElementRef<'_>) -> Option<(String, FieldValue)> {
        let element = el.value();
        let name = element.attr("name")?.to_string();
        match element.name() {
            "input" => {
                let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "checkbox" => Some((name, FieldValue::Checked(element.attr("checked").is_some()))),
                    // Only a checked radio contributes its value
                    "radio" => element.attr("checked").map(|_| {
                        (name, FieldValue::text(element.attr("value").unwrap_or("")))
                    }),
                    "submit" | "button" | "reset" | "image" | "file" => None,
                    _ => Some((name, FieldValue::text(element.attr("value").unwrap_or("")))),
                }
            }
            "textarea" => Some((name, FieldValue::text(el.text().collect::<String>()))),
            "select" => {
                let options = Self::selector("option").ok()?;
                let options: Vec<ElementRef<'_>> = el.select(&options).collect();
                let chosen = options
                    .iter()
                    .find(|option| option.value().attr("selected").is_some())
                    .or_else(|| options.first())?;
                let value = chosen.value().attr("value").map_or_else(
                    || chosen.text().collect::<String>().trim().to_string(),
                    str::to_string,
                );
                Some((name, FieldValue::Selected(value)))
            }
            _ => None,
        }
    }
}

impl DocumentEngine for HtmlEngine {
    type Document = Html;

    fn parse(&self, html: &str) -> NavegarResult<Html> {
        Ok(Html::parse_document(html))
    }

    fn contains_text(&self, doc: &Html, needle: &str) -> bool {
        doc.root_element().text().collect::<String>().contains(needle)
    }

    fn has_element(&self, doc: &Html, selector: &str) -> NavegarResult<bool> {
        let selector = Self::selector(selector)?;
        Ok(doc.select(&selector).next().is_some())
    }

    fn element_text(&self, doc: &Html, selector: &str) -> NavegarResult<String> {
        let parsed = Self::selector(selector)?;
        doc.select(&parsed)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| NavegarError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn link_href(&self, doc: &Html, link: &str) -> NavegarResult<String> {
        // Selector match first; plain link text as the fallback.
        if let Ok(selector) = Selector::parse(link) {
            if let Some(href) = doc
                .select(&selector)
                .find_map(|el| el.value().attr("href"))
            {
                return Ok(href.to_string());
            }
        }
        let anchors = Self::selector("a")?;
        doc.select(&anchors)
            .find(|el| el.text().collect::<String>().trim() == link)
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string)
            .ok_or_else(|| NavegarError::ElementNotFound {
                selector: link.to_string(),
            })
    }

    fn has_submit(&self, doc: &Html, label: &str) -> NavegarResult<bool> {
        let controls = Self::selector("button, input[type=\"submit\"]")?;
        Ok(doc.select(&controls).any(|el| match el.value().name() {
            "button" => el.text().collect::<String>().trim() == label,
            _ => el.value().attr("value") == Some(label),
        }))
    }

    fn form_fields(&self, doc: &Html, form: &str) -> NavegarResult<Vec<(String, FieldValue)>> {
        let form = Self::form_element(doc, form)?;
        let controls = Self::selector("input, textarea, select")?;
        Ok(form
            .select(&controls)
            .filter_map(Self::scrape_control)
            .collect())
    }

    fn form_action(&self, doc: &Html, form: &str) -> NavegarResult<Option<String>> {
        let form = Self::form_element(doc, form)?;
        Ok(form.value().attr("action").map(str::to_string))
    }

    fn form_method(&self, doc: &Html, form: &str) -> NavegarResult<Option<String>> {
        let form = Self::form_element(doc, form)?;
        Ok(form.value().attr("method").map(str::to_string))
    }

    fn field_value(&self, doc: &Html, name: &str) -> NavegarResult<Option<FieldValue>> {
        let selector = Self::selector(&format!("[name=\"{name}\"]"))?;
        Ok(doc.select(&selector).find_map(Self::scrape_control).map(|(_, value)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNUP_PAGE: &str = r#"
        <html><body>
            <h1>Sign up</h1>
            <a href="/login">Already registered?</a>
            <a class="home" href="/">Home</a>
            <form action="/register" method="post">
                <input type="text" name="name" value="prefilled" />
                <input type="password" name="password" />
                <input type="checkbox" name="tos" checked />
                <input type="radio" name="plan" value="free" />
                <input type="radio" name="plan" value="pro" checked />
                <select name="country">
                    <option value="se">Sweden</option>
                    <option value="no" selected>Norway</option>
                </select>
                <textarea name="bio">hello</textarea>
                <input type="submit" name="go" value="Register" />
            </form>
        </body></html>
    "#;

    fn engine_and_doc() -> (HtmlEngine, Html) {
        let engine = HtmlEngine::new();
        let doc = engine.parse(SIGNUP_PAGE).unwrap();
        (engine, doc)
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_contains_text() {
            let (engine, doc) = engine_and_doc();
            assert!(engine.contains_text(&doc, "Sign up"));
            assert!(!engine.contains_text(&doc, "Log out"));
        }

        #[test]
        fn test_has_element() {
            let (engine, doc) = engine_and_doc();
            assert!(engine.has_element(&doc, "h1").unwrap());
            assert!(engine.has_element(&doc, "form[action=\"/register\"]").unwrap());
            assert!(!engine.has_element(&doc, "table").unwrap());
        }

        #[test]
        fn test_element_text() {
            let (engine, doc) = engine_and_doc();
            assert_eq!(engine.element_text(&doc, "h1").unwrap(), "Sign up");
            let err = engine.element_text(&doc, "h2").unwrap_err();
            assert!(matches!(err, NavegarError::ElementNotFound { .. }));
        }

        #[test]
        fn test_invalid_selector_reported() {
            let (engine, doc) = engine_and_doc();
            let err = engine.has_element(&doc, "[[broken").unwrap_err();
            assert!(matches!(err, NavegarError::Selector { .. }));
        }
    }

    mod link_tests {
        use super::*;

        #[test]
        fn test_link_by_text() {
            let (engine, doc) = engine_and_doc();
            assert_eq!(engine.link_href(&doc, "Already registered?").unwrap(), "/login");
        }

        #[test]
        fn test_link_by_selector() {
            let (engine, doc) = engine_and_doc();
            assert_eq!(engine.link_href(&doc, "a.home").unwrap(), "/");
        }

        #[test]
        fn test_link_not_found() {
            let (engine, doc) = engine_and_doc();
            let err = engine.link_href(&doc, "Sign out").unwrap_err();
            assert!(matches!(err, NavegarError::ElementNotFound { .. }));
        }
    }

    mod form_tests {
        use super::*;

        #[test]
        fn test_form_action_and_method() {
            let (engine, doc) = engine_and_doc();
            assert_eq!(engine.form_action(&doc, "form").unwrap().as_deref(), Some("/register"));
            assert_eq!(engine.form_method(&doc, "form").unwrap().as_deref(), Some("post"));
        }

        #[test]
        fn test_form_not_found() {
            let (engine, doc) = engine_and_doc();
            let err = engine.form_fields(&doc, "#missing").unwrap_err();
            assert!(matches!(err, NavegarError::FormNotFound { .. }));
        }

        #[test]
        fn test_scrapes_text_checkbox_radio_select_textarea() {
            let (engine, doc) = engine_and_doc();
            let fields = engine.form_fields(&doc, "form").unwrap();
            let get = |name: &str| {
                fields
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
            };
            assert_eq!(get("name"), Some(FieldValue::text("prefilled")));
            assert_eq!(get("password"), Some(FieldValue::text("")));
            assert_eq!(get("tos"), Some(FieldValue::Checked(true)));
            // Only the checked radio contributes
            assert_eq!(get("plan"), Some(FieldValue::text("pro")));
            assert_eq!(get("country"), Some(FieldValue::Selected("no".to_string())));
            assert_eq!(get("bio"), Some(FieldValue::text("hello")));
            // Submit controls are not form data
            assert_eq!(get("go"), None);
        }

        #[test]
        fn test_select_defaults_to_first_option() {
            let engine = HtmlEngine::new();
            let doc = engine
                .parse("<form><select name=\"c\"><option value=\"a\">A</option><option value=\"b\">B</option></select></form>")
                .unwrap();
            let fields = engine.form_fields(&doc, "form").unwrap();
            assert_eq!(fields, vec![("c".to_string(), FieldValue::Selected("a".to_string()))]);
        }

        #[test]
        fn test_field_value_lookup() {
            let (engine, doc) = engine_and_doc();
            assert_eq!(
                engine.field_value(&doc, "name").unwrap(),
                Some(FieldValue::text("prefilled"))
            );
            assert_eq!(engine.field_value(&doc, "nope").unwrap(), None);
        }

        #[test]
        fn test_has_submit() {
            let (engine, doc) = engine_and_doc();
            assert!(engine.has_submit(&doc, "Register").unwrap());
            assert!(!engine.has_submit(&doc, "Delete").unwrap());
        }
    }
}
