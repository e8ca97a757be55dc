//! Building URL templates with placeholder query parameters.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use url::{Url, form_urlencoded};

use super::engine::Replacer;

impl Replacer {
    /// Turn a URL into template text whose `params` query values are tokens.
    ///
    /// Each `(key, macro)` pair sets query parameter `key` to the placeholder
    /// for `macro`, left unescaped so the token survives. Other query values
    /// are escaped as usual. Keys are written in sorted order. If `raw` is not
    /// a valid URL it is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use macro_template::Replacer;
    ///
    /// let replacer = Replacer::default();
    /// let template = replacer.url_template(
    ///     "https://example.com/track?b=x+y&a=1",
    ///     &[("user", "user_id:urlquery")],
    /// );
    /// assert_eq!(template, "https://example.com/track?a=1&b=x+y&user=${user_id:urlquery}");
    /// ```
    pub fn url_template(&self, raw: &str, params: &[(&str, &str)]) -> String {
        let mut url = match Url::parse(raw) {
            Ok(url) => url,
            Err(err) => {
                warn!("url template: invalid url {raw:?}: {err}");
                return raw.to_owned();
            }
        };

        let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            query.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        let mut tokens = BTreeSet::new();
        for &(key, macro_name) in params {
            query.insert(key.to_owned(), vec![self.delimiters().placeholder(macro_name.trim())]);
            tokens.insert(key);
        }

        let mut rebuilt = String::new();
        for (key, values) in &query {
            let escaped_key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
            for value in values {
                if !rebuilt.is_empty() {
                    rebuilt.push('&');
                }
                rebuilt.push_str(&escaped_key);
                rebuilt.push('=');
                if tokens.contains(key.as_str()) {
                    rebuilt.push_str(value);
                } else {
                    rebuilt.extend(form_urlencoded::byte_serialize(value.as_bytes()));
                }
            }
        }

        url.set_query((!rebuilt.is_empty()).then_some(rebuilt.as_str()));
        url.to_string()
    }
}
