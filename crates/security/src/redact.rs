//! Reversible PII masking.
//!
//! Phone numbers are replaced first across the whole text, then email
//! addresses across the phone-masked text. Every match gets a `<CLASS_n>`
//! placeholder where `n` is one counter shared by both classes, so the
//! placeholders of one call are pairwise distinct.
//!
//! Placeholder-shaped text already present in the input is reserved: the
//! counter skips any `n` whose placeholder the input contains, so unmasking
//! never rewrites text the user typed.
//!
//! A [`Redactor`] holds only compiled patterns. The [`RedactionMap`] is
//! returned to the caller, so concurrent requests never share state.

use regex_lite::Regex;

use cxbot_core::{Error, Result};

/// Optional `+`, a digit, then at least seven digits, spaces or hyphens.
const PHONE_PATTERN: &str = r"\b\+?\d[\d\s\-]{7,}\b";

/// `local@domain.suffix`, with dotted suffixes allowed.
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+";

/// Anything shaped like a placeholder this module issues.
const PLACEHOLDER_PATTERN: &str = r"<(?:PHONE|EMAIL)_\d+>";

/// The kinds of personal data the redactor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiClass {
    Phone,
    Email,
}

impl PiiClass {
    /// Placeholder prefix, e.g. `PHONE` in `<PHONE_1>`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
        }
    }
}

/// Placeholder → original value, in the order the placeholders were issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionMap {
    entries: Vec<(String, String)>,
    counter: usize,
    reserved: Vec<String>,
}

impl RedactionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original value for a placeholder, if it was issued.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == placeholder)
            .map(|(_, value)| value.as_str())
    }

    /// `(placeholder, original)` pairs in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Mark a literal found in the input so it is never issued.
    fn reserve(&mut self, literal: &str) {
        if !self.reserved.iter().any(|r| r == literal) {
            self.reserved.push(literal.to_string());
        }
    }

    /// Issue the next free placeholder for `original` and record it.
    fn issue(&mut self, class: PiiClass, original: &str) -> String {
        loop {
            self.counter += 1;
            let placeholder = format!("<{}_{}>", class.label(), self.counter);
            if !self.reserved.contains(&placeholder) {
                self.entries.push((placeholder.clone(), original.to_string()));
                return placeholder;
            }
        }
    }
}

/// Masks and restores phone numbers and email addresses.
#[derive(Debug, Clone)]
pub struct Redactor {
    phone: Regex,
    email: Regex,
    placeholder: Regex,
}

impl Redactor {
    /// Compile the detection patterns.
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::config(format!("invalid PII pattern '{pattern}': {e}")))
        };
        Ok(Self {
            phone: compile(PHONE_PATTERN)?,
            email: compile(EMAIL_PATTERN)?,
            placeholder: compile(PLACEHOLDER_PATTERN)?,
        })
    }

    /// Replace every phone number, then every email address, with a
    /// placeholder. Text without PII comes back unchanged with an empty map.
    pub fn mask(&self, text: &str) -> (String, RedactionMap) {
        let mut map = RedactionMap::new();
        let masked = self.mask_into(text, &mut map);
        (masked, map)
    }

    /// Mask `text` continuing the numbering of an existing map, so several
    /// texts bound for one prompt share distinct placeholders.
    pub fn mask_into(&self, text: &str, map: &mut RedactionMap) -> String {
        for literal in self.placeholder.find_iter(text) {
            map.reserve(literal.as_str());
        }

        let before = map.len();
        let masked = Self::replace_class(&self.phone, PiiClass::Phone, text, map);
        let masked = Self::replace_class(&self.email, PiiClass::Email, &masked, map);

        if map.len() > before {
            tracing::debug!(redactions = map.len() - before, "Masked PII in text");
        }
        masked
    }

    /// Put the original values back.
    ///
    /// Placeholders missing from `text` are skipped; anything the model
    /// invented that is not in the map stays as written.
    pub fn unmask(&self, text: &str, map: &RedactionMap) -> String {
        let mut restored = text.to_string();
        for (placeholder, original) in map.iter() {
            if restored.contains(placeholder) {
                restored = restored.replace(placeholder, original);
            }
        }
        restored
    }

    fn replace_class(
        pattern: &Regex,
        class: PiiClass,
        text: &str,
        map: &mut RedactionMap,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in pattern.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&map.issue(class, m.as_str()));
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redactor() -> Redactor {
        Redactor::new().unwrap()
    }

    #[test]
    fn text_without_pii_is_untouched() {
        let r = redactor();
        for text in [
            "",
            "where is my latte?",
            "order 1234 arrived",
            "meet at 5 pm",
            "email me later",
        ] {
            let (masked, map) = r.mask(text);
            assert_eq!(masked, text);
            assert!(map.is_empty(), "unexpected redaction in {text:?}");
        }
    }

    #[test]
    fn phone_and_email_share_one_counter() {
        let r = redactor();
        let text = "call me at 555-123-4567 or a@b.com";
        let (masked, map) = r.mask(text);

        assert_eq!(map.len(), 2);
        assert!(masked.contains("<PHONE_1>"));
        assert!(masked.contains("<EMAIL_2>"));
        assert!(!masked.contains("555"));
        assert!(!masked.contains("a@b.com"));
        assert_eq!(map.get("<PHONE_1>").map(str::trim), Some("555-123-4567"));
        assert_eq!(map.get("<EMAIL_2>"), Some("a@b.com"));

        assert_eq!(r.unmask(&masked, &map), text);
    }

    #[test]
    fn phones_are_numbered_before_emails() {
        let r = redactor();
        let (masked, map) = r.mask("x@y.org then +44 20 7946 0958");
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["<PHONE_1>", "<EMAIL_2>"]);
        assert!(masked.starts_with("<EMAIL_2>"));
    }

    #[test]
    fn placeholders_are_unique_within_one_call() {
        let r = redactor();
        let text = "a@b.com, c@d.net, 555 123 4567, 555 765 4321, e@f.io";
        let (_, map) = r.mask(text);
        let mut keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        let issued = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), issued);
        assert_eq!(issued, 5);
    }

    #[test]
    fn round_trip_restores_original() {
        let r = redactor();
        for text in [
            "reach me on +1 415 555 0100 please",
            "my emails are first.last+tag@shop.co.uk and x@y.io",
            "call 0800-123-456 and then 0800 654 321, or ping ops@store.example",
            "nothing sensitive here",
        ] {
            let (masked, map) = r.mask(text);
            assert_eq!(r.unmask(&masked, &map), text);
        }
    }

    #[test]
    fn unmask_tolerates_missing_placeholders() {
        let r = redactor();
        let (_, map) = r.mask("call 555-123-4567 or mail a@b.com");

        assert_eq!(r.unmask("Sure, I can help.", &map), "Sure, I can help.");
        assert_eq!(r.unmask("Mailing <EMAIL_2> now", &map), "Mailing a@b.com now");
        assert_eq!(r.unmask("Ask <EMAIL_9>", &map), "Ask <EMAIL_9>");
    }

    #[test]
    fn unmask_replaces_every_occurrence() {
        let r = redactor();
        let (_, map) = r.mask("a@b.com");
        assert_eq!(
            r.unmask("<EMAIL_1> and again <EMAIL_1>", &map),
            "a@b.com and again a@b.com"
        );
    }

    #[test]
    fn separate_calls_restart_numbering() {
        let r = redactor();
        let (_, first) = r.mask("a@b.com");
        let (_, second) = r.mask("c@d.com");
        assert_eq!(first.get("<EMAIL_1>"), Some("a@b.com"));
        assert_eq!(second.get("<EMAIL_1>"), Some("c@d.com"));
    }

    #[test]
    fn typed_placeholder_is_not_reissued() {
        let r = redactor();
        let text = "my ticket says <PHONE_1>, call 555-123-4567";
        let (masked, map) = r.mask(text);

        assert_eq!(masked, "my ticket says <PHONE_1>, call <PHONE_2>");
        assert_eq!(map.get("<PHONE_1>"), None);
        assert_eq!(map.get("<PHONE_2>"), Some("555-123-4567"));
        assert_eq!(r.unmask(&masked, &map), text);
    }

    #[test]
    fn reserved_placeholders_are_skipped() {
        let r = redactor();
        let text = "see <EMAIL_2> and <PHONE_3>; I am a@b.com, 555-123-4567";
        let (masked, map) = r.mask(text);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["<PHONE_1>", "<EMAIL_3>"]);
        assert_eq!(r.unmask(&masked, &map), text);
    }

    #[test]
    fn mask_into_continues_the_counter() {
        let r = redactor();
        let (_, mut map) = r.mask("a@b.com");
        let second = r.mask_into("User c@d.com", &mut map);

        assert_eq!(second, "User <EMAIL_2>");
        assert_eq!(map.len(), 2);
        assert_eq!(r.unmask("<EMAIL_1> <EMAIL_2>", &map), "a@b.com c@d.com");
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        let r = redactor();
        let (masked, map) = r.mask("table 12, order 4455");
        assert!(map.is_empty());
        assert_eq!(masked, "table 12, order 4455");
    }
}
