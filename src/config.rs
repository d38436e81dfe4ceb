//! Builds the locale identifiers handed to the formatting engine.

/// Used whenever no usable locale code was supplied and the OS has no
/// resolvable locale either.
pub const DEFAULT_LOCALE: &str = "en-US";

/// The OS-resolved locale identifier, falling back to [`DEFAULT_LOCALE`].
pub fn system_locale() -> String {
    sys_locale::get_locale().unwrap_or_else(|| DEFAULT_LOCALE.to_owned())
}

/// Maps (codes, numbering override, calendar override) to the identifiers
/// the formatting engine accepts, in fallback order.
///
/// An empty code list resolves to the system locale. When either override is
/// present every identifier gets a `-u` extension with a `ca` and/or `nu`
/// keyword appended.
///
/// Known limitation: the tags are passed to the engine as-is and are not
/// guaranteed to change its output, and they do not survive parsing — use
/// [`strip_extensions`] before interpreting formatted text back into data.
pub fn config_strings(
    codes: &[String],
    numbering: Option<&str>,
    calendar: Option<&str>,
) -> Vec<String> {
    let codes: Vec<String> = if codes.is_empty() {
        vec![system_locale()]
    } else {
        codes.to_vec()
    };

    if numbering.is_none() && calendar.is_none() {
        return codes;
    }

    codes
        .into_iter()
        .map(|code| {
            let mut tagged = code;
            tagged.push_str("-u");
            if let Some(cal) = calendar {
                tagged.push_str("-ca-");
                tagged.push_str(cal);
            }
            if let Some(nums) = numbering {
                tagged.push_str("-nu-");
                tagged.push_str(nums);
            }
            tagged
        })
        .collect()
}

/// Drops the `-u-…` extension sequence from a configuration string, leaving
/// the bare identifier.
pub fn strip_extensions(config: &str) -> &str {
    match config.find("-u-") {
        Some(idx) => &config[..idx],
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_overrides_passes_codes_through() {
        let out = config_strings(&codes(&["fr-CA", "fr"]), None, None);
        assert_eq!(out, vec!["fr-CA".to_string(), "fr".to_string()]);
    }

    #[test]
    fn calendar_override_tags_every_code() {
        let out = config_strings(&codes(&["en-US", "en"]), None, Some("buddhist"));
        assert_eq!(
            out,
            vec![
                "en-US-u-ca-buddhist".to_string(),
                "en-u-ca-buddhist".to_string()
            ]
        );
    }

    #[test]
    fn both_overrides_tag_calendar_before_numbering() {
        let out = config_strings(&codes(&["th"]), Some("thai"), Some("buddhist"));
        assert_eq!(out, vec!["th-u-ca-buddhist-nu-thai".to_string()]);
    }

    #[test]
    fn numbering_override_alone() {
        let out = config_strings(&codes(&["ar"]), Some("arab"), None);
        assert_eq!(out, vec!["ar-u-nu-arab".to_string()]);
    }

    #[test]
    fn empty_code_list_resolves_to_a_real_identifier() {
        let out = config_strings(&[], None, None);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_empty());
    }

    #[test]
    fn strip_extensions_recovers_the_bare_identifier() {
        assert_eq!(strip_extensions("th-u-ca-buddhist-nu-thai"), "th");
        assert_eq!(strip_extensions("en-US-u-nu-arab"), "en-US");
        assert_eq!(strip_extensions("en-US"), "en-US");
    }
}
