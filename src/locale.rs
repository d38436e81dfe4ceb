//! Locale identity, the process-wide locale cache, and per-locale name
//! tables.
//!
//! A [`Locale`] is an immutable value: the requested identifier list plus
//! optional numbering-system and calendar overrides. Locales are interned in
//! a process-wide cache keyed on that triple, so two resolutions of the same
//! configuration hand back the same `Arc<Locale>` and share its lazily
//! computed name tables. Tables are derived by formatting fixed reference
//! instants through the engine and extracting one field from the decomposed
//! output, which keeps this crate free of bundled locale data.

use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{self, DEFAULT_LOCALE};
use crate::engine::{DateFormatter, NumberFormatter};
use crate::error::FormatError;
use crate::instant::Instant;
use crate::options::{Context, FieldKind, FieldLength, FieldOptions, NumberOptions};
use crate::sampler;

/// Constructor arguments for [`Locale::from_options`].
#[derive(Debug, Clone, Default)]
pub struct LocaleOptions {
    pub code: Option<String>,
    pub numbering: Option<String>,
    pub calendar: Option<String>,
}

/// Partial replacement triple for [`Locale::clone_with`]. A `None` field
/// keeps the receiver's value.
#[derive(Debug, Clone, Default)]
pub struct LocaleOverrides {
    pub codes: Option<Vec<String>>,
    pub numbering: Option<String>,
    pub calendar: Option<String>,
}

/// An interning cache from normalized locale configuration to a shared
/// [`Locale`].
///
/// Most callers want [`global_cache`]; a separate instance is useful in
/// tests and in hosts that need to bound or drop cached locales.
pub struct LocaleCache {
    map: Mutex<FxHashMap<String, Arc<Locale>>>,
}

impl LocaleCache {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(FxHashMap::default()),
        }
    }

    /// Get-or-create the locale for this configuration. Empty codes and
    /// empty override strings are treated as absent; no code at all resolves
    /// to [`DEFAULT_LOCALE`].
    pub fn resolve(
        &self,
        codes: &[String],
        numbering: Option<&str>,
        calendar: Option<&str>,
    ) -> Arc<Locale> {
        let mut codes: Vec<String> = codes.iter().filter(|c| !c.is_empty()).cloned().collect();
        if codes.is_empty() {
            codes.push(DEFAULT_LOCALE.to_owned());
        }
        let numbering = numbering.filter(|s| !s.is_empty());
        let calendar = calendar.filter(|s| !s.is_empty());

        // Neither ',' nor '|' can occur in a BCP-47 subtag, so this key is
        // collision-free.
        let key = format!(
            "{}|{}|{}",
            codes.join(","),
            numbering.unwrap_or(""),
            calendar.unwrap_or("")
        );

        let mut map = self.map.lock();
        if let Some(locale) = map.get(&key) {
            return Arc::clone(locale);
        }
        debug!(key = %key, "locale cache miss");
        let locale = Arc::new(Locale::build(
            codes,
            numbering.map(str::to_owned),
            calendar.map(str::to_owned),
        ));
        map.insert(key, Arc::clone(&locale));
        locale
    }

    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }

    pub fn clear(&self) {
        self.map.lock().clear();
    }
}

impl Default for LocaleCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide locale cache. Entries live for the life of the process.
pub fn global_cache() -> &'static LocaleCache {
    static CACHE: OnceLock<LocaleCache> = OnceLock::new();
    CACHE.get_or_init(LocaleCache::new)
}

fn cached_table<K: Hash + Eq + Copy>(
    cache: &Mutex<FxHashMap<K, Arc<[String]>>>,
    key: K,
    compute: impl FnOnce() -> Result<Vec<String>, FormatError>,
) -> Result<Arc<[String]>, FormatError> {
    if let Some(table) = cache.lock().get(&key) {
        return Ok(Arc::clone(table));
    }
    // Computed outside the lock; a racing thread may compute the same table,
    // in which case the first insert wins and the duplicate is dropped.
    let table: Arc<[String]> = compute()?.into();
    let mut map = cache.lock();
    let entry = map.entry(key).or_insert(table);
    Ok(Arc::clone(entry))
}

/// One locale configuration plus its lazily computed field-name tables.
///
/// Obtained as `Arc<Locale>` through [`Locale::create`],
/// [`Locale::from_options`] or [`Locale::clone_with`], all of which intern
/// through [`global_cache`]. Equal configurations are pointer-equal.
pub struct Locale {
    codes: Vec<String>,
    numbering: Option<String>,
    calendar: Option<String>,
    config: Vec<String>,
    months_cache: Mutex<FxHashMap<(Context, FieldLength), Arc<[String]>>>,
    weekdays_cache: Mutex<FxHashMap<(Context, FieldLength), Arc<[String]>>>,
    meridiems_cache: Mutex<FxHashMap<FieldLength, Arc<[String]>>>,
    eras_cache: Mutex<FxHashMap<FieldLength, Arc<[String]>>>,
}

impl Locale {
    fn build(codes: Vec<String>, numbering: Option<String>, calendar: Option<String>) -> Self {
        let config = config::config_strings(&codes, numbering.as_deref(), calendar.as_deref());
        Self {
            codes,
            numbering,
            calendar,
            config,
            months_cache: Mutex::new(FxHashMap::default()),
            weekdays_cache: Mutex::new(FxHashMap::default()),
            meridiems_cache: Mutex::new(FxHashMap::default()),
            eras_cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Resolves a locale through the global cache.
    pub fn create(
        code: Option<&str>,
        numbering: Option<&str>,
        calendar: Option<&str>,
    ) -> Arc<Locale> {
        let codes: Vec<String> = code.into_iter().map(str::to_owned).collect();
        global_cache().resolve(&codes, numbering, calendar)
    }

    pub fn from_options(opts: &LocaleOptions) -> Arc<Locale> {
        Locale::create(
            opts.code.as_deref(),
            opts.numbering.as_deref(),
            opts.calendar.as_deref(),
        )
    }

    /// A locale like this one with some fields replaced. Resolves through
    /// the global cache, so overriding nothing hands back the same `Arc`.
    pub fn clone_with(&self, overrides: &LocaleOverrides) -> Arc<Locale> {
        let codes = overrides.codes.as_deref().unwrap_or(&self.codes);
        let numbering = overrides
            .numbering
            .as_deref()
            .or(self.numbering.as_deref());
        let calendar = overrides
            .calendar
            .as_deref()
            .or(self.calendar.as_deref());
        global_cache().resolve(codes, numbering, calendar)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn numbering(&self) -> Option<&str> {
        self.numbering.as_deref()
    }

    pub fn calendar(&self) -> Option<&str> {
        self.calendar.as_deref()
    }

    /// The engine identifiers this locale formats through, in fallback
    /// order.
    pub fn config(&self) -> &[String] {
        &self.config
    }

    /// Twelve month names in calendar order.
    ///
    /// With `format_context` the names are sampled alongside a day number,
    /// so declension-heavy locales yield the in-text (genitive) form;
    /// without it the bare standalone form. The two contexts are cached
    /// independently.
    pub fn months(
        &self,
        length: FieldLength,
        format_context: bool,
    ) -> Result<Arc<[String]>, FormatError> {
        let context = if format_context {
            Context::Format
        } else {
            Context::Standalone
        };
        cached_table(&self.months_cache, (context, length), || {
            debug!(?context, ?length, "computing month table");
            let opts = FieldOptions {
                month: Some(length),
                day: format_context,
                ..Default::default()
            };
            sampler::map_months(|inst| self.extract(inst, &opts, FieldKind::Month))
        })
    }

    /// Seven weekday names, Sunday first.
    pub fn weekdays(
        &self,
        length: FieldLength,
        format_context: bool,
    ) -> Result<Arc<[String]>, FormatError> {
        let context = if format_context {
            Context::Format
        } else {
            Context::Standalone
        };
        cached_table(&self.weekdays_cache, (context, length), || {
            debug!(?context, ?length, "computing weekday table");
            let opts = if format_context {
                FieldOptions {
                    weekday: Some(length),
                    year: true,
                    month: Some(FieldLength::Long),
                    day: true,
                    ..Default::default()
                }
            } else {
                FieldOptions {
                    weekday: Some(length),
                    ..Default::default()
                }
            };
            sampler::map_weekdays(|inst| self.extract(inst, &opts, FieldKind::Weekday))
        })
    }

    /// The two day-period names, AM first.
    pub fn meridiems(&self, length: FieldLength) -> Result<Arc<[String]>, FormatError> {
        cached_table(&self.meridiems_cache, length, || {
            debug!(?length, "computing meridiem table");
            let opts = FieldOptions {
                hour: true,
                day_period: Some(length),
                ..Default::default()
            };
            sampler::map_meridiems(|inst| self.extract(inst, &opts, FieldKind::DayPeriod))
        })
    }

    /// The two era names, BC first.
    pub fn eras(&self, length: FieldLength) -> Result<Arc<[String]>, FormatError> {
        cached_table(&self.eras_cache, length, || {
            debug!(?length, "computing era table");
            let opts = FieldOptions {
                year: true,
                era: Some(length),
                ..Default::default()
            };
            sampler::map_eras(|inst| self.extract(inst, &opts, FieldKind::Era))
        })
    }

    /// Formats `instant` with `opts` and returns the single output part of
    /// the requested kind. Asking for a field the options did not request is
    /// a caller bug and fails loudly rather than producing an empty string.
    pub fn extract(
        &self,
        instant: &Instant,
        opts: &FieldOptions,
        field: FieldKind,
    ) -> Result<String, FormatError> {
        let (formatter, timestamp) = self.date_formatter(instant, opts)?;
        let parts = formatter.format_to_parts(timestamp)?;
        parts
            .into_iter()
            .find(|part| part.kind == field)
            .map(|part| part.value)
            .ok_or(FormatError::MissingPart(field))
    }

    /// Builds a date formatter for this locale, `opts` and the instant's
    /// zone, together with the timestamp to feed it.
    ///
    /// A universal instant has no zone the engine could understand, so its
    /// wall-clock fields are projected as if they were UTC; zone-sensitive
    /// output is not meaningful in that case.
    pub fn date_formatter(
        &self,
        instant: &Instant,
        opts: &FieldOptions,
    ) -> Result<(DateFormatter, DateTime<Utc>), FormatError> {
        if instant.zone().is_universal() {
            let formatter = DateFormatter::try_new(&self.config, opts, None)?;
            Ok((formatter, instant.as_if_utc()))
        } else {
            let tz = instant.zone().resolve()?;
            let formatter = DateFormatter::try_new(&self.config, opts, tz)?;
            Ok((formatter, instant.to_utc()?))
        }
    }

    /// Builds a number formatter for this locale. Formatters are cheap and
    /// constructed per call; only name tables are cached.
    pub fn number_formatter(&self, opts: NumberOptions) -> Result<NumberFormatter, FormatError> {
        NumberFormatter::try_new(&self.config, opts)
    }
}
