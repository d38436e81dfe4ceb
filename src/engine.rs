//! Adapter over the underlying formatting engine (ICU4X).
//!
//! The locale layer never talks to ICU4X directly; it hands this module a
//! set of configuration strings plus field options and gets back a formatter
//! that can render a timestamp either as a plain string or decomposed into
//! typed parts. Field options are translated into a CLDR pattern: a named
//! field requested on its own uses the standalone symbol (`L`, `c`), a field
//! accompanied by other date fields uses the format symbol (`M`, `E`), which
//! is how the grammatical-context axis reaches the engine.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use fixed_decimal::{Decimal, FloatPrecision, SignedRoundingMode, UnsignedRoundingMode};
use icu::calendar::{Date, Gregorian};
use icu::datetime::DateTimeFormatterPreferences;
use icu::datetime::input::{DateTime as EngineDateTime, Time};
use icu::datetime::parts as datetime_parts;
use icu::datetime::pattern::{
    DateTimePattern, DayPeriodNameLength, FixedCalendarDateTimeNames, MonthNameLength,
    WeekdayNameLength, YearNameLength,
};
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::{DecimalFormatter, DecimalFormatterPreferences};
use icu::locale::Locale as IcuLocale;
use writeable::{Part, PartsWrite, TryWriteable};

use crate::error::FormatError;
use crate::options::{FieldKind, FieldLength, FieldOptions, NumberOptions};

fn engine_err(e: impl fmt::Display) -> FormatError {
    FormatError::Engine(e.to_string())
}

/// One typed span of formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPart {
    pub kind: FieldKind,
    pub value: String,
}

/// Everything derived from a [`FieldOptions`] set before touching the
/// engine: the pattern string plus which name tables it needs loaded.
#[derive(Debug, Default)]
struct FieldPlan {
    pattern: String,
    month: Option<MonthNameLength>,
    weekday: Option<WeekdayNameLength>,
    era: Option<YearNameLength>,
    day_period: Option<DayPeriodNameLength>,
    numeric: bool,
}

fn symbol_run(symbol: char, count: usize) -> String {
    symbol.to_string().repeat(count)
}

fn plan(opts: &FieldOptions) -> Result<FieldPlan, FormatError> {
    let mut plan = FieldPlan::default();

    let month_standalone = opts.weekday.is_none() && !opts.day && !opts.year;
    let weekday_standalone = opts.month.is_none() && !opts.day && !opts.year;

    let mut pattern = String::new();
    if let Some(width) = opts.weekday {
        let run = match width {
            FieldLength::Long => 4,
            FieldLength::Short => 3,
            FieldLength::Narrow => 5,
            FieldLength::Numeric => {
                return Err(FormatError::Unsupported("numeric weekday names"));
            }
        };
        pattern.push_str(&symbol_run(if weekday_standalone { 'c' } else { 'E' }, run));
        plan.weekday = Some(match (width, weekday_standalone) {
            (FieldLength::Long, false) => WeekdayNameLength::Wide,
            (FieldLength::Short, false) => WeekdayNameLength::Abbreviated,
            (FieldLength::Narrow, false) => WeekdayNameLength::Narrow,
            (FieldLength::Long, true) => WeekdayNameLength::StandaloneWide,
            (FieldLength::Short, true) => WeekdayNameLength::StandaloneAbbreviated,
            (FieldLength::Narrow, true) => WeekdayNameLength::StandaloneNarrow,
            (FieldLength::Numeric, _) => unreachable!(),
        });
    }

    let mut date = String::new();
    if let Some(width) = opts.month {
        let symbol = if month_standalone { 'L' } else { 'M' };
        match width {
            FieldLength::Numeric => {
                date.push(symbol);
                plan.month = Some(if month_standalone {
                    MonthNameLength::StandaloneNumeric
                } else {
                    MonthNameLength::Numeric
                });
                plan.numeric = true;
            }
            _ => {
                let run = match width {
                    FieldLength::Long => 4,
                    FieldLength::Short => 3,
                    _ => 5,
                };
                date.push_str(&symbol_run(symbol, run));
                plan.month = Some(match (width, month_standalone) {
                    (FieldLength::Long, false) => MonthNameLength::Wide,
                    (FieldLength::Short, false) => MonthNameLength::Abbreviated,
                    (FieldLength::Narrow, false) => MonthNameLength::Narrow,
                    (FieldLength::Long, true) => MonthNameLength::StandaloneWide,
                    (FieldLength::Short, true) => MonthNameLength::StandaloneAbbreviated,
                    (FieldLength::Narrow, true) => MonthNameLength::StandaloneNarrow,
                    (FieldLength::Numeric, _) => unreachable!(),
                });
            }
        }
    }
    if opts.day {
        if !date.is_empty() {
            date.push(' ');
        }
        date.push('d');
        plan.numeric = true;
    }
    if opts.year {
        if !date.is_empty() {
            date.push_str(", ");
        }
        date.push('y');
        plan.numeric = true;
    }
    if let Some(width) = opts.era {
        let run = match width {
            FieldLength::Long => 4,
            FieldLength::Short => 1,
            FieldLength::Narrow => 5,
            FieldLength::Numeric => return Err(FormatError::Unsupported("numeric era names")),
        };
        if !date.is_empty() {
            date.push(' ');
        }
        date.push_str(&symbol_run('G', run));
        plan.era = Some(match width {
            FieldLength::Long => YearNameLength::Wide,
            FieldLength::Short => YearNameLength::Abbreviated,
            _ => YearNameLength::Narrow,
        });
    }
    if !date.is_empty() {
        if !pattern.is_empty() {
            pattern.push_str(", ");
        }
        pattern.push_str(&date);
    }

    let mut time = String::new();
    if opts.hour {
        time.push('h');
        plan.numeric = true;
    }
    if let Some(width) = opts.day_period {
        let run = match width {
            FieldLength::Long => 4,
            FieldLength::Short => 1,
            FieldLength::Narrow => 5,
            FieldLength::Numeric => {
                return Err(FormatError::Unsupported("numeric meridiem names"));
            }
        };
        if !time.is_empty() {
            time.push(' ');
        }
        time.push_str(&symbol_run('a', run));
        plan.day_period = Some(match width {
            FieldLength::Long => DayPeriodNameLength::Wide,
            FieldLength::Short => DayPeriodNameLength::Abbreviated,
            _ => DayPeriodNameLength::Narrow,
        });
    }
    if !time.is_empty() {
        if !pattern.is_empty() {
            pattern.push_str(", ");
        }
        pattern.push_str(&time);
    }

    if pattern.is_empty() {
        return Err(FormatError::Unsupported("no fields requested"));
    }
    plan.pattern = pattern;
    Ok(plan)
}

fn classify(part: Part) -> Option<FieldKind> {
    if part == datetime_parts::ERA {
        Some(FieldKind::Era)
    } else if part == datetime_parts::YEAR {
        Some(FieldKind::Year)
    } else if part == datetime_parts::MONTH {
        Some(FieldKind::Month)
    } else if part == datetime_parts::DAY {
        Some(FieldKind::Day)
    } else if part == datetime_parts::WEEKDAY {
        Some(FieldKind::Weekday)
    } else if part == datetime_parts::DAY_PERIOD {
        Some(FieldKind::DayPeriod)
    } else if part == datetime_parts::HOUR {
        Some(FieldKind::Hour)
    } else if part == datetime_parts::MINUTE {
        Some(FieldKind::Minute)
    } else if part == datetime_parts::SECOND {
        Some(FieldKind::Second)
    } else {
        None
    }
}

/// Sink that records which byte span of the output each part annotation
/// covers, so a single field can be sliced out afterwards.
#[derive(Default)]
struct PartsCollector {
    text: String,
    spans: Vec<(usize, usize, Part)>,
}

impl PartsCollector {
    fn into_parts(mut self) -> Vec<FormattedPart> {
        // Nested annotations are recorded innermost-first; present them in
        // output order instead.
        self.spans.sort_by_key(|&(start, _, _)| start);
        self.spans
            .into_iter()
            .filter_map(|(start, end, part)| {
                classify(part).map(|kind| FormattedPart {
                    kind,
                    value: self.text[start..end].to_string(),
                })
            })
            .collect()
    }
}

impl fmt::Write for PartsCollector {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl PartsWrite for PartsCollector {
    type SubPartsWrite = Self;

    fn with_part(
        &mut self,
        part: Part,
        mut f: impl FnMut(&mut Self::SubPartsWrite) -> fmt::Result,
    ) -> fmt::Result {
        let start = self.text.len();
        f(self)?;
        let end = self.text.len();
        if start != end {
            self.spans.push((start, end, part));
        }
        Ok(())
    }
}

/// A date formatter bound to one locale configuration, one field plan and
/// one zone tag.
pub struct DateFormatter {
    names: FixedCalendarDateTimeNames<Gregorian>,
    pattern: DateTimePattern,
    tz: Option<Tz>,
}

impl DateFormatter {
    /// Tries the configuration strings in fallback order and keeps the first
    /// one the engine accepts. Option errors are not locale-dependent and
    /// fail immediately.
    pub(crate) fn try_new(
        configs: &[String],
        opts: &FieldOptions,
        tz: Option<Tz>,
    ) -> Result<Self, FormatError> {
        let mut last = None;
        for config in configs {
            match Self::for_config(config, opts, tz) {
                Ok(formatter) => return Ok(formatter),
                Err(e @ FormatError::Unsupported(_)) => return Err(e),
                Err(e) => last = Some(e),
            }
        }
        Err(last.unwrap_or(FormatError::Unsupported("no locale configured")))
    }

    fn for_config(config: &str, opts: &FieldOptions, tz: Option<Tz>) -> Result<Self, FormatError> {
        let locale: IcuLocale = config
            .parse()
            .map_err(|_| FormatError::InvalidLocale(config.to_owned()))?;
        let plan = plan(opts)?;

        let prefs: DateTimeFormatterPreferences = (&locale).into();
        let mut names =
            FixedCalendarDateTimeNames::<Gregorian>::try_new(prefs).map_err(engine_err)?;
        if let Some(length) = plan.month {
            names.include_month_names(length).map_err(engine_err)?;
        }
        if let Some(length) = plan.weekday {
            names.include_weekday_names(length).map_err(engine_err)?;
        }
        if let Some(length) = plan.era {
            names.include_year_names(length).map_err(engine_err)?;
        }
        if let Some(length) = plan.day_period {
            names.include_day_period_names(length).map_err(engine_err)?;
        }
        if plan.numeric {
            names.include_decimal_formatter().map_err(engine_err)?;
        }

        let pattern =
            DateTimePattern::try_from_pattern_str(&plan.pattern).map_err(engine_err)?;
        Ok(Self { names, pattern, tz })
    }

    fn wall_clock(&self, timestamp: DateTime<Utc>) -> NaiveDateTime {
        match self.tz {
            Some(tz) => timestamp.with_timezone(&tz).naive_local(),
            None => timestamp.naive_utc(),
        }
    }

    fn engine_value(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<EngineDateTime<Gregorian>, FormatError> {
        let wall = self.wall_clock(timestamp);
        let date = Date::try_new_iso(wall.year(), wall.month() as u8, wall.day() as u8)
            .map_err(engine_err)?
            .to_calendar(Gregorian);
        let time = Time::try_new(wall.hour() as u8, wall.minute() as u8, wall.second() as u8, 0)
            .map_err(engine_err)?;
        Ok(EngineDateTime { date, time })
    }

    pub fn format(&self, timestamp: DateTime<Utc>) -> Result<String, FormatError> {
        let value = self.engine_value(timestamp)?;
        let formatted = self.names.with_pattern_unchecked(&self.pattern).format(&value);
        match formatted.try_write_to_string() {
            Ok(s) => Ok(s.into_owned()),
            Err((e, _)) => Err(engine_err(e)),
        }
    }

    /// Formats the timestamp and decomposes the output into typed parts.
    /// Literal text between fields is not reported.
    pub fn format_to_parts(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<FormattedPart>, FormatError> {
        let value = self.engine_value(timestamp)?;
        let formatted = self.names.with_pattern_unchecked(&self.pattern).format(&value);
        let mut sink = PartsCollector::default();
        match formatted.try_write_to_parts(&mut sink) {
            Ok(Ok(())) => Ok(sink.into_parts()),
            Ok(Err(e)) => Err(engine_err(e)),
            Err(e) => Err(engine_err(e)),
        }
    }
}

/// A number formatter bound to one locale configuration. Grouping defaults
/// to off; padding and integer rounding are applied to the decimal before it
/// reaches the engine.
pub struct NumberFormatter {
    formatter: DecimalFormatter,
    pad_to: u16,
    round: bool,
}

impl NumberFormatter {
    pub(crate) fn try_new(configs: &[String], opts: NumberOptions) -> Result<Self, FormatError> {
        let mut fmt_opts = DecimalFormatterOptions::default();
        fmt_opts.grouping_strategy = Some(if opts.grouped {
            GroupingStrategy::Auto
        } else {
            GroupingStrategy::Never
        });

        let mut last = None;
        for config in configs {
            let locale: IcuLocale = match config.parse() {
                Ok(locale) => locale,
                Err(_) => {
                    last = Some(FormatError::InvalidLocale(config.to_owned()));
                    continue;
                }
            };
            let prefs: DecimalFormatterPreferences = (&locale).into();
            match DecimalFormatter::try_new(prefs, fmt_opts) {
                Ok(formatter) => {
                    return Ok(Self {
                        formatter,
                        pad_to: opts.pad_to,
                        round: opts.round,
                    });
                }
                Err(e) => last = Some(engine_err(e)),
            }
        }
        Err(last.unwrap_or(FormatError::Unsupported("no locale configured")))
    }

    pub fn format_i64(&self, value: i64) -> String {
        self.render(Decimal::from(value))
    }

    pub fn format_f64(&self, value: f64) -> Result<String, FormatError> {
        let decimal = Decimal::try_from_f64(value, FloatPrecision::RoundTrip)
            .map_err(|_| FormatError::InvalidNumber(value))?;
        Ok(self.render(decimal))
    }

    fn render(&self, mut decimal: Decimal) -> String {
        if self.round {
            decimal.round_with_mode(
                0,
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand),
            );
        }
        if self.pad_to > 0 {
            decimal.pad_start(self.pad_to as i16);
        }
        self.formatter.format(&decimal).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn en() -> Vec<String> {
        vec!["en-US".to_string()]
    }

    #[test]
    fn bare_month_plans_a_standalone_pattern() {
        let plan = plan(&FieldOptions {
            month: Some(FieldLength::Long),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plan.pattern, "LLLL");
        assert_eq!(plan.month, Some(MonthNameLength::StandaloneWide));
        assert!(!plan.numeric);
    }

    #[test]
    fn month_with_day_plans_a_format_pattern() {
        let plan = plan(&FieldOptions {
            month: Some(FieldLength::Long),
            day: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plan.pattern, "MMMM d");
        assert_eq!(plan.month, Some(MonthNameLength::Wide));
        assert!(plan.numeric);
    }

    #[test]
    fn weekday_plans_cover_both_contexts() {
        let standalone = plan(&FieldOptions {
            weekday: Some(FieldLength::Long),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(standalone.pattern, "cccc");

        let format = plan(&FieldOptions {
            weekday: Some(FieldLength::Short),
            year: true,
            month: Some(FieldLength::Long),
            day: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(format.pattern, "EEE, MMMM d, y");
        assert_eq!(format.weekday, Some(WeekdayNameLength::Abbreviated));
        assert_eq!(format.month, Some(MonthNameLength::Wide));
    }

    #[test]
    fn meridiem_and_era_plans() {
        let meridiem = plan(&FieldOptions {
            hour: true,
            day_period: Some(FieldLength::Short),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(meridiem.pattern, "h a");

        let era = plan(&FieldOptions {
            year: true,
            era: Some(FieldLength::Short),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(era.pattern, "y G");
    }

    #[test]
    fn widths_the_engine_cannot_render_are_rejected() {
        assert!(matches!(
            plan(&FieldOptions {
                weekday: Some(FieldLength::Numeric),
                ..Default::default()
            }),
            Err(FormatError::Unsupported(_))
        ));
        assert!(matches!(plan(&FieldOptions::default()), Err(FormatError::Unsupported(_))));
    }

    #[test]
    fn formatter_extracts_month_from_parts() {
        let opts = FieldOptions {
            month: Some(FieldLength::Long),
            day: true,
            ..Default::default()
        };
        let formatter = DateFormatter::try_new(&en(), &opts, None).unwrap();
        let ts = Utc.with_ymd_and_hms(2016, 4, 1, 0, 0, 0).unwrap();
        let parts = formatter.format_to_parts(ts).unwrap();
        let month = parts.iter().find(|p| p.kind == FieldKind::Month).unwrap();
        assert_eq!(month.value, "April");
        let day = parts.iter().find(|p| p.kind == FieldKind::Day).unwrap();
        assert_eq!(day.value, "1");
    }

    #[test]
    fn zoned_formatter_relocalizes_the_timestamp() {
        let opts = FieldOptions {
            month: Some(FieldLength::Long),
            day: true,
            ..Default::default()
        };
        let tz: Tz = "America/New_York".parse().unwrap();
        let formatter = DateFormatter::try_new(&en(), &opts, Some(tz)).unwrap();
        // 03:00 UTC on Jan 1 is still Dec 31 in New York.
        let ts = Utc.with_ymd_and_hms(2016, 1, 1, 3, 0, 0).unwrap();
        let parts = formatter.format_to_parts(ts).unwrap();
        let month = parts.iter().find(|p| p.kind == FieldKind::Month).unwrap();
        assert_eq!(month.value, "December");
    }

    #[test]
    fn bad_locale_falls_back_to_the_next_config() {
        let configs = vec!["not a locale!".to_string(), "en-US".to_string()];
        let opts = FieldOptions {
            month: Some(FieldLength::Long),
            ..Default::default()
        };
        assert!(DateFormatter::try_new(&configs, &opts, None).is_ok());
        assert!(matches!(
            DateFormatter::try_new(&["not a locale!".to_string()], &opts, None),
            Err(FormatError::InvalidLocale(_))
        ));
    }

    #[test]
    fn number_padding_and_rounding() {
        let padded =
            NumberFormatter::try_new(&en(), NumberOptions { pad_to: 2, ..Default::default() })
                .unwrap();
        assert_eq!(padded.format_i64(5), "05");
        assert_eq!(padded.format_i64(123), "123");

        let rounded =
            NumberFormatter::try_new(&en(), NumberOptions { round: true, ..Default::default() })
                .unwrap();
        assert_eq!(rounded.format_f64(5.7).unwrap(), "6");
        assert_eq!(rounded.format_f64(5.2).unwrap(), "5");
    }

    #[test]
    fn grouping_is_off_unless_requested() {
        let plain = NumberFormatter::try_new(&en(), NumberOptions::default()).unwrap();
        assert_eq!(plain.format_i64(1234567), "1234567");

        let grouped =
            NumberFormatter::try_new(&en(), NumberOptions { grouped: true, ..Default::default() })
                .unwrap();
        assert_eq!(grouped.format_i64(1234567), "1,234,567");
    }

    #[test]
    fn non_finite_input_is_an_error() {
        let nf = NumberFormatter::try_new(&en(), NumberOptions::default()).unwrap();
        assert!(matches!(
            nf.format_f64(f64::NAN),
            Err(FormatError::InvalidNumber(_))
        ));
    }
}
