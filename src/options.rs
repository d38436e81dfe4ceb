/// Requested verbosity of a calendar field name.
///
/// `Numeric` is only meaningful for fields the engine can render as digits
/// (month, day, year, hour); asking for numeric weekday, era or meridiem
/// names fails with [`FormatError::Unsupported`](crate::FormatError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLength {
    Narrow,
    Short,
    Long,
    Numeric,
}

/// Grammatical usage mode for a field name.
///
/// `Format` means the name appears inline with other date parts and may take
/// a grammatical case ("13 ноября"); `Standalone` means the name is used on
/// its own, as in a month picker ("ноябрь"). Name tables are cached
/// separately per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Format,
    Standalone,
}

/// The kind of a decomposed output part, and the key used to pull one field
/// out of a full formatted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Era,
    Year,
    Month,
    Day,
    Weekday,
    DayPeriod,
    Hour,
    Minute,
    Second,
}

/// Which calendar fields a date formatter should produce, and at what width.
///
/// A named field requested on its own is rendered in standalone form; the
/// same field requested together with other date fields is rendered in
/// format (in-running-text) form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub era: Option<FieldLength>,
    pub year: bool,
    pub month: Option<FieldLength>,
    pub day: bool,
    pub weekday: Option<FieldLength>,
    pub day_period: Option<FieldLength>,
    pub hour: bool,
}

/// Number formatter configuration. Digit grouping is off unless asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberOptions {
    /// Minimum integer digits; values are left-padded with zeros up to this
    /// width. Zero disables padding.
    pub pad_to: u16,
    /// Round to zero fraction digits.
    pub round: bool,
    /// Locale-aware digit grouping.
    pub grouped: bool,
}
