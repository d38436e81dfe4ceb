//! Locale-aware calendar field names and formatters.
//!
//! Month, weekday, meridiem and era name tables are not shipped with this
//! crate; they are derived on demand by formatting fixed reference instants
//! through the ICU4X engine and extracting one field from the decomposed
//! output. Tables come in four widths ([`FieldLength`]) and, for months and
//! weekdays, two grammatical contexts (in-text vs. standalone), and are
//! cached per [`Locale`]. Locales themselves are interned process-wide, so
//! equal configurations share one `Arc<Locale>` and its caches.
//!
//! ```
//! use intl_fields::{FieldLength, Locale};
//!
//! let locale = Locale::create(Some("fr"), None, None);
//! let months = locale.months(FieldLength::Long, false)?;
//! assert_eq!(&months[0], "janvier");
//! # Ok::<(), intl_fields::FormatError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod instant;
pub mod locale;
pub mod options;
pub mod sampler;

pub use engine::{DateFormatter, FormattedPart, NumberFormatter};
pub use error::FormatError;
pub use instant::{Instant, Zone};
pub use locale::{Locale, LocaleCache, LocaleOptions, LocaleOverrides, global_cache};
pub use options::{Context, FieldKind, FieldLength, FieldOptions, NumberOptions};
