//! Standard time format builder
//!
//! Settings front-ends offer a handful of checkboxes instead of a raw format
//! string. [`TimeFormatOptions`] turns those choices into a format string and
//! recognizes when an existing format string is one of the standard ones.

/// Date line appended by the "show date" option
pub const STANDARD_DATE_FORMAT: &str = "\\ndd MM yyyy";

/// Layout config used when the date line is enabled (time above date)
pub const STANDARD_DATE_LAYOUT: &str = "01";

/// Checkbox-level description of a standard time format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFormatOptions {
    pub use_24h: bool,
    pub leading_zero: bool,
    pub show_seconds: bool,
    pub show_am_pm: bool,
    pub space_before_am_pm: bool,
    pub uppercase_am_pm: bool,
    pub show_date: bool,
}

impl Default for TimeFormatOptions {
    fn default() -> Self {
        Self {
            use_24h: false,
            leading_zero: true,
            show_seconds: false,
            show_am_pm: true,
            space_before_am_pm: true,
            uppercase_am_pm: false,
            show_date: false,
        }
    }
}

impl TimeFormatOptions {
    /// Build the format string these options describe
    pub fn to_format_string(&self) -> String {
        let hour_char = if self.use_24h { 'H' } else { 'h' };
        let hour_len = if self.leading_zero { 2 } else { 1 };

        let mut format: String = std::iter::repeat_n(hour_char, hour_len).collect();
        format.push_str(":mm");

        if self.show_seconds {
            format.push_str(":ss");
        }

        // am/pm only makes sense for the 12 hour clock
        if !self.use_24h && self.show_am_pm {
            if self.space_before_am_pm {
                format.push(' ');
            }
            format.push(if self.uppercase_am_pm { 'A' } else { 'a' });
        }

        if self.show_date {
            format.push_str(STANDARD_DATE_FORMAT);
        }

        format
    }

    /// Recover the options from a standard format string.
    ///
    /// Returns `None` for custom formats.
    pub fn detect(format: &str) -> Option<Self> {
        let (time, show_date) = match format.strip_suffix(STANDARD_DATE_FORMAT) {
            Some(time) => (time, true),
            None => (format, false),
        };

        let use_24h = time.starts_with('H');
        let options = Self {
            use_24h,
            leading_zero: time.starts_with("hh") || time.starts_with("HH"),
            show_seconds: time.contains(":ss"),
            show_am_pm: time.contains(['a', 'A']),
            space_before_am_pm: time.contains(' '),
            uppercase_am_pm: time.contains('A'),
            show_date,
        };

        // only accept formats that round-trip exactly
        let rebuilt = Self {
            show_date: false,
            ..options
        }
        .to_format_string();
        (rebuilt == time).then_some(options)
    }

    /// Whether `format` is one of the formats these options can express
    pub fn is_standard(format: &str) -> bool {
        Self::detect(format).is_some()
    }

    /// Layout config matching these options (empty for single line)
    pub fn layout_config(&self) -> &'static str {
        if self.show_date {
            STANDARD_DATE_LAYOUT
        } else {
            ""
        }
    }
}
