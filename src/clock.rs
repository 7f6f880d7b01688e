/// Wall-clock snapshots as the real-time clock reports them.
///
/// Register values arrive BCD encoded: each nibble holds one decimal digit.

pub const SECONDS_PER_DAY: i64 = 86_400;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub fn decode_bcd(byte: u8) -> u32 {
    u32::from(byte >> 4) * 10 + u32::from(byte & 0x0F)
}

/// Encode a value below 100. Larger values keep only their last two digits.
pub fn encode_bcd(value: u32) -> u8 {
    let value = value % 100;
    ((value / 10) << 4 | value % 10) as u8
}

/// Raw BCD register contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RtcSnapshot {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub year: u8,
}

impl RtcSnapshot {
    /// Encode a UTC instant given as seconds since the Unix epoch.
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / SECONDS_PER_DAY as u64) as i64;
        let of_day = (secs % SECONDS_PER_DAY as u64) as u32;
        let (year, month, day) = civil_from_days(days);
        RtcSnapshot {
            seconds: encode_bcd(of_day % 60),
            minutes: encode_bcd(of_day / 60 % 60),
            hours: encode_bcd(of_day / 3600),
            day_of_month: encode_bcd(day),
            month: encode_bcd(month),
            year: encode_bcd(year.rem_euclid(100) as u32),
        }
    }

    pub fn hours(&self) -> u32 {
        decode_bcd(self.hours)
    }

    pub fn minutes(&self) -> u32 {
        decode_bcd(self.minutes)
    }

    pub fn seconds(&self) -> u32 {
        decode_bcd(self.seconds)
    }

    pub fn day_of_month(&self) -> u32 {
        decode_bcd(self.day_of_month)
    }

    pub fn month(&self) -> u32 {
        decode_bcd(self.month)
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month())
    }
}

/// Lower-case English name for a 1-based month; `"?"` outside 1..=12.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Time of day captured at game start or end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeSnapshot {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub total_seconds: i64,
}

impl From<&RtcSnapshot> for TimeSnapshot {
    fn from(rtc: &RtcSnapshot) -> Self {
        let (hours, minutes, seconds) = (rtc.hours(), rtc.minutes(), rtc.seconds());
        TimeSnapshot {
            hours,
            minutes,
            seconds,
            total_seconds: i64::from(hours * 3600 + minutes * 60 + seconds),
        }
    }
}

/// Seconds between two snapshots. A game running past midnight wraps once.
pub fn play_time(start: &TimeSnapshot, end: &TimeSnapshot) -> i64 {
    let elapsed = end.total_seconds - start.total_seconds;
    if elapsed < 0 {
        elapsed + SECONDS_PER_DAY
    } else {
        elapsed
    }
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
