use black_division::clock::*;

fn snapshot(h: u32, m: u32, s: u32) -> TimeSnapshot {
    TimeSnapshot::from(&RtcSnapshot {
        hours: encode_bcd(h),
        minutes: encode_bcd(m),
        seconds: encode_bcd(s),
        ..RtcSnapshot::default()
    })
}

// ── BCD ───────────────────────────────────────────────────────────────────────

#[test]
fn bcd_nibbles_are_decimal_digits() {
    assert_eq!(decode_bcd(0x00), 0);
    assert_eq!(decode_bcd(0x09), 9);
    assert_eq!(decode_bcd(0x10), 10);
    assert_eq!(decode_bcd(0x59), 59);
    assert_eq!(encode_bcd(42), 0x42);
    assert_eq!(encode_bcd(7), 0x07);
}

#[test]
fn bcd_encode_keeps_last_two_digits() {
    assert_eq!(encode_bcd(2024), 0x24);
    assert_eq!(encode_bcd(100), 0x00);
}

#[test]
fn bcd_round_trips_below_one_hundred() {
    for v in 0..100 {
        assert_eq!(decode_bcd(encode_bcd(v)), v);
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

#[test]
fn epoch_is_first_of_january() {
    let rtc = RtcSnapshot::from_unix(0);
    assert_eq!((rtc.hours(), rtc.minutes(), rtc.seconds()), (0, 0, 0));
    assert_eq!((rtc.day_of_month(), rtc.month()), (1, 1));
    assert_eq!(rtc.year, 0x70);
    assert_eq!(rtc.month_name(), "january");
}

#[test]
fn billionth_second() {
    // 2001-09-09 01:46:40 UTC
    let rtc = RtcSnapshot::from_unix(1_000_000_000);
    assert_eq!((rtc.hours(), rtc.minutes(), rtc.seconds()), (1, 46, 40));
    assert_eq!((rtc.day_of_month(), rtc.month()), (9, 9));
    assert_eq!(rtc.year, 0x01);
    assert_eq!(rtc.month_name(), "september");
}

#[test]
fn leap_day() {
    // 2000-02-29 00:00:00 UTC
    let rtc = RtcSnapshot::from_unix(951_782_400);
    assert_eq!((rtc.day_of_month(), rtc.month()), (29, 2));
    assert_eq!(rtc.year, 0x00);
}

#[test]
fn month_names_cover_the_year() {
    assert_eq!(month_name(1), "january");
    assert_eq!(month_name(5), "may");
    assert_eq!(month_name(12), "december");
    assert_eq!(month_name(0), "?");
    assert_eq!(month_name(13), "?");
}

// ── Play time ─────────────────────────────────────────────────────────────────

#[test]
fn snapshot_totals_seconds() {
    let t = snapshot(1, 2, 3);
    assert_eq!((t.hours, t.minutes, t.seconds), (1, 2, 3));
    assert_eq!(t.total_seconds, 3723);
}

#[test]
fn play_time_same_day() {
    assert_eq!(play_time(&snapshot(10, 0, 0), &snapshot(10, 1, 30)), 90);
    assert_eq!(play_time(&snapshot(10, 0, 0), &snapshot(10, 0, 0)), 0);
}

#[test]
fn play_time_wraps_past_midnight() {
    assert_eq!(play_time(&snapshot(23, 59, 50), &snapshot(0, 0, 10)), 20);
}
