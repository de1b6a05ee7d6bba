use ccda_core::{parse_timestamp, CcdaError, LocalZone, Precision};
use chrono::{Datelike, NaiveDate, Timelike};
use proptest::prelude::*;

fn wall_clock() -> impl Strategy<Value = (i32, u32, u32, u32, u32, u32)> {
    (1900i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60)
}

proptest! {
    #[test]
    fn fields_follow_length_table(
        (year, month, day, hour, minute, second) in wall_clock(),
        offset_minutes in -720i32..=840,
    ) {
        let zone = LocalZone::Fixed { offset_minutes };
        let full = format!("{year:04}{month:02}{day:02}{hour:02}{minute:02}{second:02}");

        for (len, precision) in [
            (8, Precision::Day),
            (10, Precision::Hour),
            (12, Precision::Minute),
            (14, Precision::Second),
        ] {
            let literal = &full[..len];
            let ts = parse_timestamp(literal, &zone).expect("độ dài hợp lệ");
            prop_assert_eq!(ts.precision, precision);
            prop_assert!(!ts.has_offset);

            let local = ts.local(&zone);
            prop_assert_eq!((local.year(), local.month(), local.day()), (year, month, day));
            prop_assert_eq!(local.hour(), if len >= 10 { hour } else { 0 });
            prop_assert_eq!(local.minute(), if len >= 12 { minute } else { 0 });
            prop_assert_eq!(local.second(), if len >= 14 { second } else { 0 });

            // Parsing twice is deterministic.
            prop_assert_eq!(parse_timestamp(literal, &zone).unwrap(), ts);
        }
    }

    #[test]
    fn utc_suffix_ignores_local_zone(
        (year, month, day, hour, minute, second) in wall_clock(),
        offset_minutes in -720i32..=840,
    ) {
        let literal = format!("{year:04}{month:02}{day:02}{hour:02}{minute:02}{second:02}+0000");
        let ts = parse_timestamp(&literal, &LocalZone::Fixed { offset_minutes }).unwrap();
        let expected = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .unwrap()
            .and_utc();
        prop_assert_eq!(ts.instant, expected);
        prop_assert!(ts.has_offset);
    }

    #[test]
    fn other_lengths_are_rejected(literal in "[0-9]{0,25}") {
        prop_assume!(![8usize, 10, 12, 14].contains(&literal.len()));
        prop_assert!(matches!(
            parse_timestamp(&literal, &LocalZone::utc()),
            Err(CcdaError::InvalidDateFormat(_))
        ));
    }
}
