//! Property-based tests for tool output parsing

use loudprobe::{parse_duration, parse_loudness_xml, DurationUnit, Length, MetricSet};
use proptest::prelude::*;

/// Hundredths of a loudness unit, formatted the way bs1770gain prints them
fn lu(hundredths: i32) -> String {
    format!("{:.2}", f64::from(hundredths) / 100.0)
}

fn block(tag: &str, values: [i32; 5]) -> String {
    format!(
        r#"<{tag}><integrated lufs="{}" lu="0.00"/><momentary lufs="{}"/><shortterm-maximum lufs="{}"/><range lufs="{}"/><true-peak tpfs="{}" factor="1.0"/></{tag}>"#,
        lu(values[0]),
        lu(values[1]),
        lu(values[2]),
        lu(values[3]),
        lu(values[4]),
        tag = tag
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Values always come from the first track, whatever summary says
    #[test]
    fn summary_is_ignored(
        track in prop::array::uniform5(-7000_i32..2000),
        summary in prop::array::uniform5(-7000_i32..2000),
        summary_first in any::<bool>(),
    ) {
        let track_xml = block("track", track);
        let summary_xml = block("summary", summary);
        let album = if summary_first {
            format!("{}{}", summary_xml, track_xml)
        } else {
            format!("{}{}", track_xml, summary_xml)
        };
        let xml = format!("<bs1770gain><album>{}</album></bs1770gain>", album);

        let values = parse_loudness_xml(&xml, MetricSet::Extended).unwrap();

        prop_assert_eq!(values.integrated_loudness, lu(track[0]).parse::<f64>().unwrap());
        prop_assert_eq!(values.momentary_maximum, Some(lu(track[1]).parse::<f64>().unwrap()));
        prop_assert_eq!(values.shortterm_maximum, Some(lu(track[2]).parse::<f64>().unwrap()));
        prop_assert_eq!(values.loudness_range, lu(track[3]).parse::<f64>().unwrap());
        prop_assert_eq!(values.true_peak, lu(track[4]).parse::<f64>().unwrap());
    }

    /// A length printed with six decimals comes back as the same microsecond count
    #[test]
    fn printed_length_survives_microsecond_conversion(micros in 0_u64..100_000_000_000) {
        let stat = format!(
            "Samples read: 1\nLength (seconds): {}.{:06}\nScaled by: 1.0\n",
            micros / 1_000_000,
            micros % 1_000_000
        );

        let length = parse_duration(&stat).unwrap();

        prop_assert_eq!(DurationUnit::Microseconds.length(length), Length::Microseconds(micros));
    }

    /// Text around the statistics block never hides the length line
    #[test]
    fn length_found_among_noise(
        before in "[a-zA-Z ]{0,40}",
        after in "[a-zA-Z ]{0,40}",
        whole in 0_u32..100_000,
    ) {
        let stat = format!("{}\nLength (seconds):   {}\n{}", before, whole, after);
        let length = parse_duration(&stat).unwrap();
        prop_assert_eq!(length.seconds(), f64::from(whole));
        prop_assert_eq!(length.microseconds(), u64::from(whole) * 1_000_000);
    }
}
