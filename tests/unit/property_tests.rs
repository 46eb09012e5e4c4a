use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use serde_json::{Value, json};
use temporal_sequencer::{Granularity, Sequencer, TemporalRecord};
use temporal_sequencer::sequencer::Metadata;

#[cfg(test)]
mod tests {
    use super::*;

    /// Timestamps packed into a few days so runs actually collide.
    fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
        (0i64..4, 0i64..24, 0i64..3, 0i64..3, 0i64..3).prop_map(|(d, h, m, s, us)| {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default();
            base + Duration::days(d)
                + Duration::hours(h)
                + Duration::minutes(m)
                + Duration::seconds(s)
                + Duration::microseconds(us)
        })
    }

    fn records() -> impl Strategy<Value = Vec<TemporalRecord>> {
        prop::collection::vec(
            (timestamp(), "[A-Z0-9]{1,6}").prop_map(|(ts, code)| TemporalRecord::new(ts, code)),
            0..40,
        )
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(|n| json!(n)),
            any::<bool>().prop_map(|b| json!(b)),
            "[a-z ]{0,8}".prop_map(|s| json!(s)),
            Just(Value::Null),
        ]
    }

    fn metadata() -> impl Strategy<Value = Metadata> {
        prop::collection::vec(("[a-z_]{1,8}", scalar()), 0..4)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    fn granularity() -> impl Strategy<Value = Granularity> {
        prop::sample::select(Granularity::ALL.to_vec())
    }

    fn truncated(granularity: Granularity, ts: NaiveDateTime) -> String {
        let fmt = match granularity {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Hour => "%Y-%m-%d_%H",
            Granularity::Minute => "%Y-%m-%d_%H:%M",
            Granularity::Second => "%Y-%m-%d_%H:%M:%S",
            Granularity::Microsecond | Granularity::None => "%Y-%m-%d_%H:%M:%S%.6f",
        };
        ts.format(fmt).to_string()
    }

    fn sorted(records: &[TemporalRecord]) -> Vec<TemporalRecord> {
        let mut out = records.to_vec();
        out.sort();
        out
    }

    proptest! {
        #[test]
        fn round_trip_without_shuffle(md in metadata(), input in records()) {
            let mut seq = Sequencer::with_metadata(md, '\t').unwrap();
            seq.extend(input);

            let text = seq.serialize(Granularity::None, false).unwrap();
            let restored = Sequencer::read(&text, '\t').unwrap();

            prop_assert_eq!(restored.records(), seq.records());
            prop_assert_eq!(restored.metadata(), seq.metadata());
        }

        #[test]
        fn strict_order_is_monotonic(input in records(), reverse in any::<bool>()) {
            let mut seq = Sequencer::new();
            seq.extend(input);
            seq.sequence(Granularity::None, reverse);

            for pair in seq.records().windows(2) {
                if reverse {
                    prop_assert!(pair[0].timestamp() >= pair[1].timestamp());
                } else {
                    prop_assert!(pair[0].timestamp() <= pair[1].timestamp());
                }
            }
        }

        #[test]
        fn runs_are_ordered_permutations(
            input in records(),
            granularity in granularity(),
            reverse in any::<bool>(),
        ) {
            let mut seq = Sequencer::new();
            seq.extend(input.clone());
            seq.sequence(granularity, reverse);
            let output = seq.records();

            for pair in output.windows(2) {
                let (a, b) = (
                    truncated(granularity, pair[0].timestamp()),
                    truncated(granularity, pair[1].timestamp()),
                );
                if reverse {
                    prop_assert!(a >= b);
                } else {
                    prop_assert!(a <= b);
                }
            }

            for run in output.chunk_by(|a, b| {
                truncated(granularity, a.timestamp()) == truncated(granularity, b.timestamp())
            }) {
                let key = truncated(granularity, run[0].timestamp());
                let want: Vec<TemporalRecord> = input
                    .iter()
                    .filter(|r| truncated(granularity, r.timestamp()) == key)
                    .cloned()
                    .collect();
                prop_assert_eq!(sorted(run), sorted(&want));
            }
        }

        #[test]
        fn resequencing_keeps_records(input in records(), granularity in granularity()) {
            let mut seq = Sequencer::new();
            seq.extend(input);
            seq.sequence(granularity, false);
            let first = seq.records().to_vec();
            seq.sequence(granularity, false);

            prop_assert_eq!(sorted(&first), sorted(seq.records()));
            let keys = |records: &[TemporalRecord]| -> Vec<String> {
                records.iter().map(|r| truncated(granularity, r.timestamp())).collect()
            };
            prop_assert_eq!(keys(&first), keys(seq.records()));
        }
    }
}
