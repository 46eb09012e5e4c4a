use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use temporal_sequencer::sequencer::Metadata;
use temporal_sequencer::sequencer::batch::{read_batch, sequence_rows};
use temporal_sequencer::{
    BatchOptions, CodeSequencer, Granularity, InMemorySink, Sequencer, SubjectRow,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn person(id: u64) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("person_id".to_string(), json!(id));
        metadata
    }

    // --- Single subject ---

    #[test]
    fn test_next_day_never_shuffled_before() {
        for _ in 0..100 {
            let mut seq = Sequencer::with_metadata(person(123456789), '\t').unwrap();
            seq.add(at(1, 8), "A");
            seq.add(at(1, 9), "B");
            seq.add(at(2, 0), "C");

            let line = seq.serialize(Granularity::Day, false).unwrap();
            let fields: Vec<&str> = line.split('\t').collect();

            assert_eq!(fields[0], "{\"person_id\": 123456789}");
            assert_eq!(fields[3], "(2020-01-02_00:00:00.000000, C)");
        }
    }

    #[test]
    fn test_strict_then_shuffled_serialization() {
        let mut seq = Sequencer::with_metadata(person(1), '\t').unwrap();
        seq.add(at(1, 9), "B");
        seq.add(at(1, 8), "A");

        let strict = seq.serialize(Granularity::None, false).unwrap();
        assert_eq!(
            strict,
            "{\"person_id\": 1}\t(2020-01-01_08:00:00.000000, A)\t(2020-01-01_09:00:00.000000, B)"
        );

        let shuffled = seq.serialize(Granularity::Day, false).unwrap();
        assert_eq!(seq.shuffle_granularity(), Granularity::Day);
        let restored = Sequencer::read(&shuffled, '\t').unwrap();
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut seq = Sequencer::new();
        seq.add(at(2, 0), "later");
        seq.add(at(1, 0), "earlier");

        let sequencer: &mut dyn CodeSequencer = &mut seq;
        sequencer.sequence(Granularity::None, true);
        let line = sequencer.serialize(Granularity::None, true).unwrap();

        assert!(line.ends_with("(2020-01-01_00:00:00.000000, earlier)"));
        assert_eq!(seq.records()[0].code(), "later");
    }

    // --- Batch ---

    #[test]
    fn test_batch_from_json_options() {
        let options: BatchOptions =
            serde_json::from_str(r#"{"subject_key": "person_id", "separator": "|"}"#).unwrap();
        assert_eq!(options.granularity, Granularity::None);

        let rows = vec![
            SubjectRow::new(json!(10), at(1, 8), "4329847,201826"),
            SubjectRow::new(json!(11), at(1, 8), "1112807"),
            SubjectRow::new(json!(10), at(2, 8), "320128"),
        ];

        let mut sink = InMemorySink::new();
        assert_eq!(sequence_rows(rows, &mut sink, &options).unwrap(), 2);
        assert_eq!(
            sink.lines()[0],
            "{\"person_id\": 10}|(2020-01-01_08:00:00.000000, 4329847)|(2020-01-01_08:00:00.000000, 201826)|(2020-01-02_08:00:00.000000, 320128)"
        );

        let restored = read_batch(sink.to_text().as_bytes(), '|').unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].len(), 3);
        assert_eq!(restored[1].metadata(), &person(11));
    }

    #[test]
    fn test_options_round_trip_through_json() {
        let options = BatchOptions {
            granularity: Granularity::Hour,
            reverse: true,
            ..BatchOptions::default()
        };
        let text = serde_json::to_string(&options).unwrap();
        assert!(text.contains("\"granularity\":\"hour\""));

        let back: BatchOptions = serde_json::from_str(&text).unwrap();
        assert_eq!(back, options);
    }
}
