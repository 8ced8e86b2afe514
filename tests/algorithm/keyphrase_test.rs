//! Tests for the keyphrase dictionary and featurizer

use ct_indication::{FeatureVector, KeyphraseDictionary, KeyphraseFeaturizer, ReportSegmenter};

use crate::utils::{SAMPLE_REPORT, write_artifact};

#[test]
fn test_default_dictionary_groups() {
    let dictionary = KeyphraseDictionary::lung_cancer_default().unwrap();
    let names: Vec<&str> = dictionary.feature_names().collect();
    assert_eq!(
        names,
        vec![
            "DefinitiveTreat",
            "Surveillance",
            "Recurrence",
            "FollowUp",
            "Metastasis",
            "Symptom",
            "LC_Treat_Drug"
        ]
    );
}

#[test]
fn test_default_dictionary_pattern_count() {
    let dictionary = KeyphraseDictionary::lung_cancer_default().unwrap();
    assert_eq!(dictionary.len(), 7);
    assert_eq!(dictionary.pattern_count(), 41);
}

#[test]
fn test_counts_on_sample_report() {
    let dictionary = KeyphraseDictionary::lung_cancer_default().unwrap();
    let text = ReportSegmenter::default()
        .segment(SAMPLE_REPORT)
        .text_of_interest();

    let counts = KeyphraseFeaturizer::new(&dictionary).counts(&text);

    assert_eq!(
        counts,
        vec![
            ("DefinitiveTreat", 1),
            ("Surveillance", 3),
            ("Recurrence", 1),
            ("FollowUp", 1),
            ("Metastasis", 0),
            ("Symptom", 0),
            ("LC_Treat_Drug", 0),
        ]
    );
}

#[test]
fn test_repeated_variant_counts_once() {
    let dictionary =
        KeyphraseDictionary::from_groups([("Symptom", vec!["cough", "fever"])]).unwrap();
    let featurizer = KeyphraseFeaturizer::new(&dictionary);

    assert_eq!(featurizer.counts("cough, cough and more cough"), vec![("Symptom", 1)]);
    assert_eq!(featurizer.counts("cough with fever"), vec![("Symptom", 2)]);
}

#[test]
fn test_overlapping_variants_each_count() {
    let dictionary =
        KeyphraseDictionary::from_groups([("FollowUp", vec!["follow", "follow-up"])]).unwrap();
    let counts = KeyphraseFeaturizer::new(&dictionary).counts("Recommend follow-up CT");
    assert_eq!(counts, vec![("FollowUp", 2)]);
}

#[test]
fn test_matching_ignores_case() {
    let dictionary =
        KeyphraseDictionary::from_groups([("Metastasis", vec!["metasta"])]).unwrap();
    let counts = KeyphraseFeaturizer::new(&dictionary).counts("METASTATIC disease");
    assert_eq!(counts, vec![("Metastasis", 1)]);
}

#[test]
fn test_no_matches_gives_all_zero_row() {
    let dictionary = KeyphraseDictionary::lung_cancer_default().unwrap();
    let mut features = FeatureVector::new();
    KeyphraseFeaturizer::new(&dictionary).extend("Lungs are clear.", &mut features);

    assert_eq!(features.len(), dictionary.len());
    assert!(features.iter().all(|(_, value)| value == 0.0));
}

#[test]
fn test_load_preserves_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(
        dir.path(),
        "dictionary.json",
        r#"{"Zeta": ["z"], "Alpha": ["a", "b"], "Mid": ["m"]}"#,
    );

    let dictionary = KeyphraseDictionary::load(&path).unwrap();

    let names: Vec<&str> = dictionary.feature_names().collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    assert_eq!(dictionary.pattern_count(), 4);
    assert_eq!(dictionary.get("Alpha").unwrap().patterns(), ["a", "b"]);
}

#[test]
fn test_missing_dictionary_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = KeyphraseDictionary::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_invalid_dictionaries_are_rejected() {
    let invalid = [
        r#"["not", "an", "object"]"#,
        r#"{}"#,
        r#"{"Empty": []}"#,
        r#"{"Numbers": [1, 2]}"#,
        r#"{"Scalar": "cough"}"#,
        r#"{"Broken": ["(unclosed"]}"#,
    ];

    for json in invalid {
        let err = KeyphraseDictionary::from_json_str(json).unwrap_err();
        assert!(err.is_config(), "expected configuration error for {json}: {err}");
    }
}

#[test]
fn test_malformed_json_on_disk_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), "dictionary.json", "{ not json");
    let err = KeyphraseDictionary::load(&path).unwrap_err();
    assert!(err.is_config());
}
