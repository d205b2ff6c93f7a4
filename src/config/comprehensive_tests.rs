//! Additional comprehensive tests for configuration parsing and validation

use super::{parse_prediction_list, ConfigParser, EnvManager};
use crate::{
    cli::Cli,
    models::{config::env_keys, Config},
    types::{ColumnPair, OutputFormat},
};
use clap::Parser;
use proptest::prelude::*;

/// Edge cases in configuration values
mod config_edge_cases {
    use super::*;

    #[test]
    fn test_many_predictions_up_to_limit() {
        let mut config = Config::default();
        config.predictions = (1..=crate::defaults::MAX_PREDICTIONS).map(|n| n as f64).collect();
        assert!(config.validate().is_ok());

        config.predictions.push(1000.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fractional_predictions_are_valid() {
        let mut config = Config::default();
        config.predictions = vec![0.5, 1.5, 2.25];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_infinite_prediction_rejected() {
        let mut config = Config::default();
        config.predictions = vec![f64::INFINITY];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.columns = ColumnPair::ThroughputLatency;
        config.predictions = vec![12.0];

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"throughput-latency\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}

/// Environment variable parsing edge cases
mod env_parsing_tests {
    use super::*;

    #[test]
    fn test_column_aliases() {
        for (value, expected) in [
            ("concurrency_throughput", ColumnPair::ConcurrencyThroughput),
            ("NX", ColumnPair::ConcurrencyThroughput),
            (" concurrency-latency ", ColumnPair::ConcurrencyLatency),
            ("xr", ColumnPair::ThroughputLatency),
        ] {
            assert!(EnvManager::validate_env_var(env_keys::COLUMNS, value).is_ok());
            assert_eq!(value.parse::<ColumnPair>().unwrap(), expected);
        }
    }

    #[test]
    fn test_predict_with_whitespace_and_empty_entries() {
        assert_eq!(parse_prediction_list(" 8 ,, 16 ,").unwrap(), vec![8.0, 16.0]);
    }

    #[test]
    fn test_color_bool_with_padding() {
        assert!(EnvManager::validate_env_var(env_keys::ENABLE_COLOR, " true ").is_ok());
        assert!(EnvManager::validate_env_var(env_keys::ENABLE_COLOR, "TRUE").is_err());
    }

    #[test]
    fn test_env_prediction_validated_after_merge() {
        let cli = Cli::parse_from(["usl", "bench.csv"]);
        let err = ConfigParser::new(cli)
            .parse_with_lookup(|key| (key == env_keys::PREDICT).then(|| "8,-2".to_string()))
            .unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[test]
    fn test_format_case_insensitive() {
        let cli = Cli::parse_from(["usl", "bench.csv"]);
        let config = ConfigParser::new(cli)
            .parse_with_lookup(|key| (key == env_keys::FORMAT).then(|| "JSON".to_string()))
            .unwrap();
        assert_eq!(config.format, OutputFormat::Json);
    }
}

/// Property tests for value parsing
mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn prediction_lists_roundtrip(levels in proptest::collection::vec(1u32..100000, 0..20)) {
            let text = levels.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",");
            let parsed = parse_prediction_list(&text).unwrap();
            let expected: Vec<f64> = levels.iter().map(|&n| n as f64).collect();
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn arbitrary_text_never_panics(text in ".{0,40}") {
            let _ = parse_prediction_list(&text);
            let _ = text.parse::<ColumnPair>();
            let _ = text.parse::<OutputFormat>();
            let _ = EnvManager::validate_env_var(env_keys::PREDICT, &text);
        }

        #[test]
        fn cli_predictions_override_env(cli_level in 1u32..1000, env_level in 1u32..1000) {
            let cli_arg = cli_level.to_string();
            let cli = Cli::parse_from(["usl", "bench.csv", "--predict", cli_arg.as_str()]);
            let config = ConfigParser::new(cli)
                .parse_with_lookup(|key| (key == env_keys::PREDICT).then(|| env_level.to_string()))
                .unwrap();
            prop_assert_eq!(config.predictions, vec![cli_level as f64]);
        }
    }
}
