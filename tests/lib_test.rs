//! Library integration tests.

use std::path::PathBuf;

use xrepo_validate::error::ErrorCode;
use xrepo_validate::PolicyError;

#[test]
fn error_types_are_public() {
    let err = PolicyError::FileNotFound {
        path: PathBuf::from("base.yaml"),
    };
    assert!(err.to_string().contains("base.yaml"));
    assert_eq!(err.code(), ErrorCode::FileNotFound);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> xrepo_validate::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use xrepo_validate::cli::{Cli, Commands};

    let cli = Cli::parse_from(["xrepo-validate", "show-policy", "--json"]);

    if let Commands::ShowPolicy(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected show-policy command");
    }
}

#[test]
fn error_codes_have_stable_names() {
    let names: Vec<_> = [
        ErrorCode::ConfigurationParseError,
        ErrorCode::FileNotFound,
        ErrorCode::ValidationError,
    ]
    .iter()
    .map(ErrorCode::as_str)
    .collect();
    assert_eq!(
        names,
        vec!["CONFIGURATION_PARSE_ERROR", "FILE_NOT_FOUND", "VALIDATION_ERROR"]
    );
}
