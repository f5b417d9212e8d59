use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_expectation() {
    assert_eq!(
        parse_expectation("view_model=view").unwrap(),
        ("view_model".to_string(), RelationType::View)
    );
    assert_eq!(
        parse_expectation("staging.orders=TABLE").unwrap(),
        ("staging.orders".to_string(), RelationType::Table)
    );
}

#[test]
fn test_parse_expectation_splits_on_last_equals() {
    let (name, kind) = parse_expectation(r#""a=b"=view"#).unwrap();
    assert_eq!(name, r#""a=b""#);
    assert_eq!(kind, RelationType::View);
}

#[test]
fn test_parse_expectation_rejects_malformed() {
    assert!(parse_expectation("no_kind").is_err());
    assert!(parse_expectation("=view").is_err());
    assert!(parse_expectation("orders=index").unwrap_err().contains("index"));
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "relcheck", "types", "a=table", "b=view", "-t", "ci", "--verbose",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.target.as_deref(), Some("ci"));
    match cli.command {
        Commands::Types(args) => assert_eq!(args.expectations.len(), 2),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_equal_requires_a_name() {
    assert!(Cli::try_parse_from(["relcheck", "equal"]).is_err());
}

#[test]
fn test_show_output_format() {
    let cli = Cli::try_parse_from(["relcheck", "show", "a.b", "-o", "json"]).unwrap();
    match cli.command {
        Commands::Show(args) => {
            assert_eq!(args.name, "a.b");
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}
