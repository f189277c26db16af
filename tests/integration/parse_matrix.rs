use clap::{CommandFactory, Parser};
use entitree::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["entitree"],
        vec!["entitree", "browse"],
        vec!["entitree", "browse", "--path", "Rocket/Stage1"],
        vec!["entitree", "show", "Rocket"],
        vec!["entitree", "show", "Rocket", "--format", "json"],
        vec!["entitree", "show", "Rocket", "--format", "table", "--expand-all"],
        vec!["entitree", "delete", "Rocket/Stage2"],
        vec!["entitree", "delete", "Rocket/Stage2", "--force"],
        vec!["entitree", "--config", "/tmp/entitree.toml", "show", "Rocket"],
        vec!["entitree", "--log-level", "debug", "--log-output", "stderr", "browse"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_invocations() {
    assert!(Cli::try_parse_from(["entitree", "delete"]).is_err());
    assert!(Cli::try_parse_from(["entitree", "show", "Rocket", "--bogus"]).is_err());
    assert!(Cli::try_parse_from(["entitree", "launch"]).is_err());
}

#[test]
fn browse_path_is_carried() {
    let cli = Cli::try_parse_from(["entitree", "browse", "--path", "Rocket"]).unwrap();
    assert_eq!(
        cli.resolved_command(),
        Commands::Browse {
            path: Some("Rocket".to_string())
        }
    );
}

#[test]
fn help_lists_every_command() {
    let help = Cli::command().render_long_help().to_string();
    for name in ["browse", "show", "delete", "--base-url", "--log-format"] {
        assert!(help.contains(name), "help is missing {name}");
    }
}
