#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["esmbit-dev", "serve"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert!(args.port.is_none());
                assert!(args.ws_port.is_none());
                assert!(args.config.root.is_none());
                assert!(!args.no_watch);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_serve_with_options() {
        let cli = Cli::try_parse_from([
            "esmbit-dev",
            "serve",
            "--root",
            "web/www-root",
            "--port",
            "8080",
            "--ws-port",
            "8081",
            "--host",
            "0.0.0.0",
            "--no-watch",
        ])
        .unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.config.root, Some(PathBuf::from("web/www-root")));
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.ws_port, Some(8081));
                assert_eq!(args.host.map(|h| h.to_string()), Some("0.0.0.0".to_string()));
                assert!(args.no_watch);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_check_with_config() {
        let cli = Cli::try_parse_from(["esmbit-dev", "check", "-c", "custom.json"]).unwrap();
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.config.config, Some(PathBuf::from("custom.json")));
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["esmbit-dev", "--verbose", "--no-color", "check"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["esmbit-dev", "-v", "-q", "serve"]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["esmbit-dev", "serve", "--port", "70000"]).is_err());
    }
}
