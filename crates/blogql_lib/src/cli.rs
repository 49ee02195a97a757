use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, about, version)]
pub struct CliOptions {
    /// Path to the YAML configuration file. Defaults apply if omitted.
    #[clap(long, env = "BLOGQL_CONFIG")]
    pub config: Option<PathBuf>,
    /// The URL of the PostgreSQL database to use. Overrides `databaseUrl`
    /// from the configuration file.
    #[clap(long, env = "BLOGQL_DATABASE_URL")]
    pub database_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_is_optional() {
        let opts = CliOptions::try_parse_from(["blogql"]).unwrap();
        assert!(opts.config.is_none());
    }

    #[test]
    fn flags() {
        let opts = CliOptions::try_parse_from([
            "blogql",
            "--config",
            "blogql.yml",
            "--database-url",
            "postgres://localhost/blogql",
        ])
        .unwrap();
        assert_eq!(opts.config, Some(PathBuf::from("blogql.yml")));
        assert_eq!(
            opts.database_url.as_deref(),
            Some("postgres://localhost/blogql")
        );
    }
}
