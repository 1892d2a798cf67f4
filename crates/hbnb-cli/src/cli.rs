use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hbnb",
    about = "HBnB place API: run the server or query a data file",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Search places by state, city, and amenity
    Search(SearchArgs),
    /// Show a single place
    Show(ShowArgs),
    /// List the places of a city
    List(ListArgs),
    /// Count stored entities
    Stats(StatsArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides config and environment)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// JSON data file; without one the store lives in memory
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Deduplicate state-derived places in search results
    #[arg(long)]
    pub strict_dedup: bool,
}

#[derive(Args)]
pub struct DataArgs {
    /// JSON data file
    #[arg(long)]
    pub data: PathBuf,
}

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[arg(long = "state")]
    pub states: Vec<String>,
    #[arg(long = "city")]
    pub cities: Vec<String>,
    #[arg(long = "amenity")]
    pub amenities: Vec<String>,
    #[arg(long)]
    pub strict_dedup: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,
    pub place_id: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub data: DataArgs,
    pub city_id: String,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["hbnb", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
            assert!(args.data.is_none());
            assert!(!args.strict_dedup);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from([
            "hbnb", "serve", "--bind", "0.0.0.0:8080", "--data", "file.json", "--strict-dedup",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            assert_eq!(args.data, Some(PathBuf::from("file.json")));
            assert!(args.strict_dedup);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn serve_rejects_bad_bind() {
        assert!(Cli::try_parse_from(["hbnb", "serve", "--bind", "localhost"]).is_err());
    }

    #[test]
    fn parse_search_repeated_filters() {
        let cli = Cli::try_parse_from([
            "hbnb", "search", "--data", "f.json", "--state", "s1", "--state", "s2", "--amenity", "wifi",
        ])
        .unwrap();
        if let Command::Search(args) = cli.command {
            assert_eq!(args.data.data, PathBuf::from("f.json"));
            assert_eq!(args.states, vec!["s1", "s2"]);
            assert!(args.cities.is_empty());
            assert_eq!(args.amenities, vec!["wifi"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn data_file_is_required() {
        assert!(Cli::try_parse_from(["hbnb", "stats"]).is_err());
        assert!(Cli::try_parse_from(["hbnb", "show", "p1"]).is_err());
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["hbnb", "show", "--data", "f.json", "p1"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.place_id, "p1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["hbnb", "list", "--data", "f.json", "c1"]).unwrap();
        assert!(matches!(cli.command, Command::List(ref a) if a.city_id == "c1"));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["hbnb", "--verbose", "stats", "--data", "f.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["hbnb", "stats", "--data", "f.json", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
