use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use hbnb_places::{
    project_place, project_places, project_search, PlaceService, Projection, SearchFilters,
    SearchOptions, Stats,
};
use hbnb_server::{HbnbServer, ServerConfig};
use hbnb_store::JsonFileStore;
use hbnb_types::EntityId;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Search(args) => print(cmd_search(args, format)?),
        Command::Show(args) => print(cmd_show(args, format)?),
        Command::List(args) => print(cmd_list(args, format)?),
        Command::Stats(args) => print(cmd_stats(args, format)?),
    }
}

fn print(output: String) -> anyhow::Result<()> {
    println!("{output}");
    Ok(())
}

fn open_service(path: &Path, options: SearchOptions) -> anyhow::Result<PlaceService> {
    anyhow::ensure!(path.exists(), "data file not found: {}", path.display());
    let store = JsonFileStore::open(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(path = %path.display(), "data file loaded");
    Ok(PlaceService::with_options(Arc::new(store), options))
}

/// Layer configuration: file, then `HBNB_API_*` environment, then flags.
fn server_config<F>(args: &ServeArgs, env: F) -> anyhow::Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env_from(env)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(data) = &args.data {
        config.data_file = Some(data.clone());
    }
    if args.strict_dedup {
        config.search.dedup_location_union = true;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args, |key| std::env::var(key).ok())?;
    info!(bind = %config.bind_addr, data = ?config.data_file, "starting server");
    let server = HbnbServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_search(args: SearchArgs, format: OutputFormat) -> anyhow::Result<String> {
    let options = SearchOptions {
        dedup_location_union: args.strict_dedup,
    };
    let service = open_service(&args.data.data, options)?;
    let mut filters = SearchFilters::new();
    if !args.states.is_empty() {
        filters = filters.with_states(args.states);
    }
    if !args.cities.is_empty() {
        filters = filters.with_cities(args.cities);
    }
    if !args.amenities.is_empty() {
        filters = filters.with_amenities(args.amenities);
    }
    let outcome = service.search_places(&filters)?;
    render_places(&project_search(&outcome), format)
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<String> {
    let service = open_service(&args.data.data, SearchOptions::default())?;
    let place = service.get_place(&EntityId::new(args.place_id))?;
    let value = project_place(&place, Projection::Full);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => Ok(render_place_detail(&value)),
    }
}

fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<String> {
    let service = open_service(&args.data.data, SearchOptions::default())?;
    let places = service.list_places_of_city(&EntityId::new(args.city_id))?;
    render_places(&project_places(&places, Projection::Full), format)
}

fn cmd_stats(args: StatsArgs, format: OutputFormat) -> anyhow::Result<String> {
    let service = open_service(&args.data.data, SearchOptions::default())?;
    let stats = service.stats()?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => Ok(render_stats(&stats)),
    }
}

fn field<'a>(place: &'a Value, key: &str) -> &'a str {
    place.get(key).and_then(Value::as_str).unwrap_or("-")
}

fn render_places(places: &[Value], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(places)?);
    }
    if places.is_empty() {
        return Ok("No places.".to_string());
    }
    let mut lines = vec![format!("{} place(s)", places.len().to_string().bold())];
    for place in places {
        lines.push(format!(
            "  {}  {}  {}",
            field(place, "id").yellow(),
            field(place, "name").bold(),
            format!("city {}", field(place, "city_id")).dimmed(),
        ));
    }
    Ok(lines.join("\n"))
}

fn render_place_detail(place: &Value) -> String {
    let mut lines = vec![format!(
        "Place {} {}",
        field(place, "id").yellow().bold(),
        field(place, "name").bold()
    )];
    if let Some(map) = place.as_object() {
        for (key, value) in map {
            if matches!(key.as_str(), "id" | "name" | "__class__") {
                continue;
            }
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("  {}: {}", key.cyan(), rendered));
        }
    }
    lines.join("\n")
}

fn render_stats(stats: &Stats) -> String {
    stats
        .iter()
        .map(|(name, count)| format!("{:<10} {}", name, count.to_string().bold()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbnb_store::{EntityStore, EntityStoreExt};
    use hbnb_types::{Amenity, City, Place, State, User};
    use std::path::PathBuf;

    /// Data file with s1 -> c1 -> {p1 [wifi], p2} and an empty c2.
    fn seed(dir: &Path) -> PathBuf {
        let path = dir.join("file.json");
        let store = JsonFileStore::open(path.clone()).unwrap();
        let state = State::new("S1").with_id("s1");
        let c1 = City::new(state.id.clone(), "C1").with_id("c1");
        let c2 = City::new(state.id.clone(), "C2").with_id("c2");
        let user = User::new("owner@hbnb.io", "pw").with_id("u1");
        let wifi = Amenity::new("Wifi").with_id("wifi");
        let mut p1 = Place::named(c1.id.clone(), user.id.clone(), "Loft").with_id("p1");
        p1.link_amenity(wifi.id.clone());
        let p2 = Place::named(c1.id.clone(), user.id.clone(), "Shed").with_id("p2");
        store.put(state).unwrap();
        store.put(c1).unwrap();
        store.put(c2).unwrap();
        store.put(user).unwrap();
        store.put(wifi).unwrap();
        store.put(p1).unwrap();
        store.put(p2).unwrap();
        store.persist().unwrap();
        path
    }

    fn data(path: &Path) -> DataArgs {
        DataArgs {
            data: path.to_path_buf(),
        }
    }

    fn search_args(path: &Path) -> SearchArgs {
        SearchArgs {
            data: data(path),
            states: vec![],
            cities: vec![],
            amenities: vec![],
            strict_dedup: false,
        }
    }

    #[test]
    fn search_json_lists_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path());
        let mut args = search_args(&path);
        args.amenities = vec!["wifi".into()];
        let out = cmd_search(args, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let places = value.as_array().unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0]["id"], "p1");
        assert!(places[0].get("amenities").is_none());
    }

    #[test]
    fn search_without_filters_returns_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path());
        let out = cmd_search(search_args(&path), OutputFormat::Text).unwrap();
        assert!(out.contains("Loft"));
        assert!(out.contains("Shed"));
    }

    #[test]
    fn list_text_and_empty_city() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path());
        let out = cmd_list(ListArgs { data: data(&path), city_id: "c1".into() }, OutputFormat::Text).unwrap();
        assert!(out.contains("p1"));
        assert!(out.contains("p2"));
        let out = cmd_list(ListArgs { data: data(&path), city_id: "c2".into() }, OutputFormat::Text).unwrap();
        assert_eq!(out, "No places.");
        assert!(cmd_list(ListArgs { data: data(&path), city_id: "nope".into() }, OutputFormat::Text).is_err());
    }

    #[test]
    fn show_renders_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path());
        let out = cmd_show(ShowArgs { data: data(&path), place_id: "p1".into() }, OutputFormat::Text).unwrap();
        assert!(out.contains("Loft"));
        assert!(out.contains("wifi"));

        let out = cmd_show(ShowArgs { data: data(&path), place_id: "p1".into() }, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["city_id"], "c1");
    }

    #[test]
    fn stats_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path());
        let out = cmd_stats(StatsArgs { data: data(&path) }, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["places"], 2);
        assert_eq!(value["cities"], 2);
        assert_eq!(value["amenities"], 1);
    }

    #[test]
    fn missing_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = StatsArgs { data: data(&dir.path().join("missing.json")) };
        let err = cmd_stats(args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn serve_config_layers() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("hbnb.toml");
        std::fs::write(&config_path, "bind_addr = \"127.0.0.1:6000\"\ndata_file = \"a.json\"\n").unwrap();

        let args = ServeArgs {
            bind: None,
            data: Some(PathBuf::from("b.json")),
            config: Some(config_path),
            strict_dedup: true,
        };
        let config = server_config(&args, |key| (key == "HBNB_API_PORT").then(|| "7000".to_string())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.data_file, Some(PathBuf::from("b.json")));
        assert!(config.search.dedup_location_union);

        let args = ServeArgs {
            bind: Some("0.0.0.0:8000".parse().unwrap()),
            ..args
        };
        let config = server_config(&args, |key| (key == "HBNB_API_PORT").then(|| "7000".to_string())).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
    }
}
