use clap::Parser;
use fs_err::read_to_string;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::PrepError;

pub const DEFAULT_STATIONS_FILE: &str = "stations_full.json";
pub const DEFAULT_PAIRS_FILE: &str = "pairs.json";
pub const DEFAULT_CITIES_FILE: &str = "cities.json";
pub const DEFAULT_OUTPUT_FILE: &str = "updated_stations.json";

/// Joins the station, pair and city exports into `updated_stations.json`.
#[derive(Debug, Default, Parser)]
#[clap(version)]
pub struct Args {
    /// Directory the input and output files are resolved against
    #[clap(long)]
    pub input_dir: Option<PathBuf>,
    #[clap(long)]
    pub stations: Option<PathBuf>,
    #[clap(long)]
    pub pairs: Option<PathBuf>,
    #[clap(long)]
    pub cities: Option<PathBuf>,
    #[clap(long)]
    pub output: Option<PathBuf>,
    /// TOML file with any of the keys input_dir, stations, pairs, cities, output
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Hide the progress bar
    #[clap(long)]
    pub quiet: bool,
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input_dir: Option<PathBuf>,
    pub stations: Option<PathBuf>,
    pub pairs: Option<PathBuf>,
    pub cities: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, PrepError> {
        let text = read_to_string(path).map_err(|e| PrepError::file_access(path, e))?;
        toml::from_str(&text).map_err(|e| PrepError::parse(path, e))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub stations: PathBuf,
    pub pairs: PathBuf,
    pub cities: PathBuf,
    pub output: PathBuf,
    pub show_progress: bool,
}

impl RunConfig {
    /// Command line flags win over the config file, which wins over the
    /// default file names. Relative paths are joined onto the input directory.
    pub fn resolve(args: &Args) -> Result<Self, PrepError> {
        let file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        let input_dir = args
            .input_dir
            .clone()
            .or(file.input_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let pick = |flag: &Option<PathBuf>, from_file: Option<PathBuf>, default: &str| {
            input_dir.join(
                flag.clone()
                    .or(from_file)
                    .unwrap_or_else(|| PathBuf::from(default)),
            )
        };

        Ok(RunConfig {
            stations: pick(&args.stations, file.stations, DEFAULT_STATIONS_FILE),
            pairs: pick(&args.pairs, file.pairs, DEFAULT_PAIRS_FILE),
            cities: pick(&args.cities, file.cities, DEFAULT_CITIES_FILE),
            output: pick(&args.output, file.output, DEFAULT_OUTPUT_FILE),
            show_progress: !args.quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_defaults_to_fixed_file_names() {
        let config = RunConfig::resolve(&Args::parse_from(["station-join"])).unwrap();
        assert_eq!(config.stations, Path::new(".").join("stations_full.json"));
        assert_eq!(config.pairs, Path::new(".").join("pairs.json"));
        assert_eq!(config.cities, Path::new(".").join("cities.json"));
        assert_eq!(config.output, Path::new(".").join("updated_stations.json"));
        assert!(config.show_progress);
    }

    #[test]
    fn test_resolve_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("prep.toml");
        fs_err::write(
            &config_path,
            "input_dir = \"data\"\npairs = \"pairs_2024.json\"\noutput = \"/tmp/stations.json\"\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "station-join",
            "--config",
            config_path.to_str().unwrap(),
            "--pairs",
            "override.json",
            "--quiet",
        ]);
        let config = RunConfig::resolve(&args).unwrap();
        assert_eq!(config.pairs, Path::new("data").join("override.json"));
        assert_eq!(config.stations, Path::new("data").join("stations_full.json"));
        assert_eq!(config.output, PathBuf::from("/tmp/stations.json"));
        assert!(!config.show_progress);
    }

    #[test]
    fn test_resolve_input_dir_flag_over_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("prep.toml");
        fs_err::write(&config_path, "input_dir = \"data\"\n").unwrap();

        let args = Args {
            input_dir: Some(PathBuf::from("exports")),
            config: Some(config_path),
            ..Args::default()
        };
        let config = RunConfig::resolve(&args).unwrap();
        assert_eq!(config.cities, Path::new("exports").join("cities.json"));
    }

    #[test]
    fn test_resolve_rejects_bad_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("prep.toml");
        fs_err::write(&config_path, "stations_path = \"x.json\"\n").unwrap();
        let args = Args {
            config: Some(config_path),
            ..Args::default()
        };
        assert!(matches!(
            RunConfig::resolve(&args),
            Err(PrepError::Parse { .. })
        ));

        let args = Args {
            config: Some(dir.path().join("absent.toml")),
            ..Args::default()
        };
        assert!(matches!(
            RunConfig::resolve(&args),
            Err(PrepError::FileAccess { .. })
        ));
    }
}
