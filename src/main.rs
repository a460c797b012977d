use std::process::ExitCode;
use std::path::PathBuf;
use clap::{
    Arg, ArgAction, ArgMatches, Command, crate_version, value_parser,
};
use log::LevelFilter;
use mapfit::MapConfig;
use mapfit::render::render_file;

const DEFAULT_CONFIG_PATH: &str = "mapfit.toml";


/// A marker for a failure that has already been reported.
struct Failed;


struct Config {
    map: MapConfig,
    output: Option<PathBuf>,
}

impl Config {
    fn get() -> Result<Self, Failed> {
        let mut matches = Self::get_matches();
        init_logging(matches.get_count("verbose"));

        let config_path = match matches.remove_one::<PathBuf>("config") {
            Some(path) => path,
            None => PathBuf::from(DEFAULT_CONFIG_PATH),
        };
        let map = match MapConfig::load(&config_path) {
            Ok(map) => map,
            Err(err) => {
                log::error!(
                    "Failed to load map config {}: {}",
                    config_path.display(), err
                );
                return Err(Failed)
            }
        };

        let mut config = Config { map, output: None };
        config.apply_matches(matches);
        Ok(config)
    }

    fn get_matches() -> ArgMatches {
        Command::new("mapfit")
            .version(crate_version!())
            .about("fits a map into an image")
            .arg(Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("the map configuration file")
                .action(ArgAction::Set)
            )
            .arg(Arg::new("width")
                .short('W')
                .long("width")
                .value_name("PX")
                .value_parser(value_parser!(u32).range(1..))
                .help("the image width, overriding the configuration")
                .action(ArgAction::Set)
            )
            .arg(Arg::new("height")
                .short('H')
                .long("height")
                .value_name("PX")
                .value_parser(value_parser!(u32).range(1..))
                .help("the image height, overriding the configuration")
                .action(ArgAction::Set)
            )
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("render the map into a PNG or SVG file")
                .action(ArgAction::Set)
            )
            .arg(Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("log more, repeat for even more")
                .action(ArgAction::Count)
            )
            .get_matches()
    }

    fn apply_matches(&mut self, mut matches: ArgMatches) {
        if let Some(width) = matches.remove_one("width") {
            self.map.width = width;
        }
        if let Some(height) = matches.remove_one("height") {
            self.map.height = height;
        }
        if let Some(output) = matches.remove_one("output") {
            self.output = Some(output);
        }
    }

    fn run(self) -> Result<(), Failed> {
        let map = self.map.into_map().map_err(|err| {
            log::error!("Failed to create map: {}", err);
            Failed
        })?;

        match map.transformation() {
            Some(transformation) => println!("{}", transformation),
            None => {
                log::warn!("Map has neither a bounding box nor layers.");
            }
        }

        if let Some(output) = self.output {
            render_file(&map, &output).map_err(|err| {
                log::error!(
                    "Failed to render map to {}: {}", output.display(), err
                );
                Failed
            })?;
        }
        Ok(())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    match Config::get().and_then(Config::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failed) => ExitCode::FAILURE,
    }
}
