use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::query::{param, Category, Param};

/// Search Newznab indexers and convert NZB files to JSON
#[derive(Parser, Debug)]
#[command(name = "newznab")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Search everything:
        newznab search --query \"ubuntu 24.04\"

    Search TV by season and episode:
        newznab tv --query \"Some Show\" --season 5 --episode 3

    Fetch an NZB as JSON:
        newznab get 0a1b2c3d

    Convert a local NZB file:
        newznab decode release.nzb

Server URL and API key can also be set in ~/.config/newznab/config.toml
or with NEWZNAB_URL / NEWZNAB_API_KEY.")]
pub struct Cli {
    /// Full URL of the Newznab API
    #[arg(long, global = true, env = "NEWZNAB_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// API key for the server
    #[arg(long, global = true, env = "NEWZNAB_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Config file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long = "log-level", global = true, hide = true)]
    pub log_level: Option<String>,

    /// Append logs to FILE
    #[arg(long = "log-file", global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the server's capabilities
    Caps,

    /// Run a general search
    Search(SearchArgs),

    /// Search TV shows
    Tv {
        #[command(flatten)]
        common: SearchArgs,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,

        /// TVRage id
        #[arg(long)]
        rid: Option<String>,

        #[arg(long = "tvdb-id")]
        tvdb_id: Option<String>,

        #[arg(long = "trakt-id")]
        trakt_id: Option<String>,

        #[arg(long = "tvmaze-id")]
        tvmaze_id: Option<String>,

        #[arg(long = "tmdb-id")]
        tmdb_id: Option<String>,

        #[arg(long = "imdb-id")]
        imdb_id: Option<u32>,
    },

    /// Search movies
    Movie {
        #[command(flatten)]
        common: SearchArgs,

        /// IMDB id without the "tt" prefix
        #[arg(long = "imdb-id")]
        imdb_id: Option<u32>,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Search music
    Music {
        #[command(flatten)]
        common: SearchArgs,

        #[arg(long)]
        artist: Option<String>,

        #[arg(long)]
        album: Option<String>,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        track: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Search books
    Book {
        #[command(flatten)]
        common: SearchArgs,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },

    /// Download an NZB by id and print it as JSON
    Get {
        /// NZB id from a search result
        id: String,
    },

    /// Convert a local NZB file to JSON
    Decode {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print a human-readable summary instead of JSON
        #[arg(short, long)]
        summary: bool,
    },

    /// Show configuration
    Config {
        /// Write a sample config file to the standard location
        #[arg(long)]
        init: bool,
    },
}

/// Options shared by every search command
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Search term
    #[arg(short = 'Q', long = "query")]
    pub query: Option<String>,

    /// Category id or name (repeatable), e.g. 5040 or tv-hd
    #[arg(long = "cat", value_name = "CAT")]
    pub categories: Vec<Category>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<u32>,

    /// Skip this many results
    #[arg(long)]
    pub offset: Option<u32>,

    /// Only results posted in the last DAYS days
    #[arg(long = "max-age", value_name = "DAYS")]
    pub max_age: Option<u32>,

    /// Server-specific raw parameter (repeatable)
    #[arg(long = "param", num_args = 2, value_names = ["KEY", "VALUE"])]
    pub params: Vec<String>,
}

impl SearchArgs {
    /// Translate the shared options into query parameters
    pub fn to_params(&self) -> crate::error::Result<Vec<Param>> {
        let mut params = Vec::new();
        if let Some(q) = &self.query {
            params.push(param::query(q));
        }
        if !self.categories.is_empty() {
            params.push(param::categories(&self.categories));
        }
        if let Some(limit) = self.limit {
            params.push(param::limit(limit));
        }
        if let Some(offset) = self.offset {
            params.push(param::offset(offset));
        }
        if let Some(days) = self.max_age {
            params.push(param::max_age(days));
        }
        params.extend(Param::from_pairs(&self.params)?);
        Ok(params)
    }
}

impl Commands {
    /// Parameters for search commands, `None` for everything else
    pub fn search_params(&self) -> crate::error::Result<Option<Vec<Param>>> {
        let params = match self {
            Commands::Search(common) => common.to_params()?,
            Commands::Tv {
                common,
                season,
                episode,
                rid,
                tvdb_id,
                trakt_id,
                tvmaze_id,
                tmdb_id,
                imdb_id,
            } => {
                let mut params = common.to_params()?;
                params.extend(season.map(param::season));
                params.extend(episode.map(param::episode));
                params.extend(rid.as_deref().map(param::tvrage_id));
                params.extend(tvdb_id.as_deref().map(param::tvdb_id));
                params.extend(trakt_id.as_deref().map(param::trakt_id));
                params.extend(tvmaze_id.as_deref().map(param::tvmaze_id));
                params.extend(tmdb_id.as_deref().map(param::tmdb_id));
                params.extend(imdb_id.map(param::imdb_id));
                params
            }
            Commands::Movie {
                common,
                imdb_id,
                genre,
            } => {
                let mut params = common.to_params()?;
                params.extend(imdb_id.map(param::imdb_id));
                params.extend(genre.as_deref().map(param::genre));
                params
            }
            Commands::Music {
                common,
                artist,
                album,
                label,
                track,
                year,
                genre,
            } => {
                let mut params = common.to_params()?;
                params.extend(artist.as_deref().map(param::artist));
                params.extend(album.as_deref().map(param::album));
                params.extend(label.as_deref().map(param::label));
                params.extend(track.as_deref().map(param::track));
                params.extend(year.as_deref().map(param::year));
                params.extend(genre.as_deref().map(param::genre));
                params
            }
            Commands::Book {
                common,
                author,
                title,
            } => {
                let mut params = common.to_params()?;
                params.extend(author.as_deref().map(param::author));
                params.extend(title.as_deref().map(param::title));
                params
            }
            _ => return Ok(None),
        };
        Ok(Some(params))
    }

    /// Whether the command talks to the server, and if so whether it needs
    /// the API key
    pub fn server_access(&self) -> Option<bool> {
        match self {
            Commands::Caps => Some(false),
            Commands::Decode { .. } | Commands::Config { .. } => None,
            _ => Some(true),
        }
    }

    /// Whether the configuration must be loaded before running. `config`
    /// manages the file itself, which may not exist yet.
    pub fn uses_config(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}

impl Cli {
    /// Get the effective log level
    pub fn get_log_level(&self) -> Option<&str> {
        if let Some(ref level) = self.log_level {
            Some(level)
        } else if self.quiet {
            Some("error")
        } else {
            match self.verbose {
                0 => None,
                1 => Some("debug"),
                _ => Some("trace"),
            }
        }
    }

    /// Get configuration overrides from CLI arguments
    pub fn get_config_overrides(&self) -> crate::config::ConfigOverrides {
        crate::config::ConfigOverrides {
            url: self.url.clone(),
            api_key: self.key.clone(),
            log_level: self.get_log_level().map(str::to_string),
            compact: self.compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("newznab").chain(args.iter().copied())).unwrap()
    }

    fn names(params: &[Param]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_params() {
        let cli = parse(&[
            "search", "-Q", "linux", "--cat", "pc-iso", "--cat", "4000", "--limit", "5",
            "--param", "sort", "posted_desc",
        ]);
        let params = cli.command.search_params().unwrap().unwrap();
        assert_eq!(
            names(&params),
            [
                ("q", "linux"),
                ("cat", "4020,4000"),
                ("limit", "5"),
                ("sort", "posted_desc")
            ]
        );
    }

    #[test]
    fn test_tv_params() {
        let cli = parse(&["tv", "--season", "5", "--episode", "3", "--tvdb-id", "81189"]);
        let params = cli.command.search_params().unwrap().unwrap();
        assert_eq!(
            names(&params),
            [("season", "S05"), ("ep", "E03"), ("tvdbid", "81189")]
        );
        assert_eq!(cli.command.server_access(), Some(true));
    }

    #[test]
    fn test_non_search_commands() {
        let cli = parse(&["decode", "file.nzb", "--summary"]);
        assert!(cli.command.search_params().unwrap().is_none());
        assert_eq!(cli.command.server_access(), None);

        let cli = parse(&["caps"]);
        assert_eq!(cli.command.server_access(), Some(false));
    }

    #[test]
    fn test_config_init_skips_loading() {
        let cli = parse(&["--config", "/tmp/does-not-exist.toml", "config", "--init"]);
        assert!(!cli.command.uses_config());
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/does-not-exist.toml"))
        );

        assert!(parse(&["caps"]).command.uses_config());
        assert!(parse(&["decode", "x.nzb"]).command.uses_config());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&["caps"]).get_log_level(), None);
        assert_eq!(parse(&["-v", "caps"]).get_log_level(), Some("debug"));
        assert_eq!(parse(&["caps", "-vv"]).get_log_level(), Some("trace"));
        assert_eq!(parse(&["-q", "caps"]).get_log_level(), Some("error"));
    }

    #[test]
    fn test_bad_category_is_rejected() {
        let result = Cli::try_parse_from(["newznab", "search", "--cat", "nope"]);
        assert!(result.is_err());
    }
}
