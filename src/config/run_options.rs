use std::{env, path::PathBuf};

use getopts::Options;
use tracing::warn;

use crate::config::CONFIG_FILE;

#[derive(Clone, Debug, Default)]
pub struct Args {
    pub cfg_file: PathBuf,
    // test helper
    pub cfg_str: Option<String>,
}

pub fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] [config_file]", program);
    print!("{}", opts.usage(&brief));
}

pub fn get_args() -> Args {
    parse_args(env::args().collect())
}

pub fn parse_args(args: Vec<String>) -> Args {
    let program = args.first().cloned().unwrap_or_else(|| "agriplan".to_owned());
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");

    let default_args = Args { cfg_file: default_cfg_file(), cfg_str: None };
    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(f) => {
            warn!("Error parsing arguments: {}", f);
            warn!("Proceeding with defaults.");
            print_usage(&program, &opts);
            return default_args;
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, &opts);
    }

    let Some(config_file_path) = matches.free.first() else {
        return default_args;
    };
    Args { cfg_file: PathBuf::from(config_file_path), cfg_str: None }
}

pub fn default_cfg_file() -> PathBuf {
    let mut config_path = env::current_dir().unwrap_or_default();
    config_path.push(CONFIG_FILE);
    config_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_free_argument_is_the_config_file() {
        let args = parse_args(vec!["agriplan".into(), "/etc/agriplan/prod.toml".into()]);
        assert_eq!(args.cfg_file, PathBuf::from("/etc/agriplan/prod.toml"));
    }

    #[test]
    fn no_arguments_use_the_default_file() {
        let args = parse_args(vec!["agriplan".into()]);
        assert!(args.cfg_file.ends_with("agriplan.toml"));
    }

    #[test]
    fn unknown_flags_fall_back_to_defaults() {
        let args = parse_args(vec!["agriplan".into(), "--bogus".into(), "x.toml".into()]);
        assert!(args.cfg_file.ends_with("agriplan.toml"));
    }
}
