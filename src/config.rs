use crate::{
    blend::Selection,
    error::HybridError,
};

use clap::Parser;

use rhai::{ Dynamic, Engine, Scope };

use simpleio as sio;

use std::path::PathBuf;

pub const DEFAULT_FIRST: &str = "data/fish.bmp";
pub const DEFAULT_SECOND: &str = "data/submarine.bmp";
pub const DEFAULT_LEVELS: usize = 8;
pub const DEFAULT_ZOOM_CAP: usize = 4;
pub const DEFAULT_SAVE: &str = "hybrid.png";

#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// First source image
    pub first: Option<PathBuf>,
    /// Second source image
    pub second: Option<PathBuf>,
    /// Number of Gaussian pyramid levels
    #[arg(long)]
    pub levels: Option<usize>,
    /// Highest zoom (downsample) level offered by the slider
    #[arg(long)]
    pub max_zoom: Option<usize>,
    /// Dominant image, skips the menu
    #[arg(long, value_parser = parse_selection)]
    pub select: Option<Selection>,
    /// Config script to use instead of ~/.config/hybridimg/config.rhai.rs
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where `S` writes the hybrid image
    #[arg(long)]
    pub save: Option<PathBuf>,
}

fn parse_selection(s: &str) -> Result<Selection, String>{
    let mut chars = s.chars();
    match (chars.next().and_then(Selection::from_char), chars.next()) {
        (Some(sel), None) => Ok(sel),
        _ => Err(format!("expected 1 or 2, got '{s}'")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub first: PathBuf,
    pub second: PathBuf,
    pub levels: usize,
    pub max_zoom: usize,
    pub select: Option<Selection>,
    pub save: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST.into(),
            second: DEFAULT_SECOND.into(),
            levels: DEFAULT_LEVELS,
            max_zoom: DEFAULT_LEVELS.min(DEFAULT_ZOOM_CAP),
            select: None,
            save: DEFAULT_SAVE.into(),
        }
    }
}

/// Top level variables picked up from a config script.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptValues {
    pub first: Option<String>,
    pub second: Option<String>,
    pub levels: Option<usize>,
    pub max_zoom: Option<usize>,
    pub select: Option<Selection>,
    pub save: Option<String>,
}

fn script_string(scope: &Scope, name: &str) -> Result<Option<String>, HybridError>{
    scope.get_value::<Dynamic>(name)
        .map(|v| v.into_string()
            .map_err(|t| HybridError::Config(format!("'{name}' must be a string, got {t}"))))
        .transpose()
}

fn script_count(scope: &Scope, name: &str) -> Result<Option<usize>, HybridError>{
    scope.get_value::<Dynamic>(name)
        .map(|v| {
            let i = v.as_int()
                .map_err(|t| HybridError::Config(format!("'{name}' must be an integer, got {t}")))?;
            usize::try_from(i)
                .map_err(|_| HybridError::Config(format!("'{name}' must not be negative, got {i}")))
        })
        .transpose()
}

pub fn eval_script(code: &str) -> Result<ScriptValues, HybridError>{
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.run_with_scope(&mut scope, code)
        .map_err(|e| HybridError::Config(e.to_string()))?;

    let select = match script_count(&scope, "select")? {
        None => None,
        Some(1) => Some(Selection::First),
        Some(2) => Some(Selection::Second),
        Some(n) => return Err(HybridError::Config(format!("'select' must be 1 or 2, got {n}"))),
    };
    Ok(ScriptValues {
        first: script_string(&scope, "first")?,
        second: script_string(&scope, "second")?,
        levels: script_count(&scope, "levels")?,
        max_zoom: script_count(&scope, "max_zoom")?,
        select,
        save: script_string(&scope, "save")?,
    })
}

fn default_script_path() -> Option<PathBuf>{
    let mut path = sio::get_home().ok()?;
    path.push(".config/hybridimg/config.rhai.rs");
    Some(path)
}

/// Read the config script named on the command line, or the default one if it exists.
pub fn load_script(args: &Args) -> Result<ScriptValues, HybridError>{
    let path = match &args.config {
        Some(path) => path.clone(),
        None => match default_script_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(ScriptValues::default()),
        },
    };
    log::info!("config script: {:?}", path);
    let code = sio::read_file_into_string(&path)
        .map_err(|e| HybridError::Config(format!("{:?}: {}", path, e)))?;
    eval_script(&code)
}

impl Config {
    /// Defaults, then script values, then command line flags.
    pub fn resolve(args: &Args, script: ScriptValues) -> Result<Self, HybridError>{
        let base = Config::default();
        let levels = args.levels.or(script.levels).unwrap_or(base.levels);
        if levels == 0 {
            return Err(HybridError::Config("levels must be at least 1".to_string()));
        }
        let max_zoom = args.max_zoom.or(script.max_zoom)
            .unwrap_or(levels.min(DEFAULT_ZOOM_CAP))
            .min(levels);

        Ok(Self {
            first: args.first.clone().or(script.first.map(PathBuf::from)).unwrap_or(base.first),
            second: args.second.clone().or(script.second.map(PathBuf::from)).unwrap_or(base.second),
            levels,
            max_zoom,
            select: args.select.or(script.select),
            save: args.save.clone().or(script.save.map(PathBuf::from)).unwrap_or(base.save),
        })
    }

    pub fn load(args: &Args) -> Result<Self, HybridError>{
        Self::resolve(args, load_script(args)?)
    }
}
