use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    fs, io,
    path::PathBuf,
};

use clap::Parser;
use skinning::animator::AnimatorConfig;

#[derive(Debug)]
pub enum ConfigError {
    Read(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(path, error) => {
                write!(f, "Failed to read config {}: {}", path.display(), error)
            }
            ConfigError::Parse(path, error) => {
                write!(f, "Failed to parse config {}: {}", path.display(), error)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Read(_, error) => Some(error),
            ConfigError::Parse(_, error) => Some(error),
        }
    }
}

/// Play a skinned glTF animation without a window and report the joint palette.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "skinning-headless")]
#[command(version, long_about = None)]
pub struct Args {
    /// glTF or GLB model to animate
    pub model: PathBuf,

    /// JSON animator config, flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Loop window in render seconds
    #[arg(long = "loop", num_args = 2, value_names = ["START", "END"])]
    pub loop_window: Option<Vec<f32>>,

    /// Clamp to the window end instead of looping
    #[arg(long)]
    pub no_loop: bool,

    /// Playback speed factor
    #[arg(long)]
    pub speed: Option<f32>,

    /// Index of the animation to play
    #[arg(long)]
    pub animation: Option<usize>,

    /// Number of updates to run
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Simulated updates per second
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    pub fps: f32,
}

fn parse_fps(value: &str) -> Result<f32, String> {
    let fps: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if fps > 0.0 && fps.is_finite() {
        Ok(fps)
    } else {
        Err(format!("{} is not a positive rate", value))
    }
}

impl Args {
    /// Config file contents, or defaults, with command-line flags on top.
    pub fn animator_config(&self) -> Result<AnimatorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                let content =
                    fs::read_to_string(path).map_err(|e| ConfigError::Read(path.clone(), e))?;
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(path.clone(), e))?
            }
            None => AnimatorConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AnimatorConfig) {
        if let Some([start, end]) = self.loop_window.as_deref() {
            config.loop_start = *start;
            config.loop_end = *end;
            config.looping = true;
        }
        if self.no_loop {
            config.looping = false;
        }
        if let Some(speed) = self.speed {
            config.playback_speed = speed;
        }
        if let Some(animation) = self.animation {
            config.animation = animation;
        }
    }
}

#[cfg(test)]
mod test {
    use std::{env, fs, path::PathBuf};

    use clap::{error::ErrorKind, Parser};
    use skinning::animator::AnimatorConfig;

    use super::{Args, ConfigError};

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["skinning-headless", "fox.glb"]).unwrap();
        assert_eq!(args.model, PathBuf::from("fox.glb"));
        assert_eq!(args.frames, 120);
        assert_eq!(args.fps, 60.0);
        assert_eq!(args.animator_config().unwrap(), AnimatorConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "skinning-headless",
            "--loop",
            "1",
            "3.5",
            "fox.glb",
            "--speed",
            "0.5",
            "--animation",
            "2",
            "--frames",
            "10",
        ])
        .unwrap();
        let config = args.animator_config().unwrap();
        assert_eq!(config.loop_start, 1.0);
        assert_eq!(config.loop_end, 3.5);
        assert!(config.looping);
        assert_eq!(config.playback_speed, 0.5);
        assert_eq!(config.animation, 2);
        assert_eq!(args.frames, 10);

        let args = Args::try_parse_from(["skinning-headless", "fox.glb", "--no-loop"]).unwrap();
        assert!(!args.animator_config().unwrap().looping);
    }

    #[test]
    fn test_config_file_under_flags() {
        let path = env::temp_dir().join(format!("skinning-headless-{}.json", std::process::id()));
        fs::write(&path, r#"{ "loop_end": 4.0, "playback_speed": 2.0 }"#).unwrap();
        let args = Args::try_parse_from([
            "skinning-headless",
            "fox.glb",
            "--config",
            path.to_str().unwrap(),
            "--speed",
            "3",
        ])
        .unwrap();
        let config = args.animator_config();
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.loop_start, 0.5);
        assert_eq!(config.loop_end, 4.0);
        assert_eq!(config.playback_speed, 3.0);
    }

    #[test]
    fn test_config_json_fills_missing_fields() {
        let config: AnimatorConfig =
            serde_json::from_str(r#"{ "loop_end": 4.0, "looping": false }"#).unwrap();
        assert_eq!(config.loop_start, 0.5);
        assert_eq!(config.loop_end, 4.0);
        assert!(!config.looping);
        assert_eq!(config.playback_speed, 1.0);
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::try_parse_from([
            "skinning-headless",
            "fox.glb",
            "--config",
            "/nonexistent/animator.json",
        ])
        .unwrap();
        assert!(matches!(
            args.animator_config(),
            Err(ConfigError::Read(_, _))
        ));
    }

    #[test]
    fn test_bad_arguments() {
        let kind = |args: &[&str]| Args::try_parse_from(args).unwrap_err().kind();
        assert_eq!(
            kind(&["skinning-headless"]),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            kind(&["skinning-headless", "fox.glb", "--frames", "many"]),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            kind(&["skinning-headless", "fox.glb", "--fps", "0"]),
            ErrorKind::ValueValidation
        );
        assert!(Args::try_parse_from(["skinning-headless", "fox.glb", "--loop", "1"]).is_err());
        assert_eq!(
            kind(&["skinning-headless", "fox.glb", "--verbose"]),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            kind(&["skinning-headless", "fox.glb", "other.glb"]),
            ErrorKind::UnknownArgument
        );
    }
}
