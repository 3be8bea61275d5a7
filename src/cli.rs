use mediapanel_layout::{DisplayState, MediaInfo, MediaShape};
use nalgebra_glm as glm;
use pico_args::Arguments;
use std::path::PathBuf;

pub const HELP: &str = "\
mediapanel

USAGE:
  mediapanel layout   --shape SHAPE [--width N --height N] [--state min|max]
                      [--config FILE] [--export FILE] [--material N]
  mediapanel pick     --shape SHAPE [...layout options] [--mesh FILE]
                      --origin X,Y,Z --direction X,Y,Z
  mediapanel playback --source FILE

SHAPES:
  image-2d, video-2d, panorama-180, image-360, video-360, spatial-video
  (or their numeric codes 0-5; anything else is unknown)

ENVIRONMENT:
  RUST_LOG  log filter, defaults to info
";

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutArgs {
    pub media: MediaInfo,
    pub state: DisplayState,
    pub config: Option<PathBuf>,
    pub material: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    Layout {
        layout: LayoutArgs,
        export: Option<PathBuf>,
    },
    Pick {
        layout: LayoutArgs,
        /// Picks against a previously exported mesh instead of generating one.
        mesh: Option<PathBuf>,
        origin: glm::Vec3,
        direction: glm::Vec3,
    },
    Playback {
        source: PathBuf,
    },
}

pub fn parse(mut args: Arguments) -> anyhow::Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    let command = match args.subcommand()?.as_deref() {
        Some("layout") => Command::Layout {
            layout: layout_args(&mut args)?,
            export: args.opt_value_from_os_str("--export", to_path)?,
        },
        Some("pick") => Command::Pick {
            layout: layout_args(&mut args)?,
            mesh: args.opt_value_from_os_str("--mesh", to_path)?,
            origin: args.value_from_fn("--origin", parse_vec3)?,
            direction: args.value_from_fn("--direction", parse_vec3)?,
        },
        Some("playback") => Command::Playback {
            source: args.value_from_os_str("--source", to_path)?,
        },
        Some(other) => anyhow::bail!("Unknown command '{}'", other),
        None => Command::Help,
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}", remaining);
    }
    Ok(command)
}

fn layout_args(args: &mut Arguments) -> anyhow::Result<LayoutArgs> {
    let shape: Option<MediaShape> = args.opt_value_from_str("--shape")?;
    let width: Option<u32> = args.opt_value_from_str("--width")?;
    let height: Option<u32> = args.opt_value_from_str("--height")?;
    Ok(LayoutArgs {
        media: MediaInfo::new(shape, width, height),
        state: args
            .opt_value_from_str("--state")?
            .unwrap_or(DisplayState::Minimized),
        config: args.opt_value_from_os_str("--config", to_path)?,
        material: args.opt_value_from_str("--material")?.unwrap_or(0),
    })
}

fn to_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

fn parse_vec3(s: &str) -> Result<glm::Vec3, String> {
    let components = s
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid vector '{}': {}", s, e))?;
    match components[..] {
        [x, y, z] => Ok(glm::vec3(x, y, z)),
        _ => Err(format!("Expected 3 components in '{}'", s)),
    }
}
