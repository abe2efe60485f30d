use std::error::Error;
use std::ffi::CString;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use bpaf::Bpaf;
use minideck::Minideck;

mod media;

/// Utility for easily parsing hex colors from bpaf
#[derive(Debug, Clone, Hash)]
struct Color(pub [u8; 3]);
impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        f.write_str(&format!("#{r:02x}{g:02x}{b:02x}"))
    }
}
impl FromStr for Color {
    type Err = String;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        // parse hex string into rgb
        let mut hex = (*code).trim_start_matches('#').to_string();
        match hex.len() {
            3 => {
                // Extend 3 character hex colors
                hex = hex.chars().flat_map(|a| [a, a]).collect();
            },
            6 => {},
            l => return Err(format!("Invalid hex length for {code}: {l}")),
        }
        if let Ok(channel_bytes) = u32::from_str_radix(&hex, 16) {
            let r = ((channel_bytes >> 16) & 0xFF) as u8;
            let g = ((channel_bytes >> 8) & 0xFF) as u8;
            let b = (channel_bytes & 0xFF) as u8;
            Ok(Self([r, g, b]))
        } else {
            Err(format!("Invalid hex color: {code}"))
        }
    }
}

#[derive(Clone, Debug, Bpaf)]
enum Command {
    /// Set the global key backlight brightness
    #[bpaf(command)]
    Brightness {
        /// Brightness percentage [0-100]
        #[bpaf(positional("PERCENT"))]
        percent: u8,
    },
    /// Fill a key with a solid color
    #[bpaf(command)]
    Fill {
        /// Color to fill with
        #[bpaf(short, long, fallback(Color([255; 3])), display_fallback)]
        color: Color,
        /// Key to fill [0-5]
        #[bpaf(positional("KEY"))]
        key: u8,
    },
    /// Render an image onto a key
    #[bpaf(command, fallback_to_usage)]
    Image {
        /// Use nearest neighbor interpolation when resizing, otherwise uses gaussian
        #[bpaf(short('n'), long("nearest"))]
        nearest: bool,
        /// Optional background color for transparent images
        #[bpaf(short, long, fallback(Color([0; 3])), display_fallback)]
        bg: Color,
        /// Key to render onto [0-5]
        #[bpaf(positional("KEY"))]
        key: u8,
        /// Path to image to re-encode and upload
        #[bpaf(positional("PATH"), guard(|p| p.exists(), "file not found"))]
        path: PathBuf,
    },
    /// Clear keys back to black
    #[bpaf(command, fallback_to_usage)]
    Clear(#[bpaf(external(clear_args))] ClearArgs),
    /// Print key press and release events as they arrive
    #[bpaf(command)]
    Listen,
}

#[derive(Clone, Debug, Bpaf)]
enum ClearArgs {
    /// Clear every key
    All,
    Key(
        /// Key to clear [0-5]
        #[bpaf(positional("KEY"))]
        u8,
    ),
}

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version, descr(env!("CARGO_PKG_DESCRIPTION")))]
struct Cli {
    /// Open a specific hid device path instead of auto-detecting
    #[bpaf(long, argument("PATH"))]
    device: Option<String>,
    #[bpaf(external(command))]
    command: Command,
}

fn open_deck(path: Option<String>) -> Result<Minideck, Box<dyn Error>> {
    Ok(match path {
        Some(path) => Minideck::open_path(&CString::new(path)?)?,
        None => Minideck::open()?,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = cli().run();
    let mut deck = open_deck(cli.device)?;
    match cli.command {
        Command::Brightness { percent } => {
            deck.set_brightness(percent)?;
            println!("set brightness to {percent}%");
        },
        Command::Fill { color, key } => {
            let Color([r, g, b]) = color;
            deck.fill_color(key, r, g, b)?;
            println!("filled key {key} with {color}");
        },
        Command::Image {
            nearest,
            bg,
            key,
            path,
        } => {
            let image = ::image::open(path)?;
            let rgb = media::encode_image(image, bg.0, nearest);
            deck.fill_image(key, &rgb)?;
            println!("rendered image onto key {key}");
        },
        Command::Clear(ClearArgs::All) => {
            deck.clear_all_keys()?;
            println!("cleared all keys");
        },
        Command::Clear(ClearArgs::Key(key)) => {
            deck.clear_key(key)?;
            println!("cleared key {key}");
        },
        Command::Listen => loop {
            for event in deck.read_events(100)? {
                println!("{event}");
            }
        },
    }
    Ok(())
}
