use anyhow::Context;
use deckvault_core::{Fit, OutputFormat, ResizeOptions, UploadOptions};

/// Initialize tracing for the CLI binary.
///
/// Logs go to stderr so stdout stays JSON. `RUST_LOG` sets the filter (default
/// `info`); `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Upload flags as given on the command line
#[derive(Debug, Default, Clone)]
pub struct UploadFlags {
    pub folder: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<String>,
    pub format: Option<String>,
    pub quality: Option<u8>,
    pub thumbnail: bool,
    pub public: bool,
}

impl UploadFlags {
    /// Build `UploadOptions`; `--fit` without `--width`/`--height` is rejected.
    pub fn into_options(self) -> anyhow::Result<UploadOptions> {
        let fit = self
            .fit
            .as_deref()
            .map(str::parse::<Fit>)
            .transpose()
            .context("--fit must be one of cover, contain, fill, inside, outside")?;
        let format = self
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .context("--format must be one of jpeg, png, webp")?;

        let resize = match (self.width, self.height) {
            (None, None) => {
                if fit.is_some() {
                    anyhow::bail!("--fit requires --width or --height");
                }
                None
            }
            (width, height) => Some(ResizeOptions {
                width,
                height,
                fit: fit.unwrap_or_default(),
            }),
        };

        Ok(UploadOptions {
            folder: self.folder,
            resize,
            quality: self.quality,
            format,
            generate_thumbnail: self.thumbnail,
            make_public: self.public,
        })
    }
}
