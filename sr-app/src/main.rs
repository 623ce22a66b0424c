use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sr_app::{
    BodyRequest, CapeRequest, HeadRequest, HttpProvider, SkinService, SpriteRequest,
    StaticProvider, TextureProvider,
};
use sr_net::Profile;
use sr_utils::{PlayerSkinModel, RenderConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skinrender", version)]
struct Cli {
    /// TOML config file; `SKINRENDER_*` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Head icon: the face with its hat.
    Head(HeadArgs),
    /// Posed 3D body, with the cape when the player has one.
    Body(BodyArgs),
    /// Unfolded flat view of the whole player.
    Sprite(SpriteArgs),
    /// Flat cape.
    Cape(CapeArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Player name, UUID or direct skin URL.
    player: String,

    /// Read the skin from a local PNG instead of the profile services.
    #[arg(long)]
    skin_file: Option<PathBuf>,

    /// Local cape PNG, used with `--skin-file`.
    #[arg(long, requires = "skin_file")]
    cape_file: Option<PathBuf>,

    /// Output PNG path.
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct Size {
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Show the back instead of the front.
    #[arg(long, default_value_t = false)]
    flip: bool,
}

#[derive(Args, Debug)]
struct ModelArg {
    /// Force three-pixel arms.
    #[arg(long, conflicts_with = "classic")]
    slim: bool,
    /// Force four-pixel arms.
    #[arg(long)]
    classic: bool,
}

impl ModelArg {
    fn model(&self) -> Option<PlayerSkinModel> {
        match (self.slim, self.classic) {
            (true, _) => Some(PlayerSkinModel::Slim),
            (_, true) => Some(PlayerSkinModel::Classic),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
struct HeadArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    size: Size,
}

#[derive(Args, Debug)]
struct BodyArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    size: Size,
    #[command(flatten)]
    model: ModelArg,
    /// Degrees around the vertical axis.
    #[arg(long, allow_hyphen_values = true)]
    theta: Option<f32>,
    /// Degrees of elevation.
    #[arg(long, allow_hyphen_values = true)]
    phi: Option<f32>,
    /// Walk cycle time in seconds.
    #[arg(long, allow_hyphen_values = true)]
    time: Option<f32>,
}

#[derive(Args, Debug)]
struct SpriteArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    size: Size,
    #[command(flatten)]
    model: ModelArg,
}

#[derive(Args, Debug)]
struct CapeArgs {
    #[command(flatten)]
    source: Source,
    #[command(flatten)]
    size: Size,
}

impl Command {
    fn source(&self) -> &Source {
        match self {
            Command::Head(args) => &args.source,
            Command::Body(args) => &args.source,
            Command::Sprite(args) => &args.source,
            Command::Cape(args) => &args.source,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .without_time()
        .compact()
        .init();

    let cli = Cli::parse();
    let config = RenderConfig::load(cli.config.as_deref())?;

    let source = cli.cmd.source();
    match &source.skin_file {
        Some(skin_file) => {
            let provider = local_provider(&source.player, skin_file, source.cape_file.as_deref())?;
            run(SkinService::new(provider, config), &cli.cmd).await
        }
        None => {
            let provider = HttpProvider::new(&config)?;
            run(SkinService::new(provider, config), &cli.cmd).await
        }
    }
}

fn read_png(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let bytes = std::fs::read(path).with_context(|| format!("read png '{}'", path.display()))?;
    Ok((format!("file://{}", path.display()), bytes))
}

/// Serves `player` from local files.
fn local_provider(
    player: &str,
    skin_file: &Path,
    cape_file: Option<&Path>,
) -> anyhow::Result<StaticProvider> {
    let (skin_url, skin) = read_png(skin_file)?;
    let mut provider = StaticProvider::new().with_texture(skin_url.clone(), skin);
    let cape_url = match cape_file {
        Some(path) => {
            let (url, cape) = read_png(path)?;
            provider = provider.with_texture(url.clone(), cape);
            Some(url)
        }
        None => None,
    };
    Ok(provider.with_profile(Profile {
        id: "local".to_string(),
        name: player.to_string(),
        skin_url,
        cape_url,
        model: PlayerSkinModel::Classic,
    }))
}

async fn run<P: TextureProvider>(service: SkinService<P>, cmd: &Command) -> anyhow::Result<()> {
    let player = cmd.source().player.as_str();
    let png = match cmd {
        Command::Head(args) => {
            let request = HeadRequest {
                width: args.size.width,
                height: args.size.height,
                flip: args.size.flip,
            };
            service.render_head(player, &request).await?
        }
        Command::Body(args) => {
            let request = BodyRequest {
                width: args.size.width,
                height: args.size.height,
                theta: args.theta,
                phi: args.phi,
                time: args.time,
                model: args.model.model(),
                flip: args.size.flip,
            };
            service.render_body(player, &request).await?
        }
        Command::Sprite(args) => {
            let request = SpriteRequest {
                width: args.size.width,
                height: args.size.height,
                model: args.model.model(),
                flip: args.size.flip,
            };
            service.render_full_skin(player, &request).await?
        }
        Command::Cape(args) => {
            let request = CapeRequest {
                width: args.size.width,
                height: args.size.height,
                flip: args.size.flip,
            };
            service.render_cape(player, &request).await?
        }
    };

    let out = &cmd.source().out;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &png).with_context(|| format!("write png '{}'", out.display()))?;
    info!("wrote {} ({} bytes)", out.display(), png.len());
    Ok(())
}
