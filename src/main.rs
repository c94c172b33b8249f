use clap::{Parser, Subcommand};
use detail_gallery::generate::{self, HtmlSurface};
use detail_gallery::lightbox::Key;
use detail_gallery::render::{DetailView, InputEvent};
use detail_gallery::types::SeedImage;
use detail_gallery::{config, output, seeds, site};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Flags shared by commands that resolve a single page.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Page path, relative to the site root
    page: PathBuf,

    /// Extra seed image, as SRC or SRC=LABEL (repeatable, appended after the sidecar)
    #[arg(long = "seed", value_name = "SRC[=LABEL]")]
    seeds: Vec<String>,
}

impl PageArgs {
    fn extra_seeds(&self) -> Vec<SeedImage> {
        self.seeds.iter().map(|s| seeds::parse_seed_arg(s)).collect()
    }
}

#[derive(Parser)]
#[command(name = "detail-gallery")]
#[command(about = "Resolve and preview product detail-page galleries")]
#[command(long_about = "\
Resolve and preview product detail-page galleries

Each detail page declares a few images in a TOML sidecar next to it. When
fewer than two of them load, the gallery is filled in by probing shared image
directories named after the page's parent directory.

Site structure:

  site/
  ├── config.toml                    # Site config (optional, cascades to children)
  └── products/
      ├── shared/img/sofa/main.png   # Shared images, found by page key
      └── sofa/
          ├── index.html             # Detail page (page key: \"sofa\")
          ├── index.toml             # Seed sidecar: viewer + [[block]] images
          └── img/hero.jpg

Run 'detail-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a page's gallery and list it
    Resolve {
        #[command(flatten)]
        page: PageArgs,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a page, replay viewer events and write an HTML snapshot
    Render {
        #[command(flatten)]
        page: PageArgs,

        /// Select a gallery position, as a thumbnail click would (repeatable)
        #[arg(long = "select", value_name = "N")]
        select: Vec<usize>,

        /// Report the primary image as failed to load
        #[arg(long)]
        fail_primary: bool,

        /// Open the lightbox, at N or by clicking the current image
        #[arg(long, value_name = "N", num_args = 0..=1)]
        open: Option<Option<usize>>,

        /// Press Escape after everything else
        #[arg(long)]
        escape: bool,

        /// Write the snapshot here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Resolve every page in the site and summarise; broken pages are listed, not fatal
    /// Resolve every page in the site and summarise
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing(verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter =
        EnvFilter::from_default_env().add_directive(format!("detail_gallery={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Resolve { page, json } => {
            let resolved = site::resolve_page(&cli.site, &page.page, &page.extra_seeds()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved.resolution)?);
            } else {
                output::print_resolution(&resolved.page, &resolved.resolution);
            }
        }
        Command::Render {
            page,
            select,
            fail_primary,
            open,
            escape,
            output: out,
        } => {
            let resolved = site::resolve_page(&cli.site, &page.page, &page.extra_seeds()).await?;
            let config = &resolved.config;

            let mut view = DetailView::new(config.surface(), config.labels.clone());
            let mut surface = HtmlSurface::new(view.surface());
            surface.apply_all(&view.initial_commands());
            surface.apply_all(&view.load(resolved.resolution.gallery.clone()));

            for index in select {
                surface.apply_all(&view.handle(InputEvent::ThumbnailClicked(index)));
            }
            if fail_primary {
                surface.apply_all(&view.handle(InputEvent::PrimaryImageError));
            }
            match open {
                Some(Some(index)) => surface.apply_all(&view.open_lightbox(index)),
                Some(None) => surface.apply_all(&view.handle(InputEvent::FrameImageClicked)),
                None => {}
            }
            if escape {
                surface.apply_all(&view.handle(InputEvent::KeyPressed(Key::Escape)));
            }

            let title = resolved.resolution.page_key.clone();
            let document = surface.render_document(&title);
            match out {
                Some(path) => {
                    generate::write_snapshot(&path, document)?;
                    println!(
                        "{}",
                        output::format_render_summary(
                            &resolved.resolution,
                            &path,
                            view.lightbox().is_open()
                        )
                    );
                }
                None => println!("{}", document.into_string()),
            }
        }
        Command::Check => {
            let checks = site::check_site(&cli.site).await?;
            output::print_check_output(&checks);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
