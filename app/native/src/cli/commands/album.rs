//! Album CLI commands.

use clap::Subcommand;
use serde_json::json;

use crate::album::{AlbumSource, Gallery, ImgurGallery, image_url};
use crate::cli::output::{format_bool, print_highlighted_json};
use crate::config;
use crate::error::AlbumwallError;

/// Album inspection commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum AlbumCommands {
    /// List the images of an album.
    ///
    /// Without a URL, the album from the configuration file is used.
    #[command(after_long_help = r#"Examples:
  albumwall album list
  albumwall album list https://imgur.com/a/abc123
  albumwall album list --json"#)]
    List {
        /// Album or gallery URL.
        url: Option<String>,

        /// Print the result as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Check whether a URL is a valid album URL and print its album id.
    Check {
        /// Album or gallery URL.
        url: String,
    },
}

/// Execute album subcommands.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the album cannot be fetched.
pub fn execute(cmd: &AlbumCommands) -> Result<(), AlbumwallError> {
    match cmd {
        AlbumCommands::List { url, json } => {
            let config = config::get_config();
            let url = url.as_deref().unwrap_or(&config.album.url);
            let gallery = ImgurGallery::new(config.network.timeout())?;
            list_images(&gallery, url, *json)
        }
        AlbumCommands::Check { url } => check_url(url),
    }
}

fn parse_source(url: &str) -> Result<AlbumSource, AlbumwallError> {
    AlbumSource::parse(url).map_err(|_| AlbumwallError::InvalidSource(url.to_string()))
}

fn list_images(gallery: &dyn Gallery, url: &str, as_json: bool) -> Result<(), AlbumwallError> {
    let source = parse_source(url)?;
    let ids = gallery.fetch_image_ids(&source)?;

    if as_json {
        let images: Vec<_> = ids.iter().map(|id| json!({ "id": id, "url": image_url(id) })).collect();
        print_highlighted_json(&json!({
            "url": source.url(),
            "albumId": source.id(),
            "images": images,
        }));
        return Ok(());
    }

    println!("Album {} ({} images)\n", source.id(), ids.len());
    for (i, id) in ids.iter().enumerate() {
        println!("  {:>3}. {id}  {}", i + 1, image_url(id));
    }

    Ok(())
}

fn check_url(url: &str) -> Result<(), AlbumwallError> {
    let source = parse_source(url);
    println!("{} {url}", format_bool(source.is_ok()));

    let source = source?;
    println!("Album id: {}", source.id());
    Ok(())
}
