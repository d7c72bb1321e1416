use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use url::Url;

use crate::app::{AppContext, FitroomError, Result};
use crate::encode::{self, ImagePart};
use crate::extractor::NOT_FOUND_MESSAGE;
use crate::tryon::TryOnClient;

pub async fn extract(ctx: &AppContext, url: &str) -> Result<()> {
    let result = ctx.extractor.extract(url).await;

    match result.image_url {
        Some(image_url) => {
            if let Some(title) = &result.title {
                println!("Title: {}", title);
            }
            println!("{}", image_url);
            Ok(())
        }
        None => Err(FitroomError::Extraction(
            result.error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
        )),
    }
}

pub async fn fetch_image(ctx: &AppContext, url: &str, out: &Path) -> Result<()> {
    let bytes = encode::fetch_image_bytes(ctx.transport.as_ref(), url).await?;
    fs::write(out, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

pub async fn tryon(ctx: &AppContext, person_path: &Path, garment: &str, out: &Path) -> Result<()> {
    let person = load_image_part(person_path)?;
    let garment_part = resolve_garment(ctx, garment).await?;

    let client = TryOnClient::new(&ctx.config.tryon)?;
    println!("Generating try-on composite...");
    let data_url = client.generate(&person, &garment_part).await?;

    let part = encode::parse_data_url(&data_url);
    let bytes = BASE64.decode(part.data.as_bytes())?;
    fs::write(out, &bytes)?;
    println!("Saved try-on composite to {}", out.display());
    Ok(())
}

/// Turn the garment argument into an encoded image: a local file is read
/// directly; a direct image URL is fetched; anything else is treated as
/// a product page and run through extraction first.
async fn resolve_garment(ctx: &AppContext, garment: &str) -> Result<ImagePart> {
    let path = Path::new(garment);
    if path.exists() {
        return load_image_part(path);
    }

    if !garment.starts_with("http") {
        return Err(FitroomError::Other(format!(
            "Garment {} is neither an existing file nor a URL",
            garment
        )));
    }

    let image_url = if is_direct_image_url(garment) {
        garment.to_string()
    } else {
        let result = ctx.extractor.extract(garment).await;
        match result.image_url {
            Some(url) => {
                if let Some(title) = &result.title {
                    println!("Product: {}", title);
                }
                url
            }
            None => {
                return Err(FitroomError::Extraction(
                    result.error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
                ))
            }
        }
    };

    let data = encode::image_to_base64(ctx.transport.as_ref(), &image_url).await?;
    Ok(ImagePart {
        mime_type: "image/png".to_string(),
        data,
    })
}

fn load_image_part(path: &Path) -> Result<ImagePart> {
    let bytes = fs::read(path)?;
    Ok(ImagePart {
        mime_type: mime_for_path(path).to_string(),
        data: BASE64.encode(&bytes),
    })
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

fn is_direct_image_url(url: &str) -> bool {
    const EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".gif"];
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().to_lowercase();
            EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("me.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("me.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("me")), "image/png");
    }

    #[test]
    fn test_is_direct_image_url() {
        assert!(is_direct_image_url("https://cdn.test/a/shirt.jpg"));
        assert!(is_direct_image_url("https://cdn.test/shirt.PNG?size=large"));
        assert!(!is_direct_image_url("https://shop.test/product/42"));
        assert!(!is_direct_image_url("not a url"));
    }

    #[test]
    fn test_load_image_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let part = load_image_part(&path).unwrap();
        assert_eq!(part.mime_type, "image/jpeg");
        assert_eq!(part.data, BASE64.encode([0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_load_image_part_missing_file() {
        assert!(load_image_part(Path::new("/nonexistent/photo.jpg")).is_err());
    }
}
