pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fitroom")]
#[command(about = "Virtual try-on: extract product images and render garments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the product image URL from a retail page
    Extract {
        /// URL of the product page
        url: String,
    },
    /// Fetch a product image and write its bytes to disk
    Fetch {
        /// URL of the image to fetch
        url: String,

        /// Output file path
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Render a garment onto a person photo
    Tryon {
        /// Path to the person photo
        #[arg(long)]
        person: PathBuf,

        /// Garment: a local image file, a direct image URL, or a retail
        /// product page URL
        #[arg(long)]
        garment: String,

        /// Output file path for the composite
        #[arg(short, long, default_value = "tryon.png")]
        out: PathBuf,
    },
}
